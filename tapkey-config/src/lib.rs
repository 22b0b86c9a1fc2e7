use std::ops::Range;

use tapkey_common::ActionCode;

pub mod describe;
pub mod expr;
pub mod heatmap;
pub mod keycodes;

pub use describe::describe;
pub use expr::parse_action;

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub span: Option<Range<usize>>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}\n    at: ({:?})", &self.message, span),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl From<&str> for ConfigError {
    fn from(err: &str) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl From<String> for ConfigError {
    fn from(message: String) -> Self {
        Self {
            message,
            span: None,
        }
    }
}

impl ConfigError {
    pub fn new(message: String, span: Range<usize>) -> Self {
        Self {
            message,
            span: Some(span),
        }
    }

    /// The byte span converted to a char span for the report renderer.
    fn char_span(&self, source: &str) -> Option<Range<usize>> {
        let span = self.span.clone()?;
        let to_char = |byte: usize| source[..byte.min(source.len())].chars().count();
        let start = to_char(span.start);
        Some(start..to_char(span.end).max(start + 1))
    }

    /// One based line and zero based column of the span start, and the byte range of its line.
    pub fn line_col_slice(&self, source: &str) -> (usize, usize, (usize, usize)) {
        let mut line = 1;
        let mut col = 0;
        let mut sol = 0;
        let Some(span) = self.span.clone() else {
            return (0, 0, (0, 0));
        };

        for (i, c) in source.char_indices() {
            match c {
                '\n' => {
                    if i < span.start {
                        line += 1;
                        col = 0;
                        sol = i + 1;
                    } else {
                        return (line, col, (sol, i));
                    }
                }
                _ if i < span.start => {
                    col += 1;
                }
                _ => {}
            }
        }
        (line, col, (sol, source.len()))
    }
}

/// Parse `src`, printing a labelled report to stderr when it is not a valid action.
pub fn pretty_parse(label: &str, src: &str) -> Result<ActionCode, ConfigError> {
    match parse_action(src) {
        Ok(code) => Ok(code),
        Err(err) => {
            use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
            let mut colors = ColorGenerator::new();

            let a = colors.next();
            if let Some(span) = err.char_span(src) {
                let printed = Report::build(ReportKind::Error, label, span.start)
                    .with_message("Invalid action".to_string())
                    .with_label(
                        Label::new((label, span))
                            .with_message(&err.message)
                            .with_color(a),
                    )
                    .finish()
                    .eprint((label, Source::from(src)));
                if let Err(err) = printed {
                    log::warn!("could not print report: {err}");
                }
            }
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
