use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{fs, path::PathBuf, process};
use tapkey_config::{
    describe,
    heatmap::HeatmapDump,
    keycodes::{self, Kind, Mnemonic},
    pretty_parse,
};
use tapkey_common::ActionCode;

use anyhow::{anyhow, Result};

/// Inspect tapkey keymaps and heatmaps
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List action mnemonics
    Keycodes(KeycodesArgs),
    /// Describe action codes
    Decode(DecodeArgs),
    /// Convert action expressions to action codes
    Encode(EncodeArgs),
    /// Show the press counts in a dump of the keyboard's record
    Heatmap(HeatmapArgs),
}

#[derive(Copy, Clone, ValueEnum)]
enum CodeType {
    Basic,
    Modifier,
    Consumer,
    System,
    Mouse,
    Backlight,
    Command,
}

impl CodeType {
    fn kind(self) -> Kind {
        match self {
            CodeType::Basic => Kind::Basic,
            CodeType::Modifier => Kind::Modifier,
            CodeType::Consumer => Kind::Consumer,
            CodeType::System => Kind::System,
            CodeType::Mouse => Kind::Mouse,
            CodeType::Backlight => Kind::Backlight,
            CodeType::Command => Kind::Command,
        }
    }
}

#[derive(Args)]
struct KeycodesArgs {
    /// Include the action code hex value
    #[clap(long)]
    codes: bool,

    /// Sort results by action code; Defaults to sorting by name
    #[clap(long, short)]
    sort_by_code: bool,

    /// Limit to mnemonic type
    #[clap(long, short)]
    code_type: Option<CodeType>,

    /// Only list names that contain pattern (case insensitive). A pattern starting with 0x lists
    /// the names of that action code.
    #[clap()]
    pattern: Option<String>,
}

#[derive(Args)]
struct DecodeArgs {
    /// Action codes in hex, with or without a 0x prefix
    #[clap(required = true)]
    codes: Vec<String>,
}

#[derive(Args)]
struct EncodeArgs {
    /// Read expressions from a file, one per line; `#` starts a comment
    #[clap(long, short)]
    file: Option<PathBuf>,

    /// Action expressions such as "MT(LCTRL, a)" or "LT(2, tab)"
    exprs: Vec<String>,
}

#[derive(Args)]
struct HeatmapArgs {
    /// Record dump read from the keyboard's storage
    file: PathBuf,

    /// Positions per matrix row
    #[clap(long, default_value_t = 16)]
    cols: usize,

    /// Number of positions to show; Defaults to every position in the dump
    #[clap(long, short)]
    keys: Option<usize>,

    /// List positions from most to least pressed
    #[clap(long, short)]
    sorted: bool,

    /// With --sorted, only show this many positions
    #[clap(long, short)]
    top: Option<usize>,
}

fn parse_hex(v: &str) -> Result<u16> {
    let lower = v.to_lowercase();
    u16::from_str_radix(lower.strip_prefix("0x").unwrap_or(&lower), 16)
        .map_err(|_| anyhow!("Invalid hex number {v:?}"))
}

fn list_keycodes(args: &KeycodesArgs) -> Result<()> {
    let iter = keycodes::mnemonics().filter(|m| match args.code_type {
        Some(t) => m.kind == t.kind(),
        None => true,
    });
    let mut list: Vec<&Mnemonic> = if let Some(pattern) = &args.pattern {
        let pattern = pattern.to_lowercase();
        if pattern.starts_with("0x") {
            let code = ActionCode(parse_hex(&pattern)?);
            iter.filter(|m| m.code == code).collect()
        } else {
            iter.filter(|m| m.name.to_lowercase().contains(pattern.as_str()))
                .collect()
        }
    } else {
        iter.collect()
    };
    if args.sort_by_code {
        list.sort_by(|a, b| a.code.cmp(&b.code).then(a.name.cmp(b.name)));
    } else {
        list.sort_by_key(|m| m.name.to_lowercase());
    }

    if !args.codes {
        for m in list {
            println!("{}", m.name);
        }
    } else if args.sort_by_code {
        for group in list.chunk_by(|a, b| a.code == b.code) {
            let names: Vec<&str> = group.iter().map(|m| m.name).collect();
            print_code(group[0].code, &names.join(", "));
        }
    } else {
        for m in list {
            print_code(m.code, m.name);
        }
    }
    Ok(())
}

fn print_code(code: ActionCode, name: &str) {
    println!("{:04X}: {name}", code.0);
}

fn decode(args: &DecodeArgs) -> Result<()> {
    for v in &args.codes {
        let code = ActionCode(parse_hex(v)?);
        println!("{:04X}: {}", code.0, describe(code));
    }
    Ok(())
}

/// Expressions from `src`: one per line, skipping blank lines and comments.
fn file_exprs(src: &str) -> impl Iterator<Item = &str> {
    src.lines()
        .map(|l| l.split('#').next().unwrap_or_default().trim())
        .filter(|l| !l.is_empty())
}

fn encode(args: &EncodeArgs) -> Result<()> {
    let mut failed = 0;
    let mut encode_one = |label: &str, src: &str| match pretty_parse(label, src) {
        Ok(code) => println!("{:04X}: {}", code.0, describe(code)),
        Err(_) => failed += 1,
    };

    if let Some(file) = &args.file {
        let src = fs::read_to_string(file)
            .map_err(|err| anyhow!("Failed to read \"{}\"!\n    {err}", file.display()))?;
        let label = file.display().to_string();
        for expr in file_exprs(&src) {
            encode_one(&label, expr);
        }
    }
    for expr in &args.exprs {
        encode_one("<arg>", expr);
    }

    if failed > 0 {
        Err(anyhow!("{failed} invalid expression(s)"))
    } else {
        Ok(())
    }
}

fn heatmap(args: &HeatmapArgs) -> Result<()> {
    let mut dump = HeatmapDump::read(&args.file)
        .map_err(|err| anyhow!("Failed to read \"{}\"!\n    {err}", args.file.display()))?;
    if let Some(keys) = args.keys {
        dump.counts.resize(keys, 0);
    }

    println!(
        "bluetooth id: {}, positions: {}, presses: {}",
        dump.bluetooth_id,
        dump.counts.len(),
        dump.total()
    );
    if args.sorted {
        print!("{}", dump.render_sorted(args.cols, args.top));
    } else {
        print!("{}", dump.render_matrix(args.cols));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if let Err(message) = run(&cli) {
        eprintln!("{message}");
        process::exit(1);
    };
}

fn run(cli: &Cli) -> Result<()> {
    log::debug!("tapkey-config {}", env!("CARGO_PKG_VERSION"));
    match &cli.command {
        Commands::Keycodes(args) => list_keycodes(args),
        Commands::Decode(args) => decode(args),
        Commands::Encode(args) => encode(args),
        Commands::Heatmap(args) => heatmap(args),
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn hex_arguments() {
        assert_eq!(parse_hex("0x2104").unwrap(), 0x2104);
        assert_eq!(parse_hex("A42B").unwrap(), 0xa42b);
        assert!(parse_hex("0xg").is_err());
        assert!(parse_hex("12345").is_err());
    }

    #[test]
    fn expression_file_lines() {
        let src = "# base layer\n a \n\nMT(LCTRL, b) # home row\n";

        assert_eq!(file_exprs(src).collect::<Vec<_>>(), vec!["a", "MT(LCTRL, b)"]);
    }

    #[test]
    fn encode_reports_bad_expressions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\nLT(99, b)\nnosuch").unwrap();

        let err = encode(&EncodeArgs {
            file: Some(file.path().to_owned()),
            exprs: vec!["TT(1)".into()],
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "2 invalid expression(s)");
    }

    #[test]
    fn heatmap_pads_to_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let dump = HeatmapDump {
            bluetooth_id: 1,
            counts: vec![4, 2],
        };
        file.write_all(&dump.to_bytes()).unwrap();

        assert!(heatmap(&HeatmapArgs {
            file: file.path().to_owned(),
            cols: 2,
            keys: Some(4),
            sorted: true,
            top: None,
        })
        .is_ok());
        assert!(heatmap(&HeatmapArgs {
            file: file.path().with_extension("missing"),
            cols: 2,
            keys: None,
            sorted: false,
            top: None,
        })
        .is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["tapkey-config", "-v", "keycodes", "-c", "mouse", "wheel"])
            .unwrap();
        assert!(cli.verbose);
        let Commands::Keycodes(args) = cli.command else {
            panic!("expected keycodes");
        };
        assert!(matches!(args.code_type, Some(CodeType::Mouse)));
        assert_eq!(args.pattern.as_deref(), Some("wheel"));

        assert!(Cli::try_parse_from(["tapkey-config", "decode"]).is_err());
    }
}
