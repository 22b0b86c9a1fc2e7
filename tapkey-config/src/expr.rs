//! Action expressions: the text form of an [ActionCode].
//!
//! ```text
//! a  Spacebar  volu  ms_ul  0x1234     mnemonic or raw code
//! C(S(a))  RA(e)                        key with ctrl/shift/alt/gui, R* for right hand
//! MT(LCTRL|LSHIFT, esc)                 mods when held, key when tapped
//! LT(2, tab)  TT(3)  LM(1, LGUI)        layer-tap, tap-toggle, layer + mods
//! BT(3)  MACRO(12)  CONSUMER(0x0e9)  SYSTEM(0x82)  BUTTONS(0x03)
//! ```

use std::ops::Range;

use tapkey_common::{
    action_code::{BLUETOOTH_IDS, OP_TAP_TOGGLE},
    keycodes::key_range,
    ActionCode, Mods,
};

use crate::{keycodes, ConfigError};

pub const MAX_LAYER: u32 = 31;
pub const MAX_MACRO: u32 = 0xfff;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Token<'s> {
    Word(&'s str),
    Open,
    Close,
    Comma,
    Bar,
    End,
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Parse one action expression.
pub fn parse_action(src: &str) -> Result<ActionCode> {
    let mut p = Parser { src, pos: 0 };
    let code = p.action()?;
    match p.next() {
        (Token::End, _) => Ok(code),
        (_, span) => Err(ConfigError::new("unexpected input".into(), span)),
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '|')
}

fn parse_number(word: &str) -> Option<u32> {
    match word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None if word.bytes().all(|b| b.is_ascii_digit()) => word.parse().ok(),
        None => None,
    }
}

fn wrapper_mods(name: &str) -> Option<Mods> {
    Some(match name.to_ascii_uppercase().as_str() {
        "C" => Mods::CTRL,
        "S" => Mods::SHIFT,
        "A" => Mods::ALT,
        "G" => Mods::GUI,
        "RC" => Mods::CTRL.union(Mods::RIGHT),
        "RS" => Mods::SHIFT.union(Mods::RIGHT),
        "RA" => Mods::ALT.union(Mods::RIGHT),
        "RG" => Mods::GUI.union(Mods::RIGHT),
        _ => return None,
    })
}

fn combine(a: Mods, b: Mods, span: &Range<usize>) -> Result<Mods> {
    if !a.is_empty() && !b.is_empty() && a.is_right() != b.is_right() {
        return Err(ConfigError::new(
            "left and right hand modifiers cannot be mixed".into(),
            span.clone(),
        ));
    }
    Ok(a.union(b))
}

impl<'s> Parser<'s> {
    fn skip_space(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> (Token<'s>, Range<usize>) {
        let pos = self.pos;
        let ans = self.next();
        self.pos = pos;
        ans
    }

    fn next(&mut self) -> (Token<'s>, Range<usize>) {
        self.skip_space();
        let start = self.pos;
        let rest = &self.src[start..];
        let Some(c) = rest.chars().next() else {
            return (Token::End, start..start);
        };
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            '|' => Token::Bar,
            _ => {
                let len = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
                self.pos += len;
                return (Token::Word(&rest[..len]), start..self.pos);
            }
        };
        self.pos += 1;
        (token, start..self.pos)
    }

    fn expect(&mut self, want: Token<'static>, what: &str) -> Result<()> {
        let (token, span) = self.next();
        if token == want {
            Ok(())
        } else {
            Err(ConfigError::new(format!("expected {what}"), span))
        }
    }

    fn word(&mut self, what: &str) -> Result<(&'s str, Range<usize>)> {
        match self.next() {
            (Token::Word(w), span) => Ok((w, span)),
            (_, span) => Err(ConfigError::new(format!("expected {what}"), span)),
        }
    }

    fn number(&mut self, what: &str, max: u32) -> Result<u32> {
        let (w, span) = self.word(what)?;
        match parse_number(w) {
            Some(n) if n <= max => Ok(n),
            Some(n) => Err(ConfigError::new(
                format!("{what} {n} out of range 0..={max}"),
                span,
            )),
            None => Err(ConfigError::new(format!("expected {what}"), span)),
        }
    }

    fn action(&mut self) -> Result<ActionCode> {
        let (w, span) = self.word("an action")?;
        if self.peek().0 == Token::Open {
            return self.call(w, span);
        }
        if let Some(m) = keycodes::lookup(w) {
            return Ok(m.code);
        }
        match parse_number(w) {
            Some(n) if n <= u16::MAX as u32 => Ok(ActionCode(n as u16)),
            Some(_) => Err(ConfigError::new("code larger than 0xffff".into(), span)),
            None => Err(ConfigError::new(format!("unknown key name {w:?}"), span)),
        }
    }

    fn call(&mut self, name: &'s str, span: Range<usize>) -> Result<ActionCode> {
        if let Some(mods) = wrapper_mods(name) {
            let (mods, kc) = self.wrapped(mods, span)?;
            return Ok(ActionCode::mods_key(mods, kc));
        }

        self.expect(Token::Open, "(")?;
        let code = match name.to_ascii_uppercase().as_str() {
            "MT" => {
                let mods = self.mods()?;
                self.expect(Token::Comma, ",")?;
                let tap = self.tap_key()?;
                ActionCode::mods_tap(mods, tap)
            }
            "LT" => {
                let layer = self.number("layer", MAX_LAYER)? as u8;
                self.expect(Token::Comma, ",")?;
                let start = self.peek().1.start;
                let tap = self.tap_key()?;
                if tap == OP_TAP_TOGGLE || (0xc0..=0xdf).contains(&tap) {
                    return Err(ConfigError::new(
                        format!("key 0x{tap:02x} cannot be a layer-tap key"),
                        start..self.pos,
                    ));
                }
                ActionCode::layer_tap(layer, tap)
            }
            "TT" => ActionCode::layer_tap_toggle(self.number("layer", MAX_LAYER)? as u8),
            "LM" => {
                let layer = self.number("layer", MAX_LAYER)? as u8;
                self.expect(Token::Comma, ",")?;
                ActionCode::layer_mods(layer, self.mods()?)
            }
            "BT" => {
                ActionCode::bluetooth(self.number("bluetooth id", BLUETOOTH_IDS as u32 - 1)? as u8)
            }
            "MACRO" | "M" => ActionCode::user_macro(self.number("macro", MAX_MACRO)? as u16),
            "CONSUMER" => ActionCode::consumer(
                self.number("usage", key_range::USAGE_MAX as u32)? as u16,
            ),
            "SYSTEM" => {
                ActionCode::system(self.number("usage", key_range::USAGE_MAX as u32)? as u16)
            }
            "BUTTONS" => ActionCode::mouse_button(self.number("buttons", 0xff)? as u8),
            _ => {
                return Err(ConfigError::new(
                    format!("unknown function {name:?}"),
                    span,
                ))
            }
        };
        self.expect(Token::Close, ")")?;
        Ok(code)
    }

    /// `(` key `)` after a modifier wrapper.
    fn wrapped(&mut self, mods: Mods, span: Range<usize>) -> Result<(Mods, u8)> {
        self.expect(Token::Open, "(")?;
        let (inner, kc) = self.key()?;
        self.expect(Token::Close, ")")?;
        Ok((combine(mods, inner, &span)?, kc))
    }

    fn key(&mut self) -> Result<(Mods, u8)> {
        let (w, span) = self.word("a key")?;
        if self.peek().0 == Token::Open {
            return match wrapper_mods(w) {
                Some(mods) => self.wrapped(mods, span),
                None => Err(ConfigError::new(
                    format!("{w} is not a modifier wrapper"),
                    span,
                )),
            };
        }
        if let Some(kc) = keycodes::keycode(w) {
            return Ok((Mods::NONE, kc));
        }
        match parse_number(w) {
            Some(n) if n <= 0xff => Ok((Mods::NONE, n as u8)),
            _ => Err(ConfigError::new(format!("{w:?} is not a keyboard key"), span)),
        }
    }

    fn tap_key(&mut self) -> Result<u8> {
        let start = self.peek().1.start;
        let (mods, kc) = self.key()?;
        if mods.bits() != 0 {
            return Err(ConfigError::new(
                "a tap key cannot carry modifiers".into(),
                start..self.pos,
            ));
        }
        Ok(kc)
    }

    /// Modifier keys joined with `|`, or raw mods bits.
    fn mods(&mut self) -> Result<Mods> {
        let (w, span) = self.word("modifiers")?;
        if let Some(n) = parse_number(w) {
            if n > Mods::MASK as u32 {
                return Err(ConfigError::new(
                    format!("modifier bits {n:#x} out of range"),
                    span,
                ));
            }
            return Ok(Mods::from_bits(n as u8));
        }

        let mut mods = Mods::NONE;
        let (mut w, mut span) = (w, span);
        loop {
            let Some(m) = keycodes::keycode(w).and_then(Mods::from_modifier_key) else {
                return Err(ConfigError::new(format!("{w:?} is not a modifier"), span));
            };
            mods = combine(mods, m, &span)?;
            if self.peek().0 != Token::Bar {
                return Ok(mods);
            }
            self.next();
            (w, span) = self.word("a modifier")?;
        }
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod test;
