//! Bulletin board system colour codes
//!
//! Before ANSI art took over, every BBS package had its own in-line colour
//! syntax. Eight of them are recognised here:
//!
//! | Dialect     | Code                 | Example   |
//! |-------------|----------------------|-----------|
//! | ANSI        | `ESC [`              | detection only |
//! | Celerity    | `\|` + letter        | `\|B`     |
//! | PCBoard     | `@X` + bg/fg hex     | `@X1F`    |
//! | Renegade    | `\|` + 00-23         | `\|07`    |
//! | Telegard    | `` ` `` + bg/fg hex  | `` `1F `` |
//! | Wildcat!    | `@` + bg/fg hex + `@`| `@1F@`    |
//! | WWIV #      | `\|#` + 0-9          | `\|#3`    |
//! | WWIV ♥      | ETX + 0-9            | `\x033`   |
//!
//! Celerity and Renegade share the `|` prefix and are told apart by what
//! follows it.

pub mod parser;

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::term::parser::{find, CSI};

pub use parser::{Code, Field};

/// PCBoard clear screen control, often left at the top of ANSI files
pub const CLEAR_SCREEN: &[u8] = b"@CLS@";

/// Celerity colour letters; `S` swaps between foreground and background
pub const CELERITY_CODES: &[u8] = b"kbgcrmywdBGCRMYWS";

const ETX: u8 = 0x03;
const ESC: u8 = 0x1b;

/// BBS errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BbsError {
    #[error("no bbs color codes found")]
    NoCodes,

    #[error("ansi escape code found")]
    Ansi,
}

pub type Result<T> = std::result::Result<T, BbsError>;

/// In-line colour code format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// ANSI escape sequences
    Ansi,
    /// Celerity pipe codes
    Celerity,
    /// PCBoard @X codes
    PCBoard,
    /// Renegade pipe codes
    Renegade,
    /// Telegard grave accent codes
    Telegard,
    /// Wildcat! @ codes
    Wildcat,
    /// WWIV # codes
    WwivHash,
    /// WWIV ♥ codes
    WwivHeart,
}

impl Dialect {
    pub const ALL: [Dialect; 8] = [
        Dialect::Ansi,
        Dialect::Celerity,
        Dialect::PCBoard,
        Dialect::Renegade,
        Dialect::Telegard,
        Dialect::Wildcat,
        Dialect::WwivHash,
        Dialect::WwivHeart,
    ];

    /// Dialects probed when a line has no bare `|`, in priority order
    const NON_PIPE: [Dialect; 5] = [
        Dialect::PCBoard,
        Dialect::Telegard,
        Dialect::Wildcat,
        Dialect::WwivHash,
        Dialect::WwivHeart,
    ];

    /// Toggle sequence that introduces a code
    pub fn prefix(&self) -> &'static [u8] {
        match self {
            Dialect::Ansi => CSI,
            Dialect::Celerity | Dialect::Renegade => b"|",
            Dialect::PCBoard => b"@X",
            Dialect::Telegard => b"`",
            Dialect::Wildcat => b"@",
            Dialect::WwivHash => b"|#",
            Dialect::WwivHeart => &[ETX],
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Ansi => "ANSI",
            Dialect::Celerity => "Celerity",
            Dialect::PCBoard => "PCBoard",
            Dialect::Renegade => "Renegade",
            Dialect::Telegard => "Telegard",
            Dialect::Wildcat => "Wildcat!",
            Dialect::WwivHash => "WWIV #",
            Dialect::WwivHeart => "WWIV ♥",
        }
    }

    /// Command line identifier
    pub fn id(&self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::Celerity => "celerity",
            Dialect::PCBoard => "pcboard",
            Dialect::Renegade => "renegade",
            Dialect::Telegard => "telegard",
            Dialect::Wildcat => "wildcat",
            Dialect::WwivHash => "wwiv-hash",
            Dialect::WwivHeart => "wwiv-heart",
        }
    }

    /// Look a dialect up by its identifier or name, ignoring case.
    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(s) || d.name().eq_ignore_ascii_case(s))
    }

    /// Decode the code at the start of `bytes`, returning it and its length.
    ///
    /// This is the single width and range check shared by detection and
    /// splitting. ANSI has no BBS code and always returns `None`.
    pub fn code_at(&self, bytes: &[u8]) -> Option<(Code, usize)> {
        let rest = bytes.strip_prefix(self.prefix())?;
        match self {
            Dialect::Ansi => None,
            Dialect::Celerity => {
                let &c = rest.first()?;
                CELERITY_CODES.contains(&c).then_some((Code::Celerity(c), 2))
            }
            Dialect::Renegade => {
                let &[tens, ones, ..] = rest else { return None };
                let n = decimal(tens)? * 10 + decimal(ones)?;
                (n <= 23).then_some((Code::Bar(n), 3))
            }
            Dialect::PCBoard | Dialect::Telegard => {
                let code = hex_pair(rest)?;
                Some((code, self.prefix().len() + 2))
            }
            Dialect::Wildcat => {
                let code = hex_pair(rest)?;
                (rest.get(2) == Some(&b'@')).then_some((code, 4))
            }
            Dialect::WwivHash | Dialect::WwivHeart => {
                let n = decimal(*rest.first()?)?;
                Some((Code::Bar(n), self.prefix().len() + 1))
            }
        }
    }

    /// Returns true if `bytes` holds at least one valid code of this dialect.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        if *self == Dialect::Ansi {
            return find(bytes, CSI).is_some();
        }
        let first = self.prefix()[0];
        bytes
            .iter()
            .enumerate()
            .any(|(i, &b)| b == first && self.code_at(&bytes[i..]).is_some())
    }
}

impl fmt::Display for Dialect {
    /// Name and toggle sequence, e.g. `PCBoard @X`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let toggle = match self {
            Dialect::Ansi => "←[",
            Dialect::Celerity | Dialect::Renegade => "|",
            Dialect::PCBoard => "@X",
            Dialect::Telegard => "`",
            Dialect::Wildcat => "@@",
            Dialect::WwivHash => "|#",
            Dialect::WwivHeart => return f.write_str(self.name()),
        };
        write!(f, "{} {}", self.name(), toggle)
    }
}

fn decimal(b: u8) -> Option<u8> {
    b.is_ascii_digit().then(|| b - b'0')
}

fn hex(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|n| n as u8)
}

/// Background and foreground nibbles
fn hex_pair(bytes: &[u8]) -> Option<Code> {
    let &[bg, fg, ..] = bytes else { return None };
    Some(Code::Hex {
        background: hex(bg)?,
        foreground: hex(fg)?,
    })
}

/// Trim ASCII whitespace from both ends.
fn trim(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

/// True when the line holds a `|` that is not the start of a WWIV `|#` code.
fn has_bare_pipe(line: &[u8]) -> bool {
    line.iter()
        .enumerate()
        .any(|(i, &b)| b == b'|' && line.get(i + 1) != Some(&b'#'))
}

/// Detect the dialect of a single line.
///
/// Once a line shows the shared `|` prefix only Renegade and Celerity are
/// tried, even if another dialect would match further along.
fn detect_line(line: &[u8]) -> Option<Dialect> {
    if line.contains(&ESC) && Dialect::Ansi.matches(line) {
        return Some(Dialect::Ansi);
    }
    if has_bare_pipe(line) {
        return [Dialect::Renegade, Dialect::Celerity]
            .into_iter()
            .find(|d| d.matches(line));
    }
    Dialect::NON_PIPE.into_iter().find(|d| d.matches(line))
}

/// Find the first colour code format used in `src`.
///
/// Lines are probed in order and the first line with a recognisable code
/// decides the dialect. Returns `None` for text without any codes.
pub fn detect(src: &[u8]) -> Option<Dialect> {
    for (n, line) in src.split(|&b| b == b'\n').enumerate() {
        let trimmed = trim(line);
        if trimmed.is_empty() {
            continue;
        }
        let line = match trimmed.strip_prefix(CLEAR_SCREEN) {
            Some(rest) if !rest.is_empty() => rest,
            _ => line,
        };
        if let Some(dialect) = detect_line(line) {
            debug!(line = n + 1, %dialect, "detected colour codes");
            return Some(dialect);
        }
    }
    None
}

/// Detect the dialect of `src` and split it into code fields.
pub fn fields(src: &str) -> Result<(Dialect, Vec<Field<'_>>)> {
    match detect(src.as_bytes()) {
        None => Err(BbsError::NoCodes),
        Some(Dialect::Ansi) => Err(BbsError::Ansi),
        Some(dialect) => Ok((dialect, dialect.fields(src))),
    }
}
