//! CSI sequence scanner
//!
//! Splits one line of text on the `ESC [` control sequence introducer into
//! literal text and control tokens. Nothing is carried across lines; the
//! caller keeps the rendition state between them.

use super::params::{self, Erase};
use super::state::SGR;

/// Control sequence introducer
pub const CSI: &[u8] = b"\x1b[";

/// A control operation recognised after a CSI
///
/// Movement and editing values are recorded but never applied to a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control<'a> {
    /// CUU
    CursorUp(u8),
    /// CUD
    CursorDown(u8),
    /// CUF
    CursorForward(u8),
    /// CUB
    CursorBack(u8),
    /// CNL
    NextLine(u8),
    /// CPL
    PrecedingLine(u8),
    /// CHA
    CharacterAbsolute(u8),
    /// HPA
    HorizontalAbsolute(u8),
    /// HPR
    HorizontalRelative(u8),
    /// VPA
    VerticalAbsolute(u8),
    /// VPR
    VerticalRelative(u8),
    /// CUP and HVP
    Position { line: u8, col: u8 },
    /// ED
    EraseDisplay(Erase),
    /// EL
    EraseLine(Erase),
    /// ICH
    InsertChars(u8),
    /// IL
    InsertLines(u8),
    /// DCH
    DeleteChars(u8),
    /// DL
    DeleteLines(u8),
    /// REP
    Repeat(u8),
    /// SGR parameters, the `m` and the literal text after it.
    /// Hand it to [`Rendition::consume`](super::state::Rendition::consume).
    Sgr(&'a [u8]),
    /// A well formed sequence with a final byte we do not interpret
    Unknown(u8),
}

impl<'a> Control<'a> {
    /// Decode the body of a control sequence ending in `final_byte`.
    ///
    /// `body` runs up to and including the final byte. Returns `None` when
    /// the parameters fail validation.
    fn decode(body: &[u8], final_byte: u8) -> Option<Self> {
        let n = || params::single(body, final_byte);
        let control = match final_byte {
            b'A' => Control::CursorUp(params::cursor_up(body)?),
            b'B' => Control::CursorDown(params::cursor_down(body)?),
            b'C' => Control::CursorForward(params::cursor_forward(body)?),
            b'D' => Control::CursorBack(params::cursor_back(body)?),
            b'E' => Control::NextLine(n()?),
            b'F' => Control::PrecedingLine(n()?),
            b'G' => Control::CharacterAbsolute(n()?),
            b'`' => Control::HorizontalAbsolute(n()?),
            b'a' => Control::HorizontalRelative(n()?),
            b'd' => Control::VerticalAbsolute(n()?),
            b'e' => Control::VerticalRelative(n()?),
            b'@' => Control::InsertChars(n()?),
            b'L' => Control::InsertLines(n()?),
            b'P' => Control::DeleteChars(n()?),
            b'M' => Control::DeleteLines(n()?),
            b'b' => Control::Repeat(n()?),
            b'H' => {
                let (line, col) = params::cursor_position(body)?;
                Control::Position { line, col }
            }
            b'f' => {
                let (line, col) = params::position(body, final_byte)?;
                Control::Position { line, col }
            }
            b'J' => Control::EraseDisplay(params::erase_display(body)?),
            b'K' => Control::EraseLine(params::erase_line(body)?),
            other => Control::Unknown(other),
        };
        Some(control)
    }
}

/// Scanner output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, never empty
    Text(&'a [u8]),
    Control(Control<'a>),
}

/// Lazy tokenizer over a single line
#[derive(Debug)]
pub struct CsiScanner<'a> {
    rest: &'a [u8],
    pending: Option<&'a [u8]>,
    in_control: bool,
    done: bool,
}

impl<'a> CsiScanner<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self {
            rest: line,
            pending: None,
            in_control: false,
            done: false,
        }
    }

    /// Handle the bytes between one CSI and the next.
    fn control(&mut self, segment: &'a [u8]) -> Option<Token<'a>> {
        let Some(end) = segment.iter().position(|b| (0x40..=0x7E).contains(b)) else {
            // Unterminated, so it was never a control sequence
            self.pending = Some(segment);
            return None;
        };
        let final_byte = segment[end];
        if final_byte == SGR {
            return Some(Token::Control(Control::Sgr(segment)));
        }
        let (body, rest) = segment.split_at(end + 1);
        match Control::decode(body, final_byte) {
            Some(control) => {
                self.pending = Some(rest);
                Some(Token::Control(control))
            }
            None => {
                self.pending = Some(segment);
                None
            }
        }
    }
}

impl<'a> Iterator for CsiScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(text) = self.pending.take() {
                if !text.is_empty() {
                    return Some(Token::Text(text));
                }
            }
            if self.done {
                return None;
            }
            let segment = match find(self.rest, CSI) {
                Some(i) => {
                    let segment = &self.rest[..i];
                    self.rest = &self.rest[i + CSI.len()..];
                    segment
                }
                None => {
                    self.done = true;
                    self.rest
                }
            };
            let segment = strip_cr(segment);
            if !std::mem::replace(&mut self.in_control, true) {
                self.pending = Some(segment);
                continue;
            }
            if let Some(token) = self.control(segment) {
                return Some(token);
            }
        }
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Drop one carriage return from the end of `data`.
fn strip_cr(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r").unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &[u8]) -> Vec<Token<'_>> {
        CsiScanner::new(line).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(scan(b"Hello world"), vec![Token::Text(b"Hello world")]);
        assert!(scan(b"").is_empty());
    }

    #[test]
    fn test_strips_carriage_return() {
        assert_eq!(scan(b"Hello\r"), vec![Token::Text(b"Hello")]);
        assert_eq!(
            scan(b"Hi\r\x1b[1mthere\r"),
            vec![Token::Text(b"Hi"), Token::Control(Control::Sgr(b"1mthere"))]
        );
    }

    #[test]
    fn test_sgr_segments() {
        assert_eq!(
            scan(b"A\x1b[31mB\x1b[0m"),
            vec![
                Token::Text(b"A"),
                Token::Control(Control::Sgr(b"31mB")),
                Token::Control(Control::Sgr(b"0m")),
            ]
        );
    }

    #[test]
    fn test_cursor_controls() {
        assert_eq!(
            scan(b"\x1b[5Cright\x1b[2;10Hthere"),
            vec![
                Token::Control(Control::CursorForward(5)),
                Token::Text(b"right"),
                Token::Control(Control::Position { line: 2, col: 10 }),
                Token::Text(b"there"),
            ]
        );
        assert_eq!(
            scan(b"\x1b[H\x1b[2J\x1b[0K"),
            vec![
                Token::Control(Control::Position { line: 1, col: 1 }),
                Token::Control(Control::EraseDisplay(Erase::All)),
                Token::Control(Control::EraseLine(Erase::ToEnd)),
            ]
        );
        assert_eq!(
            scan(b"\x1b[2;3fat"),
            vec![
                Token::Control(Control::Position { line: 2, col: 3 }),
                Token::Text(b"at"),
            ]
        );
        // no numeric parameter to validate
        assert_eq!(scan(b"\x1b[Kx"), vec![Token::Text(b"Kx")]);
    }

    #[test]
    fn test_editing_controls() {
        assert_eq!(
            scan(b"\x1b[3@\x1b[2L\x1b[4P\x1b[1M\x1b[9b"),
            vec![
                Token::Control(Control::InsertChars(3)),
                Token::Control(Control::InsertLines(2)),
                Token::Control(Control::DeleteChars(4)),
                Token::Control(Control::DeleteLines(1)),
                Token::Control(Control::Repeat(9)),
            ]
        );
    }

    #[test]
    fn test_invalid_params_are_text() {
        assert_eq!(scan(b"\x1b[999Ax"), vec![Token::Text(b"999Ax")]);
        assert_eq!(scan(b"\x1b[3Jx"), vec![Token::Text(b"3Jx")]);
    }

    #[test]
    fn test_unterminated_is_text() {
        assert_eq!(scan(b"ab\x1b[12;3"), vec![Token::Text(b"ab"), Token::Text(b"12;3")]);
        assert_eq!(scan(b"ab\x1b["), vec![Token::Text(b"ab")]);
    }

    #[test]
    fn test_unknown_final() {
        assert_eq!(
            scan(b"\x1b[?7hArt"),
            vec![Token::Control(Control::Unknown(b'h')), Token::Text(b"Art")]
        );
    }

    #[test]
    fn test_lone_bracket_is_text() {
        assert_eq!(scan(b"[1m] \x1b"), vec![Token::Text(b"[1m] \x1b")]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"ab\x1b[", CSI), Some(2));
        assert_eq!(find(b"ab\x1b", CSI), None);
        assert_eq!(find(b"", CSI), None);
    }
}
