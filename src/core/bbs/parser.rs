//! Splitting BBS text into codes and converting it to HTML

use std::borrow::Cow;
use std::fmt::Write;

use tracing::trace;

use super::{BbsError, Dialect, Result};
use crate::core::html::escape_into;

/// PCBoard and Wildcat! display macros that carry no colour
const MACROS: [&str; 3] = ["@CLS@", "@CLS @", "@PAUSE@"];

/// A decoded colour code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Code {
    /// Renegade and WWIV: 0-15 set the foreground, 16-23 the background
    Bar(u8),
    /// PCBoard, Telegard and Wildcat!: both colours at once
    Hex { background: u8, foreground: u8 },
    /// Celerity letter
    Celerity(u8),
}

/// Splitter output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Code(Code),
}

/// A colour code and the text up to the next one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field<'a> {
    pub code: Code,
    pub text: &'a str,
}

/// Current colours while rendering codes to classes
#[derive(Debug)]
struct Pen {
    foreground: u8,
    background: u8,
    letter_fg: u8,
    letter_bg: u8,
    swapped: bool,
}

impl Pen {
    fn new() -> Self {
        Self {
            foreground: 0,
            background: 0,
            letter_fg: b'w',
            letter_bg: b'k',
            swapped: false,
        }
    }

    /// Apply a code and return the class list for the span it opens.
    fn apply(&mut self, code: Code) -> Option<String> {
        match code {
            Code::Bar(n) => {
                if n < 16 {
                    self.foreground = n;
                } else {
                    self.background = n;
                }
                Some(format!("P{} P{}", self.background, self.foreground))
            }
            Code::Hex {
                background,
                foreground,
            } => Some(format!("PB{background:X} PF{foreground:X}")),
            Code::Celerity(b'S') => {
                self.swapped = !self.swapped;
                None
            }
            Code::Celerity(c) => {
                if self.swapped {
                    self.letter_bg = c;
                } else {
                    self.letter_fg = c;
                }
                Some(format!(
                    "PB{} PF{}",
                    char::from(self.letter_bg),
                    char::from(self.letter_fg)
                ))
            }
        }
    }
}

/// Remove the display macros that have no HTML counterpart.
pub fn remove_macros(text: &str) -> Cow<'_, str> {
    if !MACROS.iter().any(|m| text.contains(m)) {
        return Cow::Borrowed(text);
    }
    let mut out = text.to_string();
    for m in MACROS {
        out = out.replace(m, "");
    }
    Cow::Owned(out)
}

impl Dialect {
    /// Split `text` into literal text and codes.
    ///
    /// Anything that fails the code check, such as `|24` for Renegade,
    /// stays in the text.
    pub fn tokens<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let bytes = text.as_bytes();
        let first = self.prefix()[0];
        let mut tokens = Vec::new();
        let (mut start, mut i) = (0, 0);
        while i < bytes.len() {
            if bytes[i] != first {
                i += 1;
                continue;
            }
            let Some((code, len)) = self.code_at(&bytes[i..]) else {
                i += 1;
                continue;
            };
            if start < i {
                tokens.push(Token::Text(&text[start..i]));
            }
            tokens.push(Token::Code(code));
            i += len;
            start = i;
        }
        if start < bytes.len() {
            tokens.push(Token::Text(&text[start..]));
        }
        tokens
    }

    /// Each code with the text that follows it. Text before the first code
    /// is not part of any field.
    pub fn fields<'a>(&self, text: &'a str) -> Vec<Field<'a>> {
        let mut fields: Vec<Field<'a>> = Vec::new();
        for token in self.tokens(text) {
            match token {
                Token::Code(code) => fields.push(Field { code, text: "" }),
                Token::Text(t) => {
                    if let Some(last) = fields.last_mut() {
                        last.text = t;
                    }
                }
            }
        }
        fields
    }

    /// The text with every code removed.
    pub fn strip(&self, text: &str) -> String {
        self.tokens(text)
            .into_iter()
            .filter_map(|t| match t {
                Token::Text(t) => Some(t),
                Token::Code(_) => None,
            })
            .collect()
    }

    /// Convert `text` to a run of `<i>` elements, one per code.
    ///
    /// Text before the first code is escaped but not wrapped. ANSI text is
    /// rejected; it goes through the screen renderer instead.
    pub fn to_html(&self, text: &str) -> Result<String> {
        if *self == Dialect::Ansi {
            return Err(BbsError::Ansi);
        }
        let text = remove_macros(text);
        let mut pen = Pen::new();
        let mut out = String::with_capacity(text.len() * 2);
        let mut open = false;
        let mut codes = 0usize;
        for token in self.tokens(&text) {
            match token {
                Token::Text(t) => escape_into(&mut out, t),
                Token::Code(code) => {
                    codes += 1;
                    let Some(class) = pen.apply(code) else {
                        continue;
                    };
                    if open {
                        out.push_str("</i>");
                    }
                    // writing to a String cannot fail
                    let _ = write!(out, r#"<i class="{class}">"#);
                    open = true;
                }
            }
        }
        if open {
            out.push_str("</i>");
        }
        trace!(dialect = self.id(), codes, "converted to html");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renegade_html() {
        assert_eq!(
            Dialect::Renegade.to_html("|03Hello |07|19world").unwrap(),
            r#"<i class="P0 P3">Hello </i><i class="P0 P7"></i><i class="P19 P7">world</i>"#
        );
    }

    #[test]
    fn test_celerity_html_escapes() {
        let src = "|S|gABC<script>alert('xss');</script>D|REF";
        assert_eq!(
            Dialect::Celerity.to_html(src).unwrap(),
            concat!(
                r#"<i class="PBg PFw">ABC&lt;script&gt;alert(&#39;xss&#39;);&lt;/script&gt;D</i>"#,
                r#"<i class="PBR PFw">EF</i>"#
            )
        );
    }

    #[test]
    fn test_pcboard_html() {
        assert_eq!(
            Dialect::PCBoard.to_html("@X03Hello world").unwrap(),
            r#"<i class="PB0 PF3">Hello world</i>"#
        );
        assert_eq!(
            Dialect::PCBoard.to_html("@x1fnot a code@X1fcode").unwrap(),
            r#"@x1fnot a code<i class="PB1 PFF">code</i>"#
        );
    }

    #[test]
    fn test_leading_text_is_kept() {
        assert_eq!(
            Dialect::Wildcat.to_html("a&b @0E@yellow").unwrap(),
            r#"a&amp;b <i class="PB0 PFE">yellow</i>"#
        );
    }

    #[test]
    fn test_telegard_and_wwiv() {
        assert_eq!(
            Dialect::Telegard.to_html("`4Fhi").unwrap(),
            r#"<i class="PB4 PFF">hi</i>"#
        );
        assert_eq!(
            Dialect::WwivHash.to_html("|#2one|#5two").unwrap(),
            r#"<i class="P0 P2">one</i><i class="P0 P5">two</i>"#
        );
        assert_eq!(
            Dialect::WwivHeart.to_html("\x037heart").unwrap(),
            r#"<i class="P0 P7">heart</i>"#
        );
    }

    #[test]
    fn test_macros_removed() {
        assert_eq!(
            Dialect::PCBoard.to_html("@CLS@@X07Hi@PAUSE@").unwrap(),
            r#"<i class="PB0 PF7">Hi</i>"#
        );
        assert_eq!(remove_macros("plain"), Cow::Borrowed("plain"));
        assert_eq!(remove_macros("@CLS @x"), "x");
    }

    #[test]
    fn test_ansi_rejected() {
        assert_eq!(Dialect::Ansi.to_html("\x1b[0m"), Err(BbsError::Ansi));
    }

    #[test]
    fn test_out_of_range_stays_text() {
        assert_eq!(
            Dialect::Renegade.tokens("|24|23x"),
            vec![Token::Text("|24"), Token::Code(Code::Bar(23)), Token::Text("x")]
        );
    }

    #[test]
    fn test_fields_and_strip() {
        let fields = Dialect::Renegade.fields("lead|03Hello |07|19world");
        assert_eq!(
            fields,
            vec![
                Field { code: Code::Bar(3), text: "Hello " },
                Field { code: Code::Bar(7), text: "" },
                Field { code: Code::Bar(19), text: "world" },
            ]
        );
        assert_eq!(Dialect::Renegade.strip("lead|03Hello |07|19world"), "leadHello world");
        assert_eq!(Dialect::Celerity.strip("|S|gABC|REF"), "ABCEF");
    }

    #[test]
    fn test_unicode_text_survives() {
        assert_eq!(
            Dialect::Renegade.to_html("|01░▒▓").unwrap(),
            r#"<i class="P0 P1">░▒▓</i>"#
        );
    }
}
