//! HTML output
//!
//! ANSI text is laid out as a grid: one row per input line and one column per
//! run of text sharing a rendition. The grid renders to a fixed template of
//! `<div>` rows holding `<i>` elements; blank lines become empty `<p>` rows so
//! the vertical spacing survives.

use std::fmt::Write;

use tracing::{debug, trace};

use super::term::{Control, CsiScanner, Rendition, Token};

/// Escape the HTML special characters of `text` onto `out`.
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            c => out.push(c),
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// A run of text and the classes it is styled with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Space separated CSS classes
    pub class: String,
    pub content: String,
}

/// One input line
pub type Row = Vec<Column>;

/// Rows of styled columns, in input order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Lay out ANSI encoded text.
    ///
    /// The rendition runs on from one line to the next, so a colour set at
    /// the end of a line still applies to the text of the following line.
    /// Cursor and erase controls are recognised and dropped.
    pub fn from_ansi(src: &[u8]) -> Self {
        let mut rendition = Rendition::new();
        let mut rows = Vec::new();
        let mut discarded = 0usize;
        for line in lines(src) {
            let mut row = Row::new();
            for token in CsiScanner::new(line) {
                let text = match token {
                    Token::Text(text) => text,
                    Token::Control(Control::Sgr(segment)) => rendition.consume(segment),
                    Token::Control(control) => {
                        trace!(?control, "control discarded");
                        discarded += 1;
                        continue;
                    }
                };
                row.push(Column {
                    class: rendition.class_attr(),
                    content: String::from_utf8_lossy(text).into_owned(),
                });
            }
            rows.push(row);
        }
        debug!(rows = rows.len(), discarded, "ansi grid built");
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The text of every row with the control sequences removed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for column in row {
                out.push_str(&column.content);
            }
            out.push('\n');
        }
        out
    }

    /// Render the grid. Columns without content are left out.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, row) in self.rows.iter().enumerate() {
            // writing to a String cannot fail
            if row.is_empty() {
                let _ = writeln!(out, r#"<p id="row-{index}"></p>"#);
                continue;
            }
            let _ = writeln!(out, r#"<div id="row-{index}">"#);
            for column in row.iter().filter(|c| !c.content.is_empty()) {
                out.push_str(r#"  <i class=""#);
                escape_into(&mut out, &column.class);
                out.push_str(r#"">"#);
                escape_into(&mut out, &column.content);
                out.push_str("</i>\n");
            }
            out.push_str("</div>\n");
        }
        out
    }
}

/// Convert ANSI encoded text to an HTML fragment.
pub fn ansi_to_html(src: &[u8]) -> String {
    Grid::from_ansi(src).render()
}

/// Escape plain text with no colour codes.
pub fn plain_to_html(src: &[u8]) -> String {
    escape(&String::from_utf8_lossy(src))
}

/// Wrap a fragment in a standalone document.
pub fn document(title: &str, stylesheet: &str, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + stylesheet.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>");
    escape_into(&mut out, title);
    out.push_str("</title>\n<style>\n");
    out.push_str(stylesheet);
    out.push_str("</style>\n</head>\n<body>\n<div class=\"art\" style=\"white-space: pre; font-family: monospace\">\n");
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

/// Split on newlines; a final newline does not start another line.
fn lines(src: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = src.strip_suffix(b"\n").unwrap_or(src);
    let count = if src.is_empty() { 0 } else { usize::MAX };
    body.split(|&b| b == b'\n').take(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href='x'>"&"</a>"#),
            "&lt;a href=&#39;x&#39;&gt;&#34;&amp;&#34;&lt;/a&gt;"
        );
        assert_eq!(escape("░▒▓ plain"), "░▒▓ plain");
    }

    #[test]
    fn test_render_rows() {
        let html = ansi_to_html(b"\x1b[1;31mRed\x1b[0m plain\n\nnext\n");
        assert_eq!(
            html,
            concat!(
                "<div id=\"row-0\">\n",
                "  <i class=\"SGR31 SGR40 SGR1\">Red</i>\n",
                "  <i class=\"SGR37 SGR40\"> plain</i>\n",
                "</div>\n",
                "<p id=\"row-1\"></p>\n",
                "<div id=\"row-2\">\n",
                "  <i class=\"SGR37 SGR40\">next</i>\n",
                "</div>\n",
            )
        );
    }

    #[test]
    fn test_rendition_carries_across_lines() {
        let grid = Grid::from_ansi(b"\x1b[32mone\r\ntwo");
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.rows()[1][0].class, "SGR32 SGR40");
        assert_eq!(grid.rows()[1][0].content, "two");
        assert_eq!(grid.rows()[0][0].content, "one");
    }

    #[test]
    fn test_empty_columns_omitted() {
        // the reset column has no text
        let html = ansi_to_html(b"\x1b[33mA\x1b[0m");
        assert_eq!(html, "<div id=\"row-0\">\n  <i class=\"SGR33 SGR40\">A</i>\n</div>\n");
    }

    #[test]
    fn test_cursor_controls_dropped() {
        let html = ansi_to_html(b"\x1b[2J\x1b[5Cx");
        assert_eq!(html, "<div id=\"row-0\">\n  <i class=\"SGR37 SGR40\">x</i>\n</div>\n");
    }

    #[test]
    fn test_content_escaped() {
        let html = ansi_to_html(b"\x1b[0m<b>");
        assert!(html.contains(">&lt;b&gt;</i>"));
    }

    #[test]
    fn test_malformed_sgr_is_text() {
        let grid = Grid::from_ansi(b"\x1b[1;;2mX");
        assert_eq!(grid.rows()[0][0].content, "1;;2mX");
        assert_eq!(grid.rows()[0][0].class, "SGR37 SGR40");
    }

    #[test]
    fn test_zero_line_position_is_control() {
        let grid = Grid::from_ansi(b"\x1b[0;5Hart");
        assert_eq!(grid.text(), "art\n");
    }

    #[test]
    fn test_text() {
        let grid = Grid::from_ansi(b"\x1b[1mBold\x1b[0m and\r\n\x1b[5Cplain");
        assert_eq!(grid.text(), "Bold and\nplain\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(ansi_to_html(b""), "");
        assert_eq!(ansi_to_html(b"\n"), "<p id=\"row-0\"></p>\n");
    }

    #[test]
    fn test_document() {
        let doc = document("<art>", ".SGR1{}\n", "<i>x</i>");
        assert!(doc.starts_with("<!DOCTYPE html>\n"));
        assert!(doc.contains("<title>&lt;art&gt;</title>"));
        assert!(doc.contains("<style>\n.SGR1{}\n</style>"));
        assert!(doc.ends_with("monospace\">\n<i>x</i>\n</div>\n</body>\n</html>\n"));
        assert!(!doc.contains("<pre>"));
    }
}
