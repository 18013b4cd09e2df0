//! Input statistics for `--info`

use std::io::{self, Write};

use crossterm::style::Stylize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::core::bbs::{self, BbsError, Dialect};
use crate::core::html::Grid;
use crate::core::term::{parser::find, CSI};

/// Summary of one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    pub name: String,
    /// Size in bytes
    pub size: usize,
    pub lines: usize,
    /// Widest line in terminal columns, control sequences excluded
    pub width: usize,
    /// Number of CSI introducers
    pub controls: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Number of BBS colour codes
    pub codes: usize,
}

impl Info {
    pub fn new(name: &str, src: &[u8]) -> Self {
        let (dialect, codes) = match bbs::fields(&String::from_utf8_lossy(src)) {
            Ok((dialect, fields)) => (Some(dialect), fields.len()),
            Err(BbsError::Ansi) => (Some(Dialect::Ansi), 0),
            Err(BbsError::NoCodes) => (None, 0),
        };
        Self {
            name: name.to_string(),
            size: src.len(),
            lines: count_lines(src),
            width: widest(&Grid::from_ansi(src)),
            controls: count(src, CSI),
            dialect: dialect.map(|d| d.to_string()),
            codes,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Aligned text report. `color` highlights the dialect.
    pub fn write_text<W: Write>(&self, w: &mut W, color: bool) -> io::Result<()> {
        let dialect = self.dialect.as_deref().unwrap_or("none");
        let rows = [
            ("name", self.name.clone()),
            ("size", format!("{} bytes", self.size)),
            ("lines", self.lines.to_string()),
            ("width", format!("{} columns", self.width)),
            ("controls", format!("{} CSI", self.controls)),
            ("dialect", dialect.to_string()),
            ("codes", self.codes.to_string()),
        ];
        let pad = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(0) + 2;
        for (key, value) in rows {
            write!(w, " {key:<pad$}")?;
            if color && key == "dialect" {
                writeln!(w, "{}", value.as_str().bold().green())?;
            } else {
                writeln!(w, "{value}")?;
            }
        }
        Ok(())
    }
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    let mut n = 0;
    let mut rest = haystack;
    while let Some(i) = find(rest, needle) {
        n += 1;
        rest = &rest[i + needle.len()..];
    }
    n
}

/// Lines as the renderer sees them
fn count_lines(src: &[u8]) -> usize {
    if src.is_empty() {
        return 0;
    }
    let breaks = src.iter().filter(|&&b| b == b'\n').count();
    if src.ends_with(b"\n") {
        breaks
    } else {
        breaks + 1
    }
}

/// Display width of the widest row
fn widest(grid: &Grid) -> usize {
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|c| c.content.width()).sum::<usize>())
        .max()
        .unwrap_or(0)
}
