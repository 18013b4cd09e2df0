//! Text rendition state
//!
//! This module holds the graphic rendition carried between SGR sequences:
//! colours, font selection and the decoration flags. The state renders to a
//! fixed-order list of CSS class names that an external stylesheet binds to.

use bitflags::bitflags;

use super::extension::{Extension, Step};
use super::params::is_all_digits;

/// SGR final byte
pub const SGR: u8 = b'm';

/// Which half of a colour pair a value applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

/// Color definition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// One of the 16 named colours, 0-7 normal and 8-15 bright
    Named(u8),
    /// xterm 256-colour palette index
    Xterm(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// CSS class for this colour on the given layer
    pub fn class(&self, layer: Layer) -> String {
        let (base, bright, ext) = match layer {
            Layer::Foreground => (30, 90, 38),
            Layer::Background => (40, 100, 48),
        };
        match *self {
            Color::Named(n) if n < 8 => format!("SGR{}", base + u16::from(n)),
            Color::Named(n) => format!("SGR{}", bright + u16::from(n - 8)),
            Color::Xterm(n) => format!("SGR{ext}-5-{n}"),
            Color::Rgb(r, g, b) => format!("SGR{ext}-2-{r}-{g}-{b}"),
        }
    }
}

/// Font selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Font {
    #[default]
    Primary,
    /// Alternative fonts 1 to 10 (SGR 10-19)
    Alternate(u8),
    Fraktur,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AttrFlags: u16 {
        const BOLD          = 0b0000_0000_0000_0001;
        const FAINT         = 0b0000_0000_0000_0010;
        const ITALIC        = 0b0000_0000_0000_0100;
        const UNDERLINE     = 0b0000_0000_0000_1000;
        const UNDERLINE2X   = 0b0000_0000_0001_0000;
        const BLINK         = 0b0000_0000_0010_0000;
        const BLINK_FAST    = 0b0000_0000_0100_0000;
        const INVERSE       = 0b0000_0000_1000_0000;
        const CONCEAL       = 0b0000_0001_0000_0000;
        const STRIKETHROUGH = 0b0000_0010_0000_0000;
        const FRAMED        = 0b0000_0100_0000_0000;
        const ENCIRCLED     = 0b0000_1000_0000_0000;
        const OVERLINED     = 0b0001_0000_0000_0000;

        const INTENSITY  = Self::BOLD.bits() | Self::FAINT.bits();
        const UNDERLINES = Self::UNDERLINE.bits() | Self::UNDERLINE2X.bits();
        const BLINKS     = Self::BLINK.bits() | Self::BLINK_FAST.bits();
        const BORDERS    = Self::FRAMED.bits() | Self::ENCIRCLED.bits() | Self::OVERLINED.bits();
    }
}

/// Flags in the order their classes are emitted, with their class names
const DECORATIONS: [(AttrFlags, &str); 12] = [
    (AttrFlags::BOLD, "SGR1"),
    (AttrFlags::FAINT, "SGR2"),
    (AttrFlags::ITALIC, "SGR3"),
    (AttrFlags::UNDERLINE, "SGR4"),
    (AttrFlags::UNDERLINE2X, "SGR21"),
    (AttrFlags::BLINK, "SGR5"),
    (AttrFlags::BLINK_FAST, "SGR6"),
    (AttrFlags::INVERSE, "SGR7"),
    (AttrFlags::STRIKETHROUGH, "SGR9"),
    (AttrFlags::FRAMED, "SGR51"),
    (AttrFlags::ENCIRCLED, "SGR52"),
    (AttrFlags::OVERLINED, "SGR53"),
];

const CONCEAL_CLASS: &str = "SGR8";

/// Returns true if `ps` is a known SGR parameter.
pub fn is_valid_param(ps: u8) -> bool {
    matches!(ps, 0..=25 | 27..=49 | 51..=55 | 90..=97 | 100..=107)
}

/// Current graphic rendition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendition {
    pub fg: Color,
    pub bg: Color,
    pub font: Font,
    pub flags: AttrFlags,
}

impl Default for Rendition {
    fn default() -> Self {
        Self {
            fg: Self::DEFAULT_FG,
            bg: Self::DEFAULT_BG,
            font: Font::Primary,
            flags: AttrFlags::empty(),
        }
    }
}

impl Rendition {
    /// White text
    pub const DEFAULT_FG: Color = Color::Named(7);
    /// Black background
    pub const DEFAULT_BG: Color = Color::Named(0);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set `flag`, clearing the other members of its exclusive `group`.
    fn set_exclusive(&mut self, group: AttrFlags, flag: AttrFlags) {
        self.flags.remove(group);
        self.flags.insert(flag);
    }

    /// Apply one validated SGR parameter.
    pub fn apply(&mut self, ps: u8) {
        match ps {
            0 => self.reset(),
            1 => self.set_exclusive(AttrFlags::INTENSITY, AttrFlags::BOLD),
            2 => self.set_exclusive(AttrFlags::INTENSITY, AttrFlags::FAINT),
            3 => self.flags.insert(AttrFlags::ITALIC),
            4 => self.set_exclusive(AttrFlags::UNDERLINES, AttrFlags::UNDERLINE),
            5 => self.set_exclusive(AttrFlags::BLINKS, AttrFlags::BLINK),
            6 => self.set_exclusive(AttrFlags::BLINKS, AttrFlags::BLINK_FAST),
            7 => self.flags.insert(AttrFlags::INVERSE),
            8 => self.flags.insert(AttrFlags::CONCEAL),
            9 => self.flags.insert(AttrFlags::STRIKETHROUGH),
            10 => self.font = Font::Primary,
            11..=19 => self.font = Font::Alternate(ps - 10),
            20 => self.font = Font::Fraktur,
            21 => self.set_exclusive(AttrFlags::UNDERLINES, AttrFlags::UNDERLINE2X),
            22 => self.flags.remove(AttrFlags::INTENSITY),
            23 => {
                self.flags.remove(AttrFlags::ITALIC);
                if self.font == Font::Fraktur {
                    self.font = Font::Primary;
                }
            }
            24 => self.flags.remove(AttrFlags::UNDERLINES),
            25 => self.flags.remove(AttrFlags::BLINKS),
            27 => self.flags.remove(AttrFlags::INVERSE),
            28 => self.flags.remove(AttrFlags::CONCEAL),
            29 => self.flags.remove(AttrFlags::STRIKETHROUGH),
            30..=37 => self.fg = Color::Named(ps - 30),
            39 => self.fg = Self::DEFAULT_FG,
            40..=47 => self.bg = Color::Named(ps - 40),
            49 => self.bg = Self::DEFAULT_BG,
            51 => self.set_exclusive(AttrFlags::BORDERS, AttrFlags::FRAMED),
            52 => self.set_exclusive(AttrFlags::BORDERS, AttrFlags::ENCIRCLED),
            53 => self.set_exclusive(AttrFlags::BORDERS, AttrFlags::OVERLINED),
            54 => self.flags.remove(AttrFlags::FRAMED | AttrFlags::ENCIRCLED),
            55 => self.flags.remove(AttrFlags::OVERLINED),
            90..=97 => self.fg = Color::Named(ps - 90 + 8),
            100..=107 => self.bg = Color::Named(ps - 100 + 8),
            // 38 and 48 only mean something to the extension scanner
            _ => {}
        }
    }

    fn set_color(&mut self, layer: Layer, color: Color) {
        match layer {
            Layer::Foreground => self.fg = color,
            Layer::Background => self.bg = color,
        }
    }

    /// Apply the SGR parameter list in front of the `m` terminator and return
    /// the literal text that follows it.
    ///
    /// Without a terminator, or with a parameter list that fails validation,
    /// all of `bytes` is returned as literal text and the state is untouched.
    pub fn consume<'a>(&mut self, bytes: &'a [u8]) -> &'a [u8] {
        let Some(end) = bytes.iter().position(|&b| b == SGR) else {
            return bytes;
        };
        match self.parsed(&bytes[..end]) {
            Some(next) => {
                *self = next;
                &bytes[end + 1..]
            }
            None => {
                tracing::trace!(params = ?String::from_utf8_lossy(&bytes[..end]), "malformed SGR kept as text");
                bytes
            }
        }
    }

    /// The state after applying `params`, or `None` if any parameter is invalid.
    fn parsed(&self, params: &[u8]) -> Option<Self> {
        let mut next = self.clone();
        // ESC [ m is shorthand for ESC [ 0 m
        if params.is_empty() {
            next.reset();
            return Some(next);
        }
        let mut ext = Extension::new();
        for field in params.split(|&b| b == b';') {
            if !is_all_digits(field) {
                return None;
            }
            let ps: u8 = std::str::from_utf8(field).ok()?.parse().ok()?;
            match ext.scan(ps) {
                Step::Consumed => {}
                Step::Color(layer, color) => next.set_color(layer, color),
                Step::Pass if is_valid_param(ps) => next.apply(ps),
                Step::Pass => return None,
            }
        }
        if ext.is_pending() {
            tracing::trace!("incomplete extended colour dropped");
        }
        Some(next)
    }

    /// CSS classes for the current state, in a fixed order.
    pub fn classes(&self) -> Vec<String> {
        let mut cls = vec![
            self.fg.class(Layer::Foreground),
            self.bg.class(Layer::Background),
        ];
        // Concealed text is invisible, so decorations are pointless
        if self.flags.contains(AttrFlags::CONCEAL) {
            cls.push(CONCEAL_CLASS.to_string());
            return cls;
        }
        cls.extend(
            DECORATIONS
                .iter()
                .filter(|(flag, _)| self.flags.contains(*flag))
                .map(|(_, name)| (*name).to_string()),
        );
        cls
    }

    /// Space separated class attribute value.
    pub fn class_attr(&self) -> String {
        self.classes().join(" ")
    }
}
