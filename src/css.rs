//! Stylesheet for the HTML class names
//!
//! Every class the renderers emit gets a rule here, so a fragment dropped into
//! a page with this stylesheet shows its colours. The 16 base colours come
//! from a [`Palette`]; the 256-colour classes extend it with the xterm cube
//! and grey ramp.

use std::fmt::Write;

use crate::config::{Palette, Rgb};

/// Level steps of the 6x6x6 colour cube
const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// BBS colour numbers follow the CGA order (blue before red), palettes are
/// stored in ANSI order (red before blue).
const CGA_TO_ANSI: [usize; 16] = [0, 4, 2, 6, 1, 5, 3, 7, 8, 12, 10, 14, 9, 13, 11, 15];

/// Celerity letters in CGA order
const CELERITY: [u8; 16] = *b"kbgcrmywdBGCRMYW";

const DECORATIONS: &str = "\
i { font-style: normal; }
.SGR1 { font-weight: bold; }
.SGR2 { opacity: 0.6; }
.SGR3 { font-style: italic; }
.SGR4 { text-decoration: underline; }
.SGR5 { animation: blink 1s step-end infinite; }
.SGR6 { animation: blink 0.3s step-end infinite; }
.SGR7 { filter: invert(100%); }
.SGR8 { visibility: hidden; }
.SGR9 { text-decoration: line-through; }
.SGR21 { text-decoration: underline double; }
.SGR51 { border: 1px solid; }
.SGR52 { border: 1px solid; border-radius: 50%; }
.SGR53 { text-decoration: overline; }
@keyframes blink { 50% { visibility: hidden; } }
";

/// Colour for an xterm 256-colour index
pub fn xterm(palette: &Palette, index: u8) -> Rgb {
    match index {
        0..=15 => palette.colors[usize::from(index)],
        16..=231 => {
            let i = usize::from(index - 16);
            Rgb::new(CUBE[i / 36], CUBE[(i / 6) % 6], CUBE[i % 6])
        }
        _ => {
            let grey = (index - 232) * 10 + 8;
            Rgb::new(grey, grey, grey)
        }
    }
}

/// Palette colour for a CGA ordered colour number (0-15)
fn cga(palette: &Palette, n: usize) -> Rgb {
    palette.colors[CGA_TO_ANSI[n % 16]]
}

fn rule(out: &mut String, class: &str, property: &str, color: Rgb) {
    // writing to a String cannot fail
    let _ = writeln!(out, ".{class} {{ {property}: {}; }}", color.hex());
}

/// Build the stylesheet for `palette`.
pub fn stylesheet(palette: &Palette) -> String {
    let mut out = String::with_capacity(48 * 1024);
    let _ = writeln!(out, "/* retrohtml {} palette */", palette.name);

    // SGR named colours
    for (n, &color) in palette.colors.iter().enumerate() {
        let (fg, bg) = if n < 8 { (30 + n, 40 + n) } else { (82 + n, 92 + n) };
        rule(&mut out, &format!("SGR{fg}"), "color", color);
        rule(&mut out, &format!("SGR{bg}"), "background-color", color);
    }
    out.push_str(DECORATIONS);

    // SGR 256 colours
    for index in 0..=255u8 {
        let color = xterm(palette, index);
        rule(&mut out, &format!("SGR38-5-{index}"), "color", color);
        rule(&mut out, &format!("SGR48-5-{index}"), "background-color", color);
    }

    // PCBoard, Telegard and Wildcat!
    for n in 0..16 {
        let color = cga(palette, n);
        rule(&mut out, &format!("PB{n:X}"), "background-color", color);
        rule(&mut out, &format!("PF{n:X}"), "color", color);
    }

    // Renegade and WWIV bars
    for n in 0..24 {
        let (property, color) = if n < 16 {
            ("color", cga(palette, n))
        } else {
            ("background-color", cga(palette, n - 16))
        };
        rule(&mut out, &format!("P{n}"), property, color);
    }

    // Celerity
    for (n, &letter) in CELERITY.iter().enumerate() {
        let letter = char::from(letter);
        let color = cga(palette, n);
        rule(&mut out, &format!("PB{letter}"), "background-color", color);
        rule(&mut out, &format!("PF{letter}"), "color", color);
    }
    out
}
