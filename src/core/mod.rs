//! Control code interpretation and rendering.
//!
//! - **term**: ANSI CSI scanner, parameter decoders and rendition state
//! - **bbs**: bulletin board colour code detection and parsing
//! - **html**: row/column grid and HTML output
//!
//! # Architecture
//!
//! ```text
//! bytes ─┬─ bbs::detect ── Dialect ── Dialect::to_html ──┐
//!        │                                               ├── HTML fragment
//!        └─ html::Grid::from_ansi                        │
//!           ├── term::CsiScanner (per line)              │
//!           └── term::Rendition (across lines) ── render ┘
//! ```

pub mod bbs;
pub mod html;
pub mod term;
