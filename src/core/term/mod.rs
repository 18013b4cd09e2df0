//! ANSI control sequence handling
//!
//! - **params**: digit classifier and cursor/erase parameter decoding
//! - **extension**: 256-colour and RGB SGR sub-sequences
//! - **state**: the rendition state and its CSS classes
//! - **parser**: per-line CSI tokenizer

pub mod extension;
pub mod params;
pub mod parser;
pub mod state;

pub use parser::{Control, CsiScanner, Token, CSI};
pub use state::Rendition;
