//! Minesweeper boards for chat: settings validation, mine placement, the opening flood fill and
//! spoiler-tag rendering split to fit message limits.
#![no_std]

extern crate alloc;

pub use board::*;
pub use error::*;
pub use random::*;
pub use render::*;
pub use reveal::*;
pub use settings::*;
pub use types::*;

mod board;
mod error;
mod random;
mod render;
mod reveal;
mod settings;
mod types;
