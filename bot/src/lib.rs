//! The Spoilsweeper bot: its commands, configuration and a text session driver.

pub use commands::*;
pub use config::*;
pub use context::*;
pub use session::*;

mod commands;
mod config;
mod context;
mod session;
