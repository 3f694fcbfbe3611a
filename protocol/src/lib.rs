//! Data exchanged with the chat platform: typed option values, slash command payloads and
//! replies.

pub use interaction::*;
pub use reply::*;
pub use value::*;

mod interaction;
mod reply;
mod value;
