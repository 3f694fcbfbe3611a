//! A typed command grammar for chat bots.
//!
//! A [`CommandTree`] is an ordered set of literal [`Command`]s, each with a sequence of typed
//! [`ArgumentNode`] options. Dispatching raw text or a structured option set walks the tree,
//! collects the parsed [`Inputs`] and runs the most specific action reached.

pub use dispatch::*;
pub use node::*;
pub use tree::*;

mod dispatch;
mod node;
mod tree;
