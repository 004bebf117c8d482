//! Prompt construction from chat messages.

mod builder;
mod message;

pub use builder::*;
pub use message::*;
