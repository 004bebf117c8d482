//! Claude Code language model client.

mod call;
mod client;
mod error;
mod response;

pub use call::*;
pub use client::*;
pub use error::*;
pub use response::*;
