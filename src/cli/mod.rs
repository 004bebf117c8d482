//! Claude Code process spawning and stream parsing.

mod events;
mod locate;
mod process;
mod stream;

pub use events::*;
pub use locate::*;
pub use process::*;
pub use stream::*;
