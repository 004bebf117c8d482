//! Tool events and their text summaries.

mod event;
mod summary;

pub use event::*;
pub use summary::*;
