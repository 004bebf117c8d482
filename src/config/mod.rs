//! Configuration module.

mod loader;
mod options;

pub use loader::*;
pub use options::*;
