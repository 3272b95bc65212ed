//! Command-line interface module.

mod args;
pub mod fetch;
pub mod serve;

pub use args::{Cli, Commands};
