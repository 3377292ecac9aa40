//! Command-line interface module.

mod args;
pub mod asset;
pub mod clean;
pub mod output;

pub use args::{AssetArgs, Cli, Commands, OutputArgs};
