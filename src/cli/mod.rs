pub mod commands;
pub mod generate;
pub mod render;
pub mod summarize;
pub mod validate;

pub use commands::{Cli, Commands};
