pub mod builder;
pub mod loader;

pub use builder::PromptBuilder;
pub use loader::{PromptLoader, PromptVariables};
