pub mod generate;
pub mod serve;

// Re-export command functions for convenience
pub use generate::{generate, pairs, GenerateParams};
pub use serve::serve;
