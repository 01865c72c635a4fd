pub mod loss_sample;
pub mod token;

// Re-export for easier access
pub use loss_sample::LossSample;
pub use token::{TokenPair, TokenPosition};
