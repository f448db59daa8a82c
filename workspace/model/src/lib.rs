pub mod entities;
pub mod validation;

pub use validation::{SaveError, ValidationError};

// Re-export tracing for use in this crate
pub use tracing;
