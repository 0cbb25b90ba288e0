//! Knotwork core types: errors, tolerances, and validation.

pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{KwError, Result};
pub use tolerance::Tolerance;
pub use traits::Validate;
