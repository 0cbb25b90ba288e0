use thiserror::Error;

/// Hard failures raised by the kernel.
///
/// Degenerate geometry (zero-length vectors, parallel lines, points on a
/// plane) is not an error; those cases come back as `None`, empty vectors
/// or neutral classifications. Only caller misuse ends up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KwError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parameter {parameter} is outside the range [{min}, {max}]")]
    ParameterOutOfRange { parameter: f64, min: f64, max: f64 },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, KwError>;
