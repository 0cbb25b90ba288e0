use crate::error::Result;

/// Validate structural invariants of a geometric entity.
///
/// Intended for construction-time checks on caller-supplied data; queries
/// assume their inputs already passed.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
