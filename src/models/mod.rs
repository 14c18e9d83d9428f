// Re-export all model types for ease of use

pub mod user;
pub mod responses;

pub use user::*;
pub use responses::*;

/// Field-level checks run on a decoded request body before it reaches the store.
///
/// Implementations return every violation, not just the first, so a client can
/// fix a payload in one round trip.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldViolation>>;
}

/// A single failed constraint on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: &'static str,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is {}", self.field, self.rule)
    }
}
