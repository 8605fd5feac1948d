//! Declaration errors

use thiserror::Error;

/// A name was inserted into a scope that already declares it
///
/// Re-insertion is rejected rather than overwriting; a builder that trips
/// this has a defective declaration table.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("duplicate declaration of `{name}` in scope")]
pub struct DuplicateEntity {
    /// The name declared twice
    pub name: String,
}
