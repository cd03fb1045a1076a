//! Error types for spark-render-binding

use std::fmt;
use thiserror::Error;

/// Why a property was rejected by [`crate::binding::bind_render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolationReason {
    /// The member is not named `render`.
    NotRender,
    /// The member is not a method.
    NotCallable,
}

impl fmt::Display for ContractViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolationReason::NotRender => f.write_str("member is not named \"render\""),
            ContractViolationReason::NotCallable => f.write_str("member is not a method"),
        }
    }
}

/// Errors raised while setting up a render binding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("render binding can only be applied to the \"render()\" method, got `{property}`: {reason}")]
    ContractViolation {
        property: String,
        reason: ContractViolationReason,
    },
}
