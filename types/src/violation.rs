//! Error types for the non-null contract.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

use crate::policy::ViolationPolicy;

/// Which entry point received the empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Construct,
    Assign,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Construct => "construct",
            Self::Assign => "assign",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `NotNull` entry point received an empty value at run time.
///
/// Carries enough context to log the failure before handing it to a broader
/// error-reporting routine: the wrapped type, the operation, and the caller
/// location captured through `#[track_caller]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("contract violation: null value passed to {operation} NotNull<{type_name}> at {location}")]
pub struct ContractViolation {
    type_name: &'static str,
    operation: Operation,
    location: &'static Location<'static>,
}

impl ContractViolation {
    #[must_use]
    pub fn new(
        type_name: &'static str,
        operation: Operation,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            type_name,
            operation,
            location,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Returned when a second, different policy is installed after the first one
/// has been fixed for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("violation policy already fixed to `{active}`; cannot switch to `{requested}`")]
pub struct PolicyError {
    pub active: ViolationPolicy,
    pub requested: ViolationPolicy,
}

/// An unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown violation policy `{0}` (expected terminate, raise, or ignore)")]
pub struct ParsePolicyError(pub String);
