//! Process-wide contract-violation policy.
//!
//! The policy is chosen once, at program start, and is then fixed for the
//! lifetime of the process. Mixing policies inside one binary would give
//! component boundaries disagreeing failure semantics, so the slot is a
//! `OnceLock`: the first `install` (or the first violation, which falls back
//! to [`ViolationPolicy::Terminate`]) wins and every later read sees the same
//! value.
//!
//! Valid values never consult the slot. The emptiness check runs first and
//! the policy is only read on the cold violation path.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::violation::{ContractViolation, ParsePolicyError, PolicyError};

/// How a run-time contract violation is handled.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// spellings as the command line and environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ViolationPolicy {
    /// Abort the process. Nothing after the violation point executes.
    #[default]
    Terminate,
    /// Unwind with a [`ContractViolation`] payload that [`catch_violation`]
    /// turns back into an error value.
    Raise,
    /// Signal nothing. The empty value is stored as-is; only sound in builds
    /// that have proven violations cannot happen.
    Ignore,
}

impl ViolationPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
            Self::Raise => "raise",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for ViolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationPolicy {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "terminate" | "abort" => Ok(Self::Terminate),
            "raise" | "panic" | "throw" => Ok(Self::Raise),
            "ignore" | "off" | "unchecked" => Ok(Self::Ignore),
            _ => Err(ParsePolicyError(raw.to_string())),
        }
    }
}

impl TryFrom<String> for ViolationPolicy {
    type Error = ParsePolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

static POLICY: OnceLock<ViolationPolicy> = OnceLock::new();

/// Fix the process-wide policy.
///
/// Installing the policy that is already active is a no-op, so independent
/// startup paths may agree on the same value. Installing a different one
/// fails and leaves the active policy untouched.
pub fn install(policy: ViolationPolicy) -> Result<ViolationPolicy, PolicyError> {
    let active = *POLICY.get_or_init(|| policy);
    if active == policy {
        tracing::debug!(policy = %active, "Violation policy installed");
        Ok(active)
    } else {
        Err(PolicyError {
            active,
            requested: policy,
        })
    }
}

/// The policy in force, fixing it to the default if nothing was installed.
#[must_use]
pub fn current() -> ViolationPolicy {
    *POLICY.get_or_init(ViolationPolicy::default)
}

/// The installed policy, without fixing the slot.
#[must_use]
pub fn installed() -> Option<ViolationPolicy> {
    POLICY.get().copied()
}

/// Apply the active policy to a violation.
///
/// Returns only under [`ViolationPolicy::Ignore`]. Under
/// [`ViolationPolicy::Raise`] the violation unwinds without running the panic
/// hook; it has already been logged, and an uncaught one ends the thread like
/// any other panic.
pub fn report(violation: ContractViolation) {
    match current() {
        ViolationPolicy::Terminate => {
            tracing::error!(
                type_name = violation.type_name(),
                operation = %violation.operation(),
                location = %violation.location(),
                "Contract violation; terminating"
            );
            eprintln!("fatal: {violation}");
            process::abort();
        }
        ViolationPolicy::Raise => {
            tracing::warn!(
                type_name = violation.type_name(),
                operation = %violation.operation(),
                location = %violation.location(),
                "Contract violation; raising"
            );
            panic::resume_unwind(Box::new(violation));
        }
        ViolationPolicy::Ignore => {}
    }
}

/// Run `f`, turning a raised [`ContractViolation`] back into an error.
///
/// Panics that do not carry a `ContractViolation` keep unwinding. State that
/// `f` was in the middle of mutating when the violation was raised is left as
/// it was; `NotNull` itself checks before writing, so a wrapper never observes
/// a half-finished assignment.
pub fn catch_violation<F, R>(f: F) -> Result<R, ContractViolation>
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<ContractViolation>() {
            Ok(violation) => Err(*violation),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

#[cfg(test)]
pub(crate) fn raise_for_tests() {
    install(ViolationPolicy::Raise).expect("unit tests only ever install the raise policy");
}

#[cfg(test)]
mod tests {
    use super::{ViolationPolicy, catch_violation, installed, raise_for_tests, report};
    use crate::violation::{ContractViolation, Operation};
    use std::panic::{self, Location};

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("terminate".parse::<ViolationPolicy>(), Ok(ViolationPolicy::Terminate));
        assert_eq!(" Abort ".parse::<ViolationPolicy>(), Ok(ViolationPolicy::Terminate));
        assert_eq!("RAISE".parse::<ViolationPolicy>(), Ok(ViolationPolicy::Raise));
        assert_eq!("throw".parse::<ViolationPolicy>(), Ok(ViolationPolicy::Raise));
        assert_eq!("off".parse::<ViolationPolicy>(), Ok(ViolationPolicy::Ignore));
        assert!("sometimes".parse::<ViolationPolicy>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for policy in [
            ViolationPolicy::Terminate,
            ViolationPolicy::Raise,
            ViolationPolicy::Ignore,
        ] {
            assert_eq!(policy.to_string().parse::<ViolationPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn default_is_terminate() {
        assert_eq!(ViolationPolicy::default(), ViolationPolicy::Terminate);
    }

    #[test]
    fn reinstalling_the_same_policy_is_accepted() {
        raise_for_tests();
        raise_for_tests();
        assert_eq!(installed(), Some(ViolationPolicy::Raise));
    }

    #[test]
    fn switching_policy_is_rejected() {
        raise_for_tests();
        let err = super::install(ViolationPolicy::Ignore).unwrap_err();
        assert_eq!(err.active, ViolationPolicy::Raise);
        assert_eq!(err.requested, ViolationPolicy::Ignore);
        assert_eq!(installed(), Some(ViolationPolicy::Raise));
    }

    #[test]
    fn raised_violation_is_caught_as_error() {
        raise_for_tests();
        let violation = ContractViolation::new("*const u8", Operation::Construct, Location::caller());

        let caught = catch_violation(|| report(violation)).unwrap_err();
        assert_eq!(caught, violation);
    }

    #[test]
    fn catch_violation_passes_values_through() {
        assert_eq!(catch_violation(|| 41 + 1), Ok(42));
    }

    #[test]
    fn foreign_panics_keep_unwinding() {
        let outer = panic::catch_unwind(|| {
            let _ = catch_violation(|| panic!("not a contract violation"));
        });
        let payload = outer.unwrap_err();
        assert!(payload.downcast_ref::<ContractViolation>().is_none());
    }
}
