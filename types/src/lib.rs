//! Non-null handles for notnull.
//!
//! This crate contains the [`NotNull`] wrapper, the [`Nullable`] predicate it
//! relies on, and the process-wide [`ViolationPolicy`] that decides what a
//! run-time contract violation does. No IO, no async.
//!
//! ```
//! use notnull_types::{NotNull, not_null};
//!
//! struct App;
//!
//! fn run(app: NotNull<*const App>) {
//!     let _app = unsafe { app.as_ref() };
//! }
//!
//! let app = App;
//! run(NotNull::from(&app));
//!
//! const ANSWER: NotNull<*const u8> = not_null!(&42_u8);
//! # let _ = ANSWER;
//! ```

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod not_null;
mod nullable;
pub mod policy;
mod violation;

pub use not_null::NotNull;
pub use nullable::Nullable;
pub use policy::{ViolationPolicy, catch_violation};
pub use violation::{ContractViolation, Operation, ParsePolicyError, PolicyError};

/// Build a `NotNull<*const T>` from a constant pointer expression, rejecting
/// null at compile time.
///
/// The expression is evaluated in an inline `const` block, so it must be
/// const-evaluable. For run-time values use [`NotNull::new`].
#[macro_export]
macro_rules! not_null {
    ($ptr:expr $(,)?) => {
        const { $crate::NotNull::new_const($ptr) }
    };
}
