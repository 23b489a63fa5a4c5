//! The non-null handle.

use std::any;
use std::borrow::Borrow;
use std::fmt;
use std::mem;
use std::ops::Deref;
use std::panic::Location;
use std::ptr::NonNull;

use crate::nullable::Nullable;
use crate::policy;
use crate::violation::{ContractViolation, Operation};

/// A pointer-like `T` that is guaranteed not to be its empty sentinel.
///
/// # Invariants
///
/// - After construction and after every assignment, `!self.get().is_null()`.
/// - There is no empty state reachable through this API: no `Default`, no
///   public field, no constructor that yields an empty value.
///
/// # Checks
///
/// Run-time values go through [`NotNull::new`] and [`NotNull::set`], which
/// check once and hand failures to the process-wide
/// [`ViolationPolicy`](crate::ViolationPolicy). [`NotNull::try_new`] and
/// [`NotNull::try_set`] return the failure instead. Compile-time-known values
/// go through [`not_null!`](crate::not_null) or [`NotNull::new_const`], where a
/// null argument is a const-evaluation error. Reads never re-check.
///
/// # Ownership
///
/// The wrapper never owns anything beyond what `T` owns. `NotNull<*const T>`
/// borrows nothing and frees nothing; `NotNull<Option<Box<T>>>` drops its box
/// exactly as the box would.
///
/// # Aliasing
///
/// When `T` is a raw pointer, code holding a separate alias can free or
/// overwrite the referent without going through this wrapper. That is not
/// detected: the guarantee is that the *pointer* is non-null, not that the
/// referent is alive.
///
/// # Static rejection
///
/// A null known at compile time never makes it into a `NotNull`:
///
/// ```compile_fail,E0080
/// use notnull_types::not_null;
/// let _app = not_null!(std::ptr::null::<u8>());
/// ```
///
/// The remaining rejected forms live in `tests/compile_fail/`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NotNull<T: Nullable> {
    value: T,
}

impl<T: Nullable> NotNull<T> {
    /// Wrap a run-time value, applying the violation policy if it is empty.
    #[track_caller]
    #[inline]
    pub fn new(value: T) -> Self {
        if value.is_null() {
            policy::report(violation::<T>(Operation::Construct, Location::caller()));
        }
        Self { value }
    }

    /// Wrap a run-time value, returning the violation instead of applying the
    /// policy.
    #[track_caller]
    pub fn try_new(value: T) -> Result<Self, ContractViolation> {
        if value.is_null() {
            Err(violation::<T>(Operation::Construct, Location::caller()))
        } else {
            Ok(Self { value })
        }
    }

    /// Assign a run-time value, applying the violation policy if it is empty.
    ///
    /// Under [`ViolationPolicy::Raise`](crate::ViolationPolicy::Raise) the
    /// old value is kept.
    #[track_caller]
    #[inline]
    pub fn set(&mut self, value: T) {
        if value.is_null() {
            policy::report(violation::<T>(Operation::Assign, Location::caller()));
        }
        self.value = value;
    }

    /// Assign a run-time value, returning the violation and keeping the old
    /// value if it is empty.
    #[track_caller]
    pub fn try_set(&mut self, value: T) -> Result<(), ContractViolation> {
        if value.is_null() {
            return Err(violation::<T>(Operation::Assign, Location::caller()));
        }
        self.value = value;
        Ok(())
    }

    /// Like [`NotNull::set`], returning the previous value.
    #[track_caller]
    pub fn replace(&mut self, value: T) -> T {
        if value.is_null() {
            policy::report(violation::<T>(Operation::Assign, Location::caller()));
        }
        mem::replace(&mut self.value, value)
    }

    #[must_use]
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

#[cold]
fn violation<T>(operation: Operation, location: &'static Location<'static>) -> ContractViolation {
    ContractViolation::new(any::type_name::<T>(), operation, location)
}

impl<T> NotNull<*const T> {
    /// Compile-time checked constructor for constant pointers.
    ///
    /// Evaluated in a const context (a `const` item or the
    /// [`not_null!`](crate::not_null) macro), a null argument fails to
    /// compile. Evaluated at run time it panics regardless of the installed
    /// policy.
    #[must_use]
    pub const fn new_const(ptr: *const T) -> Self {
        assert!(!ptr.is_null(), "NotNull must not be built from a null pointer");
        Self { value: ptr }
    }

    /// Dereference the pointer.
    ///
    /// # Safety
    ///
    /// The referent must still be alive and not mutably aliased for `'a`.
    /// The pointer is non-null unless a violation was stored under
    /// [`ViolationPolicy::Ignore`](crate::ViolationPolicy::Ignore); callers
    /// that install that policy must rule out a null here themselves.
    #[must_use]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        unsafe { &*self.value }
    }
}

impl<T> NotNull<*mut T> {
    /// Like [`NotNull::new_const`], for mutable pointers.
    #[must_use]
    pub const fn new_const_mut(ptr: *mut T) -> Self {
        assert!(!ptr.is_null(), "NotNull must not be built from a null pointer");
        Self { value: ptr }
    }

    /// Dereference the pointer.
    ///
    /// # Safety
    ///
    /// Same as [`NotNull::as_ref`].
    #[must_use]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        unsafe { &*self.value }
    }

    /// Mutably dereference the pointer.
    ///
    /// # Safety
    ///
    /// The referent must be alive and not aliased at all for `'a`. As with
    /// [`NotNull::as_ref`], a value stored under the ignore policy may be null.
    #[must_use]
    pub unsafe fn as_mut<'a>(&mut self) -> &'a mut T {
        unsafe { &mut *self.value }
    }
}

impl<P> NotNull<Option<P>> {
    /// Wrap a handle that is already present. Never consults the policy.
    #[must_use]
    pub const fn some(handle: P) -> Self {
        Self {
            value: Some(handle),
        }
    }

    /// The present handle.
    ///
    /// # Panics
    ///
    /// Only if a `None` was stored under
    /// [`ViolationPolicy::Ignore`](crate::ViolationPolicy::Ignore).
    #[must_use]
    #[inline]
    pub fn as_some(&self) -> &P {
        match &self.value {
            Some(handle) => handle,
            None => unreachable!("NotNull<Option<_>> holds None under the ignore policy"),
        }
    }

    #[must_use]
    #[inline]
    pub fn as_some_mut(&mut self) -> &mut P {
        match &mut self.value {
            Some(handle) => handle,
            None => unreachable!("NotNull<Option<_>> holds None under the ignore policy"),
        }
    }

    #[must_use]
    pub fn into_some(self) -> P {
        match self.value {
            Some(handle) => handle,
            None => unreachable!("NotNull<Option<_>> holds None under the ignore policy"),
        }
    }

    /// The referent behind the present handle.
    #[must_use]
    #[inline]
    pub fn as_deref(&self) -> &P::Target
    where
        P: Deref,
    {
        self.as_some()
    }
}

impl<'a, T: ?Sized> From<&'a T> for NotNull<*const T> {
    fn from(reference: &'a T) -> Self {
        Self {
            value: reference as *const T,
        }
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for NotNull<*mut T> {
    fn from(reference: &'a mut T) -> Self {
        Self {
            value: reference as *mut T,
        }
    }
}

impl<T: ?Sized> From<NonNull<T>> for NotNull<*mut T> {
    fn from(ptr: NonNull<T>) -> Self {
        Self {
            value: ptr.as_ptr(),
        }
    }
}

impl<T: Nullable> Deref for NotNull<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: Nullable> AsRef<T> for NotNull<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: Nullable> Borrow<T> for NotNull<T> {
    fn borrow(&self) -> &T {
        &self.value
    }
}

impl<T: Nullable + fmt::Debug> fmt::Debug for NotNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<T: Nullable + fmt::Display> fmt::Display for NotNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: Nullable + fmt::Pointer> fmt::Pointer for NotNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.value, f)
    }
}
