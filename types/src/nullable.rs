//! The "empty" predicate for pointer-like values.
//!
//! Raw pointers are empty when they hold the null address. `Option` is the
//! empty representation for every smart handle (`Option<Box<T>>`,
//! `Option<Rc<T>>`, `Option<&T>`, ...). Handles that cannot be empty at all
//! still implement the trait so they can be wrapped uniformly.

use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

/// A pointer-like value with a distinguished "refers to nothing" state.
pub trait Nullable {
    /// Returns `true` if the value is the empty sentinel for its type.
    fn is_null(&self) -> bool;
}

impl<T: ?Sized> Nullable for *const T {
    #[inline]
    fn is_null(&self) -> bool {
        <*const T>::is_null(*self)
    }
}

impl<T: ?Sized> Nullable for *mut T {
    #[inline]
    fn is_null(&self) -> bool {
        <*mut T>::is_null(*self)
    }
}

impl<P> Nullable for Option<P> {
    #[inline]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

macro_rules! never_null {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: ?Sized> Nullable for $ty {
                #[inline]
                fn is_null(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_null!(&T, &mut T, Box<T>, Rc<T>, Arc<T>, NonNull<T>);
