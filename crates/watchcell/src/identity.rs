#![forbid(unsafe_code)]

//! Reference-identity wrapper for identity-compared values.
//!
//! Some wrapped types only have meaningful identity comparison: externally
//! managed objects (asset handles, engine resources) where structural
//! equality is unreliable or expensive. Wrapping such a value in [`ByRef`]
//! switches [`Observable`](crate::Observable)'s change test to pointer
//! identity, selected statically by the wrapped type rather than by runtime
//! type inspection: `ByRef`'s `PartialEq` *is* `Rc::ptr_eq`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// A shared handle compared by reference identity and hashed by address.
///
/// Two `ByRef` values are equal iff they point at the same allocation, even
/// when the pointed-at contents are structurally equal.
pub struct ByRef<T>(Rc<T>);

impl<T> ByRef<T> {
    /// Allocate a new identity-compared handle owning `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl<T> From<Rc<T>> for ByRef<T> {
    fn from(handle: Rc<T>) -> Self {
        Self(handle)
    }
}

impl<T> Clone for ByRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for ByRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Pointer identity is a true equivalence relation regardless of T.
impl<T> Eq for ByRef<T> {}

impl<T> Hash for ByRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl<T> Deref for ByRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for ByRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByRef").field(&self.0).finish()
    }
}

impl<T: fmt::Display> fmt::Display for ByRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
