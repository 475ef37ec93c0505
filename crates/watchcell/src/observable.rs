#![forbid(unsafe_code)]

//! Observable value wrapper with dual-channel change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). A write is a change when the new value
//! differs from the current one by `PartialEq`; equal writes are complete
//! no-ops. On a real change all live subscribers are notified in
//! registration order, first on the bare channel (no payload), then on the
//! values channel with `(previous, next)`.
//!
//! Types whose identity matters more than their contents (engine-managed
//! handles, shared assets) opt into identity comparison by wrapping in
//! [`ByRef`](crate::identity::ByRef); the change test itself always
//! delegates to `PartialEq`.
//!
//! External tools that write the value slot out-of-band (serialization
//! layers, undo) use [`set_untracked`](Observable::set_untracked) together
//! with [`begin_edit_scope`](Observable::begin_edit_scope) and
//! [`reconcile_edits`](Observable::reconcile_edits), which replays the
//! out-of-band write through the normal `set` path so subscribers observe
//! it like any other change.
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone               |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: `Subscription` guards stored indefinitely keep
//!   their callbacks registered. Dead weak references are cleaned lazily
//!   during notification.
//! - **Panicking collaborator**: a `PartialEq` impl or subscriber that
//!   panics propagates unmodified to the caller of `set`; the value slot
//!   itself is already consistent at that point.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Bare-change subscriber: stored weak, handed out strong in a guard.
type BareWeak = Weak<dyn Fn()>;
type BareRc = Rc<dyn Fn()>;
/// Values-channel subscriber, invoked with `(previous, next)`.
type ValuesWeak<T> = Weak<dyn Fn(&T, &T)>;
type ValuesRc<T> = Rc<dyn Fn(&T, &T)>;

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    value: T,
    /// Snapshot used only to reconcile out-of-band edits; `Some` once a
    /// scope has been opened or a change has gone through `set`.
    prev_value: Option<T>,
    version: u64,
    /// Bare-channel subscribers. Dead entries are pruned on notify.
    changed: Vec<BareWeak>,
    /// Values-channel subscribers. Dead entries are pruned on notify.
    changed_values: Vec<ValuesWeak<T>>,
}

/// A shared, version-tracked value with dual-channel change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner state —
/// both handles see the same value and share subscribers.
///
/// # Invariants
///
/// 1. `set(v)` where `v == current` mutates nothing and fires nothing.
/// 2. On a real change the bare channel fires before the values channel,
///    each in registration order, and neither fires without the other.
/// 3. `version` increments by exactly 1 on each value-changing mutation.
/// 4. Dead subscribers (dropped [`Subscription`] guards) are pruned lazily.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("changed_subscribers", &inner.changed.len())
            .field("values_subscribers", &inner.changed_values.len())
            .finish()
    }
}

impl<T> Observable<T> {
    /// Name of the slot holding the raw value, for host tools that locate
    /// it structurally (property paths, serialized-field lookup).
    pub const VALUE_SLOT: &'static str = "value";

    fn from_value(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                prev_value: None,
                version: 0,
                changed: Vec::new(),
                changed_values: Vec::new(),
            })),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    ///
    /// No notification fires for the construction-time value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_value(value)
    }

    /// Get a clone of the current value.
    ///
    /// This is the explicit coercion to the raw value; there is no implicit
    /// one.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set a new value. If it differs from the current value (by
    /// `PartialEq`) the version is incremented and both channels fire;
    /// otherwise nothing happens at all.
    ///
    /// Notification is synchronous and no interior borrow is held while
    /// subscribers run, so a subscriber may write back into this observable
    /// (the nested `set` completes depth-first before the outer one
    /// resumes).
    pub fn set(&self, next: T) {
        let (prev, current) = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == next {
                return;
            }
            inner.prev_value = Some(next.clone());
            let prev = std::mem::replace(&mut inner.value, next);
            inner.version += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(version = inner.version, "observable value changed");
            (prev, inner.value.clone())
        };
        self.notify(&prev, &current);
    }

    /// Modify the value in place via a closure. If the result differs from
    /// a pre-mutation snapshot, both channels fire with `(snapshot, new)`.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value == old {
                None
            } else {
                inner.prev_value = Some(inner.value.clone());
                inner.version += 1;
                Some((old, inner.value.clone()))
            }
        };
        if let Some((prev, next)) = changed {
            self.notify(&prev, &next);
        }
    }

    /// Write the value slot directly: no change test, no notification, no
    /// version bump.
    ///
    /// This is the door for external editing tools that mutate the value
    /// out-of-band and later replay the edit through
    /// [`reconcile_edits`](Self::reconcile_edits). Application code should
    /// use [`set`](Self::set).
    pub fn set_untracked(&self, value: T) {
        self.inner.borrow_mut().value = value;
    }

    /// Hook for an external editing tool, called immediately before it may
    /// mutate the value out-of-band: snapshots the current value so
    /// [`reconcile_edits`](Self::reconcile_edits) can detect the result.
    pub fn begin_edit_scope(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.prev_value = Some(inner.value.clone());
    }

    /// Reconcile an out-of-band mutation with the change-detection logic.
    ///
    /// If no snapshot exists yet, the current value is snapshotted and
    /// nothing fires (there is nothing to reconcile against). Otherwise the
    /// current value is treated as the proposed new value, the snapshot is
    /// restored, and the proposal is replayed through [`set`](Self::set) —
    /// so subscribers observe the edit exactly as if it had been a direct
    /// write, including the no-op case when nothing actually changed.
    pub fn reconcile_edits(&self) {
        let proposed = {
            let mut inner = self.inner.borrow_mut();
            match inner.prev_value.take() {
                None => {
                    inner.prev_value = Some(inner.value.clone());
                    return;
                }
                Some(prev) => {
                    let restored = std::mem::replace(&mut inner.value, prev.clone());
                    inner.prev_value = Some(prev);
                    restored
                }
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!("replaying out-of-band edit through set");
        self.set(proposed);
    }

    /// Subscribe to the bare-change channel. The callback is invoked with
    /// no payload each time the value changes.
    ///
    /// Returns a [`Subscription`] guard; dropping it unsubscribes. Two
    /// subscriptions of the same closure are independent entries and each
    /// fires once per change.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let strong: BareRc = Rc::new(callback);
        self.inner.borrow_mut().changed.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Subscribe to the values channel. The callback is invoked with
    /// `(previous, next)` each time the value changes.
    pub fn subscribe_values(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription {
        let strong: ValuesRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .changed_values
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version number. Increments by 1 on each value-changing
    /// mutation; untracked writes do not bump it.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered bare-channel subscribers (including dead ones
    /// not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().changed.len()
    }

    /// Number of registered values-channel subscribers (including dead ones
    /// not yet pruned).
    #[must_use]
    pub fn values_subscriber_count(&self) -> usize {
        self.inner.borrow().changed_values.len()
    }

    /// Notify both channels for a change from `prev` to `next`, pruning
    /// dead subscribers as each channel is snapshotted.
    ///
    /// Each channel iterates a snapshot taken up front, so a subscriber
    /// dropping a guard mid-cycle cannot corrupt iteration (the dropped
    /// callback may still see the in-flight notification; it is pruned
    /// before the next one). The values channel is snapshotted after the
    /// bare channel has run, matching the sequential firing of the two
    /// channels.
    fn notify(&self, prev: &T, next: &T) {
        let bare: Vec<BareRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.changed.retain(|w| w.strong_count() > 0);
            inner.changed.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &bare {
            cb();
        }

        let detailed: Vec<ValuesRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.changed_values.retain(|w| w.strong_count() > 0);
            inner
                .changed_values
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        for cb in &detailed {
            cb(prev, next);
        }
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// Equality, hashing, and display delegate to the wrapped value.

impl<T: PartialEq> PartialEq for Observable<T> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let a = self.inner.borrow();
        let b = other.inner.borrow();
        a.value == b.value
    }
}

impl<T: Eq> Eq for Observable<T> {}

/// Hashes the wrapped value. Mutating the observable while it sits in a
/// hash-keyed collection invalidates its bucket, as with any interior
/// mutability.
impl<T: Hash> Hash for Observable<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.borrow().value.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.borrow().value.fmt(f)
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Observable<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.borrow().value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Observable<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::from_value)
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` causes the associated callback to become
/// unreachable (the strong `Rc` is dropped, so the `Weak` in the
/// observable's subscriber list fails to upgrade on the next notification
/// cycle). Dropping is the unsubscribe operation; there is no way to remove
/// a subscriber that was never added.
pub struct Subscription {
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
