#![forbid(unsafe_code)]

//! Observable value cells with change notification and multi-source effects.
//!
//! This crate provides:
//! - [`Observable`]: a single-value cell that detects changes on write and
//!   notifies subscribers over two channels (bare change, and change with
//!   previous/next values)
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop
//! - [`Effect`]: one callback bound to the bare-change channel of several
//!   observables of possibly different value types
//! - [`ByRef`]: a shared handle compared by reference identity, for values
//!   whose identity matters more than their contents
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` function pointers and cleaned
//! up lazily during notification. All notification is synchronous: every
//! subscriber has run before `set` returns, and a subscriber writing back
//! into an observable recurses depth-first.
//!
//! External editing tools (inspectors, undo layers) that mutate the value
//! slot out-of-band reconcile with the change-detection logic through
//! [`Observable::begin_edit_scope`] and [`Observable::reconcile_edits`].
//!
//! # Invariants
//!
//! 1. Writing a value equal to the current value is a complete no-op.
//! 2. On a real change, both channels fire, bare channel first, each in
//!    registration order.
//! 3. Version increments exactly once per value-changing mutation.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. A disposed [`Effect`] never fires again.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use watchcell::{Effect, Observable};
//!
//! let width = Observable::new(80u16);
//! let height = Observable::new(24u16);
//!
//! let fired = Rc::new(Cell::new(0u32));
//! let seen = Rc::clone(&fired);
//! let effect = Effect::bind(&[&width, &height], move || {
//!     seen.set(seen.get() + 1);
//! });
//!
//! // bind fires once immediately, then once per change.
//! width.set(120);
//! height.set(24); // unchanged: no fire
//! assert_eq!(fired.get(), 2);
//! drop(effect);
//! ```

/// Multi-source effect binder over bare-change channels.
pub mod effect;
/// Reference-identity wrapper for identity-compared values.
pub mod identity;
/// Observable value cell and subscription guards.
pub mod observable;

pub use effect::{ChangeSource, Effect};
pub use identity::ByRef;
pub use observable::{Observable, Subscription};
