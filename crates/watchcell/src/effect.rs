#![forbid(unsafe_code)]

//! Multi-source effect binder.
//!
//! # Design
//!
//! [`Effect`] binds one callback to the bare-change channel of an arbitrary
//! number of observables, producing a single merged "something changed"
//! trigger. The sources need not share a wrapped value type: the binder only
//! depends on each source's bare channel, reached through the object-safe
//! [`ChangeSource`] trait.
//!
//! The binder is non-owning: each source keeps only a weak reference back to
//! the trigger, held alive by the [`Subscription`] guards inside the effect.
//! Dropping or disposing the effect detaches it from every source.
//!
//! # Invariants
//!
//! 1. Each source notification invokes the callback exactly once; N source
//!    changes inside one caller-visible operation fire it N times. There is
//!    no batching or de-duplication.
//! 2. `dispose()` is idempotent and irreversible: once disposed, the
//!    callback never fires again and the effect cannot re-subscribe.
//! 3. With the fire-immediate policy (the default), the callback runs once
//!    synchronously after all sources are subscribed, before `bind` returns.

use std::fmt;
use std::rc::Rc;

use crate::observable::{Observable, Subscription};

/// A bare-change notification source, independent of its value type.
///
/// Implemented by every [`Observable<T>`]; host tools can also use it to
/// query where a source keeps its raw value.
pub trait ChangeSource {
    /// Attach a bare-change subscriber.
    fn subscribe_changed(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Name of the slot holding the raw value, for tools that locate it
    /// structurally.
    fn value_slot(&self) -> &'static str;
}

impl<T: Clone + PartialEq + 'static> ChangeSource for Observable<T> {
    fn subscribe_changed(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.subscribe(callback)
    }

    fn value_slot(&self) -> &'static str {
        Self::VALUE_SLOT
    }
}

/// One callback bound to the bare-change channel of several observables.
///
/// The effect observes but does not own its sources; the caller must keep
/// the sources alive at least as long as the effect. Dropping the effect
/// disposes it.
pub struct Effect {
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

impl Effect {
    /// Bind `callback` to every source's bare-change channel and invoke it
    /// once synchronously before returning.
    pub fn bind(sources: &[&dyn ChangeSource], callback: impl Fn() + 'static) -> Self {
        Self::bind_with(sources, callback, true)
    }

    /// Bind without the immediate invocation; the callback first runs when
    /// a source changes.
    pub fn bind_silent(sources: &[&dyn ChangeSource], callback: impl Fn() + 'static) -> Self {
        Self::bind_with(sources, callback, false)
    }

    /// Bind with an explicit fire-immediate policy. Subscription order
    /// follows `sources` order.
    pub fn bind_with(
        sources: &[&dyn ChangeSource],
        callback: impl Fn() + 'static,
        fire_immediate: bool,
    ) -> Self {
        let trigger: Rc<dyn Fn()> = Rc::new(callback);
        let subscriptions = sources
            .iter()
            .map(|source| {
                let trigger = Rc::clone(&trigger);
                source.subscribe_changed(Box::new(move || trigger()))
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(sources = sources.len(), fire_immediate, "effect bound");

        if fire_immediate {
            trigger();
        }

        Self {
            subscriptions,
            disposed: false,
        }
    }

    /// Detach the callback from every source. Idempotent; the second call
    /// finds nothing left to remove. There is no re-subscribe.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.subscriptions.clear();
        self.disposed = true;

        #[cfg(feature = "tracing")]
        tracing::trace!("effect disposed");
    }

    /// Whether the effect has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("sources", &self.subscriptions.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
