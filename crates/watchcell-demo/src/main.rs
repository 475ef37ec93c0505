#![forbid(unsafe_code)]

//! Scripted walkthrough of the watchcell primitives.
//!
//! Run with: cargo run -p watchcell-demo
//!
//! Set `RUST_LOG=trace` to also see the library's own trace events.

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use watchcell::{ByRef, Effect, Observable};

type Rgb = (u8, u8, u8);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    subscriber_walkthrough();
    effect_walkthrough();
    identity_walkthrough();
    editor_walkthrough();
}

/// Both notification channels on a single observable.
fn subscriber_walkthrough() {
    info!("-- subscribers --");
    let tint: Observable<Rgb> = Observable::new((255, 0, 0));

    let _bare = tint.subscribe(|| info!("bare channel: tint changed"));
    let _detailed = tint.subscribe_values(|prev, next| {
        info!(?prev, ?next, "values channel");
    });

    tint.set((0, 255, 0));
    tint.set((0, 255, 0)); // Equal write: nothing fires.
    tint.set((0, 0, 255));
}

/// One callback re-evaluated when any of several observables change.
fn effect_walkthrough() {
    info!("-- effect --");
    let width = Observable::new(80u32);
    let height = Observable::new(24u32);
    let title = Observable::new(String::from("untitled"));

    let w = width.clone();
    let h = height.clone();
    let t = title.clone();
    let mut layout = Effect::bind(&[&width, &height, &title], move || {
        info!(
            width = w.get(),
            height = h.get(),
            title = %t.get(),
            "relayout"
        );
    });

    width.set(120);
    title.set(String::from("scene.mat"));

    layout.dispose();
    height.set(40); // Disposed: no relayout.
    info!(height = height.get(), "height changed after dispose, no relayout");
}

/// Identity-compared handles: change means "different allocation".
fn identity_walkthrough() {
    info!("-- identity --");
    let mesh = ByRef::new(vec![0u32; 3]);
    let current = Observable::new(mesh.clone());

    let swaps = Rc::new(Cell::new(0u32));
    let swaps_clone = Rc::clone(&swaps);
    let _sub = current.subscribe(move || swaps_clone.set(swaps_clone.get() + 1));

    current.set(mesh.clone()); // Same allocation: not a swap.
    current.set(ByRef::new(vec![0u32; 3])); // Equal contents, new allocation: a swap.
    info!(swaps = swaps.get(), "mesh swaps observed");
}

/// An inspector-style tool editing the value slot out-of-band, then
/// reconciling so subscribers observe the edit like a normal write.
fn editor_walkthrough() {
    info!("-- editor reconciliation --");
    let opacity = Observable::new(1.0f32);
    let _sub = opacity.subscribe_values(|prev, next| {
        info!(prev = *prev, next = *next, "opacity edited");
    });

    // The tool opens an edit scope, writes the slot directly (as a
    // deserializer or undo layer would), then replays the edit.
    opacity.begin_edit_scope();
    opacity.set_untracked(0.25);
    opacity.reconcile_edits();

    // Undo restores the previous serialized value the same way.
    opacity.begin_edit_scope();
    opacity.set_untracked(1.0);
    opacity.reconcile_edits();

    info!(final_value = opacity.get(), "editor walkthrough done");
}
