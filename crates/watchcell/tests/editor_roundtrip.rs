//! End-to-end exercise of the external-editing-tool surface: an inspector
//! edits values out-of-band (as a serialization or undo layer would), and
//! the reconciliation hooks replay those edits through the normal
//! change-detection path so subscribers and effects stay consistent.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use watchcell::{ChangeSource, Effect, Observable};

type Rgb = (u8, u8, u8);

const RED: Rgb = (255, 0, 0);
const GREEN: Rgb = (0, 255, 0);
const BLUE: Rgb = (0, 0, 255);

/// Minimal stand-in for a host inspector: before drawing a field it opens an
/// edit scope, after the host applied the (possibly unchanged) new value it
/// reconciles.
fn inspector_edit<T: Clone + PartialEq + 'static>(obs: &Observable<T>, new_value: T) {
    obs.begin_edit_scope();
    obs.set_untracked(new_value);
    obs.reconcile_edits();
}

#[test]
fn inspector_edit_notifies_like_a_direct_set() {
    let tint = Observable::new(RED);
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    let _sub = tint.subscribe_values(move |prev, next| {
        log_clone.borrow_mut().push((*prev, *next));
    });

    inspector_edit(&tint, GREEN);
    inspector_edit(&tint, GREEN); // Re-applying the same value: no event.
    inspector_edit(&tint, BLUE);

    assert_eq!(*log.borrow(), vec![(RED, GREEN), (GREEN, BLUE)]);
    assert_eq!(tint.get(), BLUE);
}

#[test]
fn undo_redo_round_trip_fires_subscribers() {
    let label = Observable::new(String::from("untitled"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let _sub = label.subscribe_values(move |prev, next| {
        seen_clone.borrow_mut().push(format!("{prev} -> {next}"));
    });

    // A host undo layer snapshots the serialized value before an edit.
    let before_edit = label.get();
    inspector_edit(&label, String::from("renamed"));

    // Undo: the host writes the old serialized value back into the slot,
    // bypassing set, then the validation hook reconciles.
    label.begin_edit_scope();
    label.set_untracked(before_edit);
    label.reconcile_edits();

    // Redo the same way.
    label.begin_edit_scope();
    label.set_untracked(String::from("renamed"));
    label.reconcile_edits();

    assert_eq!(
        *seen.borrow(),
        vec![
            "untitled -> renamed",
            "renamed -> untitled",
            "untitled -> renamed",
        ]
    );
}

#[test]
fn effect_tracks_edits_across_heterogeneous_fields() {
    let tint = Observable::new(RED);
    let opacity = Observable::new(1.0f32);
    let label = Observable::new(String::from("material"));

    let rebuilds = Rc::new(Cell::new(0u32));
    let rebuilds_clone = Rc::clone(&rebuilds);
    let mut effect = Effect::bind(&[&tint, &opacity, &label], move || {
        rebuilds_clone.set(rebuilds_clone.get() + 1);
    });
    assert_eq!(rebuilds.get(), 1); // Initial build.

    inspector_edit(&tint, GREEN);
    inspector_edit(&opacity, 0.5);
    assert_eq!(rebuilds.get(), 3);

    // An edit that does not change anything triggers no rebuild.
    inspector_edit(&label, String::from("material"));
    assert_eq!(rebuilds.get(), 3);

    effect.dispose();
    inspector_edit(&tint, BLUE);
    assert_eq!(rebuilds.get(), 3);
    assert_eq!(tint.get(), BLUE); // The edit itself still landed.
}

#[test]
fn reconcile_interleaves_with_direct_sets() {
    let size = Observable::new(10u32);
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    let _sub = size.subscribe_values(move |prev, next| {
        log_clone.borrow_mut().push((*prev, *next));
    });

    size.set(20); // Application write.
    inspector_edit(&size, 30); // Editor write.
    size.set(30); // Application re-applies the editor's value: no-op.
    inspector_edit(&size, 20);

    assert_eq!(*log.borrow(), vec![(10, 20), (20, 30), (30, 20)]);
}

#[test]
fn value_slot_names_are_uniform_across_field_types() {
    let tint = Observable::new(RED);
    let opacity = Observable::new(1.0f32);

    // A reflection-driven tool walks fields type-erased and asks each where
    // its raw value lives.
    let fields: Vec<&dyn ChangeSource> = vec![&tint, &opacity];
    for field in fields {
        assert_eq!(field.value_slot(), "value");
    }
}
