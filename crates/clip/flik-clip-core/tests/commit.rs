mod common;

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use common::{added, clip_on, fade_bank, opacity, removed};
use flik_clip::{
    AnimationClip, ClassToggles, ClipCategory, ClipConfigPatch, EffectBank, EffectEntry,
    EffectGenerator, MutationTarget, PropertyTarget, Snapshot, SnapshotPair, TargetEvent, Value,
    HIDDEN_CLASS, OVERRIDE_HIDDEN_CLASS,
};
use futures::FutureExt;

fn hide(target: &Rc<RefCell<PropertyTarget>>) {
    target
        .borrow_mut()
        .add_classes(&[HIDDEN_CLASS.to_string()]);
    target.borrow_mut().clear_events();
}

/// Everything except class events for classes other than the override.
fn commit_events(target: &Rc<RefCell<PropertyTarget>>) -> Vec<TargetEvent> {
    target
        .borrow()
        .events()
        .iter()
        .filter(|e| {
            !matches!(
                e,
                TargetEvent::ClassAdded(c) | TargetEvent::ClassRemoved(c)
                    if c != OVERRIDE_HIDDEN_CLASS
            )
        })
        .cloned()
        .collect()
}

#[test]
fn final_values_are_committed_to_the_base() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0),
    );
    let _ = clip.play(None).unwrap();
    clip.tick(100.0);
    let base = target.borrow().base_value("opacity");
    assert_eq!(base, Some(Value::Float(1.0)));
}

#[test]
fn accumulated_offset_is_not_stacked_after_commit() {
    let mut bank = EffectBank::new();
    bank.insert(
        "slide",
        EffectEntry::new(EffectGenerator::snapshots(|_| {
            Ok(SnapshotPair {
                forward: vec![Snapshot::new().with("x", 0.0), Snapshot::new().with("x", 100.0)],
                backward: None,
            })
        })),
    );
    let (typed, target) = PropertyTarget::new("#box").with_base("x", 20.0).shared();
    let mut clip = AnimationClip::new(target, "slide", &bank, ClipCategory::Motion)
        .unwrap()
        .initialize(
            serde_json::Value::Null,
            ClipConfigPatch::default().duration(100.0).end_delay(100.0),
        )
        .unwrap();
    let x = |t: &Rc<RefCell<PropertyTarget>>| t.borrow().value("x").and_then(|v| v.as_float());

    let playback = clip.play(None).unwrap();
    clip.tick(50.0);
    assert_abs_diff_eq!(x(&typed).unwrap(), 70.0, epsilon = 1e-4);
    clip.tick(50.0);
    assert_eq!(typed.borrow().base_value("x"), Some(Value::Float(120.0)));
    clip.tick(50.0);
    assert_abs_diff_eq!(x(&typed).unwrap(), 120.0, epsilon = 1e-4);
    clip.tick(50.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(x(&typed).unwrap(), 120.0, epsilon = 1e-4);
}

#[test]
fn without_commit_the_overlay_is_dropped_at_settle() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.25,
        ClipConfigPatch::default()
            .duration(100.0)
            .end_delay(50.0)
            .commits_styles(false),
    );
    let playback = clip.play(None).unwrap();
    clip.tick(120.0);
    // Held through the end delay.
    assert_abs_diff_eq!(opacity(&target), 1.0, epsilon = 1e-6);
    clip.tick(30.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 0.25, epsilon = 1e-6);
    assert!(!target
        .borrow()
        .events()
        .iter()
        .any(|e| matches!(e, TargetEvent::Committed(_))));
}

#[test]
fn commit_on_hidden_target_rejects_but_finishes() {
    let classes = ClassToggles {
        add_on_finish: vec!["done".into()],
        ..Default::default()
    };
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0).css_classes(classes),
    );
    hide(&target);

    let playback = clip.play(None).unwrap();
    clip.tick(100.0);
    let err = playback.now_or_never().unwrap().unwrap_err();
    assert_eq!(err.category(), "commit");
    assert!(err.is_recoverable());
    assert!(err.reason().contains("commit_styles_forcefully"));
    assert_eq!(err.context().target.as_deref(), Some("#box"));

    // Remaining phases still ran.
    assert!(!clip.is_animating());
    assert!(target.borrow().has_class("done"));
    assert_eq!(commit_events(&target), vec![TargetEvent::CommitRefused]);
}

#[test]
fn forced_commit_overrides_hidden_state_once() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default()
            .duration(100.0)
            .commit_styles_forcefully(true),
    );
    hide(&target);

    let playback = clip.play(None).unwrap();
    clip.tick(100.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));

    let events = commit_events(&target);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], TargetEvent::CommitRefused);
    assert_eq!(events[1], added(OVERRIDE_HIDDEN_CLASS));
    assert!(matches!(events[2], TargetEvent::Committed(_)));
    assert_eq!(events[3], removed(OVERRIDE_HIDDEN_CLASS));

    assert!(!target.borrow().has_class(OVERRIDE_HIDDEN_CLASS));
    assert!(target.borrow().has_class(HIDDEN_CLASS));
    assert_eq!(
        target.borrow().base_value("opacity"),
        Some(Value::Float(1.0))
    );
}

#[test]
fn forced_commit_fails_under_hidden_ancestor() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default()
            .duration(100.0)
            .commit_styles_forcefully(true),
    );
    target.borrow_mut().set_ancestor_hidden(true);

    let playback = clip.play(None).unwrap();
    clip.tick(100.0);
    let err = playback.now_or_never().unwrap().unwrap_err();
    assert_eq!(err.category(), "commit");
    assert!(err.reason().contains("ancestor"));
    assert!(!target.borrow().has_class(OVERRIDE_HIDDEN_CLASS));
    assert_eq!(target.borrow().base_value("opacity"), Some(Value::Float(0.0)));
}

#[test]
fn exits_do_not_commit_even_when_asked() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-out",
        ClipCategory::Exit {
            exit_type: flik_clip::HidingMethod::DisplayNone,
        },
        1.0,
        ClipConfigPatch::default().duration(100.0).commits_styles(true),
    );
    assert!(!clip.config().commits_styles);
    let playback = clip.play(None).unwrap();
    clip.tick(100.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_eq!(target.borrow().base_value("opacity"), Some(Value::Float(1.0)));
}
