mod common;

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use common::{added, class_events, clip_on, fade_bank, opacity, removed};
use flik_clip::{
    ClassToggles, ClipCategory, ClipConfigPatch, Direction, HidingMethod, MutationTarget,
    PhaseBoundary, HIDDEN_CLASS, INVISIBLE_CLASS, MIN_DURATION,
};
use futures::FutureExt;

#[test]
fn play_then_rewind_restores_opacity() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0),
    );

    let mut forward = clip.play(None).unwrap();
    clip.tick(50.0);
    assert_abs_diff_eq!(opacity(&target), 0.5, epsilon = 1e-6);
    assert!((&mut forward).now_or_never().is_none());
    clip.tick(50.0);
    assert_eq!(forward.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 1.0, epsilon = 1e-6);
    assert!(!clip.is_animating());

    let mut backward = clip.rewind(None).unwrap();
    assert_eq!(clip.direction(), Direction::Backward);
    clip.tick(25.0);
    assert_abs_diff_eq!(opacity(&target), 0.75, epsilon = 1e-6);
    clip.tick(75.0);
    assert_eq!((&mut backward).now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 0.0, epsilon = 1e-6);
}

#[test]
fn rewind_runs_the_inverted_easing() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0).easing("ease-in"),
    );

    let _ = clip.play(None).unwrap();
    let mut forward = Vec::new();
    for _ in 0..3 {
        clip.tick(25.0);
        forward.push(opacity(&target));
    }
    clip.tick(25.0);
    // ease-in lags linear progress early on.
    assert!(forward[0] < 0.2);

    let _ = clip.rewind(None).unwrap();
    for expected in forward.iter().rev() {
        clip.tick(25.0);
        assert_abs_diff_eq!(opacity(&target), *expected, epsilon = 1e-4);
    }
}

#[test]
fn playing_while_animating_resolves_false() {
    let (_, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default(),
    );
    let mut first = clip.play(None).unwrap();
    let second = clip.play(None).unwrap();
    assert_eq!(second.now_or_never(), Some(Ok(false)));
    let third = clip.rewind(None).unwrap();
    assert_eq!(third.now_or_never(), Some(Ok(false)));

    clip.tick(500.0);
    assert_eq!((&mut first).now_or_never(), Some(Ok(true)));
}

#[test]
fn zero_duration_is_clamped() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(0.0),
    );
    assert_eq!(clip.config().duration, MIN_DURATION);
    assert_eq!(clip.timing().duration, MIN_DURATION);

    let playback = clip.play(None).unwrap();
    clip.tick(1.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 1.0, epsilon = 1e-6);
}

#[test]
fn invalid_delay_is_rejected_at_initialize() {
    let (_, target) = flik_clip::PropertyTarget::new("#box").shared();
    let err = flik_clip::AnimationClip::new(
        target,
        "fade-in",
        &fade_bank(),
        ClipCategory::Emphasis,
    )
    .unwrap()
    .initialize(
        serde_json::Value::Null,
        ClipConfigPatch::default().delay(-5.0),
    )
    .err()
    .unwrap();
    assert_eq!(err.category(), "configuration");
}

#[test]
fn playback_rate_scales_time() {
    let (_, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0).playback_rate(2.0),
    );
    let playback = clip.play(None).unwrap();
    clip.tick(50.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
}

#[test]
fn pause_holds_progress_until_unpaused() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0),
    );
    let mut playback = clip.play(None).unwrap();
    clip.tick(20.0);
    clip.pause(None).unwrap();
    assert!(clip.status().paused);
    clip.tick(1_000.0);
    assert_abs_diff_eq!(opacity(&target), 0.2, epsilon = 1e-6);
    assert!((&mut playback).now_or_never().is_none());

    clip.unpause(None).unwrap();
    assert!(!clip.status().paused);
    clip.tick(80.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
}

#[test]
fn pause_on_idle_clip_is_ignored() {
    let (_, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default(),
    );
    clip.pause(None).unwrap();
    assert!(!clip.is_paused());
}

#[test]
fn finish_jumps_to_the_end() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default()
            .delay(200.0)
            .duration(300.0)
            .end_delay(100.0),
    );
    let playback = clip.play(None).unwrap();
    clip.tick(10.0);
    assert!(clip.finish(None).unwrap().is_none());
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 1.0, epsilon = 1e-6);
}

#[test]
fn finish_on_idle_clip_plays_forward_instantly() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default(),
    );
    let playback = clip.finish(None).unwrap().unwrap();
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert_abs_diff_eq!(opacity(&target), 1.0, epsilon = 1e-6);

    // Last direction was forward; a rewound clip is left alone.
    let rewind = clip.rewind(None).unwrap();
    clip.tick(500.0);
    assert_eq!(rewind.now_or_never(), Some(Ok(true)));
    assert!(clip.finish(None).unwrap().is_none());
    assert_abs_diff_eq!(opacity(&target), 0.0, epsilon = 1e-6);
}

#[test]
fn class_toggles_run_in_order_both_ways() {
    let classes = ClassToggles {
        add_on_start: vec!["a".into()],
        remove_on_start: vec!["b".into()],
        add_on_finish: vec!["c".into()],
        remove_on_finish: vec!["d".into()],
    };
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default().duration(100.0).css_classes(classes),
    );

    let _ = clip.play(None).unwrap();
    clip.tick(100.0);
    assert_eq!(
        class_events(&target),
        vec![added("a"), removed("b"), added("c"), removed("d")]
    );
    assert_eq!(target.borrow().classes(), ["a", "c"]);

    target.borrow_mut().clear_events();
    let _ = clip.rewind(None).unwrap();
    clip.tick(100.0);
    assert_eq!(
        class_events(&target),
        vec![added("d"), removed("c"), added("b"), removed("a")]
    );
    assert_eq!(target.borrow().classes(), ["d", "b"]);
}

#[test]
fn start_toggles_wait_for_the_delay() {
    let classes = ClassToggles {
        add_on_start: vec!["moving".into()],
        ..Default::default()
    };
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default()
            .delay(100.0)
            .duration(100.0)
            .css_classes(classes),
    );
    let _ = clip.play(None).unwrap();
    clip.tick(99.0);
    assert!(target.borrow().classes().is_empty());
    clip.tick(1.0);
    assert_eq!(target.borrow().classes(), ["moving"]);
}

#[test]
fn entrance_reveals_and_rewind_rehides() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Entrance { hide_now: None },
        1.0,
        ClipConfigPatch::default().duration(100.0),
    );
    target
        .borrow_mut()
        .add_classes(&[HIDDEN_CLASS.to_string()]);

    let playback = clip.play(None).unwrap();
    clip.tick(100.0);
    assert_eq!(playback.now_or_never(), Some(Ok(true)));
    assert!(target.borrow().classes().is_empty());
    // Entrances never commit.
    assert!(!clip.effects().commits_styles);

    let rewind = clip.rewind(None).unwrap();
    clip.tick(100.0);
    assert_eq!(rewind.now_or_never(), Some(Ok(true)));
    assert_eq!(target.borrow().classes(), [HIDDEN_CLASS]);
}

#[test]
fn entrance_hide_now_hides_at_initialize() {
    let (target, _clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Entrance {
            hide_now: Some(HidingMethod::VisibilityHidden),
        },
        1.0,
        ClipConfigPatch::default(),
    );
    assert_eq!(target.borrow().classes(), [INVISIBLE_CLASS]);
}

#[test]
fn entrance_on_visible_target_is_refused() {
    let (_, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Entrance { hide_now: None },
        1.0,
        ClipConfigPatch::default(),
    );
    let playback = clip.play(None).unwrap();
    clip.tick(16.0);
    let err = playback.now_or_never().unwrap().unwrap_err();
    assert_eq!(err.category(), "playback");
    assert!(err.reason().contains("hidden"));
    assert!(!clip.is_animating());
}

#[test]
fn exit_hides_at_finish_and_rewind_unhides() {
    let (target, mut clip) = clip_on(
        &fade_bank(),
        "fade-out",
        ClipCategory::Exit {
            exit_type: HidingMethod::DisplayNone,
        },
        1.0,
        ClipConfigPatch::default().duration(100.0),
    );
    let _ = clip.play(None).unwrap();
    clip.tick(50.0);
    assert!(target.borrow().classes().is_empty());
    clip.tick(50.0);
    assert_eq!(target.borrow().classes(), [HIDDEN_CLASS]);

    let _ = clip.rewind(None).unwrap();
    clip.tick(1.0);
    assert!(target.borrow().classes().is_empty());
}

#[test]
fn phase_listener_sees_every_boundary() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (_, mut clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Emphasis,
        0.0,
        ClipConfigPatch::default()
            .delay(10.0)
            .duration(100.0)
            .end_delay(10.0),
    );
    let sink = seen.clone();
    clip.set_phase_listener(move |boundary, direction| sink.borrow_mut().push((boundary, direction)));

    let _ = clip.play(None).unwrap();
    for _ in 0..12 {
        clip.tick(10.0);
    }
    let _ = clip.rewind(None).unwrap();
    clip.tick(200.0);

    use Direction::{Backward, Forward};
    use PhaseBoundary::{ActiveFinish, DelayFinish, EndDelayFinish};
    assert_eq!(
        *seen.borrow(),
        vec![
            (DelayFinish, Forward),
            (ActiveFinish, Forward),
            (EndDelayFinish, Forward),
            (DelayFinish, Backward),
            (ActiveFinish, Backward),
            (EndDelayFinish, Backward),
        ]
    );
}

#[test]
fn status_views_serialize() {
    let (_, clip) = clip_on(
        &fade_bank(),
        "fade-in",
        ClipCategory::Motion,
        0.0,
        ClipConfigPatch::default().easing("ease-in"),
    );
    let timing = serde_json::to_value(clip.timing()).unwrap();
    assert_eq!(timing["easing"], "ease-in");
    assert_eq!(timing["composite"], "accumulate");
    let status = serde_json::to_value(clip.status()).unwrap();
    assert_eq!(status, serde_json::json!({ "animating": false, "paused": false }));
}
