#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flik_clip::{
    AnimationClip, ClipCategory, ClipConfigPatch, ClipOwner, EffectBank, EffectEntry,
    EffectGenerator, PropertyTarget, Snapshot, SnapshotPair, TargetEvent,
};

/// Owner with settable state that counts pause/unpause requests.
#[derive(Default)]
pub struct FakeOwner {
    pub id: u64,
    pub rate: Cell<f64>,
    pub paused: Cell<bool>,
    pub skipping: Cell<bool>,
    pub pause_calls: Cell<u32>,
    pub unpause_calls: Cell<u32>,
}

impl FakeOwner {
    pub fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id,
            rate: Cell::new(1.0),
            ..Default::default()
        })
    }
}

pub fn erased(owner: &Rc<FakeOwner>) -> Rc<dyn ClipOwner> {
    owner.clone()
}

impl ClipOwner for FakeOwner {
    fn owner_id(&self) -> u64 {
        self.id
    }

    fn compounded_playback_rate(&self) -> f64 {
        self.rate.get()
    }

    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn skipping_on(&self) -> bool {
        self.skipping.get()
    }

    fn pause(&self) {
        self.paused.set(true);
        self.pause_calls.set(self.pause_calls.get() + 1);
    }

    fn unpause(&self) {
        self.paused.set(false);
        self.unpause_calls.set(self.unpause_calls.get() + 1);
    }
}

fn opacity_pair(from: f32, to: f32) -> SnapshotPair {
    SnapshotPair {
        forward: vec![
            Snapshot::new().with("opacity", from),
            Snapshot::new().with("opacity", to),
        ],
        backward: None,
    }
}

/// "fade-in" (opacity 0 to 1) and "fade-out" (1 to 0).
pub fn fade_bank() -> EffectBank {
    let mut bank = EffectBank::new();
    bank.insert(
        "fade-in",
        EffectEntry::new(EffectGenerator::snapshots(|_| Ok(opacity_pair(0.0, 1.0)))),
    )
    .insert(
        "fade-out",
        EffectEntry::new(EffectGenerator::snapshots(|_| Ok(opacity_pair(1.0, 0.0)))),
    );
    bank
}

/// Build and initialize a clip over a fresh target with the given base opacity.
pub fn clip_on(
    bank: &EffectBank,
    effect: &str,
    category: ClipCategory,
    base_opacity: f32,
    patch: ClipConfigPatch,
) -> (Rc<RefCell<PropertyTarget>>, AnimationClip) {
    let (typed, target) = PropertyTarget::new("#box")
        .with_base("opacity", base_opacity)
        .shared();
    let clip = AnimationClip::new(target, effect, bank, category)
        .unwrap()
        .initialize(serde_json::Value::Null, patch)
        .unwrap();
    (typed, clip)
}

pub fn opacity(target: &Rc<RefCell<PropertyTarget>>) -> f32 {
    target
        .borrow()
        .value("opacity")
        .and_then(|v| v.as_float())
        .unwrap()
}

pub fn class_events(target: &Rc<RefCell<PropertyTarget>>) -> Vec<TargetEvent> {
    target
        .borrow()
        .events()
        .iter()
        .filter(|e| matches!(e, TargetEvent::ClassAdded(_) | TargetEvent::ClassRemoved(_)))
        .cloned()
        .collect()
}

pub fn added(class: &str) -> TargetEvent {
    TargetEvent::ClassAdded(class.to_string())
}

pub fn removed(class: &str) -> TargetEvent {
    TargetEvent::ClassRemoved(class.to_string())
}
