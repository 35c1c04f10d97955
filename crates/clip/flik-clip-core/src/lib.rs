//! flik clip core (host-agnostic)
//!
//! One [`AnimationClip`] animates one [`MutationTarget`] with one named effect from an
//! [`EffectBank`]. The host drives time by calling [`AnimationClip::tick`] once per frame;
//! `play`/`rewind` hand back a [`Playback`] future that settles when the clip does.
//!
//! Timing lives in [`PhasedAnimation`] (delay, active, end delay; forward and backward),
//! motion data comes from an [`EffectGenerator`], and easing identifiers are resolved and
//! inverted by `flik-easing`.

pub mod category;
pub mod clip;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame_loop;
pub mod generator;
pub mod ids;
pub mod owner;
pub mod roadblock;
pub mod snapshot;
pub mod status;
pub mod target;
pub mod timeline;
pub mod value;

// Re-exports for hosts
pub use category::{ClipCategory, HidingMethod};
pub use clip::{AnimationClip, PhaseListener, Playback};
pub use config::{ClassToggles, ClipConfig, ClipConfigPatch, MIN_DURATION};
pub use driver::{Advance, Direction, DriverState, PhaseBoundary, PhasedAnimation};
pub use error::{ClipError, ErrorContext};
pub use frame_loop::LoopHandle;
pub use generator::{
    EffectBank, EffectEntry, EffectGenerator, GenerationContext, GeneratorStrategy, Mutator,
    MutatorFrame, MutatorPair, MutatorProducer, MutatorProducers, SnapshotPair, SnapshotProducer,
    SnapshotProducers,
};
pub use ids::ClipId;
pub use owner::ClipOwner;
pub use roadblock::AwaitableFactory;
pub use snapshot::{Composite, Snapshot};
pub use status::{ClipEffects, ClipStatus, ClipTiming};
pub use target::{
    MutationTarget, PropertyTarget, TargetEvent, TargetRef, Unrendered, HIDDEN_CLASS,
    INVISIBLE_CLASS, OVERRIDE_HIDDEN_CLASS,
};
pub use timeline::{Phase, PhaseTiming, PropertyTimeline};
pub use value::{Value, ValueKind};
