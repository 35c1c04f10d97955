//! Effect generators and the bank that names them.
//!
//! An effect is a named generator plus default configuration. A generator runs against a
//! [`GenerationContext`] and returns motion data in one of four shapes:
//!
//! - [`EffectGenerator::Snapshots`]: forward (and optionally backward) snapshot lists.
//! - [`EffectGenerator::SnapshotProducers`]: closures that produce those lists on demand.
//! - [`EffectGenerator::Mutators`]: per-frame closures driven by progress.
//! - [`EffectGenerator::MutatorProducers`]: closures that produce mutators on demand.
//!
//! Generators report failures with `anyhow`; the clip wraps them with its own context.

use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::config::{ClipConfig, ClipConfigPatch};
use crate::ids::ClipId;
use crate::snapshot::Snapshot;
use crate::target::TargetRef;

/// What a generator gets to look at.
pub struct GenerationContext<'a> {
    pub clip_id: ClipId,
    pub effect_name: &'a str,
    /// Caller-supplied effect options.
    pub options: &'a serde_json::Value,
    pub config: &'a ClipConfig,
    pub target: &'a TargetRef,
}

impl GenerationContext<'_> {
    /// Deserialize the effect options into a typed struct.
    pub fn options_as<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        let parsed = serde_json::from_value(self.options.clone())?;
        Ok(parsed)
    }
}

pub struct SnapshotPair {
    pub forward: Vec<Snapshot>,
    /// Played when rewinding. `None` plays the forward frames reversed.
    pub backward: Option<Vec<Snapshot>>,
}

pub type SnapshotProducer = Box<dyn FnMut() -> anyhow::Result<Vec<Snapshot>>>;

pub struct SnapshotProducers {
    pub forward: SnapshotProducer,
    /// `None` reverses the output of `forward`.
    pub backward: Option<SnapshotProducer>,
}

/// One frame handed to a mutator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutatorFrame {
    /// Eased progress of the effect, 0 at its start state and 1 at its end state,
    /// whichever way the clip is playing.
    pub progress: f64,
}

impl MutatorFrame {
    #[inline]
    pub fn tween(&self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.progress
    }
}

pub type Mutator = Box<dyn FnMut(&MutatorFrame) -> anyhow::Result<()>>;

pub struct MutatorPair {
    pub forward: Mutator,
    pub backward: Mutator,
}

pub type MutatorProducer = Box<dyn FnMut() -> anyhow::Result<Mutator>>;

pub struct MutatorProducers {
    pub forward: MutatorProducer,
    pub backward: MutatorProducer,
}

pub type GeneratorFn<T> = Rc<dyn Fn(&GenerationContext<'_>) -> anyhow::Result<T>>;

#[derive(Clone)]
pub enum EffectGenerator {
    Snapshots(GeneratorFn<SnapshotPair>),
    SnapshotProducers(GeneratorFn<SnapshotProducers>),
    Mutators(GeneratorFn<MutatorPair>),
    MutatorProducers(GeneratorFn<MutatorProducers>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeneratorStrategy {
    Snapshots,
    SnapshotProducers,
    Mutators,
    MutatorProducers,
}

impl EffectGenerator {
    pub fn snapshots(
        f: impl Fn(&GenerationContext<'_>) -> anyhow::Result<SnapshotPair> + 'static,
    ) -> Self {
        Self::Snapshots(Rc::new(f))
    }

    pub fn snapshot_producers(
        f: impl Fn(&GenerationContext<'_>) -> anyhow::Result<SnapshotProducers> + 'static,
    ) -> Self {
        Self::SnapshotProducers(Rc::new(f))
    }

    pub fn mutators(
        f: impl Fn(&GenerationContext<'_>) -> anyhow::Result<MutatorPair> + 'static,
    ) -> Self {
        Self::Mutators(Rc::new(f))
    }

    pub fn mutator_producers(
        f: impl Fn(&GenerationContext<'_>) -> anyhow::Result<MutatorProducers> + 'static,
    ) -> Self {
        Self::MutatorProducers(Rc::new(f))
    }

    /// Generator that animates nothing.
    pub fn empty() -> Self {
        Self::snapshots(|_| {
            Ok(SnapshotPair {
                forward: Vec::new(),
                backward: None,
            })
        })
    }

    pub fn strategy(&self) -> GeneratorStrategy {
        match self {
            Self::Snapshots(_) => GeneratorStrategy::Snapshots,
            Self::SnapshotProducers(_) => GeneratorStrategy::SnapshotProducers,
            Self::Mutators(_) => GeneratorStrategy::Mutators,
            Self::MutatorProducers(_) => GeneratorStrategy::MutatorProducers,
        }
    }

    #[inline]
    pub fn uses_mutators(&self) -> bool {
        matches!(self, Self::Mutators(_) | Self::MutatorProducers(_))
    }
}

impl fmt::Debug for EffectGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EffectGenerator")
            .field(&self.strategy())
            .finish()
    }
}

/// A generator together with the configuration it prefers.
#[derive(Clone, Debug)]
pub struct EffectEntry {
    pub generator: EffectGenerator,
    pub default_config: ClipConfigPatch,
}

impl EffectEntry {
    pub fn new(generator: EffectGenerator) -> Self {
        Self {
            generator,
            default_config: ClipConfigPatch::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ClipConfigPatch) -> Self {
        self.default_config = defaults;
        self
    }
}

/// Named effects available to clips.
#[derive(Clone, Debug, Default)]
pub struct EffectBank {
    entries: HashMap<String, Rc<EffectEntry>>,
}

impl EffectBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: EffectEntry) -> &mut Self {
        self.entries.insert(name.into(), Rc::new(entry));
        self
    }

    pub fn get(&self, name: &str) -> Option<Rc<EffectEntry>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
