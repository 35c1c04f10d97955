//! AnimationClip: one playable, reversible effect bound to one target.
//!
//! A clip is built from a named effect in an [`EffectBank`], initialized with effect options
//! and a configuration patch, then driven by the host: `play`/`rewind` start a playback and
//! return a [`Playback`] future, and `tick` advances time once per frame. Phase boundaries
//! are where the clip does its work:
//!
//! - delay finish: start-class toggles, category start hook, lazy generation, frame loop start
//! - active finish: final mutator frame, commit of final values, finish-class toggles and hook
//! - end-delay finish: the animated overlay is cleared and the playback resolves to `true`
//!
//! Generator failures abort the playback. Commit failures reject the playback but the
//! remaining phases still run.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::category::{CategoryState, ClipCategory, HookFailure};
use crate::config::{ClipConfig, ClipConfigPatch};
use crate::driver::{Advance, Direction, DriverState, PhaseBoundary, PhasedAnimation};
use crate::error::{ClipError, ErrorContext};
use crate::frame_loop::{FrameLoop, LoopHandle};
use crate::generator::{
    EffectBank, EffectEntry, EffectGenerator, GenerationContext, GeneratorFn, Mutator,
    MutatorFrame, MutatorPair, MutatorProducers, SnapshotPair, SnapshotProducers,
};
use crate::ids::ClipId;
use crate::owner::{ClipOwner, Ownership};
use crate::roadblock::AwaitableFactory;
use crate::snapshot::Snapshot;
use crate::status::{ClipEffects, ClipStatus, ClipTiming};
use crate::target::{TargetRef, OVERRIDE_HIDDEN_CLASS};
use crate::timeline::{Phase, PhaseTiming};

/// Observer for phase boundaries, called before the clip reacts to them.
pub type PhaseListener = Box<dyn FnMut(PhaseBoundary, Direction)>;

/// Completion of one `play`/`rewind` call.
///
/// Resolves to `Ok(true)` once the clip settles, `Ok(false)` if the clip was already
/// animating when the call was made, or the first error raised during the playback.
#[derive(Debug)]
pub struct Playback {
    clip_id: ClipId,
    state: PlaybackState,
}

#[derive(Debug)]
enum PlaybackState {
    Ready(Option<Result<bool, ClipError>>),
    Pending(oneshot::Receiver<Result<bool, ClipError>>),
}

impl Playback {
    fn ready(clip_id: ClipId, outcome: Result<bool, ClipError>) -> Self {
        Self {
            clip_id,
            state: PlaybackState::Ready(Some(outcome)),
        }
    }

    fn pending(clip_id: ClipId, receiver: oneshot::Receiver<Result<bool, ClipError>>) -> Self {
        Self {
            clip_id,
            state: PlaybackState::Pending(receiver),
        }
    }

    pub fn clip_id(&self) -> ClipId {
        self.clip_id
    }
}

impl Future for Playback {
    type Output = Result<bool, ClipError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let clip_id = self.clip_id;
        match &mut self.state {
            PlaybackState::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or(Ok(false))),
            PlaybackState::Pending(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                Poll::Ready(Err(oneshot::Canceled)) => {
                    Poll::Ready(Err(ClipError::InternalInvariant {
                        reason: "clip dropped before its playback settled".to_string(),
                        context: ErrorContext {
                            clip_id: Some(clip_id.0),
                            ..Default::default()
                        },
                    }))
                }
            },
        }
    }
}

#[derive(Default)]
struct MutatorSlots {
    forward: Option<Mutator>,
    backward: Option<Mutator>,
}

impl MutatorSlots {
    fn get_mut(&mut self, direction: Direction) -> Option<&mut Mutator> {
        match direction {
            Direction::Forward => self.forward.as_mut(),
            Direction::Backward => self.backward.as_mut(),
        }
    }

    fn set(&mut self, direction: Direction, mutator: Mutator) {
        match direction {
            Direction::Forward => self.forward = Some(mutator),
            Direction::Backward => self.backward = Some(mutator),
        }
    }
}

impl From<MutatorPair> for MutatorSlots {
    fn from(pair: MutatorPair) -> Self {
        Self {
            forward: Some(pair.forward),
            backward: Some(pair.backward),
        }
    }
}

/// Whatever a generator handed back, kept for the rest of the clip's life.
enum GenerationArtifacts {
    /// Frames live on the driver; `generated` is false until the generator has run.
    Snapshots { generated: bool },
    SnapshotProducers(SnapshotProducers),
    Mutators(MutatorSlots),
    MutatorProducers(MutatorProducers, MutatorSlots),
}

pub struct AnimationClip {
    id: ClipId,
    effect_name: String,
    entry: Rc<EffectEntry>,
    category: ClipCategory,
    category_state: CategoryState,
    target: TargetRef,
    options: serde_json::Value,
    config: ClipConfig,
    driver: Option<PhasedAnimation>,
    artifacts: Option<GenerationArtifacts>,
    ownership: Ownership,
    is_animating: bool,
    is_paused: bool,
    /// Final values already live in the base; the overlay stays off until the next playback.
    committed: bool,
    frame_loop: Option<FrameLoop>,
    completion: Option<oneshot::Sender<Result<bool, ClipError>>>,
    phase_listener: Option<PhaseListener>,
}

impl AnimationClip {
    /// Look up `effect_name` in `bank`. Unknown names fail here.
    pub fn new(
        target: TargetRef,
        effect_name: &str,
        bank: &EffectBank,
        category: ClipCategory,
    ) -> Result<Self, ClipError> {
        let id = ClipId::next();
        let Some(entry) = bank.get(effect_name) else {
            let label = target.try_borrow().ok().map(|t| t.label());
            return Err(ClipError::InvalidConfiguration {
                reason: format!(
                    "unknown effect \"{effect_name}\" for {} clip",
                    category.name()
                ),
                context: ErrorContext {
                    clip_id: Some(id.0),
                    effect: Some(effect_name.to_string()),
                    target: label,
                    ..Default::default()
                },
            });
        };
        Ok(Self {
            id,
            effect_name: effect_name.to_string(),
            entry,
            category,
            category_state: CategoryState::default(),
            target,
            options: serde_json::Value::Null,
            config: ClipConfig::default(),
            driver: None,
            artifacts: None,
            ownership: Ownership::default(),
            is_animating: false,
            is_paused: false,
            committed: false,
            frame_loop: None,
            completion: None,
            phase_listener: None,
        })
    }

    /// Merge configuration, build the driver and run eager generation. Once per clip.
    pub fn initialize(
        mut self,
        options: serde_json::Value,
        patch: ClipConfigPatch,
    ) -> Result<Self, ClipError> {
        if self.driver.is_some() {
            return Err(self.invariant("clip initialized twice"));
        }
        let config = ClipConfig::layered([
            &self.category.default_config(),
            &self.entry.default_config,
            &patch,
            &self.category.immutable_config(),
        ]);
        if let Err(reason) = config.validate() {
            return Err(self.configuration_error(reason));
        }
        self.config = config;
        self.options = options;

        let timing = PhaseTiming {
            delay: self.config.delay,
            duration: self.config.duration,
            end_delay: self.config.end_delay,
        };
        let driver = PhasedAnimation::new(timing, &self.config.easing, self.config.composite)
            .map_err(|err| ClipError::from(err).with_context(self.context()))?;
        self.driver = Some(driver);

        let artifacts = self.prepare_artifacts()?;
        self.artifacts = Some(artifacts);
        self.category.on_initialize(&mut *self.target.borrow_mut());

        log::debug!(
            "clip {} initialized: {} '{}' ({:?}), {}ms",
            self.id,
            self.category.name(),
            self.effect_name,
            self.entry.generator.strategy(),
            self.config.duration
        );
        Ok(self)
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn effect_name(&self) -> &str {
        &self.effect_name
    }

    pub fn category(&self) -> &ClipCategory {
        &self.category
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Direction of the current or most recent playback.
    pub fn direction(&self) -> Direction {
        self.driver
            .as_ref()
            .map(PhasedAnimation::direction)
            .unwrap_or_default()
    }

    pub fn timing(&self) -> ClipTiming {
        ClipTiming {
            starts_next_clip: self.config.starts_next_clip,
            starts_with_previous: self.config.starts_with_previous,
            duration: self.config.duration,
            delay: self.config.delay,
            end_delay: self.config.end_delay,
            easing: self.config.easing.clone(),
            playback_rate: self.config.playback_rate,
            compounded_playback_rate: self.ownership.compounded_rate(self.config.playback_rate),
            composite: self.config.composite,
            run_generators_eagerly: self.config.run_generators_eagerly,
        }
    }

    pub fn effects(&self) -> ClipEffects {
        ClipEffects {
            css_classes: self.config.css_classes.clone(),
            composite: self.config.composite,
            commits_styles: self.config.commits_styles,
            commit_styles_forcefully: self.config.commit_styles_forcefully,
        }
    }

    pub fn status(&self) -> ClipStatus {
        ClipStatus {
            animating: self.is_animating,
            paused: self.is_paused,
        }
    }

    /// Handle of the running frame loop, if a mutator effect is in its active phase.
    pub fn frame_loop_handle(&self) -> Option<LoopHandle> {
        self.frame_loop.as_ref().map(FrameLoop::handle)
    }

    pub fn set_phase_listener(&mut self, listener: impl FnMut(PhaseBoundary, Direction) + 'static) {
        self.phase_listener = Some(Box::new(listener));
    }

    /// Make this clip part of `sequence` (and the timeline above it, if any).
    pub fn attach_owner(
        &mut self,
        sequence: &Rc<dyn ClipOwner>,
        timeline: Option<&Rc<dyn ClipOwner>>,
    ) {
        self.ownership.attach(sequence, timeline);
    }

    /// Ids reported in error contexts.
    pub fn set_id(&mut self, sequence_id: Option<u64>, timeline_id: Option<u64>) {
        self.ownership.sequence_id = sequence_id;
        self.ownership.timeline_id = timeline_id;
    }

    /// Hold playback in `direction` at `percent` of `phase` until every awaitable resolves.
    pub fn add_roadblocks(
        &mut self,
        direction: Direction,
        phase: Phase,
        percent: f64,
        factories: Vec<AwaitableFactory>,
    ) -> Result<(), ClipError> {
        let registered = self
            .driver_mut()?
            .add_roadblock(direction, phase, percent, factories);
        registered.map_err(|reason| self.configuration_error(reason))
    }

    /// Resolves when playback in `direction` reaches `percent` of `phase`.
    /// The receiver reports `Canceled` if the clip is dropped first.
    pub fn time_marker(
        &mut self,
        direction: Direction,
        phase: Phase,
        percent: f64,
    ) -> Result<oneshot::Receiver<()>, ClipError> {
        let marker = self.driver_mut()?.add_time_marker(direction, phase, percent);
        marker.map_err(|reason| self.configuration_error(reason))
    }

    pub fn play(&mut self, owner: Option<&dyn ClipOwner>) -> Result<Playback, ClipError> {
        self.check_owner("play", owner)?;
        self.animate(Direction::Forward)
    }

    pub fn rewind(&mut self, owner: Option<&dyn ClipOwner>) -> Result<Playback, ClipError> {
        self.check_owner("rewind", owner)?;
        self.animate(Direction::Backward)
    }

    /// Only effective while animating.
    pub fn pause(&mut self, owner: Option<&dyn ClipOwner>) -> Result<(), ClipError> {
        self.check_owner("pause", owner)?;
        self.pause_playback();
        Ok(())
    }

    pub fn unpause(&mut self, owner: Option<&dyn ClipOwner>) -> Result<(), ClipError> {
        self.check_owner("unpause", owner)?;
        self.resume_playback();
        Ok(())
    }

    /// Run the rest of the playback now, firing every remaining hook. On an idle clip whose
    /// last direction was forward, starts a forward playback first and returns it.
    pub fn finish(&mut self, owner: Option<&dyn ClipOwner>) -> Result<Option<Playback>, ClipError> {
        self.check_owner("finish", owner)?;
        if self.is_animating {
            self.driver_mut()?.finish();
            self.run(0.0);
            return Ok(None);
        }
        if self.direction() != Direction::Forward {
            return Ok(None);
        }
        let playback = self.animate(Direction::Forward)?;
        if self.is_animating {
            self.driver_mut()?.finish();
            self.run(0.0);
        }
        Ok(Some(playback))
    }

    /// Frame callback: advance by `dt_ms` of wall time.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.is_animating {
            self.run(dt_ms);
        }
    }

    fn animate(&mut self, direction: Direction) -> Result<Playback, ClipError> {
        if self.is_animating {
            log::debug!("clip {} already animating; {direction:?} ignored", self.id);
            return Ok(Playback::ready(self.id, Ok(false)));
        }

        let rate = self.ownership.compounded_rate(self.config.playback_rate);
        let skipping = self.ownership.skipping();
        let owner_paused = self.ownership.sequence_paused();
        let regenerate = direction == Direction::Forward && !self.config.run_generators_eagerly;

        let driver = self.driver_mut()?;
        driver.set_direction(direction);
        if regenerate {
            driver.clear_frames();
        }
        driver.set_playback_rate(rate);
        driver.play();
        if owner_paused {
            driver.pause();
        }
        if skipping {
            driver.finish();
        }
        if regenerate {
            if let Some(GenerationArtifacts::Snapshots { generated }) = self.artifacts.as_mut() {
                *generated = false;
            }
        }

        let (sender, receiver) = oneshot::channel();
        self.completion = Some(sender);
        self.is_animating = true;
        self.is_paused = owner_paused;
        self.committed = false;
        log::debug!("clip {} animating {direction:?} at rate {rate}", self.id);

        if skipping {
            self.run(0.0);
        }
        Ok(Playback::pending(self.id, receiver))
    }

    fn run(&mut self, dt: f64) {
        let mut remaining = dt;
        while self.is_animating {
            let Some(driver) = self.driver.as_mut() else {
                return;
            };
            match driver.advance(remaining) {
                Advance::Inactive => break,
                Advance::Consumed => {
                    if let Err(err) = self.render() {
                        self.abort(err);
                    }
                    break;
                }
                Advance::Blocked { newly_reached } => {
                    if let Err(err) = self.render() {
                        self.abort(err);
                    } else if newly_reached {
                        self.hold_for_roadblock();
                    }
                    break;
                }
                Advance::Unblocked { leftover } => {
                    self.release_roadblock();
                    remaining = leftover;
                }
                Advance::Crossed { boundary, leftover } => {
                    remaining = leftover;
                    if let Err(err) = self.cross(boundary) {
                        self.abort(err);
                    }
                }
            }
        }
    }

    /// Show the current values and drive the mutator, if one is running.
    fn render(&mut self) -> Result<(), ClipError> {
        let Some(driver) = self.driver.as_ref() else {
            return Ok(());
        };
        let in_active = driver.state() == DriverState::Running(Phase::Active);
        let progress = driver.effect_progress();
        if !self.committed {
            let values = {
                let target = self.target.borrow();
                driver.current_values(&|p: &str| target.base_value(p))
            };
            if let Some(values) = values.filter(|v| !v.is_empty()) {
                self.target.borrow_mut().apply_animated(&values);
            }
        }

        let looping = self
            .frame_loop
            .as_ref()
            .filter(|frame_loop| frame_loop.is_running())
            .map(FrameLoop::direction);
        if let (true, Some(direction)) = (in_active, looping) {
            self.run_mutator_frame(direction, progress)?;
            if let Some(frame_loop) = self.frame_loop.as_mut() {
                frame_loop.record_frame();
            }
        }
        Ok(())
    }

    fn cross(&mut self, boundary: PhaseBoundary) -> Result<(), ClipError> {
        let direction = self.direction();
        if let Some(listener) = self.phase_listener.as_mut() {
            listener(boundary, direction);
        }
        match boundary {
            PhaseBoundary::DelayFinish => self.on_delay_finish(direction),
            PhaseBoundary::ActiveFinish => self.on_active_finish(direction),
            PhaseBoundary::EndDelayFinish => {
                self.settle();
                Ok(())
            }
        }
    }

    fn on_delay_finish(&mut self, direction: Direction) -> Result<(), ClipError> {
        let classes = &self.config.css_classes;
        match direction {
            Direction::Forward => {
                {
                    let mut target = self.target.borrow_mut();
                    target.add_classes(&classes.add_on_start);
                    target.remove_classes(&classes.remove_on_start);
                }
                let hooked = self
                    .category
                    .on_start_forward(&mut self.category_state, &mut *self.target.borrow_mut());
                self.hook_result(hooked)?;
            }
            Direction::Backward => {
                let mut target = self.target.borrow_mut();
                self.category.on_start_backward(&mut *target);
                target.add_classes(&classes.remove_on_finish);
                target.remove_classes(&classes.add_on_finish);
            }
        }

        if !self.config.run_generators_eagerly {
            self.generate_for(direction)?;
        }
        if self.entry.generator.uses_mutators() {
            self.frame_loop = Some(FrameLoop::start(direction));
        }
        Ok(())
    }

    fn on_active_finish(&mut self, direction: Direction) -> Result<(), ClipError> {
        if let Some(frame_loop) = self.frame_loop.take() {
            if frame_loop.is_running() {
                let progress = self.driver_ref()?.effect_progress();
                let last = self.run_mutator_frame(frame_loop.direction(), progress);
                frame_loop.stop();
                last?;
            }
        }

        let final_values = {
            let target = self.target.borrow();
            self.driver_ref()?
                .final_values(&|p: &str| target.base_value(p))
        };
        if !final_values.is_empty() {
            self.target.borrow_mut().apply_animated(&final_values);
            if self.config.commits_styles || self.config.commit_styles_forcefully {
                if let Err(err) = self.commit(&final_values) {
                    log::warn!("clip {}: {err}", self.id);
                    self.reject(err);
                }
            }
        }

        let classes = &self.config.css_classes;
        match direction {
            Direction::Forward => {
                let mut target = self.target.borrow_mut();
                target.add_classes(&classes.add_on_finish);
                target.remove_classes(&classes.remove_on_finish);
                self.category.on_finish_forward(&mut *target);
            }
            Direction::Backward => {
                let hooked = self
                    .category
                    .on_finish_backward(&mut self.category_state, &mut *self.target.borrow_mut());
                self.hook_result(hooked)?;
                let mut target = self.target.borrow_mut();
                target.add_classes(&classes.remove_on_start);
                target.remove_classes(&classes.add_on_start);
            }
        }
        Ok(())
    }

    fn settle(&mut self) {
        self.is_animating = false;
        self.is_paused = false;
        if let Some(driver) = self.driver.as_mut() {
            driver.cancel();
        }
        self.stop_frame_loop();
        self.target.borrow_mut().clear_animated();
        log::debug!("clip {} settled", self.id);
        if let Some(sender) = self.completion.take() {
            let _ = sender.send(Ok(true));
        }
    }

    fn abort(&mut self, err: ClipError) {
        log::warn!("clip {} aborted: {err}", self.id);
        self.is_animating = false;
        self.is_paused = false;
        if let Some(driver) = self.driver.as_mut() {
            driver.cancel();
        }
        self.stop_frame_loop();
        self.target.borrow_mut().clear_animated();
        self.reject(err);
    }

    /// First error wins; later ones are only logged.
    fn reject(&mut self, err: ClipError) {
        if let Some(sender) = self.completion.take() {
            let _ = sender.send(Err(err));
        }
    }

    fn stop_frame_loop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
    }

    /// Write `values` into the target. A forced commit briefly un-hides an unrendered
    /// target and retries.
    fn commit(&mut self, values: &Snapshot) -> Result<(), ClipError> {
        let forcefully = self.config.commit_styles_forcefully;
        let outcome = {
            let mut target = self.target.borrow_mut();
            match target.commit(values) {
                Ok(()) => Ok(()),
                Err(_) if !forcefully => Err(
                    "cannot commit values while the target is not rendered; set \
                     'commit_styles_forcefully' to temporarily override its hidden state \
                     (this still fails if an ancestor is unrendered)",
                ),
                Err(_) => {
                    log::warn!(
                        "clip {}: target unrendered, forcing it visible to commit",
                        self.id
                    );
                    let override_class = [OVERRIDE_HIDDEN_CLASS.to_string()];
                    target.add_classes(&override_class);
                    let retried = target.commit(values);
                    target.remove_classes(&override_class);
                    retried.map_err(|_| {
                        "failed to commit values after overriding the target's hidden state; \
                         an ancestor is unrendered"
                    })
                }
            }
        };
        match outcome {
            Ok(()) => {
                self.target.borrow_mut().clear_animated();
                self.committed = true;
                Ok(())
            }
            Err(reason) => Err(ClipError::Commit {
                reason: reason.to_string(),
                context: self.context(),
            }),
        }
    }

    fn prepare_artifacts(&mut self) -> Result<GenerationArtifacts, ClipError> {
        let eager = self.config.run_generators_eagerly;
        let artifacts = match self.entry.generator.clone() {
            EffectGenerator::Snapshots(generate) => {
                if eager {
                    let pair = self.invoke(&generate)?;
                    self.driver_mut()?.install(pair);
                }
                GenerationArtifacts::Snapshots { generated: eager }
            }
            EffectGenerator::SnapshotProducers(generate) => {
                let mut producers = self.invoke(&generate)?;
                if eager {
                    let forward = (producers.forward)().map_err(|e| self.generator_error(e))?;
                    let backward = match producers.backward.as_mut() {
                        Some(produce) => Some(produce().map_err(|e| self.generator_error(e))?),
                        None => None,
                    };
                    self.driver_mut()?.install(SnapshotPair { forward, backward });
                }
                GenerationArtifacts::SnapshotProducers(producers)
            }
            EffectGenerator::Mutators(generate) => {
                if eager {
                    GenerationArtifacts::Mutators(self.invoke(&generate)?.into())
                } else {
                    GenerationArtifacts::Mutators(MutatorSlots::default())
                }
            }
            EffectGenerator::MutatorProducers(generate) => {
                let mut producers = self.invoke(&generate)?;
                let mut slots = MutatorSlots::default();
                if eager {
                    let forward = (producers.forward)().map_err(|e| self.generator_error(e))?;
                    let backward = (producers.backward)().map_err(|e| self.generator_error(e))?;
                    slots.set(Direction::Forward, forward);
                    slots.set(Direction::Backward, backward);
                }
                GenerationArtifacts::MutatorProducers(producers, slots)
            }
        };
        Ok(artifacts)
    }

    /// Lazy generation at the start of the active phase.
    fn generate_for(&mut self, direction: Direction) -> Result<(), ClipError> {
        match self.entry.generator.clone() {
            EffectGenerator::Snapshots(generate) => {
                let generated = matches!(
                    self.artifacts,
                    Some(GenerationArtifacts::Snapshots { generated: true })
                );
                // A rewind reuses the pair generated by the last forward playback.
                if direction == Direction::Backward && generated {
                    return Ok(());
                }
                let pair = self.invoke(&generate)?;
                self.driver_mut()?.install(pair);
                self.artifacts = Some(GenerationArtifacts::Snapshots { generated: true });
            }
            EffectGenerator::SnapshotProducers(_) => {
                let Some(GenerationArtifacts::SnapshotProducers(producers)) = self.artifacts.as_mut()
                else {
                    return Err(self.invariant("snapshot producers missing"));
                };
                let (produced, explicit) = match (direction, producers.backward.as_mut()) {
                    (Direction::Forward, _) => ((producers.forward)(), true),
                    (Direction::Backward, Some(produce)) => (produce(), true),
                    (Direction::Backward, None) => ((producers.forward)(), false),
                };
                let frames = produced.map_err(|e| self.generator_error(e))?;
                let driver = self.driver_mut()?;
                match direction {
                    Direction::Forward => driver.set_forward_frames(frames),
                    Direction::Backward => driver.set_backward_frames(frames, explicit),
                }
            }
            EffectGenerator::Mutators(generate) => {
                let have_backward = matches!(
                    &self.artifacts,
                    Some(GenerationArtifacts::Mutators(slots)) if slots.backward.is_some()
                );
                if direction == Direction::Forward || !have_backward {
                    let pair = self.invoke(&generate)?;
                    self.artifacts = Some(GenerationArtifacts::Mutators(pair.into()));
                }
            }
            EffectGenerator::MutatorProducers(_) => {
                let Some(GenerationArtifacts::MutatorProducers(producers, _)) =
                    self.artifacts.as_mut()
                else {
                    return Err(self.invariant("mutator producers missing"));
                };
                let produced = match direction {
                    Direction::Forward => (producers.forward)(),
                    Direction::Backward => (producers.backward)(),
                };
                let mutator = produced.map_err(|e| self.generator_error(e))?;
                if let Some(GenerationArtifacts::MutatorProducers(_, slots)) = self.artifacts.as_mut() {
                    slots.set(direction, mutator);
                }
            }
        }
        Ok(())
    }

    fn run_mutator_frame(&mut self, direction: Direction, progress: f64) -> Result<(), ClipError> {
        let frame = MutatorFrame { progress };
        let outcome = match self.artifacts.as_mut() {
            Some(GenerationArtifacts::Mutators(slots))
            | Some(GenerationArtifacts::MutatorProducers(_, slots)) => {
                slots.get_mut(direction).map(|mutator| mutator(&frame))
            }
            _ => None,
        };
        log::trace!("clip {} mutator frame ({direction:?}) at {progress:.4}", self.id);
        match outcome {
            Some(Ok(())) => Ok(()),
            Some(Err(err)) => Err(self.generator_error(err)),
            None => Err(self.invariant("no mutator for the current direction")),
        }
    }

    fn invoke<T>(&self, generate: &GeneratorFn<T>) -> Result<T, ClipError> {
        let ctx = GenerationContext {
            clip_id: self.id,
            effect_name: &self.effect_name,
            options: &self.options,
            config: &self.config,
            target: &self.target,
        };
        generate(&ctx).map_err(|err| self.generator_error(err))
    }

    fn hold_for_roadblock(&mut self) {
        match self.ownership.root() {
            Some(owner) => {
                log::debug!(
                    "clip {} held by roadblock; pausing owner {}",
                    self.id,
                    owner.owner_id()
                );
                owner.pause();
            }
            None => {
                log::debug!("clip {} held by roadblock", self.id);
                self.pause_playback();
            }
        }
    }

    fn release_roadblock(&mut self) {
        match self.ownership.root() {
            Some(owner) => owner.unpause(),
            None => self.resume_playback(),
        }
    }

    fn pause_playback(&mut self) {
        if !self.is_animating {
            return;
        }
        self.is_paused = true;
        if let Some(driver) = self.driver.as_mut() {
            driver.pause();
        }
    }

    fn resume_playback(&mut self) {
        if !self.is_paused {
            return;
        }
        self.is_paused = false;
        if let Some(driver) = self.driver.as_mut() {
            driver.resume();
        }
    }

    fn check_owner(&self, action: &str, caller: Option<&dyn ClipOwner>) -> Result<(), ClipError> {
        if self.ownership.permits(caller) {
            return Ok(());
        }
        let reason = if self.ownership.is_owned() {
            format!("cannot {action} a clip directly while it belongs to a sequence")
        } else {
            format!("cannot {action}: the caller does not own this clip")
        };
        Err(ClipError::OwnershipViolation {
            reason,
            context: self.context(),
        })
    }

    fn hook_result(&self, result: Result<(), HookFailure>) -> Result<(), ClipError> {
        result.map_err(|failure| match failure {
            HookFailure::Refused(reason) => ClipError::InvalidPlayback {
                reason,
                context: self.context(),
            },
            HookFailure::Invariant(reason) => self.invariant(&reason),
        })
    }

    fn driver_ref(&self) -> Result<&PhasedAnimation, ClipError> {
        let id = self.id;
        self.driver.as_ref().ok_or_else(|| not_initialized(id))
    }

    fn driver_mut(&mut self) -> Result<&mut PhasedAnimation, ClipError> {
        let id = self.id;
        self.driver.as_mut().ok_or_else(|| not_initialized(id))
    }

    fn context(&self) -> ErrorContext {
        ErrorContext {
            clip_id: Some(self.id.0),
            sequence_id: self.ownership.sequence_id,
            timeline_id: self.ownership.timeline_id,
            effect: Some(self.effect_name.clone()),
            target: self.target.try_borrow().ok().map(|t| t.label()),
        }
    }

    fn generator_error(&self, err: anyhow::Error) -> ClipError {
        ClipError::GeneratorInvocation {
            reason: format!("{err:#}"),
            context: self.context(),
        }
    }

    fn configuration_error(&self, reason: String) -> ClipError {
        ClipError::InvalidConfiguration {
            reason,
            context: self.context(),
        }
    }

    fn invariant(&self, reason: &str) -> ClipError {
        ClipError::InternalInvariant {
            reason: reason.to_string(),
            context: self.context(),
        }
    }
}

fn not_initialized(id: ClipId) -> ClipError {
    ClipError::InternalInvariant {
        reason: "clip used before initialize".to_string(),
        context: ErrorContext {
            clip_id: Some(id.0),
            ..Default::default()
        },
    }
}
