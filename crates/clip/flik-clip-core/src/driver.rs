//! Phase-aware playback driver.
//!
//! [`PhasedAnimation`] owns the forward and backward timelines of a clip and advances local
//! time on request. It never runs hooks itself: [`PhasedAnimation::advance`] stops at every
//! phase boundary and every roadblock and reports what happened, so the caller can react
//! (toggle classes, generate frames, commit) before asking it to continue.

use std::str::FromStr;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use flik_easing::EasingError;

use crate::error::{ClipError, ErrorContext};
use crate::generator::SnapshotPair;
use crate::roadblock::{
    validate_percent, AwaitableFactory, Gate, PerDirection, Roadblock, TimeMarker,
};
use crate::snapshot::{reverse_snapshots, Composite, Snapshot};
use crate::timeline::{Phase, PhaseTiming, PropertyTimeline};
use crate::value::Value;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl FromStr for Direction {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other => Err(ClipError::InvalidConfiguration {
                reason: format!(
                    "invalid direction \"{other}\"; expected \"forward\" or \"backward\""
                ),
                context: ErrorContext::default(),
            }),
        }
    }
}

/// End of a phase. Each fires once per playback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseBoundary {
    DelayFinish,
    ActiveFinish,
    EndDelayFinish,
}

impl PhaseBoundary {
    fn ending(phase: Phase) -> Self {
        match phase {
            Phase::Delay => PhaseBoundary::DelayFinish,
            Phase::Active => PhaseBoundary::ActiveFinish,
            Phase::EndDelay => PhaseBoundary::EndDelayFinish,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running(Phase),
    Settled,
}

/// Outcome of one [`PhasedAnimation::advance`] call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Advance {
    /// Not running, or paused.
    Inactive,
    /// All of the time was spent inside the current phase.
    Consumed,
    /// Halted at a roadblock. `newly_reached` is set on the call that reached it.
    Blocked { newly_reached: bool },
    /// The pending roadblock resolved; `leftover` ms of wall time were not spent.
    Unblocked { leftover: f64 },
    /// A phase ended; `leftover` ms of wall time were not spent.
    Crossed { boundary: PhaseBoundary, leftover: f64 },
}

#[derive(Debug)]
pub struct PhasedAnimation {
    direction: Direction,
    forward: PropertyTimeline,
    backward: PropertyTimeline,
    state: DriverState,
    local_time: f64,
    playback_rate: f64,
    paused: bool,
    fast_forward: bool,
    roadblocks: PerDirection<Roadblock>,
    markers: PerDirection<TimeMarker>,
    gate: Option<Gate>,
}

impl PhasedAnimation {
    /// Build both directions. The backward timeline swaps the delays and plays the
    /// time-inverted easing.
    pub fn new(
        timing: PhaseTiming,
        easing: &str,
        composite: Composite,
    ) -> Result<Self, EasingError> {
        let forward_curve = flik_easing::parse_resolved(easing)?;
        let backward_curve = flik_easing::parse_resolved(&flik_easing::invert(easing)?)?;
        Ok(Self {
            direction: Direction::Forward,
            forward: PropertyTimeline::new(timing, forward_curve, composite),
            backward: PropertyTimeline::new(timing.reversed(), backward_curve, composite),
            state: DriverState::Idle,
            local_time: 0.0,
            playback_rate: 1.0,
            paused: false,
            fast_forward: false,
            roadblocks: PerDirection::default(),
            markers: PerDirection::default(),
            gate: None,
        })
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Switch direction. Ignored while a playback is in flight.
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.is_running() {
            self.direction = direction;
        }
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running(_))
    }

    #[inline]
    pub fn local_time(&self) -> f64 {
        self.local_time
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Waiting on a roadblock.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.gate.is_some()
    }

    pub fn timeline(&self) -> &PropertyTimeline {
        self.timeline_for(self.direction)
    }

    pub fn timeline_for(&self, direction: Direction) -> &PropertyTimeline {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    pub fn set_forward_frames(&mut self, frames: Vec<Snapshot>) {
        self.forward.set_frames(frames);
    }

    /// Install backward frames. `explicit == false` means `frames` are forward frames that
    /// must be reversed first.
    pub fn set_backward_frames(&mut self, frames: Vec<Snapshot>, explicit: bool) {
        if explicit {
            self.backward.set_frames(frames);
        } else {
            self.backward.set_frames(reverse_snapshots(&frames));
        }
    }

    pub fn install(&mut self, pair: SnapshotPair) {
        match pair.backward {
            Some(backward) => self.backward.set_frames(backward),
            None => self.backward.set_frames(reverse_snapshots(&pair.forward)),
        }
        self.forward.set_frames(pair.forward);
    }

    pub fn clear_frames(&mut self) {
        self.forward.set_frames(Vec::new());
        self.backward.set_frames(Vec::new());
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    #[inline]
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Start from the beginning of the current direction. Boundaries re-arm.
    pub fn play(&mut self) {
        self.state = DriverState::Running(Phase::Delay);
        self.local_time = 0.0;
        self.paused = false;
        self.fast_forward = false;
        self.gate = None;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Run the rest of the playback on the next advance, regardless of elapsed time or
    /// pause. Roadblocks still hold it.
    pub fn finish(&mut self) {
        if self.is_running() {
            self.fast_forward = true;
        }
    }

    /// Drop the current playback.
    pub fn cancel(&mut self) {
        self.state = DriverState::Idle;
        self.local_time = 0.0;
        self.paused = false;
        self.fast_forward = false;
        self.gate = None;
    }

    /// Eased progress of the current direction.
    pub fn eased_progress(&self) -> f64 {
        self.timeline().eased_progress(self.local_time)
    }

    /// Progress from the effect's start state (0) to its end state (1). Runs backwards
    /// while rewinding.
    pub fn effect_progress(&self) -> f64 {
        match self.direction {
            Direction::Forward => self.eased_progress(),
            Direction::Backward => 1.0 - self.eased_progress(),
        }
    }

    /// Values to show right now, if any.
    pub fn current_values(&self, base: &dyn Fn(&str) -> Option<Value>) -> Option<Snapshot> {
        match self.state {
            DriverState::Running(_) => self.timeline().sample(self.local_time, base),
            _ => None,
        }
    }

    pub fn final_values(&self, base: &dyn Fn(&str) -> Option<Value>) -> Snapshot {
        self.timeline().final_values(base)
    }

    /// Register a one-shot roadblock. `factories` are invoked when it is reached.
    pub fn add_roadblock(
        &mut self,
        direction: Direction,
        phase: Phase,
        percent: f64,
        factories: Vec<AwaitableFactory>,
    ) -> Result<(), String> {
        validate_percent(percent)?;
        let timing = *self.timeline_for(direction).timing();
        let block = Roadblock::new(&timing, phase, percent, factories);
        log::trace!("roadblock registered ({direction:?}) at {:.3}ms", block.position);
        self.roadblocks.get_mut(direction).push(block);
        Ok(())
    }

    pub fn pending_roadblocks(&self, direction: Direction) -> usize {
        self.roadblocks.get(direction).len()
    }

    /// Receiver that resolves when playback in `direction` reaches `percent` of `phase`.
    pub fn add_time_marker(
        &mut self,
        direction: Direction,
        phase: Phase,
        percent: f64,
    ) -> Result<oneshot::Receiver<()>, String> {
        validate_percent(percent)?;
        let timing = *self.timeline_for(direction).timing();
        let (marker, receiver) = TimeMarker::new(&timing, phase, percent);
        self.markers.get_mut(direction).push(marker);
        Ok(receiver)
    }

    /// Advance by `dt` ms of wall time, scaled by the playback rate. Stops early at a
    /// roadblock or at the end of the current phase.
    pub fn advance(&mut self, dt: f64) -> Advance {
        let DriverState::Running(phase) = self.state else {
            return Advance::Inactive;
        };

        if let Some(gate) = self.gate.as_mut() {
            if !gate.is_open() {
                log::trace!("gate at {:.3}ms still closed", self.local_time);
                return Advance::Blocked {
                    newly_reached: false,
                };
            }
            log::trace!("gate at {:.3}ms opened", self.local_time);
            self.gate = None;
            return Advance::Unblocked { leftover: dt };
        }

        if self.paused && !self.fast_forward {
            return Advance::Inactive;
        }

        let start = self.local_time;
        let (_, phase_end) = self.timeline().timing().span(phase);
        let budget = if self.fast_forward {
            f64::INFINITY
        } else {
            dt.max(0.0) * self.playback_rate
        };
        let reach = (start + budget).min(phase_end);

        if let Some(block) = self.take_roadblock(phase, start, reach) {
            self.local_time = block.position;
            self.fire_markers(phase, self.local_time);
            self.gate = Some(block.into_gate());
            return Advance::Blocked {
                newly_reached: true,
            };
        }

        self.local_time = reach;
        self.fire_markers(phase, reach);
        if reach < phase_end {
            return Advance::Consumed;
        }

        let boundary = PhaseBoundary::ending(phase);
        let leftover = if self.fast_forward {
            0.0
        } else {
            ((budget - (phase_end - start)) / self.playback_rate).max(0.0)
        };
        self.state = match phase.next() {
            Some(next) => DriverState::Running(next),
            None => {
                self.fast_forward = false;
                DriverState::Settled
            }
        };
        log::debug!(
            "{boundary:?} ({:?}) at {:.3}ms",
            self.direction,
            self.local_time
        );
        Advance::Crossed { boundary, leftover }
    }

    fn take_roadblock(&mut self, phase: Phase, from: f64, to: f64) -> Option<Roadblock> {
        let list = self.roadblocks.get_mut(self.direction);
        let index = list
            .iter()
            .enumerate()
            .filter(|(_, b)| b.phase == phase && b.position >= from && b.position <= to)
            .min_by(|(_, a), (_, b)| a.position.total_cmp(&b.position))
            .map(|(i, _)| i)?;
        Some(list.remove(index))
    }

    fn fire_markers(&mut self, phase: Phase, upto: f64) {
        let due = self
            .markers
            .drain_matching(self.direction, |m| m.phase == phase && m.position <= upto);
        for marker in due {
            marker.fire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn driver(delay: f64, duration: f64, end_delay: f64) -> PhasedAnimation {
        PhasedAnimation::new(
            PhaseTiming {
                delay,
                duration,
                end_delay,
            },
            "linear",
            Composite::Replace,
        )
        .unwrap()
    }

    #[test]
    fn crosses_each_boundary_once() {
        let mut d = driver(100.0, 200.0, 50.0);
        d.play();
        assert_eq!(d.advance(50.0), Advance::Consumed);
        assert_eq!(
            d.advance(100.0),
            Advance::Crossed {
                boundary: PhaseBoundary::DelayFinish,
                leftover: 50.0
            }
        );
        assert_eq!(d.state(), DriverState::Running(Phase::Active));
        assert_eq!(d.advance(50.0), Advance::Consumed);
        assert_eq!(d.local_time(), 150.0);
        assert_eq!(
            d.advance(1000.0),
            Advance::Crossed {
                boundary: PhaseBoundary::ActiveFinish,
                leftover: 850.0
            }
        );
        assert_eq!(
            d.advance(850.0),
            Advance::Crossed {
                boundary: PhaseBoundary::EndDelayFinish,
                leftover: 800.0
            }
        );
        assert_eq!(d.state(), DriverState::Settled);
        assert_eq!(d.advance(10.0), Advance::Inactive);
    }

    #[test]
    fn zero_length_phases_cross_immediately() {
        let mut d = driver(0.0, 100.0, 0.0);
        d.play();
        assert!(matches!(
            d.advance(0.0),
            Advance::Crossed {
                boundary: PhaseBoundary::DelayFinish,
                ..
            }
        ));
    }

    #[test]
    fn playback_rate_scales_time() {
        let mut d = driver(0.0, 100.0, 0.0);
        d.set_playback_rate(2.0);
        d.play();
        d.advance(0.0);
        assert_eq!(d.advance(25.0), Advance::Consumed);
        assert_eq!(d.local_time(), 50.0);
        assert_eq!(
            d.advance(50.0),
            Advance::Crossed {
                boundary: PhaseBoundary::ActiveFinish,
                leftover: 25.0
            }
        );
    }

    #[test]
    fn pause_freezes_time() {
        let mut d = driver(0.0, 100.0, 0.0);
        d.play();
        d.advance(0.0);
        d.pause();
        assert_eq!(d.advance(50.0), Advance::Inactive);
        assert_eq!(d.local_time(), 0.0);
        d.resume();
        assert_eq!(d.advance(50.0), Advance::Consumed);
    }

    #[test]
    fn backward_swaps_delays() {
        let mut d = driver(100.0, 200.0, 30.0);
        d.set_direction(Direction::Backward);
        d.play();
        assert!(matches!(
            d.advance(30.0),
            Advance::Crossed {
                boundary: PhaseBoundary::DelayFinish,
                ..
            }
        ));
    }

    #[test]
    fn finish_runs_through_every_phase() {
        let mut d = driver(100.0, 200.0, 50.0);
        d.play();
        d.finish();
        let mut boundaries = Vec::new();
        loop {
            match d.advance(0.0) {
                Advance::Crossed { boundary, .. } => boundaries.push(boundary),
                _ => break,
            }
        }
        assert_eq!(
            boundaries,
            vec![
                PhaseBoundary::DelayFinish,
                PhaseBoundary::ActiveFinish,
                PhaseBoundary::EndDelayFinish
            ]
        );
    }

    #[test]
    fn roadblock_holds_until_resolved() {
        let mut d = driver(0.0, 100.0, 0.0);
        let (tx, rx) = oneshot::channel::<()>();
        let mut rx = Some(rx);
        let wait: AwaitableFactory = Box::new(move || {
            let rx = rx.take();
            async move {
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
            }
            .boxed_local()
        });
        d.add_roadblock(Direction::Forward, Phase::Active, 50.0, vec![wait])
            .unwrap();
        d.play();
        d.advance(0.0);
        assert_eq!(
            d.advance(80.0),
            Advance::Blocked {
                newly_reached: true
            }
        );
        assert_eq!(d.local_time(), 50.0);
        assert_eq!(
            d.advance(80.0),
            Advance::Blocked {
                newly_reached: false
            }
        );
        assert_eq!(d.local_time(), 50.0);
        tx.send(()).unwrap();
        assert_eq!(d.advance(10.0), Advance::Unblocked { leftover: 10.0 });
        assert_eq!(d.advance(10.0), Advance::Consumed);
        assert_eq!(d.local_time(), 60.0);
        assert_eq!(d.pending_roadblocks(Direction::Forward), 0);
    }

    #[test]
    fn roadblocks_are_per_direction() {
        let mut d = driver(0.0, 100.0, 0.0);
        d.add_roadblock(Direction::Backward, Phase::Active, 50.0, Vec::new())
            .unwrap();
        d.play();
        d.advance(0.0);
        assert_eq!(d.advance(80.0), Advance::Consumed);
        assert_eq!(d.pending_roadblocks(Direction::Backward), 1);
        assert!(d
            .add_roadblock(Direction::Forward, Phase::Active, 120.0, Vec::new())
            .is_err());
    }

    #[test]
    fn time_markers_fire_when_reached() {
        let mut d = driver(0.0, 100.0, 0.0);
        let mut half = d
            .add_time_marker(Direction::Forward, Phase::Active, 50.0)
            .unwrap();
        d.play();
        d.advance(0.0);
        d.advance(40.0);
        assert_eq!(half.try_recv(), Ok(None));
        d.advance(20.0);
        assert_eq!(half.try_recv(), Ok(Some(())));
    }

    #[test]
    fn effect_progress_runs_backwards_when_rewinding() {
        let mut d = driver(0.0, 100.0, 0.0);
        d.set_direction(Direction::Backward);
        d.play();
        d.advance(0.0);
        d.advance(25.0);
        assert!((d.effect_progress() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn direction_tokens() {
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("backward".parse::<Direction>().unwrap(), Direction::Backward);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
