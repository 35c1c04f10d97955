//! One direction of a clip: phase timing, an easing curve and the frames it plays.

use serde::{Deserialize, Serialize};

use flik_easing::EasingCurve;

use crate::snapshot::{sample_snapshots, Composite, Snapshot};
use crate::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Delay,
    Active,
    EndDelay,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Delay => Some(Phase::Active),
            Phase::Active => Some(Phase::EndDelay),
            Phase::EndDelay => None,
        }
    }
}

/// Phase lengths in local milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub delay: f64,
    pub duration: f64,
    pub end_delay: f64,
}

impl PhaseTiming {
    #[inline]
    pub fn total(&self) -> f64 {
        self.delay + self.duration + self.end_delay
    }

    /// Start and end of `phase`.
    pub fn span(&self, phase: Phase) -> (f64, f64) {
        match phase {
            Phase::Delay => (0.0, self.delay),
            Phase::Active => (self.delay, self.delay + self.duration),
            Phase::EndDelay => (self.delay + self.duration, self.total()),
        }
    }

    /// Local time at `percent` (0..=100) of `phase`.
    pub fn position(&self, phase: Phase, percent: f64) -> f64 {
        let (start, end) = self.span(phase);
        start + (end - start) * percent / 100.0
    }

    /// Timing of the rewound clip: the end delay plays first.
    pub fn reversed(&self) -> PhaseTiming {
        PhaseTiming {
            delay: self.end_delay,
            duration: self.duration,
            end_delay: self.delay,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PropertyTimeline {
    timing: PhaseTiming,
    curve: EasingCurve,
    composite: Composite,
    frames: Vec<Snapshot>,
}

impl PropertyTimeline {
    pub fn new(timing: PhaseTiming, curve: EasingCurve, composite: Composite) -> Self {
        Self {
            timing,
            curve,
            composite,
            frames: Vec::new(),
        }
    }

    pub fn timing(&self) -> &PhaseTiming {
        &self.timing
    }

    pub fn curve(&self) -> &EasingCurve {
        &self.curve
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    pub fn set_frames(&mut self, frames: Vec<Snapshot>) {
        self.frames = frames;
    }

    /// Linear progress through the active phase, clamped to [0, 1].
    pub fn raw_progress(&self, local_time: f64) -> f64 {
        let (start, _) = self.timing.span(Phase::Active);
        if self.timing.duration <= 0.0 {
            return if local_time >= start { 1.0 } else { 0.0 };
        }
        ((local_time - start) / self.timing.duration).clamp(0.0, 1.0)
    }

    /// Eased progress; may leave [0, 1] for overshooting curves.
    pub fn eased_progress(&self, local_time: f64) -> f64 {
        self.curve.evaluate(self.raw_progress(local_time))
    }

    /// Values to show at `local_time`. Nothing is shown before the active phase; after it
    /// the final values are held.
    pub fn sample(&self, local_time: f64, base: &dyn Fn(&str) -> Option<Value>) -> Option<Snapshot> {
        if self.frames.is_empty() || local_time < self.timing.delay {
            return None;
        }
        Some(sample_snapshots(
            &self.frames,
            self.eased_progress(local_time),
            self.composite,
            base,
        ))
    }

    /// Values at the end of the active phase.
    pub fn final_values(&self, base: &dyn Fn(&str) -> Option<Value>) -> Snapshot {
        sample_snapshots(&self.frames, self.curve.evaluate(1.0), self.composite, base)
    }
}
