//! Roadblocks and time markers: positions on a directional timeline that gate progress or
//! notify observers.

use std::fmt;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{join_all, LocalBoxFuture};
use futures::FutureExt;

use crate::driver::Direction;
use crate::timeline::{Phase, PhaseTiming};

/// Builds the awaitable a roadblock waits on. Called once, when the roadblock is reached.
pub type AwaitableFactory = Box<dyn FnMut() -> LocalBoxFuture<'static, ()>>;

pub(crate) struct Roadblock {
    pub(crate) phase: Phase,
    pub(crate) position: f64,
    factories: Vec<AwaitableFactory>,
}

impl Roadblock {
    pub(crate) fn new(
        timing: &PhaseTiming,
        phase: Phase,
        percent: f64,
        factories: Vec<AwaitableFactory>,
    ) -> Self {
        Self {
            phase,
            position: timing.position(phase, percent),
            factories,
        }
    }

    /// Start every awaitable and combine them into one gate.
    pub(crate) fn into_gate(mut self) -> Gate {
        let pending: Vec<_> = self.factories.iter_mut().map(|factory| factory()).collect();
        Gate {
            future: join_all(pending).map(|_| ()).boxed_local(),
        }
    }
}

impl fmt::Debug for Roadblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roadblock")
            .field("phase", &self.phase)
            .field("position", &self.position)
            .field("awaitables", &self.factories.len())
            .finish()
    }
}

/// A reached roadblock. Playback stays put until it resolves.
pub(crate) struct Gate {
    future: LocalBoxFuture<'static, ()>,
}

impl Gate {
    /// Poll once without a real waker; the clip re-checks on every tick.
    pub(crate) fn is_open(&mut self) -> bool {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        matches!(self.future.poll_unpin(&mut cx), Poll::Ready(()))
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gate")
    }
}

#[derive(Debug)]
pub(crate) struct TimeMarker {
    pub(crate) phase: Phase,
    pub(crate) position: f64,
    sender: oneshot::Sender<()>,
}

impl TimeMarker {
    pub(crate) fn new(
        timing: &PhaseTiming,
        phase: Phase,
        percent: f64,
    ) -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        let marker = Self {
            phase,
            position: timing.position(phase, percent),
            sender,
        };
        (marker, receiver)
    }

    pub(crate) fn fire(self) {
        // The observer may have stopped listening.
        let _ = self.sender.send(());
    }
}

/// Separate lists for each playback direction.
#[derive(Debug)]
pub(crate) struct PerDirection<T> {
    forward: Vec<T>,
    backward: Vec<T>,
}

impl<T> Default for PerDirection<T> {
    fn default() -> Self {
        Self {
            forward: Vec::new(),
            backward: Vec::new(),
        }
    }
}

impl<T> PerDirection<T> {
    pub(crate) fn get_mut(&mut self, direction: Direction) -> &mut Vec<T> {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }

    pub(crate) fn get(&self, direction: Direction) -> &[T] {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    /// Remove and return every item of `direction` matching `pred`, keeping the rest in order.
    pub(crate) fn drain_matching(
        &mut self,
        direction: Direction,
        mut pred: impl FnMut(&T) -> bool,
    ) -> Vec<T> {
        let list = self.get_mut(direction);
        let mut taken = Vec::new();
        let mut i = 0;
        while i < list.len() {
            if pred(&list[i]) {
                taken.push(list.remove(i));
            } else {
                i += 1;
            }
        }
        taken
    }
}

pub(crate) fn validate_percent(percent: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(format!("percent must be within [0, 100], got {percent}"))
    }
}
