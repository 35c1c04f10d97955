//! The per-frame loop that drives mutator-style effects during the active phase.

use std::cell::Cell;
use std::rc::Rc;

use crate::driver::Direction;

/// Cancellation handle for a running frame loop. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle(Rc<Cell<bool>>);

impl LoopHandle {
    pub fn cancel(&self) {
        self.0.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
pub(crate) struct FrameLoop {
    handle: LoopHandle,
    direction: Direction,
    frames: u64,
}

impl FrameLoop {
    pub(crate) fn start(direction: Direction) -> Self {
        let handle = LoopHandle::default();
        handle.0.set(true);
        log::trace!("frame loop started ({direction:?})");
        Self {
            handle,
            direction,
            frames: 0,
        }
    }

    pub(crate) fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub(crate) fn stop(&self) {
        log::trace!(
            "frame loop stopped ({:?}) after {} frames",
            self.direction,
            self.frames
        );
        self.handle.cancel();
    }
}
