//! Owners of a clip: the sequence that schedules it and the timeline above that sequence.
//!
//! A clip only reads its owners (rate, pause and skip state) and forwards pause requests to
//! them when a roadblock is reached. Owners live outside this crate and are held weakly.

use std::fmt;
use std::rc::{Rc, Weak};

/// A sequence or timeline that can own clips.
///
/// Implementations must not call back into the clip synchronously from [`ClipOwner::pause`]
/// or [`ClipOwner::unpause`]; the clip is mid-update when it calls them. Queue the change
/// and apply it on the next tick instead.
pub trait ClipOwner {
    fn owner_id(&self) -> u64;

    /// Product of this owner's rate and every rate above it.
    fn compounded_playback_rate(&self) -> f64;

    fn is_paused(&self) -> bool;

    /// Children should jump to their end state instead of playing.
    fn skipping_on(&self) -> bool;

    fn pause(&self);

    fn unpause(&self);
}

#[derive(Clone, Default)]
pub(crate) struct Ownership {
    sequence: Option<Weak<dyn ClipOwner>>,
    timeline: Option<Weak<dyn ClipOwner>>,
    pub(crate) sequence_id: Option<u64>,
    pub(crate) timeline_id: Option<u64>,
}

impl Ownership {
    pub(crate) fn attach(
        &mut self,
        sequence: &Rc<dyn ClipOwner>,
        timeline: Option<&Rc<dyn ClipOwner>>,
    ) {
        self.sequence = Some(Rc::downgrade(sequence));
        self.timeline = timeline.map(Rc::downgrade);
    }

    pub(crate) fn sequence(&self) -> Option<Rc<dyn ClipOwner>> {
        self.sequence.as_ref()?.upgrade()
    }

    pub(crate) fn timeline(&self) -> Option<Rc<dyn ClipOwner>> {
        self.timeline.as_ref()?.upgrade()
    }

    pub(crate) fn is_owned(&self) -> bool {
        self.sequence().is_some()
    }

    /// The caller may drive the clip: it presents the owning sequence, or the clip has no
    /// owner and the caller presents none.
    pub(crate) fn permits(&self, caller: Option<&dyn ClipOwner>) -> bool {
        match (self.sequence(), caller) {
            (None, None) => true,
            (Some(owner), Some(caller)) => owner.owner_id() == caller.owner_id(),
            _ => false,
        }
    }

    /// Own rate times the closest owner's compounded rate.
    pub(crate) fn compounded_rate(&self, own: f64) -> f64 {
        if let Some(sequence) = self.sequence() {
            own * sequence.compounded_playback_rate()
        } else if let Some(timeline) = self.timeline() {
            own * timeline.compounded_playback_rate()
        } else {
            own
        }
    }

    pub(crate) fn skipping(&self) -> bool {
        self.sequence().is_some_and(|s| s.skipping_on())
    }

    pub(crate) fn sequence_paused(&self) -> bool {
        self.sequence().is_some_and(|s| s.is_paused())
    }

    /// The highest live owner, which is the one a roadblock pauses.
    pub(crate) fn root(&self) -> Option<Rc<dyn ClipOwner>> {
        self.timeline().or_else(|| self.sequence())
    }
}

impl fmt::Debug for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ownership")
            .field("sequence_id", &self.sequence_id)
            .field("timeline_id", &self.timeline_id)
            .field("owned", &self.is_owned())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed {
        id: u64,
        rate: f64,
        paused: Cell<bool>,
    }

    impl ClipOwner for Fixed {
        fn owner_id(&self) -> u64 {
            self.id
        }
        fn compounded_playback_rate(&self) -> f64 {
            self.rate
        }
        fn is_paused(&self) -> bool {
            self.paused.get()
        }
        fn skipping_on(&self) -> bool {
            false
        }
        fn pause(&self) {
            self.paused.set(true);
        }
        fn unpause(&self) {
            self.paused.set(false);
        }
    }

    fn owner(id: u64, rate: f64) -> Rc<dyn ClipOwner> {
        Rc::new(Fixed {
            id,
            rate,
            paused: Cell::new(false),
        })
    }

    #[test]
    fn unowned_clip_accepts_only_anonymous_callers() {
        let ownership = Ownership::default();
        let stranger = owner(9, 1.0);
        assert!(ownership.permits(None));
        assert!(!ownership.permits(Some(stranger.as_ref())));
        assert_eq!(ownership.compounded_rate(2.0), 2.0);
    }

    #[test]
    fn owned_clip_accepts_its_sequence() {
        let sequence = owner(1, 0.5);
        let timeline = owner(2, 4.0);
        let mut ownership = Ownership::default();
        ownership.attach(&sequence, Some(&timeline));
        assert!(ownership.permits(Some(sequence.as_ref())));
        assert!(!ownership.permits(Some(timeline.as_ref())));
        assert!(!ownership.permits(None));
        assert_eq!(ownership.compounded_rate(2.0), 1.0);
        assert_eq!(ownership.root().unwrap().owner_id(), 2);
    }

    #[test]
    fn dropped_owners_release_the_clip() {
        let mut ownership = Ownership::default();
        {
            let sequence = owner(1, 1.0);
            ownership.attach(&sequence, None);
            assert!(ownership.is_owned());
        }
        assert!(!ownership.is_owned());
        assert!(ownership.permits(None));
    }
}
