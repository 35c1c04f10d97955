//! Identifiers for clips.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub u64);

static NEXT_CLIP: AtomicU64 = AtomicU64::new(0);

impl ClipId {
    /// Allocate the next process-unique clip id. Ids are monotonic and never reused.
    #[inline]
    pub fn next() -> Self {
        ClipId(NEXT_CLIP.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
