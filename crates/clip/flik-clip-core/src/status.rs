//! Read-only views of a clip for hosts and sequences.

use serde::Serialize;

use crate::config::ClassToggles;
use crate::snapshot::Composite;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClipTiming {
    pub starts_next_clip: bool,
    pub starts_with_previous: bool,
    pub duration: f64,
    pub delay: f64,
    pub end_delay: f64,
    pub easing: String,
    pub playback_rate: f64,
    /// Own rate times the owners' rates.
    pub compounded_playback_rate: f64,
    pub composite: Composite,
    pub run_generators_eagerly: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClipEffects {
    pub css_classes: ClassToggles,
    pub composite: Composite,
    pub commits_styles: bool,
    pub commit_styles_forcefully: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClipStatus {
    pub animating: bool,
    pub paused: bool,
}
