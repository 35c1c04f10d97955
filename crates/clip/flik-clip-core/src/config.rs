//! Clip configuration and its layered merge.
//!
//! A clip's effective configuration is built from patches applied in order: built-in
//! defaults, the category's defaults, the effect's defaults, the caller's patch, and finally
//! the category's immutable settings. Class lists are unioned across layers instead of
//! replaced.

use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::snapshot::Composite;

/// Shortest active phase a clip will run, in milliseconds.
pub const MIN_DURATION: f64 = 0.01;

/// Marker classes toggled on the target at the start and end of the active phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassToggles {
    pub add_on_start: Vec<String>,
    pub remove_on_start: Vec<String>,
    pub add_on_finish: Vec<String>,
    pub remove_on_finish: Vec<String>,
}

impl ClassToggles {
    /// Union with `other`, keeping first-seen order and dropping duplicates.
    pub fn merged(&self, other: &ClassToggles) -> ClassToggles {
        ClassToggles {
            add_on_start: union(&self.add_on_start, &other.add_on_start),
            remove_on_start: union(&self.remove_on_start, &other.remove_on_start),
            add_on_finish: union(&self.add_on_finish, &other.add_on_finish),
            remove_on_finish: union(&self.remove_on_finish, &other.remove_on_finish),
        }
    }
}

fn union(a: &[String], b: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(a.len() + b.len());
    for class in a.iter().chain(b) {
        if !out.contains(class) {
            out.push(class.clone());
        }
    }
    out
}

/// Effective per-clip settings. Times are in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub duration: f64,
    pub delay: f64,
    pub end_delay: f64,
    /// Easing identifier, see `flik_easing::resolve`.
    pub easing: String,
    pub playback_rate: f64,
    pub composite: Composite,
    pub commits_styles: bool,
    pub commit_styles_forcefully: bool,
    pub css_classes: ClassToggles,
    /// Read by sequences; a clip only stores these.
    pub starts_next_clip: bool,
    pub starts_with_previous: bool,
    pub run_generators_eagerly: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            duration: 500.0,
            delay: 0.0,
            end_delay: 0.0,
            easing: flik_easing::LINEAR.to_string(),
            playback_rate: 1.0,
            composite: Composite::Replace,
            commits_styles: true,
            commit_styles_forcefully: false,
            css_classes: ClassToggles::default(),
            starts_next_clip: false,
            starts_with_previous: false,
            run_generators_eagerly: false,
        }
    }
}

impl ClipConfig {
    /// Fold `layers` over the defaults, then clamp the duration.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a ClipConfigPatch>) -> ClipConfig {
        let mut config = ClipConfig::default();
        for patch in layers {
            patch.apply_to(&mut config);
        }
        config.duration = config.duration.max(MIN_DURATION);
        config
    }

    /// Reject values no timeline can run with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.duration.is_finite() {
            return Err(format!("duration must be finite, got {}", self.duration));
        }
        for (name, value) in [("delay", self.delay), ("end_delay", self.end_delay)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite, non-negative number, got {value}"));
            }
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(format!(
                "playback_rate must be finite and positive, got {}",
                self.playback_rate
            ));
        }
        Ok(())
    }
}

/// Partial [`ClipConfig`]. Unset fields leave the layer below untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfigPatch {
    pub duration: Option<f64>,
    pub delay: Option<f64>,
    pub end_delay: Option<f64>,
    pub easing: Option<String>,
    pub playback_rate: Option<f64>,
    pub composite: Option<Composite>,
    pub commits_styles: Option<bool>,
    pub commit_styles_forcefully: Option<bool>,
    pub css_classes: Option<ClassToggles>,
    pub starts_next_clip: Option<bool>,
    pub starts_with_previous: Option<bool>,
    pub run_generators_eagerly: Option<bool>,
}

impl ClipConfigPatch {
    pub fn from_json(text: &str) -> Result<Self, ClipError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn apply_to(&self, config: &mut ClipConfig) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field { config.$field = v.clone(); })*
            };
        }
        take!(
            duration,
            delay,
            end_delay,
            easing,
            playback_rate,
            composite,
            commits_styles,
            commit_styles_forcefully,
            starts_next_clip,
            starts_with_previous,
            run_generators_eagerly
        );
        if let Some(classes) = &self.css_classes {
            config.css_classes = config.css_classes.merged(classes);
        }
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn delay(mut self, ms: f64) -> Self {
        self.delay = Some(ms);
        self
    }

    pub fn end_delay(mut self, ms: f64) -> Self {
        self.end_delay = Some(ms);
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn playback_rate(mut self, rate: f64) -> Self {
        self.playback_rate = Some(rate);
        self
    }

    pub fn commits_styles(mut self, on: bool) -> Self {
        self.commits_styles = Some(on);
        self
    }

    pub fn commit_styles_forcefully(mut self, on: bool) -> Self {
        self.commit_styles_forcefully = Some(on);
        self
    }

    pub fn run_generators_eagerly(mut self, on: bool) -> Self {
        self.run_generators_eagerly = Some(on);
        self
    }

    pub fn css_classes(mut self, classes: ClassToggles) -> Self {
        self.css_classes = Some(classes);
        self
    }
}
