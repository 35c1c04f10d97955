//! Keyframe snapshots and their sampling.
//!
//! A snapshot list is the frame data a snapshot-style generator produces: each snapshot maps
//! property names to values and may pin itself to an offset in [0, 1]. Unpinned snapshots are
//! spread evenly between their pinned neighbours; the first defaults to 0 and the last to 1.
//! A property missing from the first or last pinned position is keyed to the target's base
//! value there (implicit keyframes).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How sampled values combine with the target's base value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composite {
    #[default]
    Replace,
    Add,
    Accumulate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(flatten)]
    pub properties: IndexMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot pinned at `offset`.
    pub fn at(offset: f64) -> Self {
        Self {
            offset: Some(offset),
            properties: IndexMap::new(),
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Reverse a snapshot list in time: order is reversed and pinned offsets mirrored.
pub fn reverse_snapshots(frames: &[Snapshot]) -> Vec<Snapshot> {
    frames
        .iter()
        .rev()
        .map(|frame| Snapshot {
            offset: frame.offset.map(|o| 1.0 - o),
            properties: frame.properties.clone(),
        })
        .collect()
}

/// Computed offset of every frame.
pub fn computed_offsets(frames: &[Snapshot]) -> Vec<f64> {
    let n = frames.len();
    let mut offsets: Vec<Option<f64>> = frames.iter().map(|f| f.offset).collect();
    match n {
        0 => return Vec::new(),
        1 => {
            offsets[0].get_or_insert(1.0);
        }
        _ => {
            offsets[0].get_or_insert(0.0);
            offsets[n - 1].get_or_insert(1.0);
        }
    }

    let mut anchor = 0;
    for i in 1..n {
        let Some(end) = offsets[i] else { continue };
        let start = offsets[anchor].unwrap_or(0.0);
        let gap = i - anchor;
        for (step, slot) in offsets[anchor + 1..i].iter_mut().enumerate() {
            *slot = Some(start + (end - start) * (step + 1) as f64 / gap as f64);
        }
        anchor = i;
    }
    offsets.into_iter().map(|o| o.unwrap_or(1.0)).collect()
}

/// Sample `frames` at (eased) `progress`.
///
/// `base` supplies the target's unanimated value of a property. Progress outside [0, 1]
/// extrapolates along the first or last segment.
pub fn sample_snapshots(
    frames: &[Snapshot],
    progress: f64,
    composite: Composite,
    base: &dyn Fn(&str) -> Option<Value>,
) -> Snapshot {
    let offsets = computed_offsets(frames);
    let mut tracks: IndexMap<&str, Vec<(f64, Value)>> = IndexMap::new();
    for (frame, offset) in frames.iter().zip(&offsets) {
        for (name, value) in &frame.properties {
            tracks
                .entry(name.as_str())
                .or_default()
                .push((*offset, value.clone()));
        }
    }

    let mut out = Snapshot::new();
    for (name, mut keys) in tracks {
        let base_value = base(name);
        if let Some(base_value) = &base_value {
            if keys.first().is_some_and(|(x, _)| *x > 0.0) {
                keys.insert(0, (0.0, base_value.clone()));
            }
            if keys.last().is_some_and(|(x, _)| *x < 1.0) {
                keys.push((1.0, base_value.clone()));
            }
        }
        let Some(value) = interpolate(&keys, progress) else {
            continue;
        };
        let value = match (composite, &base_value) {
            (Composite::Replace, _) | (_, None) => value,
            (Composite::Add | Composite::Accumulate, Some(b)) => b.add(&value).unwrap_or(value),
        };
        out.properties.insert(name.to_string(), value);
    }
    out
}

fn interpolate(keys: &[(f64, Value)], p: f64) -> Option<Value> {
    match keys {
        [] => None,
        [(_, only)] => Some(only.clone()),
        _ => {
            let last = keys.len() - 2;
            let i = keys
                .iter()
                .rposition(|(x, _)| *x <= p)
                .unwrap_or(0)
                .min(last);
            let (x0, a) = &keys[i];
            let (x1, b) = &keys[i + 1];
            let span = x1 - x0;
            let local = if span <= 0.0 {
                if p >= *x1 {
                    1.0
                } else {
                    0.0
                }
            } else {
                (p - x0) / span
            };
            Some(a.lerp(b, local as f32))
        }
    }
}
