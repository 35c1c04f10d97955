//! The mutable element a clip animates.
//!
//! A clip never talks to a renderer directly. It samples values and hands them to a
//! [`MutationTarget`], toggles marker classes on it, and asks it to commit final values.
//! Hosts implement the trait for their element type; [`PropertyTarget`] is an in-memory
//! implementation for headless use.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::value::Value;

/// Removes the target from layout (display: none).
pub const HIDDEN_CLASS: &str = "flik-display-none";
/// Hides the target while it keeps its layout box (visibility: hidden).
pub const INVISIBLE_CLASS: &str = "flik-visibility-hidden";
/// Temporarily forces a hidden target to render so its values can be committed.
pub const OVERRIDE_HIDDEN_CLASS: &str = "flik-force-show";

/// The target could not accept committed values because it is not rendered.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("target is not rendered")]
pub struct Unrendered;

pub trait MutationTarget {
    /// Human-readable identity used in logs and error contexts.
    fn label(&self) -> String;

    /// Unanimated value of `property`, if the target has one.
    fn base_value(&self, property: &str) -> Option<Value>;

    /// Show `values` on top of the base values until cleared.
    fn apply_animated(&mut self, values: &Snapshot);

    fn clear_animated(&mut self);

    /// Write `values` into the base values. Fails when the target is not rendered.
    fn commit(&mut self, values: &Snapshot) -> Result<(), Unrendered>;

    fn add_classes(&mut self, classes: &[String]);

    fn remove_classes(&mut self, classes: &[String]);

    fn has_class(&self, class: &str) -> bool;
}

/// Shared handle to a target. Clips and effect generators all hold one.
pub type TargetRef = Rc<RefCell<dyn MutationTarget>>;

/// Something that happened to a [`PropertyTarget`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TargetEvent {
    ClassAdded(String),
    ClassRemoved(String),
    Committed(Snapshot),
    CommitRefused,
}

/// In-memory target: a base property map, an animated overlay and a class list.
///
/// It renders unless it carries [`HIDDEN_CLASS`] without [`OVERRIDE_HIDDEN_CLASS`], or an
/// ancestor is marked hidden.
#[derive(Clone, Debug, Default)]
pub struct PropertyTarget {
    label: String,
    base: IndexMap<String, Value>,
    animated: IndexMap<String, Value>,
    classes: Vec<String>,
    ancestor_hidden: bool,
    events: Vec<TargetEvent>,
}

impl PropertyTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_base(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.insert(property.into(), value.into());
        self
    }

    /// Wrap into a shared [`TargetRef`] while keeping a typed handle for inspection.
    pub fn shared(self) -> (Rc<RefCell<PropertyTarget>>, TargetRef) {
        let typed = Rc::new(RefCell::new(self));
        let erased: TargetRef = typed.clone();
        (typed, erased)
    }

    pub fn set_ancestor_hidden(&mut self, hidden: bool) {
        self.ancestor_hidden = hidden;
    }

    pub fn is_rendered(&self) -> bool {
        if self.ancestor_hidden {
            return false;
        }
        !self.has_class(HIDDEN_CLASS) || self.has_class(OVERRIDE_HIDDEN_CLASS)
    }

    /// Current value: the animated overlay if present, else the base value.
    pub fn value(&self, property: &str) -> Option<&Value> {
        self.animated
            .get(property)
            .or_else(|| self.base.get(property))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn events(&self) -> &[TargetEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl MutationTarget for PropertyTarget {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn base_value(&self, property: &str) -> Option<Value> {
        self.base.get(property).cloned()
    }

    fn apply_animated(&mut self, values: &Snapshot) {
        for (name, value) in &values.properties {
            self.animated.insert(name.clone(), value.clone());
        }
    }

    fn clear_animated(&mut self) {
        self.animated.clear();
    }

    fn commit(&mut self, values: &Snapshot) -> Result<(), Unrendered> {
        if !self.is_rendered() {
            self.events.push(TargetEvent::CommitRefused);
            return Err(Unrendered);
        }
        for (name, value) in &values.properties {
            self.base.insert(name.clone(), value.clone());
        }
        self.events.push(TargetEvent::Committed(values.clone()));
        Ok(())
    }

    fn add_classes(&mut self, classes: &[String]) {
        for class in classes {
            if !self.classes.contains(class) {
                self.classes.push(class.clone());
            }
            self.events.push(TargetEvent::ClassAdded(class.clone()));
        }
    }

    fn remove_classes(&mut self, classes: &[String]) {
        for class in classes {
            self.classes.retain(|c| c != class);
            self.events.push(TargetEvent::ClassRemoved(class.clone()));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
