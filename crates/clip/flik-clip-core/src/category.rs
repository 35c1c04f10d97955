//! Clip categories: per-kind configuration layers and lifecycle hooks.

use serde::{Deserialize, Serialize};

use crate::config::ClipConfigPatch;
use crate::snapshot::Composite;
use crate::target::{MutationTarget, HIDDEN_CLASS, INVISIBLE_CLASS};

/// How a target is taken out of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HidingMethod {
    /// Unrendered; takes no space.
    DisplayNone,
    /// Invisible; keeps its space.
    VisibilityHidden,
}

impl HidingMethod {
    pub fn class(self) -> &'static str {
        match self {
            HidingMethod::DisplayNone => HIDDEN_CLASS,
            HidingMethod::VisibilityHidden => INVISIBLE_CLASS,
        }
    }

    /// The method currently applied to `target`, if any.
    pub fn detect(target: &dyn MutationTarget) -> Option<HidingMethod> {
        if target.has_class(HIDDEN_CLASS) {
            Some(HidingMethod::DisplayNone)
        } else if target.has_class(INVISIBLE_CLASS) {
            Some(HidingMethod::VisibilityHidden)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum ClipCategory {
    /// Reveals a hidden target. `hide_now` hides it as soon as the clip is initialized.
    Entrance { hide_now: Option<HidingMethod> },
    /// Hides a visible target at the end of the active phase.
    Exit { exit_type: HidingMethod },
    Emphasis,
    Motion,
    Scroller,
}

/// Why a hook refused to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum HookFailure {
    Refused(String),
    Invariant(String),
}

/// Mutable state a category keeps between hooks.
#[derive(Clone, Debug, Default)]
pub(crate) struct CategoryState {
    /// What an entrance removed, so a rewind can put it back.
    restore_hiding: Option<HidingMethod>,
}

impl ClipCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ClipCategory::Entrance { .. } => "Entrance",
            ClipCategory::Exit { .. } => "Exit",
            ClipCategory::Emphasis => "Emphasis",
            ClipCategory::Motion => "Motion",
            ClipCategory::Scroller => "Scroller",
        }
    }

    pub fn default_config(&self) -> ClipConfigPatch {
        match self {
            ClipCategory::Entrance { .. } | ClipCategory::Exit { .. } | ClipCategory::Scroller => {
                ClipConfigPatch::default().commits_styles(false)
            }
            ClipCategory::Motion => ClipConfigPatch {
                composite: Some(Composite::Accumulate),
                ..Default::default()
            },
            ClipCategory::Emphasis => ClipConfigPatch::default(),
        }
    }

    /// Settings applied last; callers cannot override them.
    pub fn immutable_config(&self) -> ClipConfigPatch {
        match self {
            ClipCategory::Entrance { .. } | ClipCategory::Exit { .. } => {
                ClipConfigPatch::default().commits_styles(false)
            }
            _ => ClipConfigPatch::default(),
        }
    }

    pub(crate) fn on_initialize(&self, target: &mut dyn MutationTarget) {
        if let ClipCategory::Entrance {
            hide_now: Some(method),
        } = self
        {
            target.add_classes(&[method.class().to_string()]);
        }
    }

    pub(crate) fn on_start_forward(
        &self,
        state: &mut CategoryState,
        target: &mut dyn MutationTarget,
    ) -> Result<(), HookFailure> {
        match self {
            ClipCategory::Entrance { .. } => {
                let Some(method) = HidingMethod::detect(target) else {
                    return Err(HookFailure::Refused(format!(
                        "an entrance can only play on a hidden target; hide it first with \
                         'hide_now', an exit clip, or the \"{HIDDEN_CLASS}\" or \
                         \"{INVISIBLE_CLASS}\" class"
                    )));
                };
                state.restore_hiding = Some(method);
                target.remove_classes(&[method.class().to_string()]);
                Ok(())
            }
            ClipCategory::Exit { .. } => match HidingMethod::detect(target) {
                Some(method) => Err(HookFailure::Refused(format!(
                    "an exit can only play on a visible target; it is already hidden by \"{}\"",
                    method.class()
                ))),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    pub(crate) fn on_finish_forward(&self, target: &mut dyn MutationTarget) {
        if let ClipCategory::Exit { exit_type } = self {
            target.add_classes(&[exit_type.class().to_string()]);
        }
    }

    pub(crate) fn on_start_backward(&self, target: &mut dyn MutationTarget) {
        if let ClipCategory::Exit { exit_type } = self {
            target.remove_classes(&[exit_type.class().to_string()]);
        }
    }

    pub(crate) fn on_finish_backward(
        &self,
        state: &mut CategoryState,
        target: &mut dyn MutationTarget,
    ) -> Result<(), HookFailure> {
        if let ClipCategory::Entrance { .. } = self {
            let Some(method) = state.restore_hiding else {
                return Err(HookFailure::Invariant(
                    "entrance rewound without a recorded hiding method".to_string(),
                ));
            };
            target.add_classes(&[method.class().to_string()]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClipConfig;
    use crate::target::PropertyTarget;

    #[test]
    fn entrance_cannot_commit() {
        let entrance = ClipCategory::Entrance { hide_now: None };
        let user = ClipConfigPatch::default().commits_styles(true);
        let config = ClipConfig::layered([
            &entrance.default_config(),
            &user,
            &entrance.immutable_config(),
        ]);
        assert!(!config.commits_styles);
    }

    #[test]
    fn motion_accumulates_by_default() {
        let config = ClipConfig::layered([&ClipCategory::Motion.default_config()]);
        assert_eq!(config.composite, Composite::Accumulate);
        let config = ClipConfig::layered([&ClipCategory::Scroller.default_config()]);
        assert!(!config.commits_styles);
    }

    #[test]
    fn entrance_round_trip_restores_hiding() {
        let entrance = ClipCategory::Entrance {
            hide_now: Some(HidingMethod::VisibilityHidden),
        };
        let mut state = CategoryState::default();
        let mut target = PropertyTarget::new("#box");
        entrance.on_initialize(&mut target);
        assert!(target.has_class(INVISIBLE_CLASS));

        entrance.on_start_forward(&mut state, &mut target).unwrap();
        assert!(!target.has_class(INVISIBLE_CLASS));

        entrance.on_finish_backward(&mut state, &mut target).unwrap();
        assert!(target.has_class(INVISIBLE_CLASS));
    }

    #[test]
    fn entrance_refuses_visible_target() {
        let entrance = ClipCategory::Entrance { hide_now: None };
        let mut target = PropertyTarget::new("#box");
        let err = entrance
            .on_start_forward(&mut CategoryState::default(), &mut target)
            .unwrap_err();
        assert!(matches!(err, HookFailure::Refused(_)));
        assert!(matches!(
            entrance.on_finish_backward(&mut CategoryState::default(), &mut target),
            Err(HookFailure::Invariant(_))
        ));
    }

    #[test]
    fn exit_hides_and_unhides() {
        let exit = ClipCategory::Exit {
            exit_type: HidingMethod::DisplayNone,
        };
        let mut state = CategoryState::default();
        let mut target = PropertyTarget::new("#box");
        exit.on_start_forward(&mut state, &mut target).unwrap();
        exit.on_finish_forward(&mut target);
        assert!(target.has_class(HIDDEN_CLASS));
        assert!(exit.on_start_forward(&mut state, &mut target).is_err());
        exit.on_start_backward(&mut target);
        assert!(!target.has_class(HIDDEN_CLASS));
    }

    #[test]
    fn category_from_json() {
        let category: ClipCategory =
            serde_json::from_str(r#"{"category":"exit","exit_type":"visibility-hidden"}"#)
                .unwrap();
        assert_eq!(
            category,
            ClipCategory::Exit {
                exit_type: HidingMethod::VisibilityHidden
            }
        );
    }
}
