//! Error type for easing resolution.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EasingError {
    /// The identifier is neither a preset nor a parseable curve expression.
    #[error("Invalid easing string \"{easing}\"")]
    Invalid { easing: String },

    /// The curve parsed but one of its arguments is out of range.
    #[error("Invalid easing string \"{easing}\": {reason}")]
    OutOfRange { easing: String, reason: String },
}

impl EasingError {
    pub(crate) fn invalid(easing: &str) -> Self {
        Self::Invalid {
            easing: easing.to_string(),
        }
    }

    /// The identifier that failed to resolve.
    pub fn easing(&self) -> &str {
        match self {
            Self::Invalid { easing } | Self::OutOfRange { easing, .. } => easing,
        }
    }
}
