//! Error types for clip construction and playback.

use std::fmt;

use serde::{Deserialize, Serialize};

use flik_easing::EasingError;

/// Where an error happened. Every [`ClipError`] carries one so a failure deep inside a
/// sequence can be traced back to its clip, owners, effect and target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub clip_id: Option<u64>,
    pub sequence_id: Option<u64>,
    pub timeline_id: Option<u64>,
    pub effect: Option<String>,
    pub target: Option<String>,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(id) = self.clip_id {
            parts.push(format!("clip {id}"));
        }
        if let Some(id) = self.sequence_id {
            parts.push(format!("sequence {id}"));
        }
        if let Some(id) = self.timeline_id {
            parts.push(format!("timeline {id}"));
        }
        if let Some(effect) = &self.effect {
            parts.push(format!("effect '{effect}'"));
        }
        if let Some(target) = &self.target {
            parts.push(format!("target '{target}'"));
        }
        if parts.is_empty() {
            return Ok(());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ClipError {
    /// Bad configuration: unknown effect, invalid easing, bad roadblock position, and so on.
    #[error("Invalid configuration: {reason} {context}")]
    InvalidConfiguration {
        reason: String,
        context: ErrorContext,
    },

    /// An effect generator (or one of the producers or mutators it returned) failed.
    #[error("Effect generator failed: {reason} {context}")]
    GeneratorInvocation {
        reason: String,
        context: ErrorContext,
    },

    /// Final values could not be committed to the target.
    #[error("Commit failed: {reason} {context}")]
    Commit {
        reason: String,
        context: ErrorContext,
    },

    /// A clip that belongs to a sequence was driven by someone else.
    #[error("Ownership violation: {reason} {context}")]
    OwnershipViolation {
        reason: String,
        context: ErrorContext,
    },

    /// A category hook refused the requested playback.
    #[error("Invalid playback: {reason} {context}")]
    InvalidPlayback {
        reason: String,
        context: ErrorContext,
    },

    /// Internal bookkeeping went wrong. Always a bug.
    #[error("Internal invariant violated: {reason} {context}")]
    InternalInvariant {
        reason: String,
        context: ErrorContext,
    },
}

impl ClipError {
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidConfiguration { context, .. }
            | Self::GeneratorInvocation { context, .. }
            | Self::Commit { context, .. }
            | Self::OwnershipViolation { context, .. }
            | Self::InvalidPlayback { context, .. }
            | Self::InternalInvariant { context, .. } => context,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidConfiguration { reason, .. }
            | Self::GeneratorInvocation { reason, .. }
            | Self::Commit { reason, .. }
            | Self::OwnershipViolation { reason, .. }
            | Self::InvalidPlayback { reason, .. }
            | Self::InternalInvariant { reason, .. } => reason,
        }
    }

    /// Replace the context, keeping the reason.
    pub fn with_context(mut self, ctx: ErrorContext) -> Self {
        match &mut self {
            Self::InvalidConfiguration { context, .. }
            | Self::GeneratorInvocation { context, .. }
            | Self::Commit { context, .. }
            | Self::OwnershipViolation { context, .. }
            | Self::InvalidPlayback { context, .. }
            | Self::InternalInvariant { context, .. } => *context = ctx,
        }
        self
    }

    /// Playback may continue after this error (the clip still settles).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Commit { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "configuration",
            Self::GeneratorInvocation { .. } => "generator",
            Self::Commit { .. } => "commit",
            Self::OwnershipViolation { .. } => "ownership",
            Self::InvalidPlayback { .. } => "playback",
            Self::InternalInvariant { .. } => "internal",
        }
    }
}

impl From<EasingError> for ClipError {
    fn from(err: EasingError) -> Self {
        Self::InvalidConfiguration {
            reason: err.to_string(),
            context: ErrorContext::default(),
        }
    }
}

impl From<serde_json::Error> for ClipError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfiguration {
            reason: err.to_string(),
            context: ErrorContext::default(),
        }
    }
}
