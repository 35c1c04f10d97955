//! flik-easing: easing identifiers for flik clips.
//!
//! An easing identifier is either a preset name from [`presets::PRESETS`] (for example
//! `"bounce-out"`) or a curve expression (`"ease-in"`, `"cubic-bezier(...)"`, `"linear(...)"`,
//! `"steps(...)"`).
//!
//! - [`resolve`] turns an identifier into a curve expression. Unknown identifiers pass through.
//! - [`invert`] produces the curve that traces the original backwards in time, which is what a
//!   rewinding clip plays over its reversed motion data.
//! - [`curve`] parses and evaluates expressions.

pub mod curve;
pub mod error;
pub mod presets;

pub use curve::{EaseKeyword, EasingCurve, LinearStop, StepPosition};
pub use error::EasingError;
pub use presets::{preset, preset_names, PRESETS};

/// Identity curve identifier.
pub const LINEAR: &str = "linear";

/// Map a preset identifier to its curve expression; anything else is returned unchanged.
pub fn resolve(easing: &str) -> String {
    if let Some(curve) = preset(easing).or_else(|| preset(&canonical_id(easing))) {
        return curve.to_string();
    }
    easing.to_string()
}

/// Time-inverted curve expression for `easing` (preset or expression).
pub fn invert(easing: &str) -> Result<String, EasingError> {
    let curve = parse_resolved(easing)?;
    let inverted = curve.inverted();
    log::trace!("inverted easing '{easing}' -> '{inverted}'");
    Ok(inverted.to_string())
}

/// Resolve then parse an identifier, reporting failures against the caller's identifier.
pub fn parse_resolved(easing: &str) -> Result<EasingCurve, EasingError> {
    EasingCurve::parse(&resolve(easing)).map_err(|err| match err {
        EasingError::Invalid { .. } => EasingError::invalid(easing),
        EasingError::OutOfRange { reason, .. } => EasingError::OutOfRange {
            easing: easing.to_string(),
            reason,
        },
    })
}

/// Compare two identifiers after resolution and canonicalization (case, whitespace and
/// number formatting do not matter).
pub fn canonical_eq(a: &str, b: &str) -> bool {
    match (parse_resolved(a), parse_resolved(b)) {
        (Ok(ca), Ok(cb)) => ca.approx_eq(&cb, 1e-4),
        _ => false,
    }
}

fn canonical_id(easing: &str) -> String {
    easing.trim().to_ascii_lowercase()
}
