//! Parsed easing curves: evaluation, time-inversion and canonical serialization.
//!
//! Supported notations (case-insensitive, surrounding whitespace ignored):
//! - `linear` (identity)
//! - `ease`, `ease-in`, `ease-out`, `ease-in-out`
//! - `step-start`, `step-end`
//! - `linear(<value> [<percent>%], ...)`
//! - `cubic-bezier(x1, y1, x2, y2)`
//! - `steps(<count>[, <position>])`

use std::fmt;

use crate::error::EasingError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EaseKeyword {
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EaseKeyword {
    fn control_points(self) -> [f64; 4] {
        match self {
            EaseKeyword::Ease => [0.25, 0.1, 0.25, 1.0],
            EaseKeyword::EaseIn => [0.42, 0.0, 1.0, 1.0],
            EaseKeyword::EaseOut => [0.0, 0.0, 0.58, 1.0],
            EaseKeyword::EaseInOut => [0.42, 0.0, 0.58, 1.0],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            EaseKeyword::Ease => "ease",
            EaseKeyword::EaseIn => "ease-in",
            EaseKeyword::EaseOut => "ease-out",
            EaseKeyword::EaseInOut => "ease-in-out",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepPosition {
    JumpStart,
    JumpEnd,
    JumpNone,
    JumpBoth,
    Start,
    End,
}

impl StepPosition {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "jump-start" => Some(StepPosition::JumpStart),
            "jump-end" => Some(StepPosition::JumpEnd),
            "jump-none" => Some(StepPosition::JumpNone),
            "jump-both" => Some(StepPosition::JumpBoth),
            "start" => Some(StepPosition::Start),
            "end" => Some(StepPosition::End),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            StepPosition::JumpStart => "jump-start",
            StepPosition::JumpEnd => "jump-end",
            StepPosition::JumpNone => "jump-none",
            StepPosition::JumpBoth => "jump-both",
            StepPosition::Start => "start",
            StepPosition::End => "end",
        }
    }

    /// Start and end jumps trade places under time reversal.
    fn swapped(self) -> Self {
        match self {
            StepPosition::JumpStart => StepPosition::JumpEnd,
            StepPosition::JumpEnd => StepPosition::JumpStart,
            StepPosition::Start => StepPosition::End,
            StepPosition::End => StepPosition::Start,
            other => other,
        }
    }

    fn jumps_at_start(self) -> bool {
        matches!(
            self,
            StepPosition::JumpStart | StepPosition::Start | StepPosition::JumpBoth
        )
    }
}

/// One control point of a `linear(...)` curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearStop {
    pub value: f64,
    /// Input position in percent. Unpositioned stops are spread evenly when evaluated.
    pub percent: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EasingCurve {
    Identity,
    Keyword(EaseKeyword),
    StepStart,
    StepEnd,
    Linear(Vec<LinearStop>),
    CubicBezier([f64; 4]),
    Steps { count: u32, position: StepPosition },
}

impl EasingCurve {
    /// Parse a curve expression. Preset names are not accepted here; see [`crate::resolve`].
    pub fn parse(input: &str) -> Result<Self, EasingError> {
        let text = input.trim().to_ascii_lowercase();
        match text.as_str() {
            "linear" => return Ok(EasingCurve::Identity),
            "ease" => return Ok(EasingCurve::Keyword(EaseKeyword::Ease)),
            "ease-in" => return Ok(EasingCurve::Keyword(EaseKeyword::EaseIn)),
            "ease-out" => return Ok(EasingCurve::Keyword(EaseKeyword::EaseOut)),
            "ease-in-out" => return Ok(EasingCurve::Keyword(EaseKeyword::EaseInOut)),
            "step-start" => return Ok(EasingCurve::StepStart),
            "step-end" => return Ok(EasingCurve::StepEnd),
            _ => {}
        }

        if let Some(args) = function_args(&text, "linear") {
            return parse_linear(input, args);
        }
        if let Some(args) = function_args(&text, "cubic-bezier") {
            return parse_cubic_bezier(input, args);
        }
        if let Some(args) = function_args(&text, "steps") {
            return parse_steps(input, args);
        }
        Err(EasingError::invalid(input))
    }

    /// The curve that, played over the same duration, traces this curve backwards in time.
    pub fn inverted(&self) -> EasingCurve {
        match self {
            EasingCurve::Identity => EasingCurve::Identity,
            EasingCurve::Keyword(EaseKeyword::EaseIn) => EasingCurve::Keyword(EaseKeyword::EaseOut),
            EasingCurve::Keyword(EaseKeyword::EaseOut) => EasingCurve::Keyword(EaseKeyword::EaseIn),
            // ease and ease-in-out are treated as symmetric
            EasingCurve::Keyword(keyword) => EasingCurve::Keyword(*keyword),
            EasingCurve::StepStart => EasingCurve::StepEnd,
            EasingCurve::StepEnd => EasingCurve::StepStart,
            EasingCurve::Linear(stops) => EasingCurve::Linear(
                stops
                    .iter()
                    .rev()
                    .map(|stop| LinearStop {
                        value: 1.0 - stop.value,
                        percent: stop.percent.map(|p| 100.0 - p),
                    })
                    .collect(),
            ),
            EasingCurve::CubicBezier([x1, y1, x2, y2]) => {
                EasingCurve::CubicBezier([1.0 - x2, 1.0 - y2, 1.0 - x1, 1.0 - y1])
            }
            EasingCurve::Steps { count, position } => EasingCurve::Steps {
                count: *count,
                position: position.swapped(),
            },
        }
    }

    /// Map linear input progress `t` (usually within [0, 1]) to eased progress.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            EasingCurve::Identity => t,
            EasingCurve::Keyword(keyword) => {
                let [x1, y1, x2, y2] = keyword.control_points();
                bezier_ease(t, x1, y1, x2, y2)
            }
            EasingCurve::CubicBezier([x1, y1, x2, y2]) => bezier_ease(t, *x1, *y1, *x2, *y2),
            EasingCurve::StepStart => steps_ease(t, 1, StepPosition::JumpStart),
            EasingCurve::StepEnd => steps_ease(t, 1, StepPosition::JumpEnd),
            EasingCurve::Steps { count, position } => steps_ease(t, *count, *position),
            EasingCurve::Linear(stops) => linear_ease(t, stops),
        }
    }

    /// Structural comparison with a numeric tolerance.
    pub fn approx_eq(&self, other: &EasingCurve, eps: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= eps;
        match (self, other) {
            (EasingCurve::Linear(a), EasingCurve::Linear(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(sa, sb)| {
                        close(sa.value, sb.value)
                            && match (sa.percent, sb.percent) {
                                (Some(pa), Some(pb)) => close(pa, pb),
                                (None, None) => true,
                                _ => false,
                            }
                    })
            }
            (EasingCurve::CubicBezier(a), EasingCurve::CubicBezier(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for EasingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EasingCurve::Identity => f.write_str("linear"),
            EasingCurve::Keyword(keyword) => f.write_str(keyword.as_str()),
            EasingCurve::StepStart => f.write_str("step-start"),
            EasingCurve::StepEnd => f.write_str("step-end"),
            EasingCurve::Linear(stops) => {
                f.write_str("linear(")?;
                for (i, stop) in stops.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&format_number(stop.value))?;
                    if let Some(percent) = stop.percent {
                        write!(f, " {}%", format_number(percent))?;
                    }
                }
                f.write_str(")")
            }
            EasingCurve::CubicBezier([x1, y1, x2, y2]) => write!(
                f,
                "cubic-bezier({}, {}, {}, {})",
                format_number(*x1),
                format_number(*y1),
                format_number(*x2),
                format_number(*y2)
            ),
            EasingCurve::Steps { count, position } => {
                write!(f, "steps({}, {})", count, position.as_str())
            }
        }
    }
}

/// At most five decimals, trailing zeros trimmed.
pub(crate) fn format_number(value: f64) -> String {
    let mut text = format!("{value:.5}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_linear(input: &str, args: &str) -> Result<EasingCurve, EasingError> {
    let mut stops = Vec::new();
    for piece in args.split(',') {
        let mut tokens = piece.split_whitespace();
        let value = tokens
            .next()
            .and_then(parse_number)
            .ok_or_else(|| EasingError::invalid(input))?;
        let percent = match tokens.next() {
            Some(token) => Some(
                token
                    .strip_suffix('%')
                    .and_then(parse_number)
                    .ok_or_else(|| EasingError::invalid(input))?,
            ),
            None => None,
        };
        if tokens.next().is_some() {
            return Err(EasingError::invalid(input));
        }
        stops.push(LinearStop { value, percent });
    }
    if stops.len() < 2 {
        return Err(EasingError::OutOfRange {
            easing: input.to_string(),
            reason: "linear() needs at least two stops".to_string(),
        });
    }
    Ok(EasingCurve::Linear(stops))
}

fn parse_cubic_bezier(input: &str, args: &str) -> Result<EasingCurve, EasingError> {
    let values = args
        .split(',')
        .map(parse_number)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| EasingError::invalid(input))?;
    let [x1, y1, x2, y2] = <[f64; 4]>::try_from(values).map_err(|_| EasingError::invalid(input))?;
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return Err(EasingError::OutOfRange {
            easing: input.to_string(),
            reason: "x control points must lie within [0, 1]".to_string(),
        });
    }
    Ok(EasingCurve::CubicBezier([x1, y1, x2, y2]))
}

fn parse_steps(input: &str, args: &str) -> Result<EasingCurve, EasingError> {
    let mut parts = args.split(',').map(str::trim);
    let count = parts
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| EasingError::invalid(input))?;
    let position = match parts.next() {
        Some(token) => StepPosition::parse(token).ok_or_else(|| EasingError::invalid(input))?,
        None => StepPosition::JumpEnd,
    };
    if parts.next().is_some() {
        return Err(EasingError::invalid(input));
    }
    let minimum = if position == StepPosition::JumpNone { 2 } else { 1 };
    if count < minimum {
        return Err(EasingError::OutOfRange {
            easing: input.to_string(),
            reason: format!("steps() needs at least {minimum} step(s)"),
        });
    }
    Ok(EasingCurve::Steps { count, position })
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x bezier via binary search, then evaluate y.
fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..48 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-9 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

fn steps_ease(t: f64, count: u32, position: StepPosition) -> f64 {
    let n = f64::from(count);
    let t = t.clamp(0.0, 1.0);
    let mut step = (t * n).floor();
    if position.jumps_at_start() {
        step += 1.0;
    }
    let jumps = match position {
        StepPosition::JumpNone => n - 1.0,
        StepPosition::JumpBoth => n + 1.0,
        _ => n,
    };
    step.clamp(0.0, jumps) / jumps
}

/// Input positions (as fractions) for every stop, following the CSS placement rules.
fn positioned_stops(stops: &[LinearStop]) -> Vec<(f64, f64)> {
    let n = stops.len();
    let mut inputs: Vec<Option<f64>> = stops.iter().map(|s| s.percent.map(|p| p / 100.0)).collect();
    if n == 0 {
        return Vec::new();
    }
    if inputs[0].is_none() {
        inputs[0] = Some(0.0);
    }
    if inputs[n - 1].is_none() {
        inputs[n - 1] = Some(1.0);
    }

    let mut running_max = f64::NEG_INFINITY;
    for input in inputs.iter_mut().flatten() {
        if *input < running_max {
            *input = running_max;
        }
        running_max = input.max(running_max);
    }

    let mut i = 1;
    while i < n {
        if inputs[i].is_some() {
            i += 1;
            continue;
        }
        let start = i - 1;
        let mut end = i;
        while end < n - 1 && inputs[end].is_none() {
            end += 1;
        }
        let from = inputs[start].unwrap_or(0.0);
        let to = inputs[end].unwrap_or(1.0);
        let gap = (end - start) as f64;
        for (k, slot) in inputs.iter_mut().enumerate().take(end).skip(i) {
            *slot = Some(from + (to - from) * (k - start) as f64 / gap);
        }
        i = end;
    }

    inputs
        .into_iter()
        .zip(stops.iter())
        .map(|(input, stop)| (input.unwrap_or(0.0), stop.value))
        .collect()
}

fn linear_ease(t: f64, stops: &[LinearStop]) -> f64 {
    let points = positioned_stops(stops);
    let Some(&(first_x, first_y)) = points.first() else {
        return t;
    };
    if t < first_x {
        return first_y;
    }
    let last = points.iter().rposition(|(x, _)| *x <= t).unwrap_or(0);
    if last + 1 >= points.len() {
        return points[last].1;
    }
    let (x0, y0) = points[last];
    let (x1, y1) = points[last + 1];
    let span = (x1 - x0).max(f64::EPSILON);
    y0 + (y1 - y0) * (t - x0) / span
}
