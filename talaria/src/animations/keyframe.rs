use crate::errors::{ConfigurationError, Error};
use crate::utils::Range;
use crate::utils::Scalable;

/// Represents a keyframe in an animation segment.
///
/// A `Keyframe` pins an exact value at an exact cue point: when the [`Segment`](crate::animations::Segment)
/// reaches the cue (a fraction of its duration), the animated device holds this value. Between two
/// consecutive keyframes the value is interpolated, shaped by the segment [`Easing`](crate::animations::Easing).
///
/// # Example
/// ```
/// use talaria::animations::Keyframe;
/// // Reach value 1023 at the end of the segment.
/// let keyframe = Keyframe::new(1023.0, 1.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// The value the device holds when the segment reaches the cue point.
    value: f64,
    /// The position of the keyframe, as a fraction in [0, 1] of the segment duration.
    cue: f64,
}

impl Keyframe {
    /// Creates a new `Keyframe` holding the given value at the given cue point.
    pub fn new(value: f64, cue: f64) -> Self {
        Self { value, cue }
    }

    /// Returns the keyframe value.
    pub fn get_value(&self) -> f64 {
        self.value
    }

    /// Returns the keyframe cue point.
    pub fn get_cue(&self) -> f64 {
        self.cue
    }

    /// Mirrors the cue point, used when a metronomic segment flips direction.
    pub(crate) fn mirror(&self) -> Self {
        Self {
            value: self.value,
            cue: 1.0 - self.cue,
        }
    }
}

/// Describes how a [`Frame`] resolves into a concrete keyframe value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameValue {
    /// Keeps the previously resolved value. In leading position this is the device's
    /// current value, captured when the segment is enqueued.
    Hold,
    /// Moves by the given amount relative to the previously resolved value.
    Step(f64),
    /// Uses the given value, in the device's native units.
    Absolute(f64),
    /// Uses the given percentage [0, 100], rescaled into the device's value range.
    Percent(f64),
}

/// A shorthand keyframe, resolved against the device when the segment is enqueued.
///
/// Frames let a segment be declared without knowing the device's current value or native
/// range: [`FrameValue::Hold`] picks up the current value, [`FrameValue::Step`] moves
/// relative to the previous frame, [`FrameValue::Percent`] ignores the native range.
/// Cue points are optional: frames without one are spread evenly between their neighbours.
///
/// # Example
/// ```
/// use talaria::animations::Frame;
/// // Start wherever the device is, pass 50% of its range mid-way, end at 1023.
/// let frames = vec![
///     Frame::hold(),
///     Frame::percent(50.0).at(0.5),
///     Frame::absolute(1023.0),
/// ];
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    value: FrameValue,
    cue: Option<f64>,
}

impl Frame {
    /// A frame holding the previously resolved value (the device's current value in
    /// leading position).
    pub fn hold() -> Self {
        Self {
            value: FrameValue::Hold,
            cue: None,
        }
    }

    /// A frame moving by `amount` relative to the previous frame's resolved value.
    pub fn step(amount: f64) -> Self {
        Self {
            value: FrameValue::Step(amount),
            cue: None,
        }
    }

    /// A frame reaching `value`, expressed in the device's native units.
    pub fn absolute(value: f64) -> Self {
        Self {
            value: FrameValue::Absolute(value),
            cue: None,
        }
    }

    /// A frame reaching `value` percent [0, 100] of the device's value range.
    pub fn percent(value: f64) -> Self {
        Self {
            value: FrameValue::Percent(value),
            cue: None,
        }
    }

    /// Pins the frame at the given cue point (fraction in [0, 1] of the segment duration).
    pub fn at(mut self, cue: f64) -> Self {
        self.cue = Some(cue);
        self
    }

    /// Returns the frame value description.
    pub fn get_value(&self) -> FrameValue {
        self.value
    }

    /// Returns the frame cue point, if pinned.
    pub fn get_cue(&self) -> Option<f64> {
        self.cue
    }
}

/// Resolves a frame sequence into canonical keyframes.
///
/// `current` is the device value at enqueue time and seeds [`FrameValue::Hold`] /
/// [`FrameValue::Step`] resolution; `range` is the device's native value range and
/// feeds [`FrameValue::Percent`] rescaling. Unpinned cue points are filled in: the
/// first frame defaults to cue 0, the last to cue 1, and every run of unpinned
/// frames between two pinned ones is spaced evenly.
pub(crate) fn resolve_frames(
    frames: &[Frame],
    current: f64,
    range: Range<f64>,
) -> Result<Vec<Keyframe>, Error> {
    // Resolve values first: each frame may depend on the previous resolved value.
    let mut values = Vec::with_capacity(frames.len());
    let mut previous = current;
    for (index, frame) in frames.iter().enumerate() {
        let value = match frame.value {
            FrameValue::Hold => previous,
            FrameValue::Step(amount) => previous + amount,
            FrameValue::Absolute(value) => value,
            FrameValue::Percent(percent) => percent.scale(0.0, 100.0, range.start, range.end),
        };
        if !value.is_finite() {
            return Err(ConfigurationError::UnresolvableKeyframe { index }.into());
        }
        previous = value;
        values.push(value);
    }

    // Fill in unpinned cue points.
    let mut cues: Vec<Option<f64>> = frames.iter().map(|frame| frame.cue).collect();
    if let Some(first) = cues.first_mut() {
        first.get_or_insert(0.0);
    }
    if let Some(last) = cues.last_mut() {
        last.get_or_insert(1.0);
    }
    let mut anchor = 0;
    for index in 1..cues.len() {
        let Some(end_cue) = cues[index] else { continue };
        let gap = index - anchor;
        if gap > 1 {
            // First and last cues are pinned above: an anchor always exists.
            let start_cue = cues[anchor].unwrap_or(0.0);
            let step = (end_cue - start_cue) / gap as f64;
            for offset in 1..gap {
                cues[anchor + offset] = Some(start_cue + step * offset as f64);
            }
        }
        anchor = index;
    }

    Ok(values
        .into_iter()
        .zip(cues)
        .map(|(value, cue)| Keyframe::new(value, cue.unwrap_or(0.0)))
        .collect())
}
