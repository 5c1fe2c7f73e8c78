use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::animations::keyframe::resolve_frames;
use crate::animations::{Easing, Frame, Keyframe};
use crate::errors::{ConfigurationError, Error};
use crate::utils::Range;

/// How a segment ended, delivered to its completion callback.
#[derive(Clone, Debug)]
pub enum SegmentStatus {
    /// The segment played through its full duration.
    Completed,
    /// A render call failed: the segment was aborted and the queue discarded.
    Failed(Arc<Error>),
}

impl SegmentStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, SegmentStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SegmentStatus::Failed(_))
    }

    /// Returns the render error for a failed segment.
    pub fn get_error(&self) -> Option<&Error> {
        match self {
            SegmentStatus::Completed => None,
            SegmentStatus::Failed(error) => Some(error),
        }
    }
}

/// A cloneable async callback taking a single payload.
///
/// Used for segment completion and loop notifications. Callbacks are dispatched as
/// runtime tasks, strictly after the tick that triggered them.
pub struct Callback<T>(Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>);

impl<T> Callback<T> {
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Arc::new(move |payload| callback(payload).boxed()))
    }

    /// Builds the callback future for the given payload.
    pub(crate) fn invoke(&self, payload: T) -> BoxFuture<'static, ()> {
        (self.0)(payload)
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> std::fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback")
    }
}

/// Represents one timed transition of a device value through a sequence of keyframes.
///
/// A `Segment` declares its shape with [`Frame`] shorthands (resolved against the device
/// when enqueued) or directly with canonical [`Keyframe`]s. While playing, the value is
/// interpolated between keyframes at `fps` ticks per second, shaped by the [`Easing`].
///
/// - `repeat` restarts the segment from its first keyframe each time it completes.
/// - `metronomic` restarts it in the opposite direction instead, bouncing between the
///   endpoints like a metronome arm.
///
/// # Example
/// ```
/// use talaria::animations::{Easing, Frame, Segment};
/// // Ease from the current value up to 1023 and back, forever.
/// let segment = Segment::new(1000)
///     .with_frame(Frame::hold())
///     .with_frame(Frame::absolute(1023.0))
///     .set_easing(Easing::SineInOut)
///     .set_metronomic(true);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Segment {
    /// Total duration of one playthrough, in milliseconds.
    duration: u64,
    /// The declared frames, resolved into keyframes at enqueue time.
    frames: Vec<Frame>,
    /// The canonical keyframes the segment plays.
    keyframes: Vec<Keyframe>,
    /// The easing function applied between consecutive keyframes (default: `Easing::Linear`).
    easing: Easing,
    /// Replays the segment from the start on completion (default: false).
    repeat: bool,
    /// Replays the segment in alternating directions on completion (default: false).
    metronomic: bool,
    /// Tick rate of the playback, in renders per second (default: 60).
    fps: u32,

    // ########################################
    // # Volatile utility data.
    #[cfg_attr(feature = "serde", serde(skip))]
    on_complete: Option<Callback<SegmentStatus>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    on_loop: Option<Callback<usize>>,
}

impl Segment {
    /// Creates a new segment playing over the given duration (in ms).
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            frames: vec![],
            keyframes: vec![],
            easing: Easing::default(),
            repeat: false,
            metronomic: false,
            fps: 60,
            on_complete: None,
            on_loop: None,
        }
    }

    /// Resolves the declared frames against the device and checks the segment invariants.
    ///
    /// `current` is the device value at enqueue time, `range` its native value range.
    /// Segments declared directly from canonical keyframes are validated as given.
    pub(crate) fn normalize(&mut self, current: f64, range: Range<f64>) -> Result<(), Error> {
        if !self.frames.is_empty() {
            self.keyframes = resolve_frames(&self.frames, current, range)?;
        }
        self.validate()
    }

    /// Checks the segment invariants: positive duration and tick rate, at least two
    /// keyframes, cue points strictly increasing from 0 to 1.
    pub fn validate(&self) -> Result<(), Error> {
        if self.duration == 0 {
            return Err(ConfigurationError::InvalidDuration.into());
        }
        if self.fps == 0 {
            return Err(ConfigurationError::InvalidTickRate.into());
        }
        let count = self.keyframes.len();
        if count < 2 {
            return Err(ConfigurationError::NotEnoughKeyframes { count }.into());
        }
        // Bounds checked through the first/last cues plus strict monotonicity.
        if self.keyframes[0].get_cue() != 0.0 {
            return Err(ConfigurationError::InvalidCuePoints {
                reason: "first cue point must be 0",
            }
            .into());
        }
        if self.keyframes[count - 1].get_cue() != 1.0 {
            return Err(ConfigurationError::InvalidCuePoints {
                reason: "last cue point must be 1",
            }
            .into());
        }
        for pair in self.keyframes.windows(2) {
            let ascending = matches!(
                pair[0].get_cue().partial_cmp(&pair[1].get_cue()),
                Some(std::cmp::Ordering::Less)
            );
            if !ascending {
                return Err(ConfigurationError::InvalidCuePoints {
                    reason: "cue points must be strictly increasing",
                }
                .into());
            }
        }
        Ok(())
    }

    /// Computes the segment value at the given progress (fraction in [0, 1] of its duration).
    ///
    /// The bracketing cue interval is located, the easing applied to the local progress
    /// within it, and the keyframe values linearly interpolated. Progress at or beyond
    /// the boundaries yields the exact endpoint keyframe values, whatever the easing
    /// shape does in between.
    pub fn value_at(&self, progress: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return 0.0;
        };
        if progress <= 0.0 {
            return first.get_value();
        }
        if progress >= 1.0 {
            return last.get_value();
        }
        for pair in self.keyframes.windows(2) {
            let from = pair[0];
            let to = pair[1];
            if progress < to.get_cue() {
                let local = (progress - from.get_cue()) / (to.get_cue() - from.get_cue());
                let eased = self.easing.call(local as f32) as f64;
                return from.get_value() + eased * (to.get_value() - from.get_value());
            }
        }
        last.get_value()
    }

    /// Flips the playing direction: keyframe order reversed, cue points mirrored.
    /// Used by the scheduler between metronomic passes.
    pub(crate) fn reverse(&mut self) {
        self.keyframes.reverse();
        for keyframe in self.keyframes.iter_mut() {
            *keyframe = keyframe.mirror();
        }
    }
}

// ########################################
// Accessors & builders.

impl Segment {
    pub fn get_duration(&self) -> u64 {
        self.duration
    }
    pub fn get_frames(&self) -> &Vec<Frame> {
        &self.frames
    }
    pub fn get_keyframes(&self) -> &Vec<Keyframe> {
        &self.keyframes
    }
    pub fn get_easing(&self) -> Easing {
        self.easing
    }
    pub fn is_repeat(&self) -> bool {
        self.repeat
    }
    pub fn is_metronomic(&self) -> bool {
        self.metronomic
    }
    pub fn get_fps(&self) -> u32 {
        self.fps
    }
    pub(crate) fn get_on_complete(&self) -> Option<Callback<SegmentStatus>> {
        self.on_complete.clone()
    }
    pub(crate) fn get_on_loop(&self) -> Option<Callback<usize>> {
        self.on_loop.clone()
    }

    pub fn set_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }
    pub fn set_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }
    /// Declares the canonical keyframes directly, bypassing frame resolution.
    pub fn set_keyframes(mut self, keyframes: Vec<Keyframe>) -> Self {
        self.keyframes = keyframes;
        self
    }
    pub fn set_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn set_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
    pub fn set_metronomic(mut self, metronomic: bool) -> Self {
        self.metronomic = metronomic;
        self
    }
    pub fn set_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Adds a frame at the end of the declared sequence.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Registers a callback dispatched when the segment ends, successfully or not.
    pub fn set_on_complete<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(SegmentStatus) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_complete = Some(Callback::new(callback));
        self
    }

    /// Registers a callback dispatched after each completed pass of a repeating or
    /// metronomic segment, with the number of passes so far.
    pub fn set_on_loop<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_loop = Some(Callback::new(callback));
        self
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Segment [duration={}ms, keyframes={}, repeat={}, metronomic={}, fps={}]",
            self.duration,
            self.keyframes.len().max(self.frames.len()),
            self.repeat,
            self.metronomic,
            self.fps
        )
    }
}
