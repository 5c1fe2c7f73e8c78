//! Defines animations to interpolate device states between keyframes over time.

mod animator;
mod easing;
mod keyframe;
mod segment;

pub use animator::Animator;
pub use easing::Easing;
pub use keyframe::{Frame, FrameValue, Keyframe};
pub use segment::{Callback, Segment, SegmentStatus};
