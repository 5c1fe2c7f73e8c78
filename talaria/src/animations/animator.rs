use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::animations::{Segment, SegmentStatus};
use crate::devices::Output;
use crate::errors::{Error, RenderError};
use crate::utils::task;
use crate::utils::task::TaskHandler;

/// Drives the animation queue of a single device.
///
/// An `Animator` owns a FIFO of [`Segment`]s and plays them one at a time: at most one
/// segment is active, each tick of the active segment renders one interpolated value
/// onto the device, and the next segment is promoted only once the active one ends.
/// Devices construct their animator once and keep it for their whole lifetime.
///
/// Enqueueing validates the segment synchronously: a malformed segment is rejected with
/// a configuration error before any tick is scheduled. A failed render aborts the
/// active segment and discards the rest of the queue.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    inner: Arc<RwLock<AnimatorInner>>,
}

#[derive(Debug, Default)]
struct AnimatorInner {
    /// Segments waiting to be played, each paired with its render target.
    queue: VecDeque<PlayingSegment>,
    /// Handler of the task ticking through the queue, when one is alive.
    interval: Option<TaskHandler>,
}

#[derive(Debug)]
struct PlayingSegment {
    target: Box<dyn Output>,
    segment: Segment,
}

impl Animator {
    pub fn new() -> Self {
        Default::default()
    }

    /// Normalizes, validates and queues a segment for the given render target.
    ///
    /// The target is the device the values are rendered onto: its current value seeds
    /// the `Hold`/`Step` frame resolution and its native range the `Percent` rescaling.
    /// If no segment is currently playing, ticking starts immediately.
    ///
    /// # Errors
    /// Returns a `ConfigurationError` when the segment is malformed. The error is
    /// raised synchronously: a rejected segment is never queued.
    pub fn enqueue<T: Output + 'static>(&self, target: T, mut segment: Segment) -> Result<(), Error> {
        segment.normalize(target.get_state(), target.get_range())?;
        log::debug!("Queueing animation: {}", segment);

        let mut inner = self.inner.write();
        inner.queue.push_back(PlayingSegment {
            target: Box::new(target),
            segment,
        });
        if inner.interval.is_none() {
            let shared = self.inner.clone();
            inner.interval = Some(task::run(async move { Animator::drive(shared).await })?);
        }
        Ok(())
    }

    /// Stops the animation: the scheduled tick is cancelled and the queue cleared.
    ///
    /// Idempotent. The device retains the last rendered value; a tick already being
    /// rendered when `stop` is called completes first.
    pub fn stop(&self) {
        let mut inner = self.inner.write();
        inner.queue.clear();
        if let Some(handler) = inner.interval.take() {
            handler.abort();
            log::debug!("Animation stopped");
        }
    }

    /// Indicates whether a segment is currently playing or queued.
    pub fn is_running(&self) -> bool {
        self.inner.read().interval.is_some()
    }

    /// Returns the number of segments waiting behind the active one.
    pub fn get_queued(&self) -> usize {
        self.inner.read().queue.len()
    }

    /// Plays queued segments in order until the queue drains or a render fails.
    async fn drive(inner: Arc<RwLock<AnimatorInner>>) -> Result<(), Error> {
        loop {
            // Popping the next segment and releasing the slot on empty is one atomic
            // transition: an enqueue sees either a live handler or an empty queue.
            let next = {
                let mut guard = inner.write();
                let next = guard.queue.pop_front();
                if next.is_none() {
                    guard.interval = None;
                }
                next
            };
            let Some(mut playing) = next else {
                return Ok(());
            };

            if let Err(cause) = Animator::play(&mut playing).await {
                log::debug!("Animation aborted: {}", cause);
                {
                    let mut guard = inner.write();
                    guard.queue.clear();
                    guard.interval = None;
                }
                let cause = Arc::new(cause);
                if let Some(callback) = playing.segment.get_on_complete() {
                    let status = SegmentStatus::Failed(cause.clone());
                    if task::run(callback.invoke(status)).is_err() {
                        log::warn!("Completion callback of a failed segment could not be dispatched");
                    }
                }
                return Err(RenderError { cause });
            }
        }
    }

    /// Ticks one segment through to completion.
    ///
    /// The first render fires immediately at progress 0; each subsequent tick advances
    /// progress by `1 / (duration · fps)` of the whole segment, capped at 1. Metronomic
    /// and repeating segments restart in place instead of completing.
    async fn play(playing: &mut PlayingSegment) -> Result<(), Error> {
        let interval_ms = 1000.0 / playing.segment.get_fps() as f64;
        let duration_ms = playing.segment.get_duration() as f64;
        let mut interval = tokio::time::interval(Duration::from_secs_f64(interval_ms / 1000.0));
        let mut ticks: u64 = 0;
        let mut loops: usize = 0;

        // Promotion render: the segment starting point shows immediately.
        interval.tick().await;
        let value = playing.segment.value_at(0.0);
        playing.target.render(&[value])?;

        loop {
            interval.tick().await;
            ticks += 1;
            let progress = (ticks as f64 * interval_ms / duration_ms).min(1.0);
            let value = playing.segment.value_at(progress);
            playing.target.render(&[value])?;

            if progress >= 1.0 {
                if playing.segment.is_metronomic() {
                    playing.segment.reverse();
                } else if !playing.segment.is_repeat() {
                    if let Some(callback) = playing.segment.get_on_complete() {
                        task::run(callback.invoke(SegmentStatus::Completed))?;
                    }
                    // The completion callback is dispatched ahead of the next
                    // segment's first render.
                    tokio::task::yield_now().await;
                    return Ok(());
                }
                ticks = 0;
                loops += 1;
                if let Some(callback) = playing.segment.get_on_loop() {
                    task::run(callback.invoke(loops))?;
                }
            }
        }
    }
}

impl Display for Animator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        write!(
            f,
            "Animator [running={}, queued={}]",
            inner.interval.is_some(),
            inner.queue.len()
        )
    }
}
