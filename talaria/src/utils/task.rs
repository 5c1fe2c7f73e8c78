//! Defines the Talaria runtime task runner.
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

use tokio::sync::Notify;
use tokio::task;
use tokio::task::JoinHandle;

use crate::errors::{Error, RuntimeError};

/// Represents the result of a task.
/// A task may return either () or Result<(), Error> for flexibility which
/// will be converted to TaskResult when the task settles.
pub enum TaskResult {
    Ok,
    Err(Error),
}

/// Represents a handler for a task.
pub type TaskHandler = JoinHandle<Result<(), Error>>;

/// Whether a `#[talaria::runtime]` (or `#[talaria::test]`) block is currently executing.
static RUNNING: AtomicBool = AtomicBool::new(false);
/// Number of tasks spawned through [`run`] that have not finished yet.
static ACTIVE: AtomicUsize = AtomicUsize::new(0);
static NOTIFY: OnceLock<Notify> = OnceLock::new();

fn notifier() -> &'static Notify {
    NOTIFY.get_or_init(Notify::new)
}

/// Decrements the alive-task counter when the task settles, whether it ran to
/// completion, failed, panicked or was aborted.
struct Tracked;

impl Drop for Tracked {
    fn drop(&mut self) {
        // Saturating: a task may outlive the runtime block that spawned it.
        let _ = ACTIVE.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
            count.checked_sub(1)
        });
        notifier().notify_waiters();
    }
}

impl From<Result<(), Error>> for TaskResult {
    fn from(result: Result<(), Error>) -> Self {
        match result {
            Ok(_) => TaskResult::Ok,
            Err(e) => TaskResult::Err(e),
        }
    }
}

impl From<()> for TaskResult {
    fn from(_: ()) -> Self {
        TaskResult::Ok
    }
}

/// Opens the runtime: [`run`] accepts tasks from this point on.
/// Called by the code generated by `#[talaria::runtime]`, never directly.
pub fn begin_runtime() {
    ACTIVE.store(0, Ordering::SeqCst);
    RUNNING.store(true, Ordering::SeqCst);
}

/// Waits until every task spawned through [`run`] has settled.
///
/// Tasks spawned while waiting (deferred callbacks, chained animations) extend the wait:
/// the counter they registered under is re-checked after every settlement.
pub async fn wait_for_tasks() {
    loop {
        let notified = notifier().notified();
        if ACTIVE.load(Ordering::SeqCst) == 0 {
            break;
        }
        notified.await;
    }
}

/// Closes the runtime: subsequent [`run`] calls bail with `RuntimeError`.
pub fn end_runtime() {
    RUNNING.store(false, Ordering::SeqCst);
}

/// Runs a given future as a tokio task while ensuring the main function (marked by
/// `#[talaria::runtime]`) will not finish before all running tasks are done.
///
/// # Parameters
/// * `future`: A future that implements `Future<Output = ()>`, `Send`, and has a `'static` lifetime.
///
/// # Errors
/// Returns `RuntimeError` when called outside a `#[talaria::runtime]` block.
///
/// # Example
/// ```
/// use talaria::utils::task;
///
/// #[talaria::runtime]
/// async fn main() {
///     task::run(async move {
///         // whatever
///     }).unwrap();
/// }
/// ```
pub fn run<F, T>(future: F) -> Result<TaskHandler, Error>
where
    F: Future<Output = T> + Send + 'static,
    T: Into<TaskResult> + Send + 'static,
{
    if !RUNNING.load(Ordering::SeqCst) {
        return Err(RuntimeError);
    }

    ACTIVE.fetch_add(1, Ordering::SeqCst);
    let handler = task::spawn(async move {
        let _tracked = Tracked;
        match future.await.into() {
            TaskResult::Ok => Ok(()),
            TaskResult::Err(e) => {
                log::error!("Task failed: {}", e);
                Err(e)
            }
        }
    });

    Ok(handler)
}

#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::tokio::time::sleep($crate::utils::tokio::time::Duration::from_millis(
            $ms as u64,
        ))
        .await
    };
}

#[macro_export]
macro_rules! pause_sync {
    ($ms:expr) => {
        std::thread::sleep(std::time::Duration::from_millis($ms as u64))
    };
}
