//! Defines the Talaria event manager system.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use crate::utils::task;
use crate::utils::TaskResult;

type SyncedCallbackMap = Mutex<HashMap<String, Vec<CallbackWrapper>>>;
pub type EventHandler = usize;

#[derive(Clone, Default)]
pub struct EventManager {
    callbacks: Arc<SyncedCallbackMap>,
    next_id: Arc<AtomicUsize>,
}

struct CallbackWrapper {
    id: EventHandler,
    callback: Box<dyn FnMut(Arc<dyn Any + Send + Sync>) -> BoxFuture<'static, TaskResult> + Send>,
}

impl EventManager {
    /// Register event handler for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (any type that matches an Into<String>)
    /// * `callback` - An async moved callback that accepts a single parameter as an argument.
    ///                The argument can be anything that might be both `Send + Sync`.
    ///                You can trick multiple parameters by turning them in a single tuple.
    ///
    /// # Return
    /// Returns an EventHandler that can be used by the `unregister()` method.
    ///
    /// # Errors
    /// If the event handler does not match the expected emitted event exactly it will fail silently.
    /// That means if the tuple gave in the callback parameter does not exactly match the emit one
    /// no handler will be called.
    pub fn on<S, F, T, Fut, R>(&self, event: S, mut callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = R> + Send + 'static,
        R: Into<TaskResult> + Send + 'static,
    {
        let event_name = event.into();
        let callback_event = event_name.clone();
        // Generate a unique ID.
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Boxes the callback and downcast its parameter.
        let boxed_callback = Box::new(move |arg: Arc<dyn Any + Send + Sync>| {
            match arg.downcast::<T>() {
                Ok(arg) => (callback)((*arg).clone()).map(Into::into).boxed(),
                Err(_) => {
                    log::warn!("The callback for event '{}' could not be called because parameter does not match", callback_event);
                    // Current strategy is to ignore the callback
                    Box::pin(async { TaskResult::Ok })
                }
            }
        });

        let wrapper = CallbackWrapper {
            id,
            callback: boxed_callback,
        };

        self.callbacks
            .lock()
            .entry(event_name)
            .or_default()
            .push(wrapper);

        id
    }

    /// Invoke all event handlers registered for a specific event name.
    /// Only the callback registered by the `on()` method and whose payload matches the declared
    /// callback type will be called. All others will be silently skipped.
    ///
    /// Handlers run as runtime tasks: emitting never blocks the caller, and the runtime
    /// will not terminate before the handlers have settled.
    ///
    /// # Parameters
    /// * `event`:  The event name (any type that matches an `Into<String>`)
    /// * `payload`: The event payload (must be `'static + Send + Sync`)
    ///              The payload can be anything that might be both `Send + Sync`.
    ///              You can trick multiple parameters by turning them in a single tuple.
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        let event_name = event.into();
        let payload_any: Arc<dyn Any + Send + Sync> = Arc::new(payload);
        if let Some(callbacks) = self.callbacks.lock().get_mut(&event_name) {
            for wrapper in callbacks.iter_mut() {
                let payload_clone = payload_any.clone();
                let future = (wrapper.callback)(payload_clone);
                if task::run(future).is_err() {
                    log::warn!(
                        "The callback for event '{}' could not be called outside a runtime",
                        event_name
                    );
                }
            }
        }
    }

    /// Unregister a given handler if found.
    pub fn unregister(&self, handler: EventHandler) {
        self.callbacks
            .lock()
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.id != handler));
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager").finish()
    }
}
