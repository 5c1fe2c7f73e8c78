use crate::errors::Error;
use crate::io::{IoData, IoProtocol, PinModeId};
use crate::utils::task;
use crate::utils::{EventHandler, EventManager, TaskResult};
use log::trace;
use parking_lot::RwLockReadGuard;
use std::fmt::Display;
use std::ops::{Deref, DerefMut};

/// Lists all events a Board can emit/listen.
pub enum BoardEvent {
    /// Triggered when the board connexion is established and the handshake has been made.
    OnReady,
    /// Triggered when the board connexion is closed (gracefully).
    OnClose,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<BoardEvent> for String {
    fn from(value: BoardEvent) -> Self {
        let event = match value {
            BoardEvent::OnReady => "ready",
            BoardEvent::OnClose => "close",
        };
        event.into()
    }
}

/// Represents the hardware board your [`crate::devices::Device`] are attached to and controlled through this API.
/// The board gives access to [`IoData`] through a communication [`IoProtocol`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Board {
    /// The event manager for the board.
    #[cfg_attr(feature = "serde", serde(skip))]
    events: EventManager,
    /// The inner protocol used by this Board.
    protocol: Box<dyn IoProtocol>,
}

impl Board {
    /// Creates a board using a given protocol.
    ///
    /// **_/!\ The board will NOT be connected until the [`Board::open`] method is called._**
    pub fn new<P: IoProtocol + 'static>(protocol: P) -> Self {
        Self {
            events: EventManager::default(),
            protocol: Box::new(protocol),
        }
    }

    /// Returns the protocol used.
    ///
    /// NOTE: this is private to the crate since board already gives access to protocol methods via Deref.
    /// This method is only used internally in all [`Device::new()`](crate::devices::Device) methods to clone the
    /// protocol into the device.
    pub(crate) fn get_protocol(&self) -> Box<dyn IoProtocol> {
        self.protocol.clone()
    }

    /// Starts the board connexion procedure (using the appropriate configured protocol) in an asynchronous way.
    /// _Note:    after this method, you cannot consider the board to be connected until you receive the "ready" event._
    ///
    /// Have a look at the demos/board folder for more detailed examples.
    pub fn open(self) -> Self {
        let events_clone = self.events.clone();
        let callback_board = self.clone();

        task::run(async move {
            let board = callback_board.blocking_open()?;
            events_clone.emit(BoardEvent::OnReady, board);
            Ok(())
        })
        .expect("Task failed");

        self
    }

    /// Blocking version of [`Self::open()`] method.
    pub fn blocking_open(mut self) -> Result<Self, Error> {
        self.protocol.open()?;
        trace!("Board is ready: {:#?}", self.get_io());
        Ok(self)
    }

    /// Closes the board connexion (using the appropriate configured protocol) in an asynchronous way.
    /// _Note:    after this method, you cannot consider the board to be disconnected until you receive the "close" event._
    pub fn close(self) -> Self {
        let events = self.events.clone();
        let callback_board = self.clone();
        task::run(async move {
            let board = callback_board.blocking_close()?;
            events.emit(BoardEvent::OnClose, board);
            Ok(())
        })
        .expect("Task failed");
        self
    }

    /// Blocking version of [`Self::close()`] method.
    pub fn blocking_close(mut self) -> Result<Self, Error> {
        // Detach all pins.
        let pins: Vec<u16> = self.get_io().pins.keys().copied().collect();
        for id in pins {
            let _ = self.set_pin_mode(id, PinModeId::OUTPUT);
        }
        self.protocol.close()?;
        trace!("Board is closed");
        Ok(self)
    }

    /// Registers a callback to be executed on a given event.
    ///
    /// Available events for a board are defined by the enum: [`BoardEvent`]:
    /// - **`OnReady` | `ready`:** Triggered when the board is connected and ready to run.
    ///    _The callback must receive the following parameter: `|_: Board| { ... }`_
    /// - **`OnClose` | `close`:** Triggered when the board is disconnected.
    ///    _The callback must receive the following parameter: `|_: Board| { ... }`_
    pub fn on<S, F, T, Fut, R>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = R> + Send + 'static,
        R: Into<TaskResult> + Send + 'static,
    {
        self.events.on(event, callback)
    }

    /// Easy access to the hardware data through the board.
    pub fn get_io(&self) -> RwLockReadGuard<IoData> {
        self.protocol.get_data().read()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board ({})", self.protocol)
    }
}

impl Deref for Board {
    type Target = Box<dyn IoProtocol>;

    fn deref(&self) -> &Self::Target {
        &self.protocol
    }
}

impl DerefMut for Board {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.protocol
    }
}


#[cfg(feature = "serde")]
#[cfg(test)]
mod serde_tests {
    use crate::hardware::Board;
    use crate::mocks::protocol::MockIoProtocol;

    #[test]
    fn test_board_serialize() {
        let board = Board::new(MockIoProtocol::default());
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"{"protocol":{"type":"MockIoProtocol"}}"#);
    }

    #[test]
    fn test_board_deserialize() {
        let json = r#"{"protocol":{"type":"MockIoProtocol"}}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.get_protocol().get_protocol_name(), "MockIoProtocol");
    }
}
