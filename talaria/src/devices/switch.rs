use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::devices::{Device, Input};
use crate::errors::Error;
use crate::hardware::Board;
use crate::io::{IoProtocol, PinIdOrName, PinModeId};
use crate::pause;
use crate::utils::events::{EventHandler, EventManager};
use crate::utils::task;
use crate::utils::task::TaskHandler;
use crate::utils::TaskResult;

/// Lists all events a [`Switch`] type device can emit/listen.
pub enum SwitchEvent {
    /// Triggered when the switch state changes.
    OnChange,
    /// Triggered when the switch closes its circuit.
    OnClose,
    /// Triggered when the switch opens its circuit.
    OnOpen,
}

impl From<SwitchEvent> for String {
    fn from(value: SwitchEvent) -> Self {
        let event = match value {
            SwitchEvent::OnChange => "change",
            SwitchEvent::OnClose => "close",
            SwitchEvent::OnOpen => "open",
        };
        event.into()
    }
}

/// Represents a switch: a polled digital [`Input`] publishing open/close events.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Switch {
    // ########################################
    // # Basics
    /// The pin (id) of the [`Board`] used to read the switch value.
    pin: u16,
    /// The current switch electrical state (the raw pin value).
    #[cfg_attr(feature = "serde", serde(with = "crate::devices::arc_rwlock_serde"))]
    state: Arc<RwLock<bool>>,
    /// Inverts the closed/open logical value.
    invert: bool,
    /// Defines a PULL-UP mode switch.
    pullup: bool,

    // ########################################
    // # Volatile utility data.
    /// The protocol used by the board to communicate with the device.
    protocol: Box<dyn IoProtocol>,
    /// Inner handler to the task running the switch value check.
    #[cfg_attr(feature = "serde", serde(skip))]
    handler: Arc<RwLock<Option<TaskHandler>>>,
    /// The event manager for the switch.
    #[cfg_attr(feature = "serde", serde(skip))]
    events: EventManager,
}

impl Switch {
    /// Creates an instance of a PULL-DOWN switch attached to a given board:
    /// https://docs.arduino.cc/built-in-examples/digital/Button/
    ///
    /// - Switch closed => pin state HIGH
    /// - Switch open => pin state LOW
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the Switch is attached to
    /// * `pin`: the pin used to read the Switch value
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the Switch pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the Switch pin does not support INPUT mode.
    pub fn new<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self {
            pin: 0,
            state: Arc::new(RwLock::new(false)),
            invert: false,
            pullup: false,
            protocol: board.get_protocol(),
            handler: Arc::new(RwLock::new(None)),
            events: Default::default(),
        }
        .start_with(board, pin)
    }

    /// Creates an instance of an inverted PULL-DOWN switch attached to a given board:
    /// https://docs.arduino.cc/built-in-examples/digital/Button/
    ///
    /// /!\ The logical state is inverted compared to HIGH/LOW electrical value of the pin.
    /// - Inverted switch closed => pin state LOW
    /// - Inverted switch open => pin state HIGH
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the Switch is attached to
    /// * `pin`: the pin used to read the Switch value
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the Switch pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the Switch pin does not support INPUT mode.
    pub fn new_inverted<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self {
            pin: 0,
            state: Arc::new(RwLock::new(false)),
            invert: true,
            pullup: false,
            protocol: board.get_protocol(),
            handler: Arc::new(RwLock::new(None)),
            events: Default::default(),
        }
        .start_with(board, pin)
    }

    /// Creates an instance of a PULL-UP switch attached to a given board:
    /// https://docs.arduino.cc/tutorials/generic/digital-input-pullup/
    ///
    /// - Pullup switch closed => pin state LOW
    /// - Pullup switch open => pin state HIGH
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the Switch is attached to
    /// * `pin`: the pin used to read the Switch value
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the Switch pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the Switch pin does not support PULLUP mode.
    pub fn new_pullup<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self {
            pin: 0,
            state: Arc::new(RwLock::new(false)),
            invert: false,
            pullup: true,
            protocol: board.get_protocol(),
            handler: Arc::new(RwLock::new(None)),
            events: Default::default(),
        }
        .start_with(board, pin)
    }

    /// Creates an instance of an inverted PULL-UP switch attached to a given board:
    /// https://docs.arduino.cc/tutorials/generic/digital-input-pullup/
    ///
    /// /!\ The logical state is inverted compared to HIGH/LOW electrical value of the pin
    /// (therefore equivalent to a standard pull-down switch)
    /// - Inverted pullup switch closed => pin state HIGH
    /// - Inverted pullup switch open => pin state LOW
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the Switch is attached to
    /// * `pin`: the pin used to read the Switch value
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the Switch pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the Switch pin does not support PULLUP mode.
    pub fn new_inverted_pullup<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self {
            pin: 0,
            state: Arc::new(RwLock::new(false)),
            invert: true,
            pullup: true,
            protocol: board.get_protocol(),
            handler: Arc::new(RwLock::new(None)),
            events: Default::default(),
        }
        .start_with(board, pin)
    }

    /// Private helper method shared by constructors.
    fn start_with<T: Into<PinIdOrName>>(mut self, board: &Board, pin: T) -> Result<Self, Error> {
        let pin = board.get_io().get_pin(pin)?.clone();
        self.pin = pin.id;

        // Set pin mode to INPUT/PULLUP.
        match self.pullup {
            true => {
                self.protocol.set_pin_mode(self.pin, PinModeId::PULLUP)?;
                self.protocol
                    .get_data()
                    .write()
                    .get_pin_mut(self.pin)?
                    .value = 1;
            }
            false => {
                self.protocol.set_pin_mode(self.pin, PinModeId::INPUT)?;
            }
        };

        // Sync the state once the pullup resistor (if any) settled the pin value,
        // otherwise the first check would see a phantom change.
        *self.state.write() = self.protocol.get_data().read().get_pin(self.pin)?.value != 0;

        // Set reporting for this pin.
        self.protocol.report_digital(self.pin, true)?;

        // Create a task to listen hardware value and emit events accordingly.
        self.attach();

        Ok(self)
    }

    /// Translates the raw electrical value into the logical closed/open state.
    fn as_logical(&self, raw: bool) -> bool {
        let logical = match self.pullup {
            true => !raw,
            false => raw,
        };
        match self.invert {
            true => !logical,
            false => logical,
        }
    }

    // ########################################
    // Setters and Getters.

    /// Indicates whether the switch circuit is currently closed.
    pub fn is_closed(&self) -> bool {
        self.as_logical(*self.state.read())
    }

    /// Indicates whether the switch circuit is currently open.
    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }

    /// Retrieves if the switch is configured in PULL-UP mode.
    pub fn is_pullup(&self) -> bool {
        self.pullup
    }

    /// Retrieves if the logical switch value is inverted.
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    // ########################################
    // Event related functions

    /// Manually attaches the switch with the value change events.
    /// This should never be needed unless you manually `detach()` the switch first for some reason
    /// and want it to start being reactive to events again.
    pub fn attach(&self) {
        if self.handler.read().is_none() {
            let self_clone = self.clone();
            *self.handler.write() = Some(
                task::run(async move {
                    loop {
                        let pin_value = self_clone
                            .protocol
                            .get_data()
                            .read()
                            .get_pin(self_clone.pin)?
                            .value
                            != 0;
                        let state_value = *self_clone.state.read();
                        if pin_value != state_value {
                            *self_clone.state.write() = pin_value;

                            let logical = self_clone.as_logical(pin_value);
                            self_clone.events.emit(SwitchEvent::OnChange, logical);
                            match logical {
                                true => self_clone.events.emit(SwitchEvent::OnClose, ()),
                                false => self_clone.events.emit(SwitchEvent::OnOpen, ()),
                            };
                        }

                        // Changes are debounced to 10 checks per second.
                        pause!(100);
                    }
                    #[allow(unreachable_code)]
                    Ok(())
                })
                .unwrap(),
            );
        }
    }

    /// Detaches the interval associated with the switch.
    /// This means the switch won't react anymore to value changes.
    pub fn detach(&self) {
        if let Some(handler) = self.handler.write().take() {
            handler.abort();
        }
    }

    /// Registers a callback to be executed on a given event on the Switch.
    ///
    /// Available events for a switch are:
    /// * `change`: Triggered when the switch logical state changes. The callback receives the new state.
    /// * `close`: Triggered when the switch circuit closes.
    /// * `open`: Triggered when the switch circuit opens.
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
}

impl Display for Switch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Switch (pin={}) [state={}, pullup={}, inverted={}]",
            self.pin,
            match self.is_closed() {
                true => "closed",
                false => "open",
            },
            self.pullup,
            self.invert
        )
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Device for Switch {}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Input for Switch {
    fn get_state(&self) -> bool {
        self.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::mocks::protocol::MockIoProtocol;

    #[talaria_macros::test]
    async fn test_switch_creation() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new(&board, 5);

        assert!(switch.is_ok());
        let switch = switch.unwrap();
        assert_eq!(switch.pin, 5);
        assert!(switch.is_open());
        assert!(!switch.get_state());
        assert!(!switch.is_inverted());
        assert!(!switch.is_pullup());

        // Created from pin name.
        let named = Switch::new(&board, "D5").unwrap();
        assert_eq!(named.pin, 5);

        switch.detach();
        named.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_inverted_switch_creation() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new_inverted(&board, 5).unwrap();

        assert_eq!(switch.pin, 5);
        assert!(switch.is_closed(), "The pin reads LOW: an inverted switch is closed");
        assert!(switch.is_inverted());
        assert!(!switch.is_pullup());

        switch.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_pullup_switch_creation() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new_pullup(&board, 5).unwrap();

        assert_eq!(switch.pin, 5);
        assert_eq!(
            switch.protocol.get_data().read().get_pin(5).unwrap().mode.id,
            PinModeId::PULLUP
        );
        assert_eq!(
            switch.protocol.get_data().read().get_pin(5).unwrap().value,
            1,
            "The pullup resistor forces the pin HIGH"
        );
        assert!(switch.is_open(), "The pin reads HIGH: a pullup switch is open");
        assert!(!switch.is_inverted());
        assert!(switch.is_pullup());

        switch.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_inverted_pullup_switch_creation() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new_inverted_pullup(&board, 5).unwrap();

        assert_eq!(switch.pin, 5);
        assert!(switch.is_closed());
        assert!(switch.is_inverted());
        assert!(switch.is_pullup());

        switch.detach();
        board.close();
    }

    #[test]
    fn test_switch_creation_failures() {
        let board = Board::new(MockIoProtocol::default());

        let unknown = Switch::new(&board, 66);
        assert_eq!(
            unknown.unwrap_err().to_string(),
            "Hardware error: Unknown pin 66."
        );

        // Servo pins do not support INPUT mode.
        let incompatible = Switch::new(&board, 9);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (9) not compatible with mode (INPUT) - try to set pin mode."
        );
    }

    #[talaria_macros::test]
    async fn test_switch_events() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new(&board, 5).unwrap();

        // CHANGE
        let change_flag = Arc::new(AtomicBool::new(false));
        let moved_change_flag = change_flag.clone();
        switch.on(SwitchEvent::OnChange, move |new_state: bool| {
            let captured_flag = moved_change_flag.clone();
            async move {
                captured_flag.store(new_state, Ordering::SeqCst);
                Ok(())
            }
        });

        // CLOSED
        let closed_flag = Arc::new(AtomicBool::new(false));
        let moved_closed_flag = closed_flag.clone();
        switch.on(SwitchEvent::OnClose, move |_: ()| {
            let captured_flag = moved_closed_flag.clone();
            async move {
                captured_flag.store(true, Ordering::SeqCst);
                Ok(())
            }
        });

        // OPENED
        let opened_flag = Arc::new(AtomicBool::new(false));
        let moved_opened_flag = opened_flag.clone();
        switch.on(SwitchEvent::OnOpen, move |_: ()| {
            let captured_flag = moved_opened_flag.clone();
            async move {
                captured_flag.store(true, Ordering::SeqCst);
                Ok(())
            }
        });

        assert!(!change_flag.load(Ordering::SeqCst));
        assert!(!closed_flag.load(Ordering::SeqCst));
        assert!(!opened_flag.load(Ordering::SeqCst));

        // Simulate pin state change in the protocol => takes value 0xFF
        switch
            .protocol
            .get_data()
            .write()
            .get_pin_mut(5)
            .unwrap()
            .value = 0xFF;

        pause!(500);

        assert!(change_flag.load(Ordering::SeqCst));
        assert!(closed_flag.load(Ordering::SeqCst));
        assert!(!opened_flag.load(Ordering::SeqCst));
        assert!(switch.is_closed());

        // Simulate pin state change in the protocol => takes value 0
        switch
            .protocol
            .get_data()
            .write()
            .get_pin_mut(5)
            .unwrap()
            .value = 0;

        pause!(500);

        assert!(!change_flag.load(Ordering::SeqCst)); // change switched back to 0
        assert!(opened_flag.load(Ordering::SeqCst));
        assert!(switch.is_open());

        switch.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_pullup_switch_events() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new_pullup(&board, 5).unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let moved_changes = changes.clone();
        switch.on(SwitchEvent::OnChange, move |_: bool| {
            let captured_changes = moved_changes.clone();
            async move {
                captured_changes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let closed_flag = Arc::new(AtomicBool::new(false));
        let moved_closed_flag = closed_flag.clone();
        switch.on(SwitchEvent::OnClose, move |_: ()| {
            let captured_flag = moved_closed_flag.clone();
            async move {
                captured_flag.store(true, Ordering::SeqCst);
                Ok(())
            }
        });

        // The forced pullup value does not count as a change.
        pause!(300);
        assert_eq!(changes.load(Ordering::SeqCst), 0);

        // Simulate the switch being closed: the pin is pulled to the ground.
        switch
            .protocol
            .get_data()
            .write()
            .get_pin_mut(5)
            .unwrap()
            .value = 0;

        pause!(500);

        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert!(closed_flag.load(Ordering::SeqCst));
        assert!(switch.is_closed());

        switch.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_switch_attach_detach() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new(&board, 5).unwrap();

        let change_flag = Arc::new(AtomicBool::new(false));
        let moved_change_flag = change_flag.clone();
        switch.on(SwitchEvent::OnChange, move |new_state: bool| {
            let captured_flag = moved_change_flag.clone();
            async move {
                captured_flag.store(new_state, Ordering::SeqCst);
                Ok(())
            }
        });

        // Once detached, the switch stops reacting to changes.
        switch.detach();
        switch
            .protocol
            .get_data()
            .write()
            .get_pin_mut(5)
            .unwrap()
            .value = 1;
        pause!(500);
        assert!(!change_flag.load(Ordering::SeqCst));

        // Once reattached, the pending change is caught up.
        switch.attach();
        pause!(500);
        assert!(change_flag.load(Ordering::SeqCst));

        switch.detach();
        board.close();
    }

    #[talaria_macros::test]
    async fn test_switch_display() {
        let board = Board::new(MockIoProtocol::default());
        let switch = Switch::new(&board, 5).unwrap();

        assert_eq!(
            format!("{}", switch),
            String::from("Switch (pin=5) [state=open, pullup=false, inverted=false]")
        );

        switch.detach();
        board.close();
    }
}
