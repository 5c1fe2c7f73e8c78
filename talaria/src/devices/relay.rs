use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::devices::Device;
use crate::errors::Error;
use crate::hardware::Board;
use crate::io::{IoProtocol, Pin, PinIdOrName, PinModeId};

/// Represents a relay: a [`Device`] switching a power circuit through an OUTPUT pin driving its coil.
///
/// The relay state is expressed from the controlled circuit point of view: `close` makes the
/// circuit conduct, `open` interrupts it. On a normally-closed relay the electrical command is
/// therefore inverted: the circuit conducts while the coil stays released.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Relay {
    // ########################################
    // # Basics
    /// The pin (id) of the [`Board`] used to drive the relay coil.
    pin: u16,
    /// The current relay state: true when the controlled circuit conducts.
    #[cfg_attr(feature = "serde", serde(with = "crate::devices::arc_rwlock_serde"))]
    state: Arc<RwLock<bool>>,

    // ########################################
    // # Settings
    /// Defines a normally-closed relay (default: false, normally-open).
    normally_closed: bool,

    // ########################################
    // # Volatile utility data.
    /// The protocol used by the board to communicate with the device.
    protocol: Box<dyn IoProtocol>,
}

impl Relay {
    /// Creates an instance of a normally-open relay attached to a given board.
    /// The controlled circuit conducts only while the coil is energized.
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the pin does not support OUTPUT mode.
    pub fn new<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self::create(board, pin, false)
    }

    /// Creates an instance of a normally-closed relay attached to a given board.
    /// The controlled circuit conducts while the coil stays released.
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the pin does not support OUTPUT mode.
    pub fn new_normally_closed<T: Into<PinIdOrName>>(board: &Board, pin: T) -> Result<Self, Error> {
        Self::create(board, pin, true)
    }

    /// Inner helper.
    fn create<T: Into<PinIdOrName>>(
        board: &Board,
        pin: T,
        normally_closed: bool,
    ) -> Result<Self, Error> {
        let pin = board.get_io().get_pin(pin)?.clone();

        let mut relay = Self {
            pin: pin.id,
            // A released coil leaves a normally-closed circuit conducting.
            state: Arc::new(RwLock::new(normally_closed)),
            normally_closed,
            protocol: board.get_protocol(),
        };

        // Set pin mode to OUTPUT and release the coil.
        relay.protocol.set_pin_mode(relay.pin, PinModeId::OUTPUT)?;
        relay.protocol.digital_write(relay.pin, false)?;

        Ok(relay)
    }

    /// Closes the controlled circuit: the relay conducts.
    pub fn close(&mut self) -> Result<&Self, Error> {
        self.protocol.digital_write(self.pin, !self.normally_closed)?;
        *self.state.write() = true;
        Ok(self)
    }

    /// Opens the controlled circuit: the relay interrupts it.
    pub fn open(&mut self) -> Result<&Self, Error> {
        self.protocol.digital_write(self.pin, self.normally_closed)?;
        *self.state.write() = false;
        Ok(self)
    }

    /// Toggles the current state: if closed then open, if open then close.
    pub fn toggle(&mut self) -> Result<&Self, Error> {
        match self.is_closed() {
            true => self.open(),
            false => self.close(),
        }
    }

    // ########################################
    // Setters and Getters.

    /// Returns the pin (id) used by the device.
    pub fn get_pin(&self) -> u16 {
        self.pin
    }

    /// Returns [`Pin`] information.
    pub fn get_pin_info(&self) -> Result<Pin, Error> {
        let lock = self.protocol.get_data().read();
        Ok(lock.get_pin(self.pin)?.clone())
    }

    /// Indicates whether the controlled circuit currently conducts.
    pub fn is_closed(&self) -> bool {
        *self.state.read()
    }

    /// Indicates whether the controlled circuit is currently interrupted.
    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }

    /// Retrieves if the relay is of normally-closed type.
    pub fn is_normally_closed(&self) -> bool {
        self.normally_closed
    }
}

impl Display for Relay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Relay (pin={}) [state={}, normally_closed={}]",
            self.pin,
            match self.is_closed() {
                true => "closed",
                false => "open",
            },
            self.normally_closed,
        )
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Device for Relay {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::protocol::MockIoProtocol;

    fn pin_value(relay: &Relay) -> u16 {
        relay.get_pin_info().unwrap().value
    }

    #[test]
    fn test_relay_creation() {
        let board = Board::new(MockIoProtocol::default());

        let relay = Relay::new(&board, 13).unwrap();
        assert_eq!(relay.get_pin(), 13);
        assert!(!relay.is_normally_closed());
        assert!(relay.is_open(), "A normally-open relay starts interrupted");
        assert_eq!(pin_value(&relay), 0);

        // Created from pin name.
        let relay = Relay::new(&board, "D4").unwrap();
        assert_eq!(relay.get_pin(), 4);

        let relay = Relay::new_normally_closed(&board, 13).unwrap();
        assert!(relay.is_normally_closed());
        assert!(
            relay.is_closed(),
            "A normally-closed relay starts conducting"
        );
        assert_eq!(pin_value(&relay), 0, "The coil stays released at creation");
    }

    #[test]
    fn test_relay_creation_failures() {
        let board = Board::new(MockIoProtocol::default());

        let unknown = Relay::new(&board, 66);
        assert_eq!(
            unknown.unwrap_err().to_string(),
            "Hardware error: Unknown pin 66."
        );

        // Analog pins cannot drive a coil.
        let incompatible = Relay::new(&board, 14);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (14) not compatible with mode (OUTPUT) - try to set pin mode."
        );
    }

    #[test]
    fn test_relay_close_open() {
        let board = Board::new(MockIoProtocol::default());
        let mut relay = Relay::new(&board, 13).unwrap();

        relay.close().unwrap();
        assert!(relay.is_closed());
        assert_eq!(pin_value(&relay), 1, "Closing energizes the coil");

        relay.open().unwrap();
        assert!(relay.is_open());
        assert_eq!(pin_value(&relay), 0, "Opening releases the coil");
    }

    #[test]
    fn test_normally_closed_relay_inverts_the_command() {
        let board = Board::new(MockIoProtocol::default());
        let mut relay = Relay::new_normally_closed(&board, 13).unwrap();

        relay.open().unwrap();
        assert!(relay.is_open());
        assert_eq!(pin_value(&relay), 1, "Opening energizes the coil");

        relay.close().unwrap();
        assert!(relay.is_closed());
        assert_eq!(pin_value(&relay), 0, "Closing releases the coil");
    }

    #[test]
    fn test_relay_toggle() {
        let board = Board::new(MockIoProtocol::default());
        let mut relay = Relay::new(&board, 13).unwrap();

        relay.toggle().unwrap();
        assert!(relay.is_closed());
        relay.toggle().unwrap();
        assert!(relay.is_open());
    }

    #[test]
    fn test_relay_display() {
        let board = Board::new(MockIoProtocol::default());
        let mut relay = Relay::new(&board, 13).unwrap();
        assert_eq!(
            format!("{}", relay),
            "Relay (pin=13) [state=open, normally_closed=false]"
        );
        relay.close().unwrap();
        assert_eq!(
            format!("{}", relay),
            "Relay (pin=13) [state=closed, normally_closed=false]"
        );
    }
}
