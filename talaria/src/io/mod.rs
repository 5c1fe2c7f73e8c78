//! Defines the I/O providers the devices talk through.

mod data;

use std::any::type_name;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use dyn_clone::DynClone;
use parking_lot::RwLock;

pub use data::*;

use crate::errors::Error;
use crate::errors::ProtocolError::NotInitialized;
use crate::utils::Range;

// Makes a Box<dyn IoProtocol> clone (used for Board cloning).
dyn_clone::clone_trait_object!(IoProtocol);

/// Defines the trait all I/O providers must implement.
///
/// An `IoProtocol` owns the transport to one piece of hardware and keeps a shared
/// [`IoData`] in sync with it: pin capabilities, modes and values. Devices never touch
/// the transport; they go through the read/write operations below.
#[cfg_attr(feature = "serde", typetag::serde(tag = "type"))]
pub trait IoProtocol: DynClone + Send + Sync + Debug + Display {
    // ########################################
    // Inner data related functions

    /// Returns a protected arc to the inner [`IoData`].
    fn get_data(&self) -> &Arc<RwLock<IoData>>;

    /// Returns the protocol name (used for Display only).
    fn get_protocol_name(&self) -> &'static str {
        type_name::<Self>().split("::").last().unwrap()
    }

    // ########################################
    // Functions specifically bound to the provider.

    /// Opens the communication with the hardware.
    fn open(&mut self) -> Result<(), Error>;
    /// Gracefully shuts the communication down.
    fn close(&mut self) -> Result<(), Error>;
    /// Checks if the communication is opened.
    fn is_connected(&self) -> bool;

    // ########################################
    // Read/Write on pins

    /// Sets the `mode` of the specified `pin`.
    fn set_pin_mode(&mut self, pin: u16, mode: PinModeId) -> Result<(), Error>;

    /// Writes `level` to the digital `pin`.
    fn digital_write(&mut self, pin: u16, level: bool) -> Result<(), Error>;

    /// Writes `level` to the analog `pin`.
    fn analog_write(&mut self, pin: u16, level: u16) -> Result<(), Error>;

    /// Reads the digital `pin` value.
    ///
    /// The pin must be in `INPUT` or `PULLUP` mode. The value returned is the last one
    /// synchronized into the inner [`IoData`]: it is meaningless while the communication
    /// is not opened.
    fn digital_read(&mut self, pin: u16) -> Result<bool, Error> {
        if !self.is_connected() {
            return Err(NotInitialized.into());
        }
        let lock = self.get_data().read();
        let pin = lock.get_pin(pin)?;
        if pin.mode.id != PinModeId::PULLUP {
            pin.validate_current_mode(PinModeId::INPUT)?;
        }
        Ok(pin.value != 0)
    }

    /// Reads the analog `pin` value.
    ///
    /// The pin must be in `ANALOG` mode. The value returned is the last one synchronized
    /// into the inner [`IoData`].
    fn analog_read(&mut self, pin: u16) -> Result<u16, Error> {
        if !self.is_connected() {
            return Err(NotInitialized.into());
        }
        let lock = self.get_data().read();
        let pin = lock.get_pin(pin)?;
        pin.validate_current_mode(PinModeId::ANALOG)?;
        Ok(pin.value)
    }

    /// Sets the digital reporting `state` of the specified digital `pin`.
    ///
    /// When activated, the hardware sends the pin value whenever it changes and the
    /// provider stores it into the inner [`IoData`].
    fn report_digital(&mut self, pin: u16, state: bool) -> Result<(), Error> {
        let mut lock = self.get_data().write();
        lock.get_pin(pin)?;
        match state {
            true => {
                if !lock.digital_reported_pins.contains(&pin) {
                    lock.digital_reported_pins.push(pin);
                }
            }
            false => lock.digital_reported_pins.retain(|&reported| reported != pin),
        }
        Ok(())
    }

    // ########################################
    // SERVO

    /// Configures the pulse width working range of a servo `pin` (in microseconds).
    fn servo_config(&mut self, pin: u16, pwm_range: Range<u16>) -> Result<(), Error>;
}
