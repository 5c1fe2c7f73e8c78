use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use crate::errors::HardwareError::{IncompatibleMode, UnknownPin};
use crate::errors::*;

/// Represents the internal data an [`IoProtocol`](crate::io::IoProtocol) synchronizes.
///
/// This struct is hidden behind an `Arc<RwLock<IoData>>` so devices and the protocol can
/// safely share and mutate it. It encapsulates the pins with their capabilities and
/// values, together with the provider identification strings.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoData {
    /// All `Pin` instances, representing the hardware's pins.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pins: HashMap<u16, Pin>,
    /// List of pins with digital reporting activated.
    pub digital_reported_pins: Vec<u16>,
    /// A string indicating the version of the protocol.
    pub protocol_version: String,
    /// A string representing the name of the firmware.
    pub firmware_name: String,
    /// A string representing the version of the firmware.
    pub firmware_version: String,
    /// A boolean indicating whether the provider is connected.
    ///
    /// Lives in the shared data so every clone of the provider (hence every device
    /// holding one) observes the same connection state.
    pub connected: bool,
}

impl IoData {
    /// Retrieves a reference to a pin by its id or name.
    ///
    /// # Errors
    /// * `UnknownPin` - An `Error` returned if no pin matches.
    pub fn get_pin<T: Into<PinIdOrName>>(&self, pin: T) -> Result<&Pin, Error> {
        let pin = pin.into();
        match &pin {
            PinIdOrName::Id(id) => self.pins.get(id).ok_or(Error::from(UnknownPin { pin })),
            PinIdOrName::Name(name) => Ok(self
                .pins
                .iter()
                .find(|(_, pin)| pin.name == *name)
                .ok_or(Error::from(UnknownPin { pin }))?
                .1),
        }
    }

    /// Retrieves a mutable reference to a pin by its id or name.
    ///
    /// # Errors
    /// * `UnknownPin` - An `Error` returned if no pin matches.
    pub fn get_pin_mut<T: Into<PinIdOrName>>(&mut self, pin: T) -> Result<&mut Pin, Error> {
        let pin = pin.into();
        match &pin {
            PinIdOrName::Id(id) => self.pins.get_mut(id).ok_or(Error::from(UnknownPin { pin })),
            PinIdOrName::Name(name) => Ok(self
                .pins
                .iter_mut()
                .find(|(_, pin)| pin.name == *name)
                .ok_or(Error::from(UnknownPin { pin }))?
                .1),
        }
    }
}

/// Represents the current state and configuration of a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Default)]
pub struct Pin {
    /// The pin ID, which also corresponds to the index of the [`IoData::pins`] hashmap.
    pub id: u16,
    /// The pin name: an alternative String representation of the pin: 'D13', 'A0' for instance.
    pub name: String,
    /// Currently configured mode.
    pub mode: PinMode,
    /// All pin supported modes.
    pub supported_modes: Vec<PinMode>,
    /// For analog pins, this is the channel number ie "A0"=>0, "A1"=>1, etc.
    pub channel: Option<u8>,
    /// Pin value.
    pub value: u16,
}

impl Pin {
    /// Verifies if a pin supports the given mode and returns it if it does.
    ///
    /// # Returns
    /// * `None` if the mode is not supported.
    /// * `PinMode` the `PinMode` configuration if supported.
    pub fn supports_mode(&self, mode: PinModeId) -> Option<PinMode> {
        self.supported_modes.iter().find(|m| m.id == mode).copied()
    }

    /// Validates that the pin is currently in the given mode.
    ///
    /// # Errors
    /// * `IncompatibleMode`: the pin's current mode does not match the expected mode.
    pub fn validate_current_mode(&self, mode: PinModeId) -> Result<(), Error> {
        match self.mode.id == mode {
            true => Ok(()),
            false => Err(Error::from(IncompatibleMode {
                pin: self.id,
                mode,
                context: "check current pin mode",
            })),
        }
    }

    /// Get the max value this pin can reach.
    ///
    /// This is defined by the resolution of the current pin mode.
    pub fn get_max_possible_value(&self) -> u16 {
        self.mode.get_max_possible_value()
    }
}

impl Debug for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mode_str = format!("{}", self.mode);

        let mut debug_struct = f.debug_struct("Pin");
        debug_struct
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mode", &mode_str)
            .field("supported modes", &self.supported_modes);
        if let Some(channel) = self.channel {
            debug_struct.field("channel", &channel);
        } else {
            debug_struct.field("channel", &None::<u8>);
        }
        debug_struct.field("value", &self.value).finish()
    }
}

// ########################################

/// Defines a structure to receive either an id or a name for a pin: 13, 'D13' or 'A1' for instance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Debug)]
pub enum PinIdOrName {
    Id(u16),
    Name(String),
}

impl From<u16> for PinIdOrName {
    fn from(n: u16) -> Self {
        PinIdOrName::Id(n)
    }
}

impl From<&str> for PinIdOrName {
    fn from(s: &str) -> Self {
        PinIdOrName::Name(s.to_string())
    }
}

impl From<String> for PinIdOrName {
    fn from(s: String) -> Self {
        PinIdOrName::Name(s)
    }
}

impl Display for PinIdOrName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PinIdOrName::Id(n) => write!(f, "{}", n),
            PinIdOrName::Name(s) => write!(f, "{:?}", s),
        }
    }
}

// ########################################

/// Represents a mode configuration for a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Default, Copy)]
pub struct PinMode {
    /// Currently configured mode.
    pub id: PinModeId,
    /// Resolution (number of bits) this mode uses.
    pub resolution: u8,
}

impl PinMode {
    /// Get the max value this pinMode can reach according to its resolution.
    pub fn get_max_possible_value(&self) -> u16 {
        (1 << self.resolution) - 1
    }
}

impl Display for PinMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Debug for PinMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            PinModeId::UNSUPPORTED => write!(f, "[{}]", self.id),
            _ => write!(f, "[id: {}, resolution: {}]", self.id, self.resolution),
        }
    }
}

// ########################################

/// Enumerates the possible modes for a pin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum PinModeId {
    /// Same as INPUT defined in Arduino.h
    INPUT = 0,
    /// Same as OUTPUT defined in Arduino.h
    OUTPUT = 1,
    /// Analog pin in analogInput mode
    ANALOG = 2,
    /// Digital pin in PWM output mode
    PWM = 3,
    /// Digital pin in Servo output mode
    SERVO = 4,
    /// Enable internal pull-up resistor for pin
    PULLUP = 0x0B,
    /// Pin configured to be ignored by digitalWrite and capabilityResponse
    #[default]
    UNSUPPORTED = 0x7F,
}

impl PinModeId {
    /// Converts a `u8` byte value into a `PinModeId`.
    ///
    /// # Errors
    /// * `Unknown`: The value does not match any known pin mode.
    pub fn from_u8(value: u8) -> Result<PinModeId, Error> {
        match value {
            0 => Ok(PinModeId::INPUT),
            1 => Ok(PinModeId::OUTPUT),
            2 => Ok(PinModeId::ANALOG),
            3 => Ok(PinModeId::PWM),
            4 => Ok(PinModeId::SERVO),
            0x0B => Ok(PinModeId::PULLUP),
            0x7F => Ok(PinModeId::UNSUPPORTED),
            x => Err(Unknown {
                info: format!("PinMode not found with value: {}", x),
            }),
        }
    }
}

impl From<PinModeId> for u8 {
    fn from(mode: PinModeId) -> u8 {
        mode as u8
    }
}

impl Display for PinModeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
