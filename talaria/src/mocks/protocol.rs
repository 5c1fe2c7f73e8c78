use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::Error;
use crate::errors::HardwareError::IncompatibleMode;
use crate::errors::ProtocolError::IoException;
use crate::io::{IoData, IoProtocol, Pin, PinMode, PinModeId};
use crate::pause_sync;
use crate::utils::Range;

pub fn create_digital_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: PinMode {
            id: PinModeId::OUTPUT,
            resolution: 1,
        },
        supported_modes: vec![
            PinMode {
                id: PinModeId::INPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::PULLUP,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::OUTPUT,
                resolution: 1,
            },
        ],
        channel: None,
        value,
    }
}

pub fn create_input_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: PinMode {
            id: PinModeId::INPUT,
            resolution: 1,
        },
        supported_modes: vec![
            PinMode {
                id: PinModeId::INPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::PULLUP,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::OUTPUT,
                resolution: 1,
            },
        ],
        channel: None,
        value,
    }
}

pub fn create_pwm_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: PinMode {
            id: PinModeId::PWM,
            resolution: 10,
        },
        supported_modes: vec![
            PinMode {
                id: PinModeId::INPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::OUTPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::PWM,
                resolution: 10,
            },
            PinMode {
                id: PinModeId::SERVO,
                resolution: 14,
            },
        ],
        channel: None,
        value,
    }
}

pub fn create_servo_pin(id: u16, value: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: PinMode {
            id: PinModeId::SERVO,
            resolution: 14,
        },
        supported_modes: vec![
            PinMode {
                id: PinModeId::OUTPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::PWM,
                resolution: 10,
            },
            PinMode {
                id: PinModeId::SERVO,
                resolution: 14,
            },
        ],
        channel: None,
        value,
    }
}

pub fn create_analog_pin(id: u16, value: u16) -> Pin {
    // Channels numbered the UNO way: A0 starts at pin 14.
    let channel = id.saturating_sub(14) as u8;
    Pin {
        id,
        name: format!("A{}", channel),
        mode: PinMode {
            id: PinModeId::ANALOG,
            resolution: 10,
        },
        supported_modes: vec![
            PinMode {
                id: PinModeId::INPUT,
                resolution: 1,
            },
            PinMode {
                id: PinModeId::ANALOG,
                resolution: 10,
            },
        ],
        channel: Some(channel),
        value,
    }
}

pub fn create_unsupported_pin(id: u16) -> Pin {
    Pin {
        id,
        name: format!("D{}", id),
        mode: PinMode {
            id: PinModeId::UNSUPPORTED,
            resolution: 0,
        },
        supported_modes: vec![],
        channel: None,
        value: 0,
    }
}

/// Builds the pin set of a fake UNO-flavored board.
pub fn create_test_io_data() -> IoData {
    IoData {
        pins: HashMap::from([
            (0, create_unsupported_pin(0)),
            (1, create_unsupported_pin(1)),
            (2, create_digital_pin(2, 0)),
            (3, create_digital_pin(3, 0)),
            (4, create_digital_pin(4, 0)),
            (5, create_input_pin(5, 0)),
            (8, create_pwm_pin(8, 0)),
            (9, create_servo_pin(9, 0)),
            (11, create_pwm_pin(11, 0)),
            (12, create_servo_pin(12, 0)),
            (13, create_digital_pin(13, 0)),
            (14, create_analog_pin(14, 100)),
            (15, create_analog_pin(15, 100)),
        ]),
        digital_reported_pins: vec![],
        protocol_version: "fake.1.0".to_string(),
        firmware_name: "Fake protocol".to_string(),
        firmware_version: "fake.2.3".to_string(),
        connected: false,
    }
}

/// Mock implementation for [`IoProtocol`].
/// Uses [`create_test_io_data`] for the hardware.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct MockIoProtocol {
    /// When set, the next `open` fails with a protocol error.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub fail_on_open: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Arc<RwLock<IoData>>,
}

impl Default for MockIoProtocol {
    fn default() -> Self {
        Self {
            fail_on_open: false,
            data: Arc::new(RwLock::new(create_test_io_data())),
        }
    }
}

impl Display for MockIoProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.read();
        write!(
            f,
            "{} [firmware={}, version={}, protocol={}]",
            self.get_protocol_name(),
            data.firmware_name,
            data.firmware_version,
            data.protocol_version,
        )
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl IoProtocol for MockIoProtocol {
    fn get_data(&self) -> &Arc<RwLock<IoData>> {
        &self.data
    }

    fn open(&mut self) -> Result<(), Error> {
        pause_sync!(100);
        if self.fail_on_open {
            return Err(IoException {
                info: String::from("Connection refused"),
            }
            .into());
        }
        self.data.write().connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        pause_sync!(100);
        self.data.write().connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.data.read().connected
    }

    fn set_pin_mode(&mut self, pin: u16, mode: PinModeId) -> Result<(), Error> {
        let mut lock = self.data.write();
        let pin_instance = lock.get_pin_mut(pin)?;
        let new_mode = pin_instance.supports_mode(mode).ok_or(IncompatibleMode {
            pin,
            mode,
            context: "try to set pin mode",
        })?;
        pin_instance.mode = new_mode;
        Ok(())
    }

    fn digital_write(&mut self, pin: u16, level: bool) -> Result<(), Error> {
        let mut lock = self.data.write();
        let pin_instance = lock.get_pin_mut(pin)?;
        pin_instance.validate_current_mode(PinModeId::OUTPUT)?;
        pin_instance.value = u16::from(level);
        Ok(())
    }

    fn analog_write(&mut self, pin: u16, level: u16) -> Result<(), Error> {
        self.data.write().get_pin_mut(pin)?.value = level;
        Ok(())
    }

    fn servo_config(&mut self, pin: u16, _: Range<u16>) -> Result<(), Error> {
        self.data.read().get_pin(pin)?;
        Ok(())
    }
}
