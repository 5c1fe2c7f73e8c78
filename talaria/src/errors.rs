use std::sync::Arc;

use snafu::Snafu;

pub use crate::errors::Error::*;
use crate::io::{PinIdOrName, PinModeId};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: Are you sure your code runs inside #[talaria::runtime]?
    RuntimeError,
    /// Configuration error: {source}.
    ConfigurationError { source: ConfigurationError },
    /// Protocol error: {source}.
    ProtocolError { source: ProtocolError },
    /// Hardware error: {source}.
    HardwareError { source: HardwareError },
    /// Render error: {cause}
    RenderError { cause: Arc<Error> },
    /// State error: the value cannot be rendered by this device.
    StateError,
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<ConfigurationError> for Error {
    fn from(value: ConfigurationError) -> Self {
        Self::ConfigurationError { source: value }
    }
}

impl From<ProtocolError> for Error {
    fn from(value: ProtocolError) -> Self {
        Self::ProtocolError { source: value }
    }
}

impl From<HardwareError> for Error {
    fn from(value: HardwareError) -> Self {
        Self::HardwareError { source: value }
    }
}

/// Raised synchronously at enqueue time when an animation segment is malformed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigurationError {
    /// Keyframe ({index}) carries no resolvable numeric value
    UnresolvableKeyframe { index: usize },
    /// Invalid cue points: {reason}
    InvalidCuePoints { reason: &'static str },
    /// Not enough keyframes: {count} given, 2 required
    NotEnoughKeyframes { count: usize },
    /// Duration must be a positive number of milliseconds
    InvalidDuration,
    /// Tick rate must be a positive number of ticks per second
    InvalidTickRate,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProtocolError {
    /// {info}
    IoException { info: String },
    /// Connection has not been initialized
    NotInitialized,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HardwareError {
    /// Pin ({pin}) not compatible with mode ({mode}) - {context}
    IncompatibleMode {
        pin: u16,
        mode: PinModeId,
        context: &'static str,
    },
    /// Unknown pin {pin}
    UnknownPin { pin: PinIdOrName },
}

#[cfg(test)]
mod tests {
    use crate::errors::ConfigurationError::{InvalidCuePoints, UnresolvableKeyframe};
    use crate::errors::HardwareError::{IncompatibleMode, UnknownPin};

    use super::*;

    #[test]
    fn test_error_display() {
        let runtime_error = RuntimeError;
        assert_eq!(
            format!("{}", runtime_error),
            "Runtime error: Are you sure your code runs inside #[talaria::runtime]?"
        );

        let configuration_error = Error::from(UnresolvableKeyframe { index: 3 });
        assert_eq!(
            format!("{}", configuration_error),
            "Configuration error: Keyframe (3) carries no resolvable numeric value."
        );

        let protocol_error = Error::from(ProtocolError::NotInitialized);
        assert_eq!(
            format!("{}", protocol_error),
            "Protocol error: Connection has not been initialized."
        );

        let hardware_error = Error::from(IncompatibleMode {
            pin: 1,
            mode: PinModeId::SERVO,
            context: "test context",
        });
        assert_eq!(
            format!("{}", hardware_error),
            "Hardware error: Pin (1) not compatible with mode (SERVO) - test context."
        );

        let state_error = StateError;
        assert_eq!(
            format!("{}", state_error),
            "State error: the value cannot be rendered by this device."
        );

        let unknown_error = Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_render_error_display() {
        let cause = Arc::new(Error::from(UnknownPin { pin: 42.into() }));
        let render_error = RenderError { cause };
        assert_eq!(
            format!("{}", render_error),
            "Render error: Hardware error: Unknown pin 42."
        );
    }

    #[test]
    fn test_from_configuration_error() {
        let configuration_error = InvalidCuePoints {
            reason: "cue points must start at 0",
        };
        let error: Error = configuration_error.into();
        assert_eq!(
            format!("{}", error),
            "Configuration error: Invalid cue points: cue points must start at 0."
        );
    }

    #[test]
    fn test_from_protocol_error() {
        let protocol_error = ProtocolError::IoException {
            info: "I/O error message".to_string(),
        };
        let error: Error = protocol_error.into();
        assert_eq!(format!("{}", error), "Protocol error: I/O error message.");
    }

    #[test]
    fn test_from_hardware_error() {
        let hardware_error = UnknownPin { pin: 42.into() };
        let error: Error = hardware_error.into();
        assert_eq!(format!("{}", error), "Hardware error: Unknown pin 42.");
    }
}
