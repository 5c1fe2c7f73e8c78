//! Defines the devices attachable to a board.

use std::fmt::{Debug, Display};

use dyn_clone::DynClone;

pub use crate::devices::led::Led;
pub use crate::devices::relay::Relay;
pub use crate::devices::servo::Servo;
pub use crate::devices::switch::{Switch, SwitchEvent};
use crate::errors::Error;
use crate::utils::Range;

mod led;
mod relay;
mod servo;
mod switch;

#[cfg_attr(feature = "serde", typetag::serde(tag = "type"))]
pub trait Device: Debug + Display + DynClone + Send + Sync {}
dyn_clone::clone_trait_object!(Device);

/// A trait for devices that can act on the world: the board "outputs" some values onto them.
///
/// This trait extends [`Device`] and is intended for actuators that require the same capabilities
/// as devices, including debugging, cloning, and concurrency support.
#[cfg_attr(feature = "serde", typetag::serde(tag = "type"))]
pub trait Output: Device {
    /// Renders the given values onto the device.
    ///
    /// Values are expressed in the device native range and clamped into it by the device:
    /// the hardware write performed underneath never exceeds the pin capability. Most
    /// devices consume a single value per call.
    fn render(&mut self, values: &[f64]) -> Result<(), Error>;
    /// Retrieves the device current (last rendered) value.
    fn get_state(&self) -> f64;
    /// Retrieves the device default (or neutral) value.
    fn get_default(&self) -> f64;
    /// Retrieves the device native value range.
    fn get_range(&self) -> Range<f64>;
}
dyn_clone::clone_trait_object!(Output);

/// A trait for devices that can sense the world: they "input" some state into the board.
///
/// This trait extends [`Device`] and is intended for sensors that require the same capabilities
/// as devices, including debugging, cloning, and concurrency support.
#[cfg_attr(feature = "serde", typetag::serde(tag = "type"))]
pub trait Input: Device {
    /// Retrieves the sensor current state.
    fn get_state(&self) -> bool;
}
dyn_clone::clone_trait_object!(Input);

/// Serialization helper for the `Arc<RwLock<T>>` state fields of devices.
#[cfg(feature = "serde")]
pub(crate) mod arc_rwlock_serde {
    use std::sync::Arc;

    use parking_lot::RwLock;
    use serde::de::Deserializer;
    use serde::ser::Serializer;
    use serde::{Deserialize, Serialize};

    pub fn serialize<S, T>(value: &Arc<RwLock<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        T::serialize(&*value.read(), serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Arc<RwLock<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Arc::new(RwLock::new(T::deserialize(deserializer)?)))
    }
}
