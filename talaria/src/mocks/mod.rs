//! Provides mocked entities of all kinds (useful for tests mostly).

pub mod output_device;
pub mod protocol;
