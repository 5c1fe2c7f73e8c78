//! Defines the hardware that devices attach to.

mod board;

pub use board::Board;
pub use board::BoardEvent;
