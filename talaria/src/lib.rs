#![doc(html_root_url = "https://docs.rs/talaria/0.1.0-beta")]

//! <h1 align="center">TALARIA - Animated device control for hobby robotics</h1>
//! <div style="text-align:center;font-style:italic;">Talaria drives LEDs, servos, relays and switches over pluggable board protocols - written in Rust.</div>
//! <br/>
//!
//! # Documentation
//!
//! This is the API documentation.<br/>
//! To see the code in action, visit the [demos](https://github.com/talaria-rs/talaria/tree/develop/talaria/demos) directory.
//!
//! # Features
//!
//! **Talaria** is a Rust library designed to control hobby-robotics boards together with all types
//! of input/output devices (led, servo, relay, switch, etc.) connected to them.
//!
//! - Define a controllable [`Board`](hardware::Board) over any [`IoProtocol`](io::IoProtocol) implementation
//! - Control all types of [`Device`](devices::Device)s such as [`Output`](devices::Output)s (LED, servo, relay)
//!   or [`Input`](devices::Input)s (switch) individually
//! - Play timed, eased movements through [`Segment`](animations::Segment)s with auto-interpolated keyframes
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! talaria = "0.1.0-beta"
//! ```
//!
//! - Start writing your code: see the [demos](https://github.com/talaria-rs/talaria/tree/develop/talaria/demos)
//!   directory for more examples.
//!
//! The following code demonstrates the simplest program we could imagine: blink a led on pin 13.
#![cfg_attr(
    feature = "mocks",
    doc = r##"
```no_run
use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;

#[talaria::runtime]
async fn main() {
    // Register a new board over whichever protocol reaches your hardware.
    let board = Board::new(MockIoProtocol::default()).open();

    // When board communication is ready:
    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a LED on pin 13: OFF by default.
        let mut led = Led::new(&board, 13, false)?;

        // Blinks the LED every 500ms: indefinitely.
        led.blink(500)?;

        Ok(())
    });
}
```
"##
)]
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for most entities.
//! - **mocks** -- Provides mocked entities of all kinds (useful for tests mostly).

#[cfg(test)]
extern crate self as talaria;

pub mod animations;
pub mod devices;
pub mod errors;
pub mod hardware;
pub mod io;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod utils;

pub use talaria_macros::runtime;
