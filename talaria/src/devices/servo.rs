use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::animations::{Animator, Frame, Segment};
use crate::devices::{Device, Output};
use crate::errors::HardwareError::IncompatibleMode;
use crate::errors::{Error, StateError};
use crate::hardware::Board;
use crate::io::{IoProtocol, Pin, PinIdOrName, PinModeId};
use crate::pause_sync;
use crate::utils::{History, Range, Scalable};

/// The owned state of a [`Servo`]: the current and previous positions and the render history.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
struct ServoState {
    /// The current position, in degrees.
    position: u16,
    /// The position before the last render, in degrees.
    previous: u16,
    /// The last rendered positions, most recent last.
    history: History<f64>,
}

/// Represents a Servo: an [`Output`] [`Device`] holding an angular position, with timed
/// and swept movements on top of immediate ones.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Servo {
    // ########################################
    // # Basics
    /// The pin (id) of the [`Board`] used to control the servo.
    pin: u16,
    /// The current servo state.
    #[cfg_attr(feature = "serde", serde(with = "crate::devices::arc_rwlock_serde"))]
    state: Arc<RwLock<ServoState>>,
    /// The servo default position, in degrees (the position it takes at creation).
    default: u16,

    // ########################################
    // # Settings
    /// The range the servo accepts movement orders within (default: the full degree range).
    range: Range<u16>,
    /// The physical angular bounds of the hardware (default: [0, 180] degrees).
    degree_range: Range<u16>,
    /// The pulse widths commanding the extreme positions, in microseconds (default: [600, 2400]).
    pwm_range: Range<u16>,
    /// Whether the servo movement is inverted.
    inverted: bool,

    // ########################################
    // # Volatile utility data.
    /// The protocol used by the board to communicate with the device.
    protocol: Box<dyn IoProtocol>,
    /// The animator playing the servo movement segments.
    #[cfg_attr(feature = "serde", serde(skip))]
    animator: Animator,
}

impl Servo {
    /// Creates an instance of a servo attached to a given board.
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the servo is attached to
    /// * `pin`: the pin used to control the servo
    /// * `default`: the default position, in degrees (clamped into the movement range)
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the servo pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the servo pin does not support SERVO mode.
    pub fn new<T: Into<PinIdOrName>>(board: &Board, pin: T, default: u16) -> Result<Self, Error> {
        Self::create(board, pin, default, false)
    }

    /// Creates an instance of a servo with inverted movement: orders for the low end of the
    /// degree range drive the high end of the pulse range, and conversely.
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the servo pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the servo pin does not support SERVO mode.
    pub fn new_inverted<T: Into<PinIdOrName>>(
        board: &Board,
        pin: T,
        default: u16,
    ) -> Result<Self, Error> {
        Self::create(board, pin, default, true)
    }

    /// Inner helper to create a servo.
    fn create<T: Into<PinIdOrName>>(
        board: &Board,
        pin: T,
        default: u16,
        inverted: bool,
    ) -> Result<Self, Error> {
        let pin = board.get_io().get_pin(pin)?.clone();
        pin.supports_mode(PinModeId::SERVO).ok_or(IncompatibleMode {
            pin: pin.id,
            mode: PinModeId::SERVO,
            context: "create a new Servo device",
        })?;

        let range: Range<u16> = [0, 180].into();
        let default = range.clamp(default);

        let mut servo = Self {
            pin: pin.id,
            state: Arc::new(RwLock::new(ServoState {
                position: default,
                previous: default,
                history: History::default(),
            })),
            default,
            range,
            degree_range: [0, 180].into(),
            pwm_range: [600, 2400].into(),
            inverted,
            protocol: board.get_protocol(),
            animator: Animator::new(),
        };

        // Register the pulse range with the hardware, then reach the default position.
        servo.protocol.servo_config(servo.pin, servo.pwm_range)?;
        servo.to(default)?;
        servo.protocol.set_pin_mode(servo.pin, PinModeId::SERVO)?;

        // Let the servo settle on its default position before handing the device out.
        pause_sync!(100);

        Ok(servo)
    }

    /// Moves the servo to the requested position, in degrees. Positions outside the
    /// movement range are clamped to it.
    ///
    /// # Errors
    /// * `HardwareError`: this function will bail an error if the position cannot be written.
    pub fn to(&mut self, to: u16) -> Result<&Self, Error> {
        self.stop();
        self.render(&[to as f64])?;
        Ok(self)
    }

    /// Moves the servo to the requested position over the given duration (in ms).
    /// The movement is interpolated at 100 ticks per second and cancels any movement
    /// currently playing.
    ///
    /// # Errors
    /// * `ConfigurationError`: this function will bail an error if the movement is malformed.
    pub fn animate(&mut self, to: u16, ms: u64) -> Result<&Self, Error> {
        self.stop();
        let segment = Segment::new(ms)
            .with_frame(Frame::hold())
            .with_frame(Frame::absolute(to as f64))
            .set_fps(100);
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Plays a custom [`Segment`] on the servo position. Unlike the other movements, this
    /// does not cancel what is currently playing: segments stack in a queue and play in order.
    ///
    /// # Errors
    /// * `ConfigurationError`: this function will bail an error if the segment is malformed.
    pub fn animate_with(&mut self, segment: Segment) -> Result<&Self, Error> {
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Swings the servo back and forth across its whole movement range until stopped.
    /// Each traversal lasts the given duration (in ms).
    ///
    /// # Errors
    /// * `ConfigurationError`: this function will bail an error if the movement is malformed.
    pub fn sweep(&mut self, ms: u64) -> Result<&Self, Error> {
        self.stop();
        let segment = Segment::new(ms)
            .with_frame(Frame::absolute(self.range.start as f64))
            .with_frame(Frame::absolute(self.range.end as f64))
            .set_metronomic(true);
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Moves the servo to the low end of its movement range.
    ///
    /// # Errors
    /// * `HardwareError`: this function will bail an error if the position cannot be written.
    pub fn min(&mut self) -> Result<&Self, Error> {
        let min = self.range.start;
        self.to(min)
    }

    /// Moves the servo to the high end of its movement range.
    ///
    /// # Errors
    /// * `HardwareError`: this function will bail an error if the position cannot be written.
    pub fn max(&mut self) -> Result<&Self, Error> {
        let max = self.range.end;
        self.to(max)
    }

    /// Moves the servo to the middle of its movement range.
    ///
    /// # Errors
    /// * `HardwareError`: this function will bail an error if the position cannot be written.
    pub fn center(&mut self) -> Result<&Self, Error> {
        let center = self.range.start + (self.range.end - self.range.start) / 2;
        self.to(center)
    }

    /// Stops any ongoing movement. The servo stays wherever the last tick left it.
    pub fn stop(&self) -> &Self {
        self.animator.stop();
        self
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

    /// Returns the current servo position, in degrees.
    pub fn get_position(&self) -> u16 {
        self.state.read().position
    }

    /// Returns the servo position before the last movement, in degrees.
    pub fn get_previous(&self) -> u16 {
        self.state.read().previous
    }

    /// Returns the range the servo accepts movement orders within.
    pub fn get_range(&self) -> Range<u16> {
        self.range
    }

    /// Sets the range the servo accepts movement orders within.
    ///
    /// The bounds are reordered if needed, restricted to the degree range, and the
    /// default position is clamped into the new range.
    pub fn set_range<R: Into<Range<u16>>>(mut self, range: R) -> Self {
        let input: Range<u16> = range.into();
        let (min, max) = match input.start <= input.end {
            true => (input.start, input.end),
            false => (input.end, input.start),
        };
        self.range = [self.degree_range.clamp(min), self.degree_range.clamp(max)].into();
        self.default = self.range.clamp(self.default);
        self
    }

    /// Returns the physical angular bounds of the hardware.
    pub fn get_degree_range(&self) -> Range<u16> {
        self.degree_range
    }

    /// Sets the physical angular bounds of the hardware.
    ///
    /// The bounds are reordered if needed, and the movement range and default position
    /// are restricted to the new bounds.
    pub fn set_degree_range<R: Into<Range<u16>>>(mut self, range: R) -> Self {
        let input: Range<u16> = range.into();
        let (min, max) = match input.start <= input.end {
            true => (input.start, input.end),
            false => (input.end, input.start),
        };
        self.degree_range = [min, max].into();
        self.range = [
            self.degree_range.clamp(self.range.start),
            self.degree_range.clamp(self.range.end),
        ]
        .into();
        self.default = self.range.clamp(self.default);
        self
    }

    /// Returns the pulse widths commanding the extreme positions, in microseconds.
    pub fn get_pwm_range(&self) -> Range<u16> {
        self.pwm_range
    }

    /// Sets the pulse widths commanding the extreme positions, in microseconds, and
    /// registers them with the hardware.
    ///
    /// # Errors
    /// * `HardwareError`: this function will bail an error if the pulse range cannot be registered.
    pub fn set_pwm_range<R: Into<Range<u16>>>(mut self, range: R) -> Result<Self, Error> {
        let input: Range<u16> = range.into();
        let (min, max) = match input.start <= input.end {
            true => (input.start, input.end),
            false => (input.end, input.start),
        };
        self.pwm_range = [min, max].into();
        self.protocol.servo_config(self.pin, self.pwm_range)?;
        Ok(self)
    }

    /// Indicates whether the servo movement is inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Sets whether the servo movement is inverted.
    pub fn set_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Indicates whether the servo is currently moving.
    pub fn is_busy(&self) -> bool {
        self.animator.is_running()
    }
}

impl Display for Servo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Servo (pin={}) [state={}, default={}, range={}-{}]",
            self.pin,
            self.get_position(),
            self.default,
            self.range.start,
            self.range.end,
        )
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Device for Servo {}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Output for Servo {
    /// Internal only: movements and animations funnel through here.
    /// The position is clamped into the movement range, then scaled into a pulse width.
    fn render(&mut self, values: &[f64]) -> Result<(), Error> {
        let Some(&value) = values.first() else {
            return Err(Error::from(StateError));
        };
        let degree = value.clamp(self.range.start as f64, self.range.end as f64);

        // Inverting the servo swaps the degree ends of the scale.
        let pwm = match self.inverted {
            false => degree.scale(
                self.degree_range.start as f64,
                self.degree_range.end as f64,
                self.pwm_range.start as f64,
                self.pwm_range.end as f64,
            ),
            true => degree.scale(
                self.degree_range.end as f64,
                self.degree_range.start as f64,
                self.pwm_range.start as f64,
                self.pwm_range.end as f64,
            ),
        };
        self.protocol.analog_write(self.pin, pwm as u16)?;

        let mut state = self.state.write();
        state.previous = state.position;
        state.position = degree as u16;
        state.history.push(degree);
        Ok(())
    }

    fn get_state(&self) -> f64 {
        self.state.read().position as f64
    }

    fn get_default(&self) -> f64 {
        self.default as f64
    }

    fn get_range(&self) -> Range<f64> {
        [self.range.start as f64, self.range.end as f64].into()
    }
}
