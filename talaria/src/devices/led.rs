use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::animations::{Animator, Easing, Frame, Segment};
use crate::devices::{Device, Output};
use crate::errors::HardwareError::IncompatibleMode;
use crate::errors::{Error, StateError};
use crate::hardware::Board;
use crate::io::{IoProtocol, Pin, PinIdOrName, PinMode, PinModeId};
use crate::pause;
use crate::utils::task;
use crate::utils::task::TaskHandler;
use crate::utils::{History, Range, Scalable};

/// The owned state of a [`Led`]: the rendered value and its bounded history.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
struct LedState {
    /// The current raw output value.
    value: f64,
    /// The last rendered values, most recent last.
    history: History<f64>,
}

/// Represents a LED: an [`Output`] [`Device`] for simple on/off control on any output pin,
/// plus brightness control and animations on PWM capable ones.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Led {
    // ########################################
    // # Basics
    /// The pin (id) of the [`Board`] used to control the LED.
    pin: u16,
    /// The current LED state.
    #[cfg_attr(feature = "serde", serde(with = "crate::devices::arc_rwlock_serde"))]
    state: Arc<RwLock<LedState>>,
    /// The LED default value (the value it takes at creation).
    default: f64,

    // ########################################
    // # Settings
    /// The raw value the LED takes when turned on (default: the pin max value).
    brightness: u16,

    // ########################################
    // # Volatile utility data.
    /// Caches the max output value depending on resolution.
    #[cfg_attr(feature = "serde", serde(skip))]
    max_value: u16,
    /// The pin PWM mode, when the pin supports it.
    #[cfg_attr(feature = "serde", serde(skip))]
    pwm_mode: Option<PinMode>,
    /// The protocol used by the board to communicate with the device.
    protocol: Box<dyn IoProtocol>,
    /// The animator playing the LED brightness segments.
    #[cfg_attr(feature = "serde", serde(skip))]
    animator: Animator,
    /// Inner handler to the task running the blink interval.
    #[cfg_attr(feature = "serde", serde(skip))]
    interval: Arc<RwLock<Option<TaskHandler>>>,
}

impl Led {
    /// Creates an instance of a LED attached to a given board.
    ///
    /// # Parameters
    /// * `board`: the [`Board`] which the LED is attached to
    /// * `pin`: the pin used to control the LED
    /// * `default_on`: the initial LED status
    ///
    /// # Errors
    /// * `UnknownPin`: this function will bail an error if the LED pin does not exist for this board.
    /// * `IncompatibleMode`: this function will bail an error if the LED pin does not support OUTPUT mode.
    pub fn new<T: Into<PinIdOrName>>(board: &Board, pin: T, default_on: bool) -> Result<Self, Error> {
        let pin = board.get_io().get_pin(pin)?.clone();

        // Keep the PWM mode at hand, if the pin supports it.
        let pwm_mode = pin.supports_mode(PinModeId::PWM);
        let max_value = match pwm_mode {
            Some(mode) => mode.get_max_possible_value(),
            None => 1,
        };

        let mut led = Self {
            pin: pin.id,
            state: Arc::new(RwLock::new(LedState::default())),
            default: match default_on {
                true => max_value as f64,
                false => 0.0,
            },
            brightness: max_value,
            max_value,
            pwm_mode,
            protocol: board.get_protocol(),
            animator: Animator::new(),
            interval: Arc::new(RwLock::new(None)),
        };

        // Set pin mode to OUTPUT and render the initial status.
        led.protocol.set_pin_mode(led.pin, PinModeId::OUTPUT)?;
        match default_on {
            true => led.on()?,
            false => led.off()?,
        };

        Ok(led)
    }

    /// Turns the LED on, to its current brightness.
    pub fn on(&mut self) -> Result<&Self, Error> {
        self.stop();
        let brightness = self.brightness as f64;
        self.render(&[brightness])?;
        Ok(self)
    }

    /// Turns the LED off.
    pub fn off(&mut self) -> Result<&Self, Error> {
        self.stop();
        self.render(&[0.0])?;
        Ok(self)
    }

    /// Toggles the current state: if on then turn off, if off then turn on.
    pub fn toggle(&mut self) -> Result<&Self, Error> {
        self.stop();
        self.flip()
    }

    /// Inner toggle, safe to call from the blink interval task.
    fn flip(&mut self) -> Result<&Self, Error> {
        match self.is_on() {
            true => self.render(&[0.0])?,
            false => {
                let brightness = self.brightness as f64;
                self.render(&[brightness])?
            }
        };
        Ok(self)
    }

    /// Sets the LED brightness (in percent of the max possible value).
    /// NOTE: everything above 100 is considered 100%.
    ///
    /// If the LED is currently on, the new brightness shows at once.
    ///
    /// # Errors
    /// * `IncompatibleMode`: this function will bail an error if the LED pin does not support PWM mode.
    pub fn set_brightness(&mut self, percent: u8) -> Result<&Self, Error> {
        self.stop();
        let pwm = self.require_pwm("set the LED brightness")?;
        self.brightness = (percent.min(100) as u16).scale(0, 100, 0, pwm.get_max_possible_value());
        if self.is_on() {
            let brightness = self.brightness as f64;
            self.render(&[brightness])?;
        }
        Ok(self)
    }

    /// Blinks the LED on/off in phases of `ms` (milliseconds) duration.
    /// This is an interval operation and can be stopped by calling [`Led::stop()`].
    /// The first flip happens after one full phase.
    pub fn blink(&mut self, ms: u64) -> Result<&Self, Error> {
        self.stop();
        let mut self_clone = self.clone();
        *self.interval.write() = Some(task::run(async move {
            loop {
                pause!(ms);
                self_clone.flip()?;
            }
            #[allow(unreachable_code)]
            Ok(())
        })?);
        Ok(self)
    }

    /// Pulses the LED brightness between off and its current brightness, metronome style,
    /// in phases of `ms` (milliseconds) duration. The pin is switched to PWM mode.
    /// This runs until [`Led::stop()`] is called.
    ///
    /// # Errors
    /// * `IncompatibleMode`: this function will bail an error if the LED pin does not support PWM mode.
    pub fn pulse(&mut self, ms: u64) -> Result<&Self, Error> {
        self.stop();
        self.require_pwm("pulse the LED")?;
        let segment = Segment::new(ms)
            .with_frame(Frame::absolute(0.0))
            .with_frame(Frame::absolute(self.brightness as f64))
            .set_easing(Easing::SineInOut)
            .set_metronomic(true);
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Fades the LED from its current value to the given percentage of the max possible
    /// value, over `ms` (milliseconds). The pin is switched to PWM mode.
    ///
    /// # Errors
    /// * `IncompatibleMode`: this function will bail an error if the LED pin does not support PWM mode.
    /// * `ConfigurationError`: this function will bail an error if the fade parameters are invalid.
    pub fn fade(&mut self, percent: u8, ms: u64) -> Result<&Self, Error> {
        self.stop();
        self.require_pwm("fade the LED")?;
        let segment = Segment::new(ms)
            .with_frame(Frame::hold())
            .with_frame(Frame::percent(percent.min(100) as f64))
            .set_easing(Easing::SineOut);
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Fades the LED in, from its current value to full brightness, over `ms` (milliseconds).
    pub fn fade_in(&mut self, ms: u64) -> Result<&Self, Error> {
        self.fade(100, ms)
    }

    /// Fades the LED out, from its current value to off, over `ms` (milliseconds).
    pub fn fade_out(&mut self, ms: u64) -> Result<&Self, Error> {
        self.fade(0, ms)
    }

    /// Queues a custom animation segment for the LED value.
    ///
    /// Unlike the other animations, this does not cancel what is currently playing: the
    /// segment plays once the queue reaches it.
    ///
    /// # Errors
    /// * `ConfigurationError`: this function will bail an error if the segment is malformed.
    pub fn animate(&mut self, segment: Segment) -> Result<&Self, Error> {
        self.animator.enqueue(self.clone(), segment)?;
        Ok(self)
    }

    /// Stops the current animation or blink. This does not necessarily turn off the LED:
    /// it will remain in its current state when stopped.
    pub fn stop(&self) -> &Self {
        self.animator.stop();
        if let Some(handler) = self.interval.write().take() {
            handler.abort();
        }
        self
    }

    /// Switches the pin to PWM mode, failing on pins without PWM support.
    fn require_pwm(&mut self, context: &'static str) -> Result<PinMode, Error> {
        let pwm = self.pwm_mode.ok_or(IncompatibleMode {
            pin: self.pin,
            mode: PinModeId::PWM,
            context,
        })?;
        self.protocol.set_pin_mode(self.pin, PinModeId::PWM)?;
        Ok(pwm)
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

    /// Indicates whether the LED is currently lit.
    pub fn is_on(&self) -> bool {
        self.state.read().value > 0.0
    }

    /// Indicates whether the LED is currently animated (blink included).
    pub fn is_busy(&self) -> bool {
        self.animator.is_running() || self.interval.read().is_some()
    }

    /// Returns the raw value the LED takes when turned on.
    pub fn get_brightness(&self) -> u16 {
        self.brightness
    }
}

impl Display for Led {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Led (pin={}) [state={}, brightness={}]",
            self.pin,
            match self.is_on() {
                true => "on",
                false => "off",
            },
            self.brightness,
        )
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Device for Led {}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Output for Led {
    /// Internal only: controls and animations funnel through here.
    /// The value is clamped into the LED possible range.
    fn render(&mut self, values: &[f64]) -> Result<(), Error> {
        let Some(&value) = values.first() else {
            return Err(Error::from(StateError));
        };
        let value = value.clamp(0.0, self.max_value as f64);

        match self.get_pin_info()?.mode.id {
            // on/off digital operation.
            PinModeId::OUTPUT => self.protocol.digital_write(self.pin, value > 0.0),
            // pwm (brightness) operation.
            PinModeId::PWM => self.protocol.analog_write(self.pin, value as u16),
            id => Err(Error::from(IncompatibleMode {
                mode: id,
                pin: self.pin,
                context: "update the LED",
            })),
        }?;

        let mut state = self.state.write();
        state.value = value;
        state.history.push(value);
        Ok(())
    }

    fn get_state(&self) -> f64 {
        self.state.read().value
    }

    fn get_default(&self) -> f64 {
        self.default
    }

    fn get_range(&self) -> Range<f64> {
        [0.0, self.max_value as f64].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::protocol::MockIoProtocol;

    fn pin_value(led: &Led) -> u16 {
        led.get_pin_info().unwrap().value
    }

    #[test]
    fn test_led_creation() {
        let board = Board::new(MockIoProtocol::default());

        // Initially off, on a plain digital pin.
        let led = Led::new(&board, 13, false).unwrap();
        assert_eq!(led.get_pin(), 13);
        assert!(!led.is_on());
        assert_eq!(led.get_state(), 0.0);
        assert_eq!(led.get_default(), 0.0);
        assert_eq!(led.get_brightness(), 1, "Digital pins know only on/off");
        assert_eq!(led.get_range(), [0.0, 1.0].into());
        assert_eq!(pin_value(&led), 0);

        // Initially on.
        let led = Led::new(&board, 13, true).unwrap();
        assert!(led.is_on());
        assert_eq!(led.get_default(), 1.0);
        assert_eq!(pin_value(&led), 1);

        // On a PWM capable pin, the brightness scale follows the resolution.
        let led = Led::new(&board, 11, false).unwrap();
        assert_eq!(led.get_brightness(), 1023);
        assert_eq!(led.get_range(), [0.0, 1023.0].into());

        // Created from pin name.
        let led = Led::new(&board, "D13", false).unwrap();
        assert_eq!(led.get_pin(), 13);
    }

    #[test]
    fn test_led_creation_failures() {
        let board = Board::new(MockIoProtocol::default());

        let unknown = Led::new(&board, 66, false);
        assert_eq!(
            unknown.unwrap_err().to_string(),
            "Hardware error: Unknown pin 66."
        );

        // Analog pins do not support OUTPUT mode.
        let incompatible = Led::new(&board, 14, false);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (14) not compatible with mode (OUTPUT) - try to set pin mode."
        );
    }

    #[test]
    fn test_led_on_off_toggle() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();

        led.on().unwrap();
        assert!(led.is_on());
        assert_eq!(pin_value(&led), 1);

        led.off().unwrap();
        assert!(!led.is_on());
        assert_eq!(pin_value(&led), 0);

        led.toggle().unwrap();
        assert!(led.is_on());
        led.toggle().unwrap();
        assert!(!led.is_on());

        // Every change is recorded: creation, on, off, two toggles.
        assert_eq!(led.state.read().history.len(), 5);
    }

    #[test]
    fn test_led_set_brightness() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 11, false).unwrap();

        led.set_brightness(50).unwrap();
        assert_eq!(led.get_brightness(), 511);
        assert_eq!(
            led.get_pin_info().unwrap().mode.id,
            PinModeId::PWM,
            "Brightness control switches the pin to PWM"
        );
        assert_eq!(pin_value(&led), 0, "The LED is off: nothing shows yet");

        led.on().unwrap();
        assert_eq!(pin_value(&led), 511);

        // A lit LED reflects its new brightness at once.
        led.set_brightness(25).unwrap();
        assert_eq!(led.get_brightness(), 255);
        assert_eq!(pin_value(&led), 255);

        led.set_brightness(200).unwrap();
        assert_eq!(led.get_brightness(), 1023);
    }

    #[test]
    fn test_led_set_brightness_requires_pwm() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();

        let incompatible = led.set_brightness(50);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (13) not compatible with mode (PWM) - set the LED brightness."
        );
    }

    #[test]
    fn test_led_render_requires_an_output_mode() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();

        led.protocol.set_pin_mode(13, PinModeId::INPUT).unwrap();
        let incompatible = led.render(&[1.0]);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (13) not compatible with mode (INPUT) - update the LED."
        );

        assert!(led.render(&[]).is_err());
    }

    #[talaria_macros::test]
    async fn test_led_blink() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();

        led.blink(100).unwrap();
        assert!(led.is_busy());

        // Phases flip the LED at 100, 200, 300, 400 and 500ms.
        pause!(550);
        led.stop();

        assert!(led.is_on(), "Five flips from off leave the LED on");
        assert!(!led.is_busy());
        assert_eq!(led.state.read().history.len(), 6, "Initial render plus five flips");

        // Once stopped, the LED state is frozen.
        pause!(300);
        assert!(led.is_on());
        assert_eq!(led.state.read().history.len(), 6);

        board.close();
    }

    #[talaria_macros::test]
    async fn test_led_pulse() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 11, false).unwrap();

        led.pulse(500).unwrap();
        assert!(led.is_busy());

        pause!(250);
        assert!(led.get_state() > 0.0, "Mid-pulse, the LED is partially lit");

        led.stop();
        assert!(!led.is_busy());

        // The LED keeps its last rendered value.
        let frozen = led.get_state();
        pause!(300);
        assert_eq!(led.get_state(), frozen);

        board.close();
    }

    #[talaria_macros::test]
    async fn test_led_fade() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 11, false).unwrap();

        led.fade(50, 500).unwrap();
        assert!(led.is_busy());
        pause!(600);

        assert!(!led.is_busy());
        assert_eq!(led.get_state(), 511.5, "The fade ends exactly at its target");
        assert_eq!(pin_value(&led), 511);

        led.fade_in(200).unwrap();
        pause!(300);
        assert_eq!(led.get_state(), 1023.0);
        assert!(led.is_on());

        led.fade_out(200).unwrap();
        pause!(300);
        assert_eq!(led.get_state(), 0.0);
        assert!(!led.is_on());

        board.close();
    }

    #[test]
    fn test_led_fade_requires_pwm() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();

        let incompatible = led.pulse(500);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (13) not compatible with mode (PWM) - pulse the LED."
        );

        let incompatible = led.fade(50, 500);
        assert_eq!(
            incompatible.unwrap_err().to_string(),
            "Hardware error: Pin (13) not compatible with mode (PWM) - fade the LED."
        );
    }

    #[talaria_macros::test]
    async fn test_led_animate_queues_segments() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 11, false).unwrap();

        let first = Segment::new(300)
            .with_frame(Frame::absolute(100.0))
            .with_frame(Frame::absolute(400.0))
            .set_fps(10);
        let second = Segment::new(300)
            .with_frame(Frame::absolute(400.0))
            .with_frame(Frame::absolute(200.0))
            .set_fps(10);

        led.animate(first).unwrap();
        led.animate(second).unwrap();
        assert!(led.is_busy());

        pause!(700);
        assert!(!led.is_busy());
        assert_eq!(led.get_state(), 200.0, "Segments play in queue order");
        // Initial render, then four renders per segment (promotion plus three ticks).
        assert_eq!(led.state.read().history.len(), 9);

        board.close();
    }

    #[test]
    fn test_led_stop_is_idempotent() {
        let board = Board::new(MockIoProtocol::default());
        let led = Led::new(&board, 13, false).unwrap();

        assert!(!led.is_busy());
        led.stop().stop();
        assert!(!led.is_busy());
    }

    #[test]
    fn test_led_display() {
        let board = Board::new(MockIoProtocol::default());
        let mut led = Led::new(&board, 13, false).unwrap();
        assert_eq!(format!("{}", led), "Led (pin=13) [state=off, brightness=1]");
        led.on().unwrap();
        assert_eq!(format!("{}", led), "Led (pin=13) [state=on, brightness=1]");
    }
}
