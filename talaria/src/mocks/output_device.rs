use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::devices::{Device, Output};
use crate::errors::{Error, StateError};
use crate::utils::Range;

/// Mock [`Output`] recording every rendered value, for testing purposes.
///
/// All clones share the same recorder, so the animator can render through its own clone
/// while the test reads the original.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct MockOutput {
    #[cfg_attr(feature = "serde", serde(skip))]
    inner: Arc<RwLock<MockOutputInner>>,
}

#[derive(Debug, Default)]
struct MockOutputInner {
    state: f64,
    renders: Vec<f64>,
    fail_at: Option<usize>,
}

impl MockOutput {
    pub fn new(state: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockOutputInner {
                state,
                renders: vec![],
                fail_at: None,
            })),
        }
    }

    /// Arms the device to fail the render call of the given index (0-based).
    pub fn set_fail_at(self, nth: usize) -> Self {
        self.inner.write().fail_at = Some(nth);
        self
    }

    /// Returns a copy of every value rendered so far, in render order.
    pub fn get_renders(&self) -> Vec<f64> {
        self.inner.read().renders.clone()
    }

    pub fn get_render_count(&self) -> usize {
        self.inner.read().renders.len()
    }

    /// Inserts an out-of-band marker among the recorded renders, for ordering assertions.
    pub fn record_marker(&self, value: f64) {
        self.inner.write().renders.push(value);
    }
}

impl Display for MockOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockOutput [state={}]", self.inner.read().state)
    }
}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Device for MockOutput {}

#[cfg_attr(feature = "serde", typetag::serde)]
impl Output for MockOutput {
    fn render(&mut self, values: &[f64]) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if inner.fail_at == Some(inner.renders.len()) {
            return Err(Error::from(StateError));
        }
        let Some(&value) = values.first() else {
            return Err(Error::from(StateError));
        };
        inner.renders.push(value);
        inner.state = value;
        Ok(())
    }

    fn get_state(&self) -> f64 {
        self.inner.read().state
    }

    fn get_default(&self) -> f64 {
        0.0
    }

    fn get_range(&self) -> Range<f64> {
        [0.0, 1023.0].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_renders_through_clones() {
        let device = MockOutput::new(42.0);
        assert_eq!(device.get_state(), 42.0);
        assert_eq!(device.get_default(), 0.0);
        assert_eq!(device.get_range(), [0.0, 1023.0].into());

        let mut clone = device.clone();
        clone.render(&[100.0]).unwrap();
        clone.render(&[200.0]).unwrap();

        assert_eq!(device.get_renders(), vec![100.0, 200.0]);
        assert_eq!(device.get_render_count(), 2);
        assert_eq!(device.get_state(), 200.0);
    }

    #[test]
    fn test_armed_failure() {
        let mut device = MockOutput::new(0.0).set_fail_at(1);

        device.render(&[10.0]).unwrap();
        let failure = device.render(&[20.0]).unwrap_err();
        assert_eq!(
            failure.to_string(),
            "State error: the value cannot be rendered by this device."
        );

        // The failed value is not recorded and the state keeps the last success.
        assert_eq!(device.get_renders(), vec![10.0]);
        assert_eq!(device.get_state(), 10.0);
    }

    #[test]
    fn test_empty_render_rejected() {
        let mut device = MockOutput::new(0.0);
        assert!(device.render(&[]).is_err());
    }

    #[test]
    fn test_boxed_clone() {
        let device = MockOutput::new(7.0);
        let boxed: Box<dyn Output> = Box::new(device.clone());
        let mut cloned = boxed.clone();
        cloned.render(&[99.0]).unwrap();
        assert_eq!(device.get_state(), 99.0);
    }

    #[test]
    fn test_display_implementation() {
        let device = MockOutput::new(250.0);
        assert_eq!(device.to_string(), "MockOutput [state=250]");
    }
}
