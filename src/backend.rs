//! Audio backend abstraction
//!
//! The sonifier needs exactly three things from a host: a monotonic clock, a
//! single oscillator-through-gain voice routed to the output device, and
//! scheduled automation on that voice's frequency and gain. Everything else
//! (device selection, stream management, synthesis) stays behind these
//! traits.

use crate::error::Error;
use crate::timeline::ParamTimeline;

/// Frequency a freshly created oscillator voice idles at, in Hz.
pub const OSCILLATOR_DEFAULT_HZ: f32 = 440.0;

/// A controllable audio parameter accepting scheduled automation.
pub trait AudioParam {
    /// Schedule `value` to take effect at `time` and hold.
    fn set_value_at(&mut self, value: f32, time: f64);
    /// Schedule a linear ramp arriving at `value` at `time`.
    fn linear_ramp_to_value_at(&mut self, value: f32, time: f64);
    /// Drop every scheduled change at or after `from`.
    fn cancel_scheduled_values(&mut self, from: f64);
}

impl AudioParam for ParamTimeline {
    fn set_value_at(&mut self, value: f32, time: f64) {
        ParamTimeline::set_value_at(self, value, time);
    }

    fn linear_ramp_to_value_at(&mut self, value: f32, time: f64) {
        ParamTimeline::linear_ramp_to_value_at(self, value, time);
    }

    fn cancel_scheduled_values(&mut self, from: f64) {
        ParamTimeline::cancel_scheduled_values(self, from);
    }
}

/// Oscillator voice routed through a gain stage to the output device.
///
/// The gain starts at zero so a freshly created voice is silent until a
/// playback schedules its envelope.
pub struct Voice<P> {
    pub frequency: P,
    pub gain: P,
}

impl Voice<ParamTimeline> {
    /// A silent voice with empty automation timelines.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            frequency: ParamTimeline::new(OSCILLATOR_DEFAULT_HZ),
            gain: ParamTimeline::new(0.0),
        }
    }
}

/// Host audio facility: clock plus voice creation.
pub trait AudioBackend {
    /// The parameter handle type this backend hands out.
    type Param: AudioParam;

    /// Monotonic clock reading in seconds. Never decreases.
    fn current_time(&self) -> f64;

    /// Create the oscillator voice routed to the output device.
    fn create_voice(&mut self) -> Result<Voice<Self::Param>, Error>;
}

/// Backend with a manually advanced clock and no audio device.
///
/// The offline analogue of a real-time context: automation lands in plain
/// [`ParamTimeline`]s that can be inspected or rendered after the fact. Used
/// by the tests, the docs, and the non-audible demos.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend {
    clock: f64,
}

impl OfflineBackend {
    /// A backend whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `dt` seconds. Negative values are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.clock += dt;
        }
    }
}

impl AudioBackend for OfflineBackend {
    type Param = ParamTimeline;

    fn current_time(&self) -> f64 {
        self.clock
    }

    fn create_voice(&mut self) -> Result<Voice<ParamTimeline>, Error> {
        Ok(Voice::silent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_clock_is_monotonic() {
        let mut backend = OfflineBackend::new();
        assert_eq!(backend.current_time(), 0.0);
        backend.advance(1.5);
        assert_eq!(backend.current_time(), 1.5);
        backend.advance(-1.0);
        assert_eq!(backend.current_time(), 1.5);
    }

    #[test]
    fn test_fresh_voice_is_silent() {
        let mut backend = OfflineBackend::new();
        let voice = backend.create_voice().unwrap();
        assert_eq!(voice.gain.value_at(0.0), 0.0);
        assert_eq!(voice.frequency.value_at(0.0), OSCILLATOR_DEFAULT_HZ);
        assert!(voice.frequency.is_empty());
    }
}
