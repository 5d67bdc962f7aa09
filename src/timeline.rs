//! Scheduled parameter automation
//!
//! Time-stamped value changes against a monotonic clock: set a value at a
//! time, ramp linearly to a value arriving at a time, cancel everything from
//! a time onward. The host interpolates between scheduled points, so reading
//! the timeline at an arbitrary instant is well defined.

use serde::{Deserialize, Serialize};

/// How a scheduled event reaches its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RampKind {
    /// Jump to the value at the event time and hold it.
    #[default]
    Set,
    /// Interpolate linearly from the previous event, arriving at the event time.
    Linear,
}

/// Single scheduled change to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomationEvent {
    /// Time position in seconds on the owning clock
    pub time: f64,
    /// Parameter value to reach
    pub value: f32,
    /// How the value is reached
    pub ramp: RampKind,
}

/// Automation schedule for a single audio parameter.
///
/// Events are kept sorted by time; scheduling a second event at exactly the
/// same time replaces the first. Times are trusted to be finite - they come
/// from a clock snapshot plus validated offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamTimeline {
    initial_value: f32,
    events: Vec<AutomationEvent>,
}

impl ParamTimeline {
    /// Create an empty timeline holding `initial_value`.
    pub fn new(initial_value: f32) -> Self {
        Self {
            initial_value,
            events: Vec::new(),
        }
    }

    /// The value before any event applies.
    #[must_use]
    pub fn initial_value(&self) -> f32 {
        self.initial_value
    }

    /// Schedule `value` to take effect at `time` and hold.
    pub fn set_value_at(&mut self, value: f32, time: f64) {
        self.push_event(AutomationEvent {
            time,
            value,
            ramp: RampKind::Set,
        });
    }

    /// Schedule a linear ramp arriving at `value` at `time`.
    ///
    /// The ramp starts from the previous event; with no earlier event it
    /// degenerates to a set.
    pub fn linear_ramp_to_value_at(&mut self, value: f32, time: f64) {
        self.push_event(AutomationEvent {
            time,
            value,
            ramp: RampKind::Linear,
        });
    }

    /// Drop every scheduled event at or after `from`.
    pub fn cancel_scheduled_values(&mut self, from: f64) {
        self.events.retain(|e| e.time < from);
    }

    fn push_event(&mut self, event: AutomationEvent) {
        let pos = self.events.binary_search_by(|e| {
            e.time
                .partial_cmp(&event.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        match pos {
            Ok(idx) => self.events[idx] = event,
            Err(idx) => self.events.insert(idx, event),
        }
    }

    /// The value the parameter holds at `time`.
    #[must_use]
    pub fn value_at(&self, time: f64) -> f32 {
        if self.events.is_empty() {
            return self.initial_value;
        }

        let pos = self.events.binary_search_by(|e| {
            e.time
                .partial_cmp(&time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        match pos {
            Ok(idx) => self.events[idx].value,
            Err(0) => self.initial_value,
            Err(idx) if idx == self.events.len() => self.events[idx - 1].value,
            Err(idx) => {
                let prev = &self.events[idx - 1];
                let next = &self.events[idx];
                match next.ramp {
                    RampKind::Set => prev.value,
                    RampKind::Linear => {
                        let frac = (time - prev.time) / (next.time - prev.time);
                        (prev.value as f64 + (next.value - prev.value) as f64 * frac) as f32
                    }
                }
            }
        }
    }

    /// All scheduled events, sorted by time.
    #[must_use]
    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    /// Number of scheduled events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
