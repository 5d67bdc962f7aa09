//! Curve sonification sessions
//!
//! A session owns one oscillator voice and turns a Bezier velocity curve
//! into automation on it: the voice's frequency tracks the curve's tangent
//! slope over the playback duration, and the gain carries anti-click fades.
//! Reversing an in-flight playback repositions the window and reschedules
//! the surviving tail.

use serde::{Deserialize, Serialize};

use crate::backend::{AudioBackend, AudioParam, Voice};
use crate::curve::BezierCurve;
use crate::error::Error;

/// Base tone in Hz heard on a flat stretch of curve.
pub const BASE_FREQUENCY_HZ: f64 = 150.0;
/// Hz added per unit of absolute tangent slope.
pub const SLOPE_FREQUENCY_SCALE: f64 = 200.0;
/// Hard cap on the mapped frequency in Hz.
pub const MAX_FREQUENCY_HZ: f64 = 6000.0;
/// Gain ramp length in seconds at the edges of playback, against clicks.
pub const FADE_TIME_S: f64 = 0.005;
/// Automation samples scheduled per second of playback duration.
pub const SAMPLES_PER_SECOND: f64 = 100.0;

/// Calibration values for the slope-to-frequency mapping.
///
/// The defaults are the values the mapping was tuned with; override them for
/// a different register or a coarser automation resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SonifierConfig {
    /// default: 150.0
    pub base_frequency_hz: f64,
    /// default: 200.0
    pub slope_frequency_scale: f64,
    /// default: 6000.0
    pub max_frequency_hz: f64,
    /// default: 0.005
    pub fade_time_s: f64,
    /// default: 100.0
    pub samples_per_second: f64,
}

impl Default for SonifierConfig {
    fn default() -> Self {
        Self {
            base_frequency_hz: BASE_FREQUENCY_HZ,
            slope_frequency_scale: SLOPE_FREQUENCY_SCALE,
            max_frequency_hz: MAX_FREQUENCY_HZ,
            fade_time_s: FADE_TIME_S,
            samples_per_second: SAMPLES_PER_SECOND,
        }
    }
}

/// Sonification session: one voice, one active curve.
///
/// The session is created once and lives as long as playback is wanted; each
/// call to [`visualize_sound`] (or [`start`](Self::start) /
/// [`reverse`](Self::reverse)) replaces the curve and duration wholesale.
pub struct CurveSonifier<B: AudioBackend> {
    backend: B,
    voice: Voice<B::Param>,
    config: SonifierConfig,
    curve: BezierCurve,
    duration: f64,
    last_start_time: f64,
}

impl<B: AudioBackend> CurveSonifier<B> {
    /// Create a session on `backend` with the default calibration.
    pub fn new(backend: B) -> Result<Self, Error> {
        Self::with_config(backend, SonifierConfig::default())
    }

    /// Create a session with explicit calibration values.
    pub fn with_config(mut backend: B, config: SonifierConfig) -> Result<Self, Error> {
        let voice = backend.create_voice()?;
        Ok(Self {
            backend,
            voice,
            config,
            curve: BezierCurve::linear(),
            duration: 0.0,
            last_start_time: f64::NEG_INFINITY,
        })
    }

    /// Whether the backend clock is still inside the playback window
    /// `[last_start_time, last_start_time + duration)`.
    ///
    /// False on a fresh session: `last_start_time` starts at negative
    /// infinity.
    #[must_use]
    pub fn running(&self) -> bool {
        self.backend.current_time() - self.duration < self.last_start_time
    }

    /// Sampling resolution for the current duration, in automation samples
    /// across the whole curve. Recomputed per call since the duration may
    /// change between invocations.
    #[must_use]
    pub fn bezier_steps(&self) -> f64 {
        self.config.samples_per_second * self.duration
    }

    /// Length of the anti-click gain ramps in seconds.
    #[must_use]
    pub fn fade_time(&self) -> f64 {
        self.config.fade_time_s
    }

    /// Map curve parameter `t` to `(frequency_hz, time_s)`.
    ///
    /// The curve's x coordinate scaled by the duration becomes the elapsed
    /// playback time at which the frequency should be reached; the frequency
    /// rises from the base tone with the absolute tangent slope, hard-capped.
    /// An infinite slope (vertical tangent) lands exactly on the cap.
    #[must_use]
    pub fn map_to_audio_param(&self, t: f64) -> (f64, f64) {
        let s = self.curve.sample(t);
        let frequency = (self.config.base_frequency_hz
            + s.slope.abs() * self.config.slope_frequency_scale)
            .min(self.config.max_frequency_hz);
        (frequency, s.x * self.duration)
    }

    /// Start a fresh playback of `curve` over `duration` seconds.
    ///
    /// Cancels whatever automation was still pending and installs the new
    /// schedule: one linear frequency ramp per sample, plus the fade-in /
    /// fade-out gain envelope.
    pub fn start(&mut self, curve: BezierCurve, duration: f64) -> Result<(), Error> {
        self.load(curve, duration)?;
        self.schedule_start();
        Ok(())
    }

    /// Reverse an in-flight playback of `curve` over `duration` seconds,
    /// continuing audibly from the current point through the remaining curve
    /// backward in time. When nothing is running this is equivalent to
    /// [`start`](Self::start).
    ///
    /// The turnaround is approximate: the remaining time is derived from the
    /// elapsed wall-clock time through the forward schedule, not from the
    /// curve's y position.
    pub fn reverse(&mut self, curve: BezierCurve, duration: f64) -> Result<(), Error> {
        self.load(curve, duration)?;
        if self.running() {
            self.schedule_reverse();
        } else {
            self.schedule_start();
        }
        Ok(())
    }

    /// Validate and adopt a new curve and duration.
    fn load(&mut self, curve: BezierCurve, duration: f64) -> Result<(), Error> {
        curve.validate()?;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::InvalidDuration(duration));
        }
        self.curve = curve;
        self.duration = duration;
        Ok(())
    }

    fn schedule_start(&mut self) {
        // One snapshot per operation; scheduling against a moving clock
        // would tear the schedule.
        let now = self.backend.current_time();
        self.last_start_time = now;

        self.voice.frequency.cancel_scheduled_values(now);
        self.voice.gain.cancel_scheduled_values(now);

        let steps = self.bezier_steps();
        let count = steps.floor() as usize;
        for i in 0..=count {
            let (frequency, time) = self.map_to_audio_param(i as f64 / steps);
            self.voice
                .frequency
                .linear_ramp_to_value_at(frequency as f32, now + time);
        }

        let fade = self.config.fade_time_s;
        self.voice.gain.set_value_at(0.0, now);
        self.voice.gain.linear_ramp_to_value_at(1.0, now + fade);
        self.voice.gain.set_value_at(1.0, now + self.duration - fade);
        self.voice.gain.linear_ramp_to_value_at(0.0, now + self.duration);

        log::debug!(
            "start: {} frequency ramps over {:.3}s",
            count + 1,
            self.duration
        );
    }

    fn schedule_reverse(&mut self) {
        let now = self.backend.current_time();

        // Time already spent in the forward schedule.
        // TODO: derive the turnaround from curve progress (y) rather than
        // elapsed wall-clock time.
        let elapsed = now - self.last_start_time;
        let remaining = self.duration - elapsed;
        self.last_start_time = now - remaining;

        self.voice.frequency.cancel_scheduled_values(now);
        self.voice.gain.cancel_scheduled_values(now);

        let steps = self.bezier_steps();
        let count = steps.floor() as usize;
        let mut kept = 0usize;
        for i in 0..=count {
            let (frequency, time) = self.map_to_audio_param(i as f64 / steps);
            let time = time - remaining;
            if time < 0.0 {
                continue;
            }
            self.voice
                .frequency
                .linear_ramp_to_value_at(frequency as f32, now + time);
            kept += 1;
        }

        // The repositioned window ends at now + elapsed; the fade-out lands
        // there.
        let fade = self.config.fade_time_s;
        self.voice.gain.set_value_at(1.0, now + elapsed - fade);
        self.voice.gain.linear_ramp_to_value_at(0.0, now + elapsed);

        log::debug!(
            "reverse: kept {} of {} ramps, window ends in {:.3}s",
            kept,
            count + 1,
            elapsed
        );
    }

    // ==================== Accessors ====================

    /// The curve most recently loaded.
    #[must_use]
    pub fn curve(&self) -> &BezierCurve {
        &self.curve
    }

    /// The duration most recently loaded, in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clock time at which the current playback's virtual time zero
    /// occurred. Negative infinity until the first playback.
    #[must_use]
    pub fn last_start_time(&self) -> f64 {
        self.last_start_time
    }

    /// The voice this session schedules onto.
    #[must_use]
    pub fn voice(&self) -> &Voice<B::Param> {
        &self.voice
    }

    /// The backend's clock and facilities.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access, e.g. to advance an offline clock.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The calibration in effect.
    #[must_use]
    pub fn config(&self) -> &SonifierConfig {
        &self.config
    }
}

/// Sonify `curve` over `duration` seconds on `sonifier`'s voice.
///
/// The sole entry point: adopts the new curve and duration, then reverses
/// the playback in place if one is still inside its window, or starts a
/// fresh one otherwise. The window check uses the newly supplied duration,
/// matching the replace-then-dispatch order of the session fields.
pub fn visualize_sound<B: AudioBackend>(
    sonifier: &mut CurveSonifier<B>,
    curve: BezierCurve,
    duration: f64,
) -> Result<(), Error> {
    sonifier.reverse(curve, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OfflineBackend;
    use crate::timeline::RampKind;

    fn sonifier() -> CurveSonifier<OfflineBackend> {
        CurveSonifier::new(OfflineBackend::new()).unwrap()
    }

    #[test]
    fn test_linear_curve_maps_to_constant_tone() {
        let mut s = sonifier();
        s.start(BezierCurve::linear(), 2.0).unwrap();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let (frequency, time) = s.map_to_audio_param(t);
            assert!((frequency - 350.0).abs() < 1e-9, "frequency({t}) = {frequency}");
            assert!((time - t * 2.0).abs() < 1e-9, "time({t}) = {time}");
        }
    }

    #[test]
    fn test_not_running_before_first_start() {
        let s = sonifier();
        assert!(!s.running());
    }

    #[test]
    fn test_running_tracks_playback_window() {
        let mut s = sonifier();
        s.start(BezierCurve::ease_in_out(), 2.0).unwrap();
        assert!(s.running());
        s.backend_mut().advance(1.0);
        assert!(s.running());
        s.backend_mut().advance(0.5);
        assert!(s.running());
        s.backend_mut().advance(0.5);
        // At exactly last_start_time + duration the window is over.
        assert!(!s.running());
    }

    #[test]
    fn test_frequency_ramp_count_scales_with_duration() {
        let mut s = sonifier();
        s.start(BezierCurve::ease_in_out(), 2.0).unwrap();
        assert_eq!(s.bezier_steps(), 200.0);
        assert_eq!(s.voice().frequency.len(), 201);
        assert!(s
            .voice()
            .frequency
            .events()
            .iter()
            .all(|e| e.ramp == RampKind::Linear));

        let mut s = sonifier();
        s.start(BezierCurve::ease_in_out(), 0.25).unwrap();
        assert_eq!(s.bezier_steps(), 25.0);
        assert_eq!(s.voice().frequency.len(), 26);
    }

    #[test]
    fn test_gain_envelope_shape() {
        let mut s = sonifier();
        s.start(BezierCurve::linear(), 2.0).unwrap();
        let gain = &s.voice().gain;
        assert_eq!(gain.len(), 4);
        assert_eq!(gain.value_at(0.0), 0.0);
        assert_eq!(gain.value_at(0.005), 1.0);
        assert_eq!(gain.value_at(1.0), 1.0);
        assert_eq!(gain.value_at(2.0 - 0.005), 1.0);
        assert_eq!(gain.value_at(2.0), 0.0);
        assert_eq!(gain.value_at(5.0), 0.0);
    }

    #[test]
    fn test_immediate_second_call_leaves_one_schedule() {
        let mut s = sonifier();
        let curve = BezierCurve::ease_in_out();
        visualize_sound(&mut s, curve, 2.0).unwrap();
        assert_eq!(s.voice().frequency.len(), 201);

        // Same clock instant: still running, so the second call reverses and
        // must cancel every pending ramp of the first call (they reached out
        // to t = 2.0).
        visualize_sound(&mut s, curve, 2.0).unwrap();
        let now = s.backend().current_time();
        assert!(s
            .voice()
            .frequency
            .events()
            .iter()
            .all(|e| e.time <= now));
        // With zero elapsed time only the final sample survives the shift.
        assert_eq!(s.voice().frequency.len(), 1);
        assert!(s.voice().gain.events().iter().all(|e| e.time <= now));
    }

    #[test]
    fn test_reverse_midflight_replays_tail() {
        let mut s = sonifier();
        s.start(BezierCurve::linear(), 2.0).unwrap();
        s.backend_mut().advance(0.513);
        visualize_sound(&mut s, BezierCurve::linear(), 2.0).unwrap();

        let now = 0.513;
        let elapsed = 0.513;
        // Samples land at now + x(t)*2 - (2 - elapsed); the first surviving
        // one is t = 149/200. Events already in the past stay on the
        // timeline, so only look at the live ones - everything later than
        // `now` must belong to the new schedule, and nothing may reach past
        // the reversed window.
        let live: Vec<f64> = s
            .voice()
            .frequency
            .events()
            .iter()
            .map(|e| e.time)
            .filter(|&t| t >= now)
            .collect();
        assert_eq!(live.len(), 52);
        assert!(live.iter().all(|&t| t <= now + elapsed + 1e-9));
        assert!((live.last().unwrap() - (now + elapsed)).abs() < 1e-9);

        // Window was repositioned to end at now + elapsed.
        assert!((s.last_start_time() - (now - (2.0 - elapsed))).abs() < 1e-9);
        assert!(s.running());
        s.backend_mut().advance(elapsed + 1e-6);
        assert!(!s.running());
    }

    #[test]
    fn test_reverse_fade_out_ends_with_window() {
        let mut s = sonifier();
        s.start(BezierCurve::linear(), 2.0).unwrap();
        s.backend_mut().advance(0.5);
        s.reverse(BezierCurve::linear(), 2.0).unwrap();

        let end = 1.0; // now + elapsed
        let gain = &s.voice().gain;
        assert_eq!(gain.value_at(end - 0.005), 1.0);
        assert_eq!(gain.value_at(end), 0.0);
    }

    #[test]
    fn test_reverse_when_idle_starts_fresh() {
        let mut s = sonifier();
        s.reverse(BezierCurve::linear(), 2.0).unwrap();
        assert_eq!(s.voice().frequency.len(), 201);
        assert_eq!(s.last_start_time(), 0.0);
        assert!(s.running());
    }

    #[test]
    fn test_new_duration_governs_the_dispatch() {
        // The window check runs against the freshly supplied duration, so a
        // shorter one can expire a playback that was mid-flight under the
        // old duration and trigger a fresh start.
        let mut s = sonifier();
        s.start(BezierCurve::linear(), 2.0).unwrap();
        s.backend_mut().advance(1.5);
        visualize_sound(&mut s, BezierCurve::linear(), 1.0).unwrap();
        assert_eq!(s.last_start_time(), 1.5);
        let live = s
            .voice()
            .frequency
            .events()
            .iter()
            .filter(|e| e.time >= 1.5)
            .count();
        assert_eq!(live, 101);
    }

    #[test]
    fn test_vertical_tangent_hits_frequency_cap() {
        let mut s = sonifier();
        s.start(BezierCurve::new([0.0, 1.0], [1.0, 0.0]).unwrap(), 1.0)
            .unwrap();
        let (frequency, _) = s.map_to_audio_param(0.0);
        assert_eq!(frequency, 6000.0);
    }

    #[test]
    fn test_rejects_invalid_duration() {
        let mut s = sonifier();
        let curve = BezierCurve::linear();
        assert!(matches!(
            visualize_sound(&mut s, curve, 0.0),
            Err(Error::InvalidDuration(_))
        ));
        assert!(matches!(
            visualize_sound(&mut s, curve, -1.0),
            Err(Error::InvalidDuration(_))
        ));
        assert!(matches!(
            visualize_sound(&mut s, curve, f64::NAN),
            Err(Error::InvalidDuration(_))
        ));
        // Nothing was scheduled or adopted.
        assert!(!s.running());
        assert!(s.voice().frequency.is_empty());
    }

    #[test]
    fn test_rejects_malformed_curve() {
        let mut s = sonifier();
        let curve = BezierCurve {
            p1: [f64::INFINITY, 0.0],
            p2: [0.5, 0.5],
        };
        assert!(matches!(
            visualize_sound(&mut s, curve, 1.0),
            Err(Error::InvalidCurve { .. })
        ));
        assert!(s.voice().frequency.is_empty());
    }
}
