//! Real-time playback backend built on cpal
//!
//! One output stream synthesizes the session's single sine voice. The
//! stream callback reads the shared frequency and gain timelines at the
//! stream clock, which is a counter of frames rendered so far - the same
//! monotonic clock [`current_time`](CpalBackend::current_time) reports.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{OutputCallbackInfo, SampleFormat, StreamConfig};

use crate::backend::{AudioBackend, AudioParam, Voice, OSCILLATOR_DEFAULT_HZ};
use crate::error::Error;
use crate::timeline::ParamTimeline;

/// Handle to a voice parameter shared with the audio callback.
///
/// Scheduling operations lock the underlying timeline for the duration of a
/// single call; the callback locks it once per buffer.
#[derive(Clone)]
pub struct SharedParam(Arc<Mutex<ParamTimeline>>);

impl SharedParam {
    fn new(timeline: ParamTimeline) -> Self {
        Self(Arc::new(Mutex::new(timeline)))
    }

    fn lock(&self) -> MutexGuard<'_, ParamTimeline> {
        self.0.lock().expect("audio thread panicked holding the parameter lock")
    }

    /// The value the parameter holds at `time` on the stream clock.
    #[must_use]
    pub fn value_at(&self, time: f64) -> f32 {
        self.lock().value_at(time)
    }
}

impl AudioParam for SharedParam {
    fn set_value_at(&mut self, value: f32, time: f64) {
        self.lock().set_value_at(value, time);
    }

    fn linear_ramp_to_value_at(&mut self, value: f32, time: f64) {
        self.lock().linear_ramp_to_value_at(value, time);
    }

    fn cancel_scheduled_values(&mut self, from: f64) {
        self.lock().cancel_scheduled_values(from);
    }
}

fn backend_err(err: impl std::fmt::Display) -> Error {
    Error::BackendUnavailable(err.to_string())
}

/// Backend playing through the default output device.
///
/// The voice exists for the backend's whole lifetime (it is a single-voice
/// backend by design); [`create_voice`](AudioBackend::create_voice) hands
/// out shared handles to it. The stream keeps running in between playbacks,
/// silent while the gain timeline reads zero.
pub struct CpalBackend {
    _stream: cpal::Stream,
    sample_rate: f64,
    samples_played: Arc<AtomicU64>,
    frequency: SharedParam,
    gain: SharedParam,
}

impl CpalBackend {
    /// Open the default output device and start the silent voice stream.
    pub fn new() -> Result<Self, Error> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::BackendUnavailable("no output device".to_string()))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        }

        let default_config = device.default_output_config().map_err(backend_err)?;
        if default_config.sample_format() != SampleFormat::F32 {
            return Err(Error::BackendUnavailable(format!(
                "unsupported sample format {:?}",
                default_config.sample_format()
            )));
        }
        let config = StreamConfig {
            channels: default_config.channels(),
            sample_rate: default_config.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        let sample_rate = config.sample_rate.0 as f64;
        let channels = config.channels as usize;
        log::info!("sample rate: {}", config.sample_rate.0);
        log::info!("num channels: {}", config.channels);

        let frequency = SharedParam::new(ParamTimeline::new(OSCILLATOR_DEFAULT_HZ));
        let gain = SharedParam::new(ParamTimeline::new(0.0));
        let samples_played = Arc::new(AtomicU64::new(0));

        let stream = device
            .build_output_stream(
                &config,
                {
                    let frequency = frequency.clone();
                    let gain = gain.clone();
                    let samples_played = Arc::clone(&samples_played);
                    let mut phase = 0.0f64;
                    move |data: &mut [f32], _: &OutputCallbackInfo| {
                        let frequency = frequency.lock();
                        let gain = gain.lock();
                        let mut frame = samples_played.load(Ordering::Relaxed);
                        for out in data.chunks_mut(channels) {
                            let t = frame as f64 / sample_rate;
                            let hz = frequency.value_at(t) as f64;
                            let amp = gain.value_at(t);
                            let sample = (phase * 2.0 * PI).sin() as f32 * amp;
                            phase += hz / sample_rate;
                            if phase >= 1.0 {
                                phase -= 1.0;
                            }
                            for element in out {
                                *element = sample;
                            }
                            frame += 1;
                        }
                        samples_played.store(frame, Ordering::Relaxed);
                    }
                },
                |err| eprintln!("stream error: {}", err),
                None,
            )
            .map_err(backend_err)?;
        stream.play().map_err(backend_err)?;

        Ok(Self {
            _stream: stream,
            sample_rate,
            samples_played,
            frequency,
            gain,
        })
    }
}

impl AudioBackend for CpalBackend {
    type Param = SharedParam;

    /// Stream time in seconds: frames rendered so far over the sample rate.
    fn current_time(&self) -> f64 {
        self.samples_played.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    fn create_voice(&mut self) -> Result<Voice<SharedParam>, Error> {
        Ok(Voice {
            frequency: self.frequency.clone(),
            gain: self.gain.clone(),
        })
    }
}
