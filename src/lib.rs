//! # curve-sonifier
//!
//! Auditory visualization of velocity curves - backend-agnostic.
//!
//! This crate provides:
//! - **Bezier curves** - cubic, pinned to (0,0) and (1,1), sampled with
//!   De Casteljau to get the tangent slope
//! - **Slope-to-pitch mapping** - a tone whose frequency tracks how steep
//!   the curve is at the current playback position
//! - **Scheduled automation** - set / linear-ramp / cancel operations
//!   against a monotonic clock
//! - **In-place reversal** - scrub an in-flight playback backward through
//!   the remaining curve
//! - **Pluggable backends** - offline for tests and tools, cpal for audible
//!   output
//!
//! ## Quick Start
//!
//! ```rust
//! use curve_sonifier::{visualize_sound, BezierCurve, CurveSonifier, OfflineBackend};
//!
//! let mut sonifier = CurveSonifier::new(OfflineBackend::new()).unwrap();
//!
//! // An ease-in-out velocity profile, sonified over two seconds.
//! let curve = BezierCurve::ease_in_out();
//! visualize_sound(&mut sonifier, curve, 2.0).unwrap();
//! assert!(sonifier.running());
//!
//! // A second request while the first is still audible reverses it in place.
//! sonifier.backend_mut().advance(0.5);
//! visualize_sound(&mut sonifier, curve, 2.0).unwrap();
//! ```
//!
//! ## Frequency mapping
//!
//! Flat stretches of curve sit on the 150 Hz base tone; a slope of 1 (the
//! identity curve) is heard at 350 Hz; the mapping is hard-capped at 6 kHz,
//! which is also where vertical tangents land.

pub mod backend;
pub mod curve;
pub mod error;
#[cfg(feature = "playback")]
pub mod playback;
pub mod sonifier;
pub mod timeline;

pub use backend::{AudioBackend, AudioParam, OfflineBackend, Voice};
pub use curve::{BezierCurve, CurveSample};
pub use error::Error;
#[cfg(feature = "playback")]
pub use playback::CpalBackend;
pub use sonifier::{visualize_sound, CurveSonifier, SonifierConfig};
pub use timeline::{AutomationEvent, ParamTimeline, RampKind};

/// Prelude for common imports
pub mod prelude {
    pub use crate::backend::{AudioBackend, AudioParam, OfflineBackend, Voice};
    pub use crate::curve::{BezierCurve, CurveSample};
    pub use crate::error::Error;
    #[cfg(feature = "playback")]
    pub use crate::playback::CpalBackend;
    pub use crate::sonifier::{visualize_sound, CurveSonifier, SonifierConfig};
    pub use crate::timeline::{AutomationEvent, ParamTimeline, RampKind};
}
