//! # bargein-core
//!
//! Real-time speech onset ("barge-in") detection for telephony audio.
//!
//! ## Architecture
//!
//! ```text
//! raw bytes → FrameConditioner → SpectralAnalyzer → decision::evaluate → bool
//!             (decode, emphasis,  (transform, band    (median floor,
//!              Hann taper)         ratio, flux, zcr)   hysteresis)
//! ```
//!
//! A [`Detector`] owns one stream's configuration, its spectral transform and
//! the mutable [`DetectorState`]. Every call processes exactly one 20 ms frame
//! synchronously; there is no look-ahead and no internal buffering.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod buffering;
pub mod detector;
pub mod error;
pub mod spectral;
pub mod tuning;
pub mod vad;

// Convenience re-exports for downstream crates
pub use audio::Encoding;
pub use detector::{Detector, DetectorConfig, DetectorState, FrameReport};
pub use error::BargeInError;
pub use spectral::{RustFftTransform, SpectralTransform};
