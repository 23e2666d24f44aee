//! Empirically tuned detector constants.
//!
//! Changing any of these shifts onset timing and false-trigger rates on real
//! calls. Keep them in sync with recorded fixtures before retuning.

/// Analysis frame duration in seconds (20 ms).
pub const FRAME_SECS: f64 = 0.020;

/// Pre-emphasis coefficient for `y[i] = x[i] - a * x[i - 1]`.
pub const PRE_EMPHASIS: f32 = 0.9;

/// Lower edge of the speech band (Hz).
pub const SPEECH_BAND_LOW_HZ: f32 = 300.0;
/// Upper edge of the speech band (Hz).
pub const SPEECH_BAND_HIGH_HZ: f32 = 3400.0;
/// Formant region that receives [`FORMANT_BOOST`].
pub const FORMANT_LOW_HZ: f32 = 1000.0;
pub const FORMANT_HIGH_HZ: f32 = 2000.0;
/// Weight applied to power inside the formant region.
pub const FORMANT_BOOST: f32 = 1.5;

/// Fusion weight for the band-energy ratio.
pub const WEIGHT_BAND: f32 = 0.6;
/// Fusion weight for the squashed spectral flux.
pub const WEIGHT_FLUX: f32 = 0.3;
/// Fusion weight for the zero-crossing rate.
pub const WEIGHT_ZCR: f32 = 0.1;

/// Frames whose raw spectral power falls below this score 0.
pub const MIN_ENERGY: f32 = 1e-4;

/// `norm` must exceed this for a frame to count towards an onset.
pub const ENTER_HYST: f32 = 0.15;
/// While speaking, `norm` below this ends the segment.
pub const EXIT_HYST: f32 = 0.05;
/// Consecutive above-threshold frames required to confirm an onset.
pub const ONSET_FRAMES: u32 = 3;
/// Upper bound on the history needed before the floor is trusted.
pub const MIN_FLOOR_FRAMES: usize = 20;

/// Default rolling history length (~1 s at 20 ms/frame).
pub const DEFAULT_WINDOW_FRAMES: usize = 50;
/// Default telephony sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 8_000;
