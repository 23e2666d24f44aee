//! Frame conditioning: byte decoding, pre-emphasis and Hann tapering.
//!
//! ## Per-frame steps
//!
//! ```text
//! bytes ─► decode (μ-law | PCM16LE) ─► pre-emphasis (right-to-left) ─► Hann taper
//! ```
//!
//! Pre-emphasis must run right-to-left so every subtraction sees the
//! predecessor's decoded value rather than its already-emphasised value, and
//! it must run before the taper.

pub mod codec;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffering::chunk::Frame;
use crate::error::BargeInError;
use crate::tuning::PRE_EMPHASIS;

/// Wire encoding of the incoming telephony audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// ITU-T G.711 μ-law, one byte per sample.
    #[default]
    #[serde(alias = "ulaw", alias = "pcmu")]
    Mulaw,
    /// Signed 16-bit little-endian linear PCM, two bytes per sample.
    #[serde(alias = "linear16", alias = "s16le")]
    Pcm16,
}

impl Encoding {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Encoding::Mulaw => 1,
            Encoding::Pcm16 => 2,
        }
    }

    /// Decode from the front of `bytes` into `out`, returning samples written.
    pub fn decode(self, bytes: &[u8], out: &mut [f32]) -> usize {
        match self {
            Encoding::Mulaw => codec::decode_mulaw(bytes, out),
            Encoding::Pcm16 => codec::decode_pcm16le(bytes, out),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Mulaw => f.write_str("mulaw"),
            Encoding::Pcm16 => f.write_str("pcm16"),
        }
    }
}

impl FromStr for Encoding {
    type Err = BargeInError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mulaw" | "ulaw" | "pcmu" | "g711u" => Ok(Encoding::Mulaw),
            "pcm16" | "linear16" | "s16le" | "l16" => Ok(Encoding::Pcm16),
            other => Err(BargeInError::UnsupportedEncoding(other.to_string())),
        }
    }
}

/// Turns one chunk of raw bytes into a conditioned analysis frame.
#[derive(Debug, Clone)]
pub struct FrameConditioner {
    encoding: Encoding,
    /// Precomputed symmetric Hann taper, `frame_len` long.
    window: Vec<f32>,
}

impl FrameConditioner {
    /// `frame_len` must be at least 2 (checked by `DetectorConfig::validate`).
    pub fn new(encoding: Encoding, frame_len: usize) -> Self {
        Self {
            encoding,
            window: build_hann_window(frame_len),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.window.len()
    }

    /// Minimum chunk size in bytes for one frame.
    pub fn bytes_per_frame(&self) -> usize {
        self.window.len() * self.encoding.bytes_per_sample()
    }

    /// Decode and condition the first frame of `bytes` into `frame`.
    ///
    /// Returns `false` (leaving `frame` untouched) when `bytes` holds less than
    /// one frame. Bytes past the first frame are ignored.
    pub fn condition(&self, bytes: &[u8], frame: &mut Frame) -> bool {
        if bytes.len() < self.bytes_per_frame() {
            return false;
        }

        let samples = frame.samples_mut();
        samples.resize(self.window.len(), 0.0);
        self.encoding.decode(bytes, samples);

        pre_emphasize(samples, PRE_EMPHASIS);
        for (s, w) in samples.iter_mut().zip(&self.window) {
            *s *= w;
        }
        true
    }
}

/// First-order high-pass `y[i] = x[i] - coeff * x[i - 1]`, in place.
fn pre_emphasize(samples: &mut [f32], coeff: f32) {
    for i in (1..samples.len()).rev() {
        samples[i] -= coeff * samples[i - 1];
    }
}

/// Symmetric Hann window: `0.5 * (1 - cos(2πn / (N - 1)))`.
fn build_hann_window(n: usize) -> Vec<f32> {
    use std::f32::consts::PI;
    let denom = n.saturating_sub(1).max(1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pre_emphasis_uses_unmodified_predecessor() {
        let mut x = [1.0f32, 1.0, 1.0, 1.0];
        pre_emphasize(&mut x, 0.9);
        // A left-to-right pass would give 0.1, 0.91, ... instead.
        assert_abs_diff_eq!(x[0], 1.0);
        assert_abs_diff_eq!(x[1], 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(x[2], 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(x[3], 0.1, epsilon = 1e-6);
    }

    #[test]
    fn hann_window_is_symmetric_and_zero_at_edges() {
        let w = build_hann_window(160);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(w[159], 0.0, epsilon = 1e-6);
        for i in 0..80 {
            assert_abs_diff_eq!(w[i], w[159 - i], epsilon = 1e-5);
        }
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn short_chunk_is_rejected() {
        let cond = FrameConditioner::new(Encoding::Pcm16, 160);
        assert_eq!(cond.bytes_per_frame(), 320);
        let mut frame = Frame::with_capacity(160);
        assert!(!cond.condition(&vec![0u8; 319], &mut frame));
        assert!(frame.is_empty());
    }

    #[test]
    fn emphasis_runs_before_taper() {
        // Constant input: after emphasis every sample but the first is 0.1 * c,
        // then the taper scales it.
        let cond = FrameConditioner::new(Encoding::Pcm16, 8);
        let bytes: Vec<u8> = std::iter::repeat_n(16_384i16.to_le_bytes(), 8)
            .flatten()
            .collect();
        let mut frame = Frame::with_capacity(8);
        assert!(cond.condition(&bytes, &mut frame));

        let w = build_hann_window(8);
        let s = frame.samples();
        assert_abs_diff_eq!(s[0], 0.5 * w[0], epsilon = 1e-6);
        for i in 1..8 {
            assert_abs_diff_eq!(s[i], 0.05 * w[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn encoding_parses_aliases() {
        assert_eq!("ULAW".parse::<Encoding>().unwrap(), Encoding::Mulaw);
        assert_eq!("linear16".parse::<Encoding>().unwrap(), Encoding::Pcm16);
        assert!(matches!(
            "alaw".parse::<Encoding>(),
            Err(BargeInError::UnsupportedEncoding(_))
        ));
        assert_eq!(Encoding::Pcm16.bytes_per_sample(), 2);
    }
}
