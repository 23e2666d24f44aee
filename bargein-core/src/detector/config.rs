//! Per-stream detector configuration (JSON-serialisable).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::Encoding;
use crate::error::{BargeInError, Result};
use crate::tuning::{DEFAULT_SAMPLE_RATE, DEFAULT_WINDOW_FRAMES, FRAME_SECS};

/// Highest sample rate accepted at construction (Hz).
const MAX_SAMPLE_RATE: u32 = 192_000;

/// Configuration for a `Detector`. Fixed for the lifetime of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct DetectorConfig {
    /// Stream sample rate in Hz. Default: 8000.
    pub sample_rate: u32,
    /// Wire encoding of each chunk. Default: μ-law.
    pub encoding: Encoding,
    /// Rolling score history length in frames. Default: 50 (~1 s).
    pub window_frames: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            encoding: Encoding::Mulaw,
            window_frames: DEFAULT_WINDOW_FRAMES,
        }
    }
}

impl DetectorConfig {
    pub fn new(sample_rate: u32, encoding: Encoding) -> Self {
        Self {
            sample_rate,
            encoding,
            ..Self::default()
        }
    }

    pub fn with_window_frames(mut self, window_frames: usize) -> Self {
        self.window_frames = window_frames;
        self
    }

    /// Samples per 20 ms frame: `round(sample_rate * 0.02)`.
    pub fn frame_len(&self) -> usize {
        (self.sample_rate as f64 * FRAME_SECS).round() as usize
    }

    /// Smallest power of two ≥ `frame_len`.
    pub fn transform_size(&self) -> usize {
        self.frame_len().next_power_of_two()
    }

    pub fn bytes_per_frame(&self) -> usize {
        self.frame_len() * self.encoding.bytes_per_sample()
    }

    /// Check construction preconditions.
    ///
    /// # Errors
    /// `BargeInError::InvalidConfig` for a zero/absurd sample rate, a frame
    /// shorter than two samples, or an empty history window.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(BargeInError::InvalidConfig(
                "sample rate must be positive".into(),
            ));
        }
        if self.sample_rate > MAX_SAMPLE_RATE {
            return Err(BargeInError::InvalidConfig(format!(
                "sample rate {} Hz exceeds {MAX_SAMPLE_RATE} Hz",
                self.sample_rate
            )));
        }
        if self.frame_len() < 2 {
            return Err(BargeInError::InvalidConfig(format!(
                "sample rate {} Hz yields a {}-sample frame",
                self.sample_rate,
                self.frame_len()
            )));
        }
        if self.window_frames == 0 {
            return Err(BargeInError::InvalidConfig(
                "window must hold at least one frame".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}
