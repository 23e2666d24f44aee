//! `Detector`: per-stream facade over the analysis pipeline.
//!
//! ## Lifecycle
//!
//! ```text
//! Detector::new(config)       → transform planned, state at stream start
//!     └─► process_chunk(..)   → one 20 ms frame per call, bool onset
//!     └─► reset()             → state back to stream start, transform kept
//!     └─► close() / drop      → transform released
//! ```
//!
//! ## Threading
//!
//! Processing takes `&mut self`, so one detector serves one stream serially.
//! `Detector` is `Send`; run concurrent streams with one detector each.

pub mod config;
pub mod state;

pub use config::DetectorConfig;
pub use state::DetectorState;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    audio::FrameConditioner,
    buffering::chunk::Frame,
    error::{BargeInError, Result},
    spectral::{FrameFeatures, RustFftTransform, SpectralAnalyzer, SpectralTransform},
    vad::{self, SpeechState, Transition},
};

/// Everything the detector derived from one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    /// Zero-based index of the frame within the stream (since last reset).
    pub frame_index: u64,
    #[serde(flatten)]
    pub features: FrameFeatures,
    /// Median noise floor, absent until the history is established.
    pub floor: Option<f32>,
    /// `score - floor`, absent until the history is established.
    pub norm: Option<f32>,
    /// State after this frame.
    pub state: SpeechState,
    /// Rising edge of a speech segment.
    pub onset: bool,
    /// Falling edge of a speech segment.
    pub offset: bool,
}

impl FrameReport {
    pub fn score(&self) -> f32 {
        self.features.score
    }
}

/// Speech onset detector for one audio stream.
pub struct Detector {
    config: DetectorConfig,
    conditioner: FrameConditioner,
    analyzer: SpectralAnalyzer,
    /// Scratch frame reused every call.
    frame: Frame,
    state: DetectorState,
}

impl Detector {
    /// Create a detector backed by a `rustfft` transform.
    ///
    /// # Errors
    /// Returns `BargeInError::InvalidConfig` when `config` fails validation.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let transform = RustFftTransform::new(config.transform_size())?;
        Self::with_transform(config, transform)
    }

    /// Create a detector around a caller-supplied transform.
    ///
    /// # Errors
    /// Returns `BargeInError::Transform` if `transform.size()` differs from
    /// `config.transform_size()`.
    pub fn with_transform<T: SpectralTransform>(config: DetectorConfig, transform: T) -> Result<Self> {
        config.validate()?;

        let frame_len = config.frame_len();
        let transform_size = config.transform_size();
        if transform.size() != transform_size {
            return Err(BargeInError::Transform(format!(
                "transform size {} does not match required {transform_size}",
                transform.size()
            )));
        }

        info!(
            sample_rate = config.sample_rate,
            encoding = %config.encoding,
            window_frames = config.window_frames,
            frame_len,
            transform_size,
            "onset detector ready"
        );

        Ok(Self {
            conditioner: FrameConditioner::new(config.encoding, frame_len),
            analyzer: SpectralAnalyzer::new(Box::new(transform), config.sample_rate),
            frame: Frame::with_capacity(frame_len),
            state: DetectorState::new(config.window_frames),
            config,
        })
    }

    /// Process one chunk and report whether speech started on this frame.
    ///
    /// Chunks shorter than [`bytes_per_frame`](Self::bytes_per_frame) return
    /// `false` without touching state; bytes past one frame are ignored.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> bool {
        self.analyze_chunk(chunk).is_some_and(|r| r.onset)
    }

    /// Like [`process_chunk`](Self::process_chunk) but returns the full frame
    /// report, or `None` when the chunk holds less than one frame.
    pub fn analyze_chunk(&mut self, chunk: &[u8]) -> Option<FrameReport> {
        if !self.conditioner.condition(chunk, &mut self.frame) {
            trace!(
                len = chunk.len(),
                need = self.conditioner.bytes_per_frame(),
                "chunk shorter than one frame, skipped"
            );
            return None;
        }

        let features = self
            .analyzer
            .analyze(&self.frame, &mut self.state.previous_spectrum);
        let decision = vad::evaluate(&mut self.state, features.score);

        let frame_index = self.state.frames_seen;
        self.state.frames_seen += 1;

        Some(FrameReport {
            frame_index,
            features,
            floor: decision.floor,
            norm: decision.norm,
            state: self.state.speech_state(),
            onset: decision.transition == Transition::Onset,
            offset: decision.transition == Transition::Offset,
        })
    }

    /// Return to start-of-stream state. Configuration and transform are kept.
    pub fn reset(&mut self) {
        debug!(frames = self.state.frames_seen, "detector reset");
        self.state.reset();
    }

    /// Release the detector and its transform.
    pub fn close(self) {
        debug!(frames = self.state.frames_seen, "detector closed");
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn frame_len(&self) -> usize {
        self.conditioner.frame_len()
    }

    pub fn transform_size(&self) -> usize {
        self.analyzer.transform_size()
    }

    /// Minimum chunk size in bytes.
    pub fn bytes_per_frame(&self) -> usize {
        self.conditioner.bytes_per_frame()
    }

    pub fn is_speaking(&self) -> bool {
        self.state.is_speaking()
    }

    pub fn history_len(&self) -> usize {
        self.state.history_len()
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
