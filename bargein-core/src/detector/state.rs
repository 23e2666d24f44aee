//! Mutable per-stream detector state.

use crate::buffering::ScoreHistory;
use crate::vad::SpeechState;

/// Everything a detector remembers between chunks.
///
/// Owned exclusively by one `Detector`; each pipeline stage receives it (or
/// one of its fields) by `&mut`.
#[derive(Debug)]
pub struct DetectorState {
    /// Speech segment currently active.
    pub(crate) talking: bool,
    /// Recent non-zero frame scores (noise-floor source).
    pub(crate) history: ScoreHistory,
    /// Magnitude spectrum of the previous frame, `None` at stream start.
    pub(crate) previous_spectrum: Option<Vec<f32>>,
    /// Consecutive frames above the entry threshold while not talking.
    pub(crate) consecutive: u32,
    /// Frames analysed since construction or the last reset.
    pub(crate) frames_seen: u64,
}

impl DetectorState {
    /// # Panics
    /// Panics if `window_frames` is zero; `DetectorConfig::validate` rejects that.
    pub fn new(window_frames: usize) -> Self {
        Self {
            talking: false,
            history: ScoreHistory::new(window_frames),
            previous_spectrum: None,
            consecutive: 0,
            frames_seen: 0,
        }
    }

    /// Back to start-of-stream defaults. Keeps the history allocation.
    pub fn reset(&mut self) {
        self.talking = false;
        self.history.clear();
        self.previous_spectrum = None;
        self.consecutive = 0;
        self.frames_seen = 0;
    }

    pub fn is_speaking(&self) -> bool {
        self.talking
    }

    pub fn speech_state(&self) -> SpeechState {
        SpeechState::from_parts(self.talking, self.consecutive)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn has_previous_spectrum(&self) -> bool {
        self.previous_spectrum.is_some()
    }
}
