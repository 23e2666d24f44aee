//! Adaptive onset decision.
//!
//! ## State machine
//!
//! ```text
//!            norm > ENTER_HYST            counter reaches ONSET_FRAMES
//!   Idle ─────────────────────► Rising ───────────────────────────► Speaking
//!    ▲   ◄─────────────────────   │                                    │
//!    │        norm ≤ ENTER_HYST                                         │
//!    └──────────────────────────────────────────────────────────────────┘
//!                               norm < EXIT_HYST
//! ```
//!
//! `norm` is the frame score minus the median of the recent non-zero scores.
//! Nothing is evaluated until that history holds `min(window, 20)` entries.

pub mod hysteresis;

pub use hysteresis::evaluate;

use serde::Serialize;

use crate::tuning::ONSET_FRAMES;

/// Logical speech state derived from `(talking, consecutive)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    /// Not speaking, no candidate frames.
    Idle,
    /// Not speaking, `1..ONSET_FRAMES` candidate frames in a row.
    Rising(u32),
    Speaking,
}

impl SpeechState {
    pub fn from_parts(talking: bool, consecutive: u32) -> Self {
        if talking {
            SpeechState::Speaking
        } else if consecutive == 0 {
            SpeechState::Idle
        } else {
            SpeechState::Rising(consecutive.min(ONSET_FRAMES - 1))
        }
    }

    pub fn is_speaking(self) -> bool {
        self == SpeechState::Speaking
    }
}

/// State change produced by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    None,
    /// Idle/Rising → Speaking. The only event reported to callers.
    Onset,
    /// Speaking → Idle.
    Offset,
}

/// Outcome of evaluating one frame score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Median noise floor, `None` while the history is too short.
    pub floor: Option<f32>,
    /// `score - floor`, `None` while the history is too short.
    pub norm: Option<f32>,
    pub transition: Transition,
}

impl Decision {
    pub(crate) fn pending() -> Self {
        Self {
            floor: None,
            norm: None,
            transition: Transition::None,
        }
    }

    pub fn is_onset(&self) -> bool {
        self.transition == Transition::Onset
    }
}
