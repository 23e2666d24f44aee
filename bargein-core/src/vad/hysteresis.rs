//! Noise-floor tracking and hysteresis transitions.

use tracing::debug;

use super::{Decision, Transition};
use crate::detector::DetectorState;
use crate::tuning::{ENTER_HYST, EXIT_HYST, MIN_FLOOR_FRAMES, ONSET_FRAMES};

/// Feed one frame score through the decision engine.
///
/// Zero scores (gated silence) never enter the history: they are dropouts,
/// not background noise, and would drag the floor towards 0.
pub fn evaluate(state: &mut DetectorState, score: f32) -> Decision {
    if score > 0.0 {
        state.history.push(score);
    }

    let required = state.history.capacity().min(MIN_FLOOR_FRAMES);
    if state.history.len() < required {
        return Decision::pending();
    }

    let Some(floor) = state.history.median() else {
        return Decision::pending();
    };
    let norm = score - floor;

    let mut transition = Transition::None;
    if !state.talking {
        if norm > ENTER_HYST {
            state.consecutive += 1;
        } else {
            state.consecutive = 0;
        }

        if state.consecutive >= ONSET_FRAMES {
            state.talking = true;
            transition = Transition::Onset;
            debug!(
                frame = state.frames_seen,
                score, floor, norm, "speech onset"
            );
        }
    } else if norm < EXIT_HYST {
        state.talking = false;
        state.consecutive = 0;
        transition = Transition::Offset;
        debug!(
            frame = state.frames_seen,
            score, floor, norm, "speech offset"
        );
    }

    Decision {
        floor: Some(floor),
        norm: Some(norm),
        transition,
    }
}
