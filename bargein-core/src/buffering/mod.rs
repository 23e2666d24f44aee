//! Bounded buffers owned by a detector.
//!
//! `ScoreHistory` wraps `ringbuf::HeapRb<f32>`: pushes overwrite the oldest
//! score once the window is full, so memory stays fixed for the stream's
//! lifetime.

pub mod chunk;

use std::fmt;

use ringbuf::traits::{Consumer, Observer, RingBuffer};
use ringbuf::HeapRb;

/// Rolling window of the most recent non-zero frame scores, oldest first.
pub struct ScoreHistory {
    ring: HeapRb<f32>,
    /// Sort scratch for the median, reused across frames.
    scratch: Vec<f32>,
}

impl ScoreHistory {
    /// # Panics
    /// Panics if `capacity` is zero; `DetectorConfig::validate` rejects that.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: HeapRb::new(capacity),
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Append a score, evicting the oldest one when full.
    pub fn push(&mut self, score: f32) {
        let _ = self.ring.push_overwrite(score);
    }

    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity().get()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.scratch.clear();
    }

    /// Scores oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &f32> + '_ {
        self.ring.iter()
    }

    /// Median of a sorted snapshot; mean of the middle pair for even lengths.
    ///
    /// Returns `None` when the history is empty.
    pub fn median(&mut self) -> Option<f32> {
        self.scratch.clear();
        self.scratch.extend(self.ring.iter().copied());
        let n = self.scratch.len();
        if n == 0 {
            return None;
        }
        self.scratch.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = n / 2;
        if n.is_multiple_of(2) {
            Some((self.scratch[mid - 1] + self.scratch[mid]) / 2.0)
        } else {
            Some(self.scratch[mid])
        }
    }
}

impl fmt::Debug for ScoreHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreHistory")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut h = ScoreHistory::new(3);
        for s in [0.1, 0.2, 0.3, 0.4] {
            h.push(s);
        }
        assert_eq!(h.len(), 3);
        let kept: Vec<f32> = h.iter().copied().collect();
        assert_eq!(kept, vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn median_odd_and_even() {
        let mut h = ScoreHistory::new(8);
        assert_eq!(h.median(), None);

        for s in [0.9, 0.1, 0.5] {
            h.push(s);
        }
        assert_eq!(h.median(), Some(0.5));

        h.push(0.3);
        // sorted: 0.1 0.3 0.5 0.9
        assert!((h.median().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn median_does_not_reorder_history() {
        let mut h = ScoreHistory::new(4);
        for s in [0.4, 0.1, 0.3] {
            h.push(s);
        }
        let _ = h.median();
        let kept: Vec<f32> = h.iter().copied().collect();
        assert_eq!(kept, vec![0.4, 0.1, 0.3]);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut h = ScoreHistory::new(5);
        h.push(0.2);
        h.push(0.3);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), 5);
    }
}
