//! Per-frame feature extraction and score fusion.
//!
//! ## Features
//!
//! | Feature    | Source                                              | Range  |
//! |------------|-----------------------------------------------------|--------|
//! | band ratio | formant-weighted 300–3400 Hz power / total power    | [0, 1] |
//! | flux       | rising magnitude per bin, summed, then `x / (x + 1)` | [0, 1) |
//! | zcr        | sign changes / frame length (time domain)           | [0, 1) |
//!
//! `score = 0.6·band + 0.3·flux + 0.1·zcr`, forced to 0 when total power is
//! below `MIN_ENERGY`. The energy gate uses unweighted power.

use serde::Serialize;
use tracing::trace;

use super::SpectralTransform;
use crate::buffering::chunk::Frame;
use crate::tuning::{
    FORMANT_BOOST, FORMANT_HIGH_HZ, FORMANT_LOW_HZ, MIN_ENERGY, SPEECH_BAND_HIGH_HZ,
    SPEECH_BAND_LOW_HZ, WEIGHT_BAND, WEIGHT_FLUX, WEIGHT_ZCR,
};

/// Features extracted from one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFeatures {
    pub band_ratio: f32,
    pub flux: f32,
    pub zcr: f32,
    /// Raw Σ|X|² over all bins (drives the energy gate).
    pub total_energy: f32,
    /// Fused, energy-gated frame score.
    pub score: f32,
}

/// Drives the spectral transform and turns a conditioned frame into a score.
pub struct SpectralAnalyzer {
    transform: Box<dyn SpectralTransform>,
    sample_rate: u32,
    /// Zero-padded transform input, `size` long.
    padded: Vec<f32>,
    /// Interleaved transform output, `size` long.
    spectrum: Vec<f32>,
    /// Current magnitudes; swapped into the state's previous spectrum.
    magnitudes: Vec<f32>,
}

impl SpectralAnalyzer {
    pub fn new(transform: Box<dyn SpectralTransform>, sample_rate: u32) -> Self {
        let size = transform.size();
        Self {
            transform,
            sample_rate,
            padded: vec![0.0; size],
            spectrum: vec![0.0; size],
            magnitudes: vec![0.0; size / 2],
        }
    }

    pub fn transform_size(&self) -> usize {
        self.padded.len()
    }

    /// Score one conditioned frame.
    ///
    /// `previous` is the state's previous magnitude spectrum; it always holds
    /// this frame's spectrum on return.
    pub fn analyze(&mut self, frame: &Frame, previous: &mut Option<Vec<f32>>) -> FrameFeatures {
        let samples = frame.samples();

        let n = samples.len().min(self.padded.len());
        self.padded[..n].copy_from_slice(&samples[..n]);
        self.padded[n..].fill(0.0);

        self.transform.forward(&self.padded, &mut self.spectrum);

        for (m, pair) in self
            .magnitudes
            .iter_mut()
            .zip(self.spectrum.chunks_exact(2))
        {
            *m = (pair[0] * pair[0] + pair[1] * pair[1]).sqrt();
        }

        let (band_ratio, total_energy) = self.band_ratio();

        let flux = match previous {
            Some(prev) => {
                let rise: f32 = self
                    .magnitudes
                    .iter()
                    .zip(prev.iter())
                    .map(|(cur, old)| (cur - old).max(0.0))
                    .sum();
                std::mem::swap(prev, &mut self.magnitudes);
                rise / (rise + 1.0)
            }
            None => {
                *previous = Some(self.magnitudes.clone());
                0.0
            }
        };

        let zcr = zero_crossing_rate(samples);

        let score = if total_energy < MIN_ENERGY {
            0.0
        } else {
            WEIGHT_BAND * band_ratio + WEIGHT_FLUX * flux + WEIGHT_ZCR * zcr
        };

        trace!(band_ratio, flux, zcr, total_energy, score, "frame features");

        FrameFeatures {
            band_ratio,
            flux,
            zcr,
            total_energy,
            score,
        }
    }

    /// Formant-weighted speech-band power ratio and the raw total power.
    fn band_ratio(&self) -> (f32, f32) {
        let bins = self.magnitudes.len();
        let hz_per_bin = self.sample_rate as f32 / (2 * bins) as f32;

        let mut total = 0.0f32;
        let mut speech = 0.0f32;
        for (i, &m) in self.magnitudes.iter().enumerate() {
            let power = m * m;
            total += power;

            let freq = i as f32 * hz_per_bin;
            if (SPEECH_BAND_LOW_HZ..=SPEECH_BAND_HIGH_HZ).contains(&freq) {
                let weight = if (FORMANT_LOW_HZ..=FORMANT_HIGH_HZ).contains(&freq) {
                    FORMANT_BOOST
                } else {
                    1.0
                };
                speech += weight * power;
            }
        }

        let ratio = if total > 0.0 {
            (speech / total).min(1.0)
        } else {
            0.0
        };
        (ratio, total)
    }
}

/// Sign changes between consecutive samples, divided by the frame length.
fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / samples.len() as f32
}

impl std::fmt::Debug for SpectralAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralAnalyzer")
            .field("transform_size", &self.padded.len())
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}
