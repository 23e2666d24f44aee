//! Spectral analysis.
//!
//! The `SpectralTransform` trait is the seam to the forward real→complex
//! transform. `RustFftTransform` (default) plans a `rustfft` forward FFT once
//! per detector; tests and embedders may inject their own implementation via
//! `Detector::with_transform`.

pub mod features;

pub use features::{FrameFeatures, SpectralAnalyzer};

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use crate::error::{BargeInError, Result};

/// Forward real-to-complex transform of a fixed power-of-two size.
pub trait SpectralTransform: Send + 'static {
    /// Transform size `N` (a power of two).
    fn size(&self) -> usize;

    /// Transform `input` (length `N`) into `output` (length `N`) as
    /// interleaved `[re0, im0, re1, im1, ...]` for bins `0..N/2`.
    fn forward(&mut self, input: &[f32], output: &mut [f32]);
}

/// `rustfft`-backed forward transform with preallocated buffers.
pub struct RustFftTransform {
    fft: Arc<dyn Fft<f32>>,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RustFftTransform {
    /// Plan a forward FFT of `size` points.
    ///
    /// # Errors
    /// Returns `BargeInError::Transform` unless `size` is a power of two ≥ 2.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(BargeInError::Transform(format!(
                "transform size must be a power of two >= 2, got {size}"
            )));
        }

        let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        debug!(size, "planned forward FFT");

        Ok(Self {
            fft,
            buf: vec![Complex::new(0.0, 0.0); size],
            scratch,
        })
    }
}

impl SpectralTransform for RustFftTransform {
    fn size(&self) -> usize {
        self.buf.len()
    }

    fn forward(&mut self, input: &[f32], output: &mut [f32]) {
        for (dst, &x) in self.buf.iter_mut().zip(input) {
            *dst = Complex::new(x, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let half = self.buf.len() / 2;
        for (pair, c) in output.chunks_exact_mut(2).zip(&self.buf[..half]) {
            pair[0] = c.re;
            pair[1] = c.im;
        }
    }
}

impl Drop for RustFftTransform {
    fn drop(&mut self) {
        debug!(size = self.buf.len(), "released forward FFT");
    }
}

impl std::fmt::Debug for RustFftTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFftTransform")
            .field("size", &self.buf.len())
            .finish_non_exhaustive()
    }
}
