//! Reusable analysis frame handed from the conditioner to the spectral stage.

/// One frame of conditioned mono f32 samples.
///
/// Owned by the detector as scratch space and overwritten on every call, so
/// the steady-state path does not allocate.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    samples: Vec<f32>,
}

impl Frame {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            samples: Vec::with_capacity(len),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Vec<f32> {
        &mut self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no frame has been conditioned into this buffer yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f32>> for Frame {
    fn from(samples: Vec<f32>) -> Self {
        Self { samples }
    }
}
