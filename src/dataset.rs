use crate::{
    error::{ConfigError, KMeansError, Result},
    memory::Primitive,
};
use rand::prelude::*;

/// Immutable, validated set of samples the engine operates on.
///
/// Samples are kept in a single row-major buffer: `[<sample0>,<sample1>,<sample2>,...]`.
/// Sample indices stay stable for the lifetime of the dataset, which is what assignments refer to.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>,
}
impl<T: Primitive> Dataset<T> {
    /// Create a dataset from a raw row-major sample buffer.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 {
            return Err(ConfigError::EmptyDataset.into());
        }
        if sample_dims == 0 {
            return Err(ConfigError::ZeroDimensions.into());
        }
        // An overflowing expected length can never be matched, the buffer is always too short then
        let expected_len = sample_cnt.checked_mul(sample_dims);
        if expected_len != Some(samples.len()) {
            // Short buffer: the trailing partial sample is the offender. Long buffer: the surplus behind the last one.
            let (index, found) = match expected_len {
                Some(expected_len) if samples.len() > expected_len => (sample_cnt, samples.len() - expected_len),
                _ => (samples.len() / sample_dims, samples.len() % sample_dims),
            };
            return Err(KMeansError::DimensionMismatch { index, expected: sample_dims, found });
        }
        Self::check_finite(&samples, sample_dims)?;
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Create a dataset from a list of points. The first point establishes the dimensionality.
    pub fn from_points(points: &[Vec<T>]) -> Result<Self> {
        let sample_dims = points.first().ok_or(ConfigError::EmptyDataset)?.len();
        if sample_dims == 0 {
            return Err(ConfigError::ZeroDimensions.into());
        }
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| p.len() != sample_dims) {
            return Err(KMeansError::DimensionMismatch { index, expected: sample_dims, found: p.len() });
        }
        let samples = points.concat();
        Self::check_finite(&samples, sample_dims)?;
        Ok(Self { sample_cnt: points.len(), sample_dims, samples })
    }

    /// Generate **sample_cnt** samples, each coordinate drawn uniformly from `[low, high)`.
    /// This is the kind of dataset the interactive frontend scatters across its plot area.
    pub fn random_uniform<R: Rng + ?Sized>(sample_cnt: usize, sample_dims: usize, low: T, high: T, rnd: &mut R) -> Result<Self> {
        if !(low < high) || !(high - low).is_finite() {
            return Err(ConfigError::InvalidBounds.into());
        }
        let len = sample_cnt.checked_mul(sample_dims)
            .ok_or(ConfigError::TooManySamples { sample_cnt, sample_dims })?;
        let mut samples = vec![T::zero(); len];
        samples.iter_mut().for_each(|v| *v = rnd.gen_range(low..high));
        Self::new(samples, sample_cnt, sample_dims)
    }

    fn check_finite(samples: &[T], sample_dims: usize) -> Result<()> {
        match samples.iter().position(|v| !v.is_finite()) {
            Some(pos) => Err(ConfigError::NonFiniteCoordinate { index: pos / sample_dims }.into()),
            None => Ok(()),
        }
    }

    /// Amount of samples in the dataset.
    pub fn len(&self) -> usize { self.sample_cnt }
    /// Always `false`, construction rejects empty datasets.
    pub fn is_empty(&self) -> bool { self.sample_cnt == 0 }
    /// Dimensionality of every sample.
    pub fn dims(&self) -> usize { self.sample_dims }
    /// Row-major sample buffer.
    pub fn samples(&self) -> &[T] { &self.samples }

    /// Coordinates of the sample at **idx**.
    pub fn sample(&self, idx: usize) -> &[T] {
        &self.samples[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.samples.chunks_exact(self.sample_dims)
    }

    /// Copy of the samples as a list of points.
    pub fn to_points(&self) -> Vec<Vec<T>> {
        self.iter().map(|s| s.to_vec()).collect()
    }
}
