use crate::{dataset::Dataset, helpers, memory::*, KMeansState};
use tracing::trace;

pub(crate) struct Lloyd<T> where T: Primitive {
	_p: std::marker::PhantomData<T>
}
impl<T> Lloyd<T> where T: Primitive {
    /// Assignment step: nearest centroid (and the squared distance to it) for every sample.
    /// Does not touch any state, the caller decides where to store the result.
    pub(crate) fn assign(data: &Dataset<T>, centroids: &[T]) -> (Vec<usize>, Vec<T>) {
        data.iter()
            .map(|s| helpers::nearest_centroid(s, centroids, data.sample_dims))
            .unzip()
    }

    pub(crate) fn update_cluster_frequencies(assignments: &[usize], centroid_frequency: &mut [usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Centroid update: every centroid becomes the coordinate-wise mean of its assigned samples.
    /// A centroid without samples keeps its previous position.
    pub(crate) fn update_centroids(data: &Dataset<T>, assignments: &[usize], centroid_frequency: &[usize], centroids: &mut [T]) {
        let dims = data.sample_dims;
        // Sum all samples in a cluster together into new_centroids
        let mut new_centroids = vec![T::zero(); centroids.len()];
        data.iter()
            .zip(assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                new_centroids[centroid_id * dims..(centroid_id + 1) * dims].iter_mut()
                    .zip(s.iter())
                    .for_each(|(c, sv)| *c += sv);
            });
        centroids.chunks_exact_mut(dims)
            .zip(new_centroids.chunks_exact(dims))
            .zip(centroid_frequency.iter().cloned())
            .filter(|(_, cfreq)| *cfreq > 0)
            .for_each(|((c, nc), cfreq)| {
                // usize always converts to f32/f64 (rounding at worst)
                let cfreq = T::from(cfreq).unwrap_or_else(T::infinity);
                c.iter_mut().zip(nc.iter()).for_each(|(cv, &sum)| *cv = sum / cfreq);
            });
    }

    /// Refresh each sample's squared distance to its assigned centroid. Returns the new distsum.
    pub(crate) fn update_centroid_distances(data: &Dataset<T>, state: &mut KMeansState<T>) -> T {
        let dims = data.sample_dims;
        let centroids = &state.centroids;
        state.centroid_distances = data.iter()
            .zip(state.assignments.iter().cloned())
            .map(|(s, assignment)| helpers::squared_distance(s, &centroids[assignment * dims..(assignment + 1) * dims]))
            .collect();
        state.centroid_distances.iter().cloned().sum()
    }

    /// One full iteration (assignment step + centroid update) on **state**.
    /// ## Returns
    /// The new distsum, measured against the updated centroids.
    pub(crate) fn iterate(data: &Dataset<T>, state: &mut KMeansState<T>) -> T {
        let (assignments, _) = Self::assign(data, &state.centroids);
        state.assignments = assignments;

        let used_centroids_cnt = Self::update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        if used_centroids_cnt < state.k {
            trace!(empty = state.k - used_centroids_cnt, "empty clusters keep their previous centroid");
        }
        Self::update_centroids(data, &state.assignments, &state.centroid_frequency, &mut state.centroids);
        Self::update_centroid_distances(data, state)
    }
}
