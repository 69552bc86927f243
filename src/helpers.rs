use crate::memory::Primitive;

/// Squared euclidean distance between two points of equal dimensionality.
#[inline(always)]
pub(crate) fn squared_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b.iter())
        .map(|(&av, &bv)| av - bv)      // <sample> - <centroid>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum()
}

/// Index and squared distance of the centroid (row-major, `dims` wide) nearest to `sample`.
/// Only strictly smaller distances replace the current best, so ties resolve to the lowest index.
#[inline(always)]
pub(crate) fn nearest_centroid<T: Primitive>(sample: &[T], centroids: &[T], dims: usize) -> (usize, T) {
    let mut best = (0, T::infinity());
    for (ci, c) in centroids.chunks_exact(dims).enumerate() {
        let dist = squared_distance(sample, c);
        if dist < best.1 {
            best = (ci, dist);
        }
    }
    best
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-12))
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn squared_distance_sums_squared_components() {
		assert_eq!(squared_distance(&[0.0f64, 0.0], &[3.0, 4.0]), 25.0);
		assert_eq!(squared_distance(&[1.5f32], &[1.5]), 0.0);
	}

	#[test]
	fn nearest_centroid_prefers_lowest_index_on_ties() {
		let centroids = [-1.0f64, 0.0, 1.0, 0.0, 5.0, 5.0];
		assert_eq!(nearest_centroid(&[0.0, 0.0], &centroids, 2), (0, 1.0));
		assert_eq!(nearest_centroid(&[0.9, 0.0], &centroids, 2).0, 1);
		assert_eq!(nearest_centroid(&[4.0, 4.0], &centroids, 2), (2, 2.0));
	}
}
