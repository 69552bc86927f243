use crate::{dataset::Dataset, helpers::squared_distance, memory::*};
use rand::{distributions::{WeightedError, WeightedIndex}, prelude::*};
use tracing::{trace, warn};

/// K-Means++ seeding.
///
/// ## Description
/// Starts by selecting one sample uniformly at random as first centroid.
/// Proceeding from there, every following centroid is drawn at random, where each sample's probability
/// of being drawn is proportional to its squared distance D(x)² to the nearest centroid selected so far.
/// Already selected samples have D(x)² = 0 and are therefore never drawn again.
pub(crate) fn select<T: Primitive, R: Rng + ?Sized>(data: &Dataset<T>, k: usize, rnd: &mut R) -> Vec<usize> {
    let mut nearest_dists = vec![T::infinity(); data.len()];
    let mut chosen = Vec::with_capacity(k);

    // Randomly select first centroid
    let mut next_idx = rnd.gen_range(0..data.len());
    loop {
        chosen.push(next_idx);
        if chosen.len() == k {
            break;
        }
        let centroid = data.sample(next_idx);
        data.iter().zip(nearest_dists.iter_mut()).for_each(|(s, nd)| {
            let d = squared_distance(s, centroid);
            if d < *nd {
                *nd = d;
            }
        });

        next_idx = match draw_weighted(&nearest_dists, rnd) {
            Ok(idx) => idx,
            Err(err) => {
                // Every remaining sample sits on a centroid already, duplicates are unavoidable
                warn!(%err, chosen = chosen.len(), k, "degenerate k-means++ weights, falling back to uniform selection");
                match (0..data.len()).filter(|idx| !chosen.contains(idx)).choose(rnd) {
                    Some(idx) => idx,
                    None => break,
                }
            }
        };
    }
    chosen
}

/// Use rand's WeightedIndex to randomly draw a sample index, while respecting the D(x)² weights.
///
/// Squared distances of far apart (but finite) samples can overflow. An infinite weight outweighs everything else,
/// so the lowest index carrying one is taken directly. A finite total is required by the sampler, so
/// weights whose sum overflows are scaled down by their maximum first.
fn draw_weighted<T: Primitive, R: Rng + ?Sized>(weights: &[T], rnd: &mut R) -> Result<usize, WeightedError> {
    if let Some(idx) = weights.iter().position(|w| w.is_infinite()) {
        trace!(idx, "squared distance overflowed, taking the sample directly");
        return Ok(idx);
    }
    let total: T = weights.iter().cloned().sum();
    if total.is_finite() {
        return WeightedIndex::<T>::new(weights).map(|w| w.sample(rnd));
    }
    let max = weights.iter().cloned().fold(T::zero(), |m, w| if w > m { w } else { m });
    let scaled: Vec<T> = weights.iter().map(|&w| w / max).collect();
    WeightedIndex::<T>::new(&scaled).map(|w| w.sample(rnd))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favors_samples_far_from_existing_centroids() {
        // A dense blob of 20 samples around the origin plus one far outlier.
        let mut points: Vec<Vec<f64>> = (0..20).map(|i| vec![(i % 5) as f64 * 0.1, (i / 5) as f64 * 0.1]).collect();
        points.push(vec![100.0, 100.0]);
        let data = Dataset::from_points(&points).unwrap();
        let outlier = data.len() - 1;

        let mut rnd = StdRng::seed_from_u64(1337);
        let runs = 2000;
        let mut outlier_picked = 0;
        for _ in 0..runs {
            let chosen = select(&data, 2, &mut rnd);
            if chosen.contains(&outlier) {
                outlier_picked += 1;
            }
        }
        // Uniform seeding would include the outlier in roughly 2/21 of all runs.
        assert!(outlier_picked > runs * 9 / 10, "outlier only picked in {} of {} runs", outlier_picked, runs);
    }

    #[test]
    fn second_pick_follows_squared_distance_weights() {
        // From sample 0, samples 1 and 2 carry weights 1 and 4 (squared), not 1 and 2.
        let data = Dataset::from_points(&[vec![0.0f64], vec![1.0], vec![2.0]]).unwrap();
        let mut rnd = StdRng::seed_from_u64(99);
        let (mut far, mut near) = (0usize, 0usize);
        while far + near < 5000 {
            let chosen = select(&data, 2, &mut rnd);
            if chosen[0] != 0 {
                continue;
            }
            match chosen[1] {
                1 => near += 1,
                2 => far += 1,
                other => panic!("sample {} is a centroid already", other),
            }
        }
        let ratio = far as f64 / near as f64;
        assert!(ratio > 3.3 && ratio < 4.8, "far/near ratio {} is not close to 4", ratio);
    }

    #[test]
    fn identical_samples_fall_back_to_uniform_selection() {
        let data = Dataset::new(vec![3.0f32; 12], 6, 2).unwrap();
        let mut rnd = StdRng::seed_from_u64(5);
        let mut chosen = select(&data, 6, &mut rnd);
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn overflowing_squared_distances_are_handled() {
        // Sample 0 and 1 are 2e19 apart, their squared distance does not fit into an f32
        let data = Dataset::from_points(&[vec![-1e19f32, 0.0], vec![1e19, 0.0], vec![0.0, 1e19]]).unwrap();
        for seed in 0..50 {
            let mut rnd = StdRng::seed_from_u64(seed);
            for k in 2..=3 {
                let mut chosen = select(&data, k, &mut rnd);
                chosen.sort_unstable();
                chosen.dedup();
                assert_eq!(chosen.len(), k);
            }
        }
    }

    #[test]
    fn infinite_weights_win_and_overflowing_totals_are_scaled() {
        let mut rnd = StdRng::seed_from_u64(3);
        assert_eq!(draw_weighted(&[0.0f32, 1.0, f32::INFINITY, f32::INFINITY], &mut rnd), Ok(2));

        let weights = [0.0f32, f32::MAX, f32::MAX];
        let mut picked = [0usize; 3];
        for _ in 0..200 {
            picked[draw_weighted(&weights, &mut rnd).unwrap()] += 1;
        }
        assert_eq!(picked[0], 0);
        assert!(picked[1] > 0 && picked[2] > 0);

        assert_eq!(draw_weighted(&[0.0f64, 0.0], &mut rnd), Err(WeightedError::AllWeightsZero));
    }
}
