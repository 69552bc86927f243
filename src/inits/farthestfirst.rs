use crate::{dataset::Dataset, helpers::squared_distance, memory::*};

/// Farthest-first traversal, starting at sample **first_idx**.
///
/// Every following centroid is the not yet selected sample with the largest distance to its nearest
/// selected centroid. Ties go to the lowest sample index, so the result is fully determined by **first_idx**.
/// Squared distances are compared, which yields the same order as plain euclidean distances.
pub(crate) fn select<T: Primitive>(data: &Dataset<T>, k: usize, first_idx: usize) -> Vec<usize> {
    let mut selected = vec![false; data.len()];
    let mut nearest_dists = vec![T::infinity(); data.len()];
    let mut chosen = Vec::with_capacity(k);

    let mut next_idx = first_idx;
    loop {
        selected[next_idx] = true;
        chosen.push(next_idx);
        if chosen.len() == k {
            break;
        }
        // Only the newest centroid can lower a sample's distance to its nearest centroid
        let centroid = data.sample(next_idx);
        data.iter().zip(nearest_dists.iter_mut()).for_each(|(s, nd)| {
            let d = squared_distance(s, centroid);
            if d < *nd {
                *nd = d;
            }
        });

        let mut farthest: Option<(usize, T)> = None;
        for (idx, &d) in nearest_dists.iter().enumerate().filter(|(idx, _)| !selected[*idx]) {
            if farthest.map_or(true, |(_, best)| d > best) {
                farthest = Some((idx, d));
            }
        }
        match farthest {
            Some((idx, _)) => next_idx = idx,
            None => break, // k > sample count, rejected before we get here
        }
    }
    chosen
}
