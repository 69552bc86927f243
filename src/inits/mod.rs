//! Centroid initialization methods.

pub(crate) mod farthestfirst;
pub(crate) mod kmeanplusplus;
pub(crate) mod manual;
pub(crate) mod randomsample;

use crate::{
    dataset::Dataset,
    error::{ConfigError, Result},
    memory::Primitive,
};
use rand::Rng;
use std::fmt;

/// Available centroid initialization methods.
#[derive(Clone, Debug, PartialEq)]
pub enum InitMethod<T: Primitive> {
    /// K distinct samples, drawn uniformly without replacement (a.k.a. Forgy).
    Random,
    /// Greedy spread: after a random first pick, always take the sample farthest from its nearest centroid.
    FarthestFirst,
    /// K-Means++ seeding, sampling proportionally to the squared distance to the nearest centroid.
    KMeansPlusPlus,
    /// Centroid coordinates placed by the caller.
    Manual(Vec<Vec<T>>),
}
impl<T: Primitive> InitMethod<T> {
    /// Parse a method name as sent by a frontend. Manual initialization takes its coordinates from **centroids**,
    /// all other methods ignore them.
    pub fn parse(name: &str, centroids: Option<Vec<Vec<T>>>) -> std::result::Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(InitMethod::Random),
            "farthest" | "farthest-first" | "farthest_first" => Ok(InitMethod::FarthestFirst),
            "kmeans++" | "k-means++" | "kmeanspp" | "kmeans_plus_plus" => Ok(InitMethod::KMeansPlusPlus),
            "manual" => centroids.map(InitMethod::Manual).ok_or(ConfigError::MissingManualCentroids),
            _ => Err(ConfigError::UnknownInitMethod(name.to_owned())),
        }
    }

    /// Canonical name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            InitMethod::Random => "random",
            InitMethod::FarthestFirst => "farthest-first",
            InitMethod::KMeansPlusPlus => "kmeans++",
            InitMethod::Manual(_) => "manual",
        }
    }
}
impl<T: Primitive> fmt::Display for InitMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

pub(crate) fn validate_cluster_count(k: usize, sample_cnt: usize) -> std::result::Result<(), ConfigError> {
    if sample_cnt == 0 {
        return Err(ConfigError::EmptyDataset);
    }
    if k == 0 || k > sample_cnt {
        return Err(ConfigError::InvalidClusterCount { k: i64::try_from(k).unwrap_or(i64::MAX), n: sample_cnt });
    }
    Ok(())
}

/// Calculate the initial **k** centroids for **data**.
///
/// ## Arguments
/// - **data**: Dataset to pick the centroids from
/// - **k**: Amount of centroids to produce (`1 <= k <= data.len()`)
/// - **method**: Initialization method to use
/// - **rnd**: Random number generator (pass a seeded one for reproducible results)
///
/// ## Returns
/// The centroids [row-major] = [<centroid0>,<centroid1>,...], exactly `k * data.dims()` values.
pub fn initialize_centroids<T, R>(data: &Dataset<T>, k: usize, method: &InitMethod<T>, rnd: &mut R) -> Result<Vec<T>>
where
    T: Primitive,
    R: Rng + ?Sized,
{
    validate_cluster_count(k, data.len())?;
    let indices = match method {
        InitMethod::Random => randomsample::select(data, k, rnd),
        InitMethod::FarthestFirst => {
            let first_idx = rnd.gen_range(0..data.len());
            farthestfirst::select(data, k, first_idx)
        }
        InitMethod::KMeansPlusPlus => kmeanplusplus::select(data, k, rnd),
        InitMethod::Manual(centroids) => return manual::calculate(data, k, centroids),
    };
    Ok(gather(data, &indices))
}

/// Copy the selected samples into a row-major centroid buffer.
fn gather<T: Primitive>(data: &Dataset<T>, indices: &[usize]) -> Vec<T> {
    let mut centroids = Vec::with_capacity(indices.len() * data.dims());
    indices.iter().for_each(|&idx| centroids.extend_from_slice(data.sample(idx)));
    centroids
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::KMeansError;
    use rand::prelude::*;

    fn grid() -> Dataset<f64> {
        let points: Vec<Vec<f64>> = (0..5).flat_map(|x| (0..4).map(move |y| vec![x as f64, y as f64 * 3.0])).collect();
        Dataset::from_points(&points).unwrap()
    }

    #[test]
    fn every_method_yields_k_centroids_of_dataset_dimension() {
        let data = grid();
        let mut rnd = StdRng::seed_from_u64(1337);
        for k in 1..=data.len() {
            let manual = InitMethod::Manual(data.to_points().into_iter().take(k).collect());
            for method in [InitMethod::Random, InitMethod::FarthestFirst, InitMethod::KMeansPlusPlus, manual] {
                let centroids = initialize_centroids(&data, k, &method, &mut rnd).unwrap();
                assert_eq!(centroids.len(), k * data.dims(), "{} with k={}", method, k);
            }
        }
    }

    #[test]
    fn sampling_methods_never_duplicate_distinct_samples() {
        let data = grid();
        let mut rnd = StdRng::seed_from_u64(7);
        for method in [InitMethod::Random, InitMethod::FarthestFirst, InitMethod::KMeansPlusPlus] {
            let centroids = initialize_centroids(&data, data.len(), &method, &mut rnd).unwrap();
            let mut points: Vec<Vec<f64>> = centroids.chunks_exact(2).map(|c| c.to_vec()).collect();
            points.sort_by(|a, b| a.partial_cmp(b).unwrap());
            points.dedup();
            assert_eq!(points.len(), data.len(), "{} picked a sample twice", method);
        }
    }

    #[test]
    fn invalid_cluster_counts_are_rejected() {
        let data = grid();
        let mut rnd = StdRng::seed_from_u64(1);
        for method in [InitMethod::Random, InitMethod::FarthestFirst, InitMethod::KMeansPlusPlus, InitMethod::Manual(vec![])] {
            assert_eq!(initialize_centroids(&data, 0, &method, &mut rnd).unwrap_err(),
                KMeansError::Config(ConfigError::InvalidClusterCount { k: 0, n: 20 }));
            assert_eq!(initialize_centroids(&data, 21, &method, &mut rnd).unwrap_err(),
                KMeansError::Config(ConfigError::InvalidClusterCount { k: 21, n: 20 }));
        }
    }

    #[test]
    fn parse_method_names() {
        assert_eq!(InitMethod::<f64>::parse("random", None), Ok(InitMethod::Random));
        assert_eq!(InitMethod::<f64>::parse("farthest", None), Ok(InitMethod::FarthestFirst));
        assert_eq!(InitMethod::<f64>::parse("Farthest-First", None), Ok(InitMethod::FarthestFirst));
        assert_eq!(InitMethod::<f64>::parse("kmeans++", Some(vec![vec![1.0]])), Ok(InitMethod::KMeansPlusPlus));
        assert_eq!(InitMethod::<f64>::parse("k-means++", None), Ok(InitMethod::KMeansPlusPlus));
        assert_eq!(InitMethod::parse("manual", Some(vec![vec![1.0f64, 2.0]])), Ok(InitMethod::Manual(vec![vec![1.0, 2.0]])));
        assert_eq!(InitMethod::<f64>::parse("manual", None), Err(ConfigError::MissingManualCentroids));
        assert_eq!(InitMethod::<f64>::parse("spectral", None), Err(ConfigError::UnknownInitMethod("spectral".into())));
        assert_eq!(InitMethod::<f32>::KMeansPlusPlus.to_string(), "kmeans++");
    }
}
