//! # kmeans-stepper - API documentation
//!
//! A small k-means clustering engine for interactive visualizations: instead of only handing back a final
//! result, the engine can be advanced one iteration at a time, so that a frontend can animate how the
//! centroids move.
//!
//! ## Design target
//! Datasets are small (a few hundred 2D points scattered over a plot) and every call has to answer one
//! request, synchronously. The engine is therefore single-threaded and plain: samples are given as
//! a raw row-major vector (or a list of points), and all state of one clustering run lives in one owned
//! [`KMeans`] value that belongs to one session.
//!
//! ## Supported centroid initializations
//! The outcome of each K-Means run depends on the initialization of its clusters. For a list of implemented
//! initialization methods, see [`InitMethod`]. Randomized methods draw from the random number generator
//! configured through [`KMeansConfig`], so seeded runs are reproducible.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! Running to convergence, using K-Mean++ initialization:
//!
//! ```rust
//! use kmeans_stepper::*;
//!
//! fn main() -> Result<()> {
//!     let (sample_cnt, sample_dims, k, max_iter) = (300, 2, 4, 100);
//!
//!     // Generate some random data
//!     let mut samples = vec![0.0f64; sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rand::random());
//!
//!     let data = Dataset::new(samples, sample_cnt, sample_dims)?;
//!     let mut kmean = KMeans::new(data, k, max_iter, InitMethod::KMeansPlusPlus, KMeansConfig::default())?;
//!     let result = kmean.run_to_convergence()?;
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Cluster-Assignments: {:?}", result.assignments);
//!     println!("Finished after {} iterations: {:?}", result.iterations, result.phase);
//!     Ok(())
//! }
//! ```
//!
//! ## Example (stepping)
//! ```rust
//! use kmeans_stepper::*;
//!
//! fn main() -> Result<()> {
//!     let data = Dataset::from_points(&[vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 0.0], vec![10.0, 1.0]])?;
//!     let init = InitMethod::Manual(vec![vec![0.0, 0.0], vec![10.0, 0.0]]);
//!     let mut kmean = KMeans::new(data, 2, 100, init, KMeansConfig::default())?;
//!
//!     let step = kmean.step()?;
//!     assert_eq!(step.assignments, vec![0, 0, 1, 1]);
//!     assert_eq!(step.centroids, vec![vec![0.0, 0.5], vec![10.0, 0.5]]);
//!
//!     let step = kmean.step()?;
//!     assert!(step.just_converged);
//!     assert_eq!(step.iteration, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct. It takes over a validated [`Dataset`], the cluster count,
//! an iteration cap, the [`InitMethod`] and a [`KMeansConfig`]. The state of the run is kept in a [`KMeansState`]:
//! - [`KMeans::step`] initializes the centroids on its first call, and does exactly one iteration on every
//!   following call, until the run is converged (then it keeps returning the same state).
//! - [`KMeans::run_to_convergence`] iterates until the centroids stop changing, or the iteration cap is hit.
//! - [`KMeans::reset`] starts over on the same dataset.
//!
//! Web handlers don't have to deal with the engine directly: [`Session`] keeps one engine per client and
//! rebuilds it whenever a [`ClusterRequest`] brings a different dataset or configuration.
//!
//! Invalid input is reported as [`KMeansError`]; nothing in here panics on bad user input.

#[macro_use] mod helpers;
mod api;
mod convergence;
mod dataset;
mod error;
mod inits;
mod memory;
mod session;
mod variants;

pub use api::{KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, RunReport, StepReport};
pub use convergence::{ConvergenceCriterion, Phase};
pub use dataset::Dataset;
pub use error::{ConfigError, KMeansError, Result};
pub use inits::{initialize_centroids, InitMethod};
pub use memory::Primitive;
pub use session::{ClusterRequest, Session};
