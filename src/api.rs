use crate::{
    convergence::{ConvergenceCriterion, Phase},
    dataset::Dataset,
    error::{ConfigError, Result},
    inits::{self, InitMethod},
    memory::*,
    variants::Lloyd,
};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub type InitDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>) + Sync);
pub type IterationDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>, usize, T) + Sync);

/// This is a structure holding various configuration options for a k-means engine, such as
/// the random number generator to use, the convergence criterion, or a couple of callbacks, that can be set
/// to get status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: New distance sum (**state** contains the distsum from the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<dyn RngCore + Send>,
    /// Decides when the centroids count as unchanged
    pub(crate) convergence: ConvergenceCriterion<T>,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
            rnd: Box::new(StdRng::from_entropy()),
            convergence: ConvergenceCriterion::Exact,
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("convergence", &self.convergence)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>,
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration of the engine.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used for the randomized initialization methods.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + Send + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(rnd); self
    }
    /// Shorthand for [`KMeansConfigBuilder::random_generator`] with a [`StdRng`] seeded from **seed**.
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Set the criterion deciding when the centroids count as unchanged. For more information,
    /// see documentation of [`ConvergenceCriterion`].
    /// ## Default
    /// [`ConvergenceCriterion::Exact`]
    pub fn convergence(mut self, convergence: ConvergenceCriterion<T>) -> Self {
        self.config.convergence = convergence; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the data-structure storing the current state of an engine.
///
/// ## Generics
/// - **T**: Underlying primitive type that is used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters
/// - **distsum**: The total sum of (squared) distances from all samples to their respective centroids
///   (infinite until the first iteration ran)
/// - **centroids**: Cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...], empty until initialized
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster, empty until the first iteration
/// - **centroid_distances**: Vector containing each sample's (squared) distance to its centroid
/// - **iteration**: Amount of iterations done so far
/// - **phase**: Where in its lifecycle the engine is
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iteration: usize,
    pub phase: Phase,

    pub(crate) sample_dims: usize,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::infinity(),
            centroids: Vec::new(),
            centroid_frequency: vec![0usize; k],
            assignments: Vec::new(),
            centroid_distances: Vec::new(),
            iteration: 0,
            phase: Phase::Initialized,
            sample_dims,
        }
    }

    pub(crate) fn install_centroids(&mut self, centroids: Vec<T>) {
        debug_assert_eq!(centroids.len(), self.k * self.sample_dims);
        self.centroids = centroids;
        self.phase = Phase::Iterating;
    }

    /// Coordinates of centroid **idx**.
    pub fn centroid(&self, idx: usize) -> &[T] {
        &self.centroids[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }

    /// Copy of the centroids as a list of points (empty while uninitialized).
    pub fn centroid_points(&self) -> Vec<Vec<T>> {
        self.centroids.chunks_exact(self.sample_dims).map(|c| c.to_vec()).collect()
    }

    fn distsum_if_assigned(&self) -> Option<T> {
        (!self.assignments.is_empty()).then_some(self.distsum)
    }
}


/// Outcome of a single [`KMeans::step`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepReport<T: Primitive> {
    pub centroids: Vec<Vec<T>>,
    /// Cluster index per sample. Empty right after the initialization step.
    pub assignments: Vec<usize>,
    pub iteration: usize,
    pub phase: Phase,
    /// Whether the engine is converged.
    pub converged: bool,
    /// Whether convergence was reached by this very step.
    pub just_converged: bool,
    pub distsum: Option<T>,
}

/// Outcome of [`KMeans::run_to_convergence`]. **phase** is always terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport<T: Primitive> {
    pub centroids: Vec<Vec<T>>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub phase: Phase,
    pub converged: bool,
    pub distsum: Option<T>,
}


/// Entrypoint of this crate's API-Surface.
///
/// An engine owns one dataset, its configuration and the state of one clustering run on it.
/// It is meant to be owned by exactly one session. A new dataset or configuration means a new engine.
///
/// ## Operations
/// - [`KMeans::step`]: Advance by exactly one iteration (the first call only initializes the centroids)
/// - [`KMeans::run_to_convergence`]: Iterate until converged, or until the iteration cap is hit
/// - [`KMeans::reset`]: Start over on the same dataset and configuration
///
/// ## Supported initialization methods
/// See [`InitMethod`].
#[derive(Debug)]
pub struct KMeans<'a, T: Primitive> {
    data: Dataset<T>,
    k: usize,
    max_iter: usize,
    init: InitMethod<T>,
    config: KMeansConfig<'a, T>,
    state: KMeansState<T>,
}
impl<'a, T: Primitive> KMeans<'a, T> {
    /// Create a new engine.
    ///
    /// ## Arguments
    /// - **data**: Samples to cluster
    /// - **k**: Amount of clusters to search for (`1 <= k <= data.len()`)
    /// - **max_iter**: Limit the maximum amount of iterations (at least 1)
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Errors
    /// [`ConfigError`] for an invalid **k**, a zero **max_iter**, or malformed manual centroids.
    pub fn new(data: Dataset<T>, k: usize, max_iter: usize, init: InitMethod<T>, config: KMeansConfig<'a, T>) -> Result<Self> {
        inits::validate_cluster_count(k, data.len())?;
        if max_iter == 0 {
            return Err(ConfigError::InvalidMaxIter(0).into());
        }
        if let InitMethod::Manual(centroids) = &init {
            inits::manual::validate(&data, k, centroids)?;
        }
        let state = KMeansState::new(data.dims(), k);
        let mut kmean = Self { data, k, max_iter, init, config, state };
        kmean.reset();
        Ok(kmean)
    }

    /// Drop centroids, assignments and the iteration counter. Manually placed centroids are put back in place,
    /// so a manually initialized engine is ready to iterate right away.
    pub fn reset(&mut self) {
        self.state = KMeansState::new(self.data.dims(), self.k);
        if let InitMethod::Manual(centroids) = &self.init {
            self.state.install_centroids(centroids.iter().flat_map(|c| c.iter().cloned()).collect());
            (self.config.init_done)(&self.state);
        }
        debug!(k = self.k, samples = self.data.len(), method = %self.init, "engine reset");
    }

    /// Advance the engine by exactly one iteration.
    ///
    /// - Without centroids, this only initializes them and returns an empty assignment.
    /// - Otherwise one assignment step and one centroid update are done, and convergence is checked.
    /// - Once converged (or out of iterations), this is a no-op returning the same state again.
    pub fn step(&mut self) -> Result<StepReport<T>> {
        let mut just_converged = false;
        let phase = self.state.phase;
        match phase {
            Phase::Initialized => self.initialize()?,
            Phase::Iterating => just_converged = self.iterate() == Phase::Converged,
            Phase::Converged | Phase::MaxItersReached => trace!(?phase, "run finished, step is a no-op"),
        }
        Ok(StepReport {
            centroids: self.state.centroid_points(),
            assignments: self.state.assignments.clone(),
            iteration: self.state.iteration,
            phase: self.state.phase,
            converged: self.state.phase == Phase::Converged,
            just_converged,
            distsum: self.state.distsum_if_assigned(),
        })
    }

    /// Iterate until the centroids stop changing, or until **max_iter** iterations have been done in total
    /// (iterations done through [`KMeans::step`] count as well). Initializes the centroids first if needed.
    ///
    /// ## Returns
    /// [`RunReport`], with [`Phase::Converged`] or [`Phase::MaxItersReached`]
    pub fn run_to_convergence(&mut self) -> Result<RunReport<T>> {
        if self.state.phase == Phase::Initialized {
            self.initialize()?;
        }
        while self.state.phase == Phase::Iterating {
            self.iterate();
        }
        Ok(RunReport {
            centroids: self.state.centroid_points(),
            assignments: self.state.assignments.clone(),
            iterations: self.state.iteration,
            phase: self.state.phase,
            converged: self.state.phase == Phase::Converged,
            distsum: self.state.distsum_if_assigned(),
        })
    }

    fn initialize(&mut self) -> Result<()> {
        let centroids = inits::initialize_centroids(&self.data, self.k, &self.init, &mut *self.config.rnd)?;
        self.state.install_centroids(centroids);
        debug!(method = %self.init, k = self.k, "centroids initialized");
        (self.config.init_done)(&self.state);
        Ok(())
    }

    fn iterate(&mut self) -> Phase {
        let prev_centroids = self.state.centroids.clone();
        let new_distsum = Lloyd::iterate(&self.data, &mut self.state);
        self.state.iteration += 1;
        let iteration = self.state.iteration;

        // Notify subscriber about finished iteration
        (self.config.iteration_done)(&self.state, iteration, new_distsum);
        self.state.distsum = new_distsum;
        trace!(iteration, distsum = %new_distsum, "iteration done");

        self.state.phase = if self.config.convergence.has_converged(&prev_centroids, &self.state.centroids) {
            debug!(iterations = iteration, distsum = %new_distsum, "converged");
            Phase::Converged
        } else if iteration >= self.max_iter {
            debug!(iterations = iteration, distsum = %new_distsum, "iteration cap reached before convergence");
            Phase::MaxItersReached
        } else {
            Phase::Iterating
        };
        self.state.phase
    }

    /// Current state of the engine.
    pub fn state(&self) -> &KMeansState<T> { &self.state }
    pub fn dataset(&self) -> &Dataset<T> { &self.data }
    pub fn k(&self) -> usize { self.k }
    pub fn max_iter(&self) -> usize { self.max_iter }
    pub fn init_method(&self) -> &InitMethod<T> { &self.init }
    pub fn phase(&self) -> Phase { self.state.phase }
}
