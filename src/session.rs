//! Per-session engine holder and the request payload a web frontend posts.
//!
//! The HTTP layer deserializes a [`ClusterRequest`], hands it to [`Session::apply`] and then calls
//! [`Session::step`] or [`Session::converge`]; the returned reports serialize straight back into the response.

use crate::{
    api::{KMeans, KMeansConfig, RunReport, StepReport},
    dataset::Dataset,
    error::{ConfigError, Result},
    inits::InitMethod,
    memory::Primitive,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_max_iter() -> i64 { 100 }
fn default_init_method() -> String { "random".to_owned() }

/// Dataset and configuration as submitted by a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest<T: Primitive> {
    pub points: Vec<Vec<T>>,
    pub k: i64,
    #[serde(default = "default_max_iter")]
    pub max_iter: i64,
    #[serde(default = "default_init_method")]
    pub init_method: String,
    /// Centroid coordinates, only used by manual initialization.
    #[serde(default)]
    pub centroids: Option<Vec<Vec<T>>>,
    /// Seed for the randomized initialization methods. Fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}
impl<T: Primitive> ClusterRequest<T> {
    /// Validate the request and build a fresh engine from it.
    pub fn build_engine(&self) -> Result<KMeans<'static, T>> {
        let data = Dataset::from_points(&self.points)?;
        let k = usize::try_from(self.k).ok()
            .filter(|&k| k >= 1 && k <= data.len())
            .ok_or(ConfigError::InvalidClusterCount { k: self.k, n: data.len() })?;
        let max_iter = usize::try_from(self.max_iter).ok()
            .filter(|&m| m >= 1)
            .ok_or(ConfigError::InvalidMaxIter(self.max_iter))?;
        let init = InitMethod::parse(&self.init_method, self.centroids.clone())?;

        let mut config = KMeansConfig::build();
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        KMeans::new(data, k, max_iter, init, config.build())
    }
}

/// State of one client: at most one engine, together with the request it was built from.
#[derive(Debug, Default)]
pub struct Session<T: Primitive> {
    engine: Option<KMeans<'static, T>>,
    request: Option<ClusterRequest<T>>,
}
impl<T: Primitive> Session<T> {
    pub fn new() -> Self {
        Self { engine: None, request: None }
    }

    /// Bring the session in line with **request**.
    ///
    /// The running engine is kept when dataset and configuration are unchanged, so consecutive
    /// step requests advance the same run. Anything else replaces the engine.
    /// An invalid request leaves the current engine untouched.
    pub fn apply(&mut self, request: ClusterRequest<T>) -> Result<()> {
        if self.engine.is_some() && self.request.as_ref() == Some(&request) {
            return Ok(());
        }
        let engine = request.build_engine()?;
        debug!(samples = request.points.len(), k = request.k, method = %request.init_method, "session engine replaced");
        self.engine = Some(engine);
        self.request = Some(request);
        Ok(())
    }

    pub fn step(&mut self) -> Result<StepReport<T>> {
        self.engine_mut()?.step()
    }

    pub fn converge(&mut self) -> Result<RunReport<T>> {
        self.engine_mut()?.run_to_convergence()
    }

    /// Restart the current run on the same dataset and configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.engine_mut()?.reset();
        Ok(())
    }

    /// Forget dataset and engine, e.g. when the client generates a new dataset.
    pub fn clear(&mut self) {
        self.engine = None;
        self.request = None;
    }

    pub fn engine(&self) -> Option<&KMeans<'static, T>> {
        self.engine.as_ref()
    }

    fn engine_mut(&mut self) -> Result<&mut KMeans<'static, T>> {
        self.engine.as_mut().ok_or_else(|| ConfigError::NotConfigured.into())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{convergence::Phase, KMeansError};

    const SCENARIO: &str = r#"{
        "points": [[0, 0], [0, 1], [10, 0], [10, 1]],
        "k": 2,
        "init_method": "manual",
        "centroids": [[0, 0], [10, 0]]
    }"#;

    fn scenario() -> ClusterRequest<f64> {
        serde_json::from_str(SCENARIO).unwrap()
    }

    #[test]
    fn request_defaults() {
        let request: ClusterRequest<f32> = serde_json::from_str(r#"{"points": [[1.5, 2.5]], "k": 1}"#).unwrap();
        assert_eq!(request.max_iter, 100);
        assert_eq!(request.init_method, "random");
        assert_eq!(request.centroids, None);
        assert_eq!(request.seed, None);
        assert_eq!(request.points, vec![vec![1.5, 2.5]]);
    }

    #[test]
    fn repeated_requests_advance_the_same_run() {
        let mut session = Session::new();
        session.apply(scenario()).unwrap();
        let first = session.step().unwrap();
        assert_eq!(first.iteration, 1);
        assert_eq!(first.assignments, vec![0, 0, 1, 1]);

        session.apply(scenario()).unwrap();
        let second = session.step().unwrap();
        assert_eq!(second.iteration, 2);
        assert!(second.just_converged);

        let json = serde_json::to_value(&second).unwrap();
        assert_eq!(json["phase"], "converged");
        assert_eq!(json["converged"], true);
        assert_eq!(json["centroids"], serde_json::json!([[0.0, 0.5], [10.0, 0.5]]));
        assert_eq!(json["assignments"], serde_json::json!([0, 0, 1, 1]));
    }

    #[test]
    fn reports_travel_back_into_clients() {
        let mut session = Session::new();
        session.apply(scenario()).unwrap();
        let step = session.step().unwrap();
        let parsed: StepReport<f64> = serde_json::from_str(&serde_json::to_string(&step).unwrap()).unwrap();
        assert_eq!(parsed, step);

        let run = session.converge().unwrap();
        let parsed: RunReport<f64> = serde_json::from_value(serde_json::to_value(&run).unwrap()).unwrap();
        assert_eq!(parsed, run);
        assert_eq!(parsed.phase, Phase::Converged);
    }

    #[test]
    fn changed_configuration_replaces_the_engine() {
        let mut session = Session::new();
        session.apply(scenario()).unwrap();
        session.converge().unwrap();

        let mut changed = scenario();
        changed.init_method = "farthest".into();
        changed.seed = Some(1);
        session.apply(changed).unwrap();
        assert_eq!(session.engine().unwrap().phase(), Phase::Initialized);
        let report = session.converge().unwrap();
        assert_eq!(report.phase, Phase::Converged);
        assert_eq!(report.centroids.len(), 2);
    }

    #[test]
    fn reset_and_clear() {
        let mut session = Session::new();
        session.apply(scenario()).unwrap();
        session.converge().unwrap();
        session.reset().unwrap();
        assert_eq!(session.engine().unwrap().state().iteration, 0);

        session.clear();
        assert!(session.engine().is_none());
        assert_eq!(session.step().unwrap_err(), KMeansError::Config(ConfigError::NotConfigured));
        assert_eq!(session.reset().unwrap_err(), KMeansError::Config(ConfigError::NotConfigured));
    }

    #[test]
    fn invalid_requests_surface_config_errors() {
        let mut session = Session::new();
        session.apply(scenario()).unwrap();

        let mut bad = scenario();
        bad.k = -1;
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::InvalidClusterCount { k: -1, n: 4 }));
        let mut bad = scenario();
        bad.k = 5;
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::InvalidClusterCount { k: 5, n: 4 }));
        let mut bad = scenario();
        bad.max_iter = 0;
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::InvalidMaxIter(0)));
        let mut bad = scenario();
        bad.init_method = "bisecting".into();
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::UnknownInitMethod("bisecting".into())));
        let mut bad = scenario();
        bad.centroids = None;
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::MissingManualCentroids));
        let mut bad = scenario();
        bad.points = vec![];
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::Config(ConfigError::EmptyDataset));
        let mut bad = scenario();
        bad.points[2] = vec![10.0];
        assert_eq!(session.apply(bad).unwrap_err(), KMeansError::DimensionMismatch { index: 2, expected: 2, found: 1 });

        // The previous engine survives failed requests
        assert_eq!(session.step().unwrap().iteration, 1);
    }
}
