use crate::memory::*;
use serde::{Deserialize, Serialize};

/// Enum with possible convergence criteria.
/// These criteria decide whether an iteration left the centroids unchanged, which ends a running calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConvergenceCriterion<T: Primitive> {
	/// Converged when every centroid coordinate is bit-for-bit equal to its previous value.
	Exact,
	/// Converged when no centroid coordinate moved by more than **epsilon**.
	/// ## Fields:
	/// - **epsilon**: Largest per-coordinate change that still counts as "unchanged"
	Tolerance { epsilon: T },
}
impl<T: Primitive> Default for ConvergenceCriterion<T> {
	fn default() -> Self { ConvergenceCriterion::Exact }
}
impl<T: Primitive> ConvergenceCriterion<T> {
	/// ## Arguments
	/// - **prev**: Row-major centroids before the iteration
	/// - **next**: Row-major centroids after the iteration
	/// ## Returns
	/// - **true** if the centroids count as unchanged
	pub fn has_converged(&self, prev: &[T], next: &[T]) -> bool {
		debug_assert_eq!(prev.len(), next.len());
		match *self {
			ConvergenceCriterion::Exact => prev.iter().zip(next.iter()).all(|(p, n)| p == n),
			ConvergenceCriterion::Tolerance { epsilon } => prev.iter().zip(next.iter())
				.all(|(&p, &n)| (p - n).abs() <= epsilon),
		}
	}
}

/// Lifecycle of an engine.
///
/// `Initialized` -> `Iterating` -> `Converged` | `MaxItersReached`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	/// Configured, but no centroids yet.
	Initialized,
	/// Centroids exist, iterations may follow.
	Iterating,
	/// The last iteration left the centroids unchanged.
	Converged,
	/// The iteration cap was hit before convergence. Not an error.
	MaxItersReached,
}
impl Phase {
	/// Whether no further iteration will happen in this phase.
	pub fn is_terminal(self) -> bool {
		matches!(self, Phase::Converged | Phase::MaxItersReached)
	}
}
