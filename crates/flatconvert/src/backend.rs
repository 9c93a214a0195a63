//! [`Backend`]: the solve-and-retrieve side of a solver binding, and the
//! [`Interrupter`] a driver uses to request early termination (SIGINT, a
//! time limit, ...).

use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

use crate::{error::ConvertError, var::Num};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of a solve, matching the status taxonomy a native solver reports.
pub enum Status {
	/// An optimal (or, for a satisfaction problem, feasible) solution was found.
	Solved,
	/// The solver proved the model infeasible.
	Infeasible,
	/// The solver could not distinguish infeasible from unbounded.
	InfOrUnbounded,
	/// The solver proved the model unbounded.
	Unbounded,
	/// The solver stopped without a definitive answer (e.g. numerical trouble).
	Uncertain,
	/// The solve was interrupted via [`Interrupter`] before it converged.
	Interrupted,
	/// No further information is available.
	Unknown,
}

#[derive(Debug, Clone, Default)]
/// A shared flag a driver can set to ask a running [`Backend::solve`] call to
/// stop at its next safe checkpoint.
///
/// Modeled on the `Arc<AtomicBool>` pattern used to wire a `ctrlc` handler
/// into a long-running solve.
pub struct Interrupter(Arc<AtomicBool>);

impl Interrupter {
	/// A fresh, not-yet-triggered interrupter.
	pub fn new() -> Self {
		Self(Arc::new(AtomicBool::new(false)))
	}

	/// Request interruption.
	pub fn trigger(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	/// Whether interruption has been requested.
	pub fn is_triggered(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

#[derive(Debug, Clone)]
/// A primal (and, where available, dual) solution returned by [`Backend::solution`].
pub struct Solution {
	/// Value of each variable, indexed the same way they were added via
	/// [`crate::ModelAPI::add_variables`].
	pub primal: Vec<Num>,
	/// Dual value of each algebraic constraint actually pushed to the
	/// solver, indexed per constraint kind in push order. `None` for
	/// solvers that do not report duals (e.g. a MIP backend).
	pub duals: Option<Vec<Num>>,
	/// Objective value of the active objective row.
	pub objective_value: Num,
}

/// The solve-and-retrieve half of a solver binding.
///
/// Split from [`crate::ModelAPI`] because a driver typically builds the
/// whole model through `ModelAPI` first and only then calls into `Backend`
/// once, matching the specification's "ModelAPI (build) / Backend (solve)"
/// component split (§4.7).
pub trait Backend {
	/// Solve the model already pushed through [`crate::ModelAPI`], honoring
	/// `interrupter` if the underlying solver supports cooperative
	/// cancellation.
	fn solve(&mut self, interrupter: &Interrupter) -> Result<Status, ConvertError>;

	/// Retrieve the solution for the most recent [`Self::solve`] call.
	/// Only meaningful after a [`Status::Solved`] result.
	fn solution(&self) -> Result<Solution, ConvertError>;

	/// Whether this backend reports dual values at all.
	fn supports_duals(&self) -> bool {
		false
	}
}
