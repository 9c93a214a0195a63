//! An in-memory [`ModelAPI`]/[`Backend`] pair used by the test suite and by
//! the CLI's demo mode, standing in for a real commercial-solver binding
//! (out of scope here; see `DESIGN.md`).

use std::collections::HashMap;

use crate::{
	backend::{Backend, Interrupter, Solution, Status},
	constraints::{
		abs::AbsConstraint, alldiff::AllDiffConstraint, complementarity::ComplementarityConstraint,
		cond::{CondLinConstraint, CondQuadConstraint},
		count::{CountConstraint, NumberofConstConstraint, NumberofVarConstraint},
		div::DivConstraint,
		elementary::ElementaryFnConstraint,
		extremum::ExtremumConstraint,
		functional::{LinearFunctionalConstraint, QuadraticFunctionalConstraint},
		if_then_else::IfThenElseConstraint,
		indicator::{IndicatorConstraint, IndicatorQuadConstraint},
		linear::LinearConstraint,
		logical::{LogicalConstraint, NotConstraint},
		pl::PlConstraint,
		quadratic::QuadraticConstraint,
		sos::SosConstraint,
	},
	error::ConvertError,
	kind::{Acceptance, ConstraintKind},
	model_api::{LinearObjective, ModelAPI, QuadraticObjective, VariableSpec},
	var::Num,
};

/// A pushed row, kept only for inspection by tests and the demo CLI (not
/// interpreted by [`InMemoryBackend::solve`] beyond counting it).
#[derive(Debug, Clone)]
pub enum PushedRow {
	/// `LinConLE`/`LinConEQ`/`LinConGE`/`LinConRange`.
	Linear(LinearConstraint),
	/// `QuadConLE`/`QuadConEQ`/`QuadConGE`/`QuadConRange`.
	Quadratic(QuadraticConstraint),
	/// `SOS1`/`SOS2`.
	Sos(SosConstraint),
	/// `IndicatorConstraintLin{LE,EQ,GE}`.
	Indicator(IndicatorConstraint),
	/// `IndicatorConstraintQuad{LE,EQ,GE}`.
	IndicatorQuad(IndicatorQuadConstraint),
	/// Any other kind accepted natively by a non-default acceptance override
	/// (recorded only by its kind, since the demo backend has no native
	/// semantics for it).
	Other(ConstraintKind),
}

/// A minimal in-process stand-in for a commercial solver's modeling API.
///
/// By default, only plain algebraic rows (`LinCon*`/`QuadCon*`), `SOS1`/
/// `SOS2`, and the indicator families are "natively accepted" — mirroring
/// the acceptance profile a real MIP solver like CPLEX or Gurobi actually
/// has — so every higher-level modeling construct (`AbsConstraint`,
/// `Div`, `Count`, ...) runs through [`crate::FlatConverter`]'s redefinition
/// cascade exactly as it would against a real binding.
#[derive(Debug, Clone)]
pub struct InMemoryModel {
	name: &'static str,
	acceptance: HashMap<ConstraintKind, Acceptance>,
	variables: Vec<VariableSpec>,
	linear_objective: Option<LinearObjective>,
	quadratic_objective: Option<QuadraticObjective>,
	rows: Vec<PushedRow>,
}

impl InMemoryModel {
	/// A fresh model with the default (realistic commercial-solver) acceptance
	/// profile.
	pub fn new(name: &'static str) -> Self {
		let mut acceptance = HashMap::new();
		for &kind in ConstraintKind::ALL {
			let acc = match kind {
				ConstraintKind::LinConLe
				| ConstraintKind::LinConEq
				| ConstraintKind::LinConGe
				| ConstraintKind::LinConRange
				| ConstraintKind::QuadConLe
				| ConstraintKind::QuadConEq
				| ConstraintKind::QuadConGe
				| ConstraintKind::QuadConRange
				| ConstraintKind::Sos1
				| ConstraintKind::Sos2
				| ConstraintKind::IndicatorLinLe
				| ConstraintKind::IndicatorLinEq
				| ConstraintKind::IndicatorLinGe
				| ConstraintKind::IndicatorQuadLe
				| ConstraintKind::IndicatorQuadEq
				| ConstraintKind::IndicatorQuadGe => Acceptance::Recommended,
				_ => Acceptance::NotAccepted,
			};
			acceptance.insert(kind, acc);
		}
		Self {
			name,
			acceptance,
			variables: Vec::new(),
			linear_objective: None,
			quadratic_objective: None,
			rows: Vec::new(),
		}
	}

	/// Override the declared acceptance for `kind`, e.g. to exercise a
	/// conversion rule that would otherwise be skipped, or to simulate a
	/// solver with native SOS/indicator support turned off.
	pub fn with_acceptance(mut self, kind: ConstraintKind, acc: Acceptance) -> Self {
		self.acceptance.insert(kind, acc);
		self
	}

	/// Variables pushed so far, in column order.
	pub fn variables(&self) -> &[VariableSpec] {
		&self.variables
	}

	/// Every row pushed natively, in push order.
	pub fn rows(&self) -> &[PushedRow] {
		&self.rows
	}

	/// The active linear objective, if one was set.
	pub fn linear_objective(&self) -> Option<&LinearObjective> {
		self.linear_objective.as_ref()
	}
}

impl ModelAPI for InMemoryModel {
	fn name(&self) -> &'static str {
		self.name
	}

	fn acceptance(&self, kind: ConstraintKind) -> Acceptance {
		self.acceptance.get(&kind).copied().unwrap_or(Acceptance::NotAccepted)
	}

	fn add_variables(&mut self, vars: &[VariableSpec]) -> Result<(), ConvertError> {
		self.variables.extend_from_slice(vars);
		Ok(())
	}

	fn set_linear_objective(&mut self, obj: &LinearObjective) -> Result<(), ConvertError> {
		self.linear_objective = Some(obj.clone());
		Ok(())
	}

	fn set_quadratic_objective(&mut self, obj: &QuadraticObjective) -> Result<(), ConvertError> {
		self.quadratic_objective = Some(obj.clone());
		Ok(())
	}

	fn add_linear(&mut self, c: &LinearConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Linear(c.clone()));
		Ok(())
	}

	fn add_quadratic(&mut self, c: &QuadraticConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Quadratic(c.clone()));
		Ok(())
	}

	fn add_linear_functional(&mut self, _c: &LinearFunctionalConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::LinearFunctional));
		Ok(())
	}

	fn add_quadratic_functional(&mut self, _c: &QuadraticFunctionalConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::QuadraticFunctional));
		Ok(())
	}

	fn add_extremum(&mut self, c: &ExtremumConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(match c.which {
			crate::kind::ExtremumKind::Max => ConstraintKind::Max,
			crate::kind::ExtremumKind::Min => ConstraintKind::Min,
		}));
		Ok(())
	}

	fn add_abs(&mut self, _c: &AbsConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::Abs));
		Ok(())
	}

	fn add_logical(&mut self, c: &LogicalConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(match c.op {
			crate::kind::LogicalOp::And => ConstraintKind::And,
			crate::kind::LogicalOp::Or => ConstraintKind::Or,
		}));
		Ok(())
	}

	fn add_not(&mut self, _c: &NotConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::Not));
		Ok(())
	}

	fn add_div(&mut self, _c: &DivConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::Div));
		Ok(())
	}

	fn add_if_then_else(&mut self, _c: &IfThenElseConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::IfThen));
		Ok(())
	}

	fn add_cond_linear(&mut self, _c: &CondLinConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::CondLinConEq));
		Ok(())
	}

	fn add_cond_quadratic(&mut self, _c: &CondQuadConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::CondQuadConEq));
		Ok(())
	}

	fn add_count(&mut self, _c: &CountConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::Count));
		Ok(())
	}

	fn add_numberof_const(&mut self, _c: &NumberofConstConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::NumberofConst));
		Ok(())
	}

	fn add_numberof_var(&mut self, _c: &NumberofVarConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::NumberofVar));
		Ok(())
	}

	fn add_alldiff(&mut self, _c: &AllDiffConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::AllDiff));
		Ok(())
	}

	fn add_elementary(&mut self, c: &ElementaryFnConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(match c.func {
			crate::kind::ElemFunc::Exp => ConstraintKind::Exp,
			crate::kind::ElemFunc::ExpA => ConstraintKind::ExpA,
			crate::kind::ElemFunc::Log => ConstraintKind::Log,
			crate::kind::ElemFunc::LogA => ConstraintKind::LogA,
			crate::kind::ElemFunc::Pow => ConstraintKind::Pow,
			crate::kind::ElemFunc::Sin => ConstraintKind::Sin,
			crate::kind::ElemFunc::Cos => ConstraintKind::Cos,
			crate::kind::ElemFunc::Tan => ConstraintKind::Tan,
		}));
		Ok(())
	}

	fn add_indicator(&mut self, c: &IndicatorConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Indicator(c.clone()));
		Ok(())
	}

	fn add_indicator_quad(&mut self, c: &IndicatorQuadConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::IndicatorQuad(c.clone()));
		Ok(())
	}

	fn add_sos(&mut self, c: &SosConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Sos(c.clone()));
		Ok(())
	}

	fn add_complementarity(&mut self, _c: &ComplementarityConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::ComplementarityLinear));
		Ok(())
	}

	fn add_pl(&mut self, _c: &PlConstraint) -> Result<(), ConvertError> {
		self.rows.push(PushedRow::Other(ConstraintKind::PiecewiseLinear));
		Ok(())
	}
}

/// A trivial [`Backend`] that never actually solves anything: it reports
/// [`Status::Solved`] and returns each variable's midpoint (or its lower
/// bound, if unbounded above) as the primal solution. Useful for exercising
/// the conversion-and-push path and the CLI's exit-code plumbing end to end
/// without a real solver SDK.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
	primal: Vec<Num>,
}

impl InMemoryBackend {
	/// Build a backend that will report `primal` as the solution.
	pub fn with_primal(primal: Vec<Num>) -> Self {
		Self { primal }
	}

	/// Derive a trivial feasible-looking point from `model`'s variable
	/// bounds (midpoint, or the lower bound if the upper bound is infinite,
	/// or zero if both are infinite).
	pub fn from_model(model: &InMemoryModel) -> Self {
		let primal = model
			.variables()
			.iter()
			.map(|v| match (v.lb.is_finite(), v.ub.is_finite()) {
				(true, true) => (v.lb + v.ub) / 2.0,
				(true, false) => v.lb,
				(false, true) => v.ub,
				(false, false) => 0.0,
			})
			.collect();
		Self { primal }
	}
}

impl Backend for InMemoryBackend {
	fn solve(&mut self, interrupter: &Interrupter) -> Result<Status, ConvertError> {
		if interrupter.is_triggered() {
			return Ok(Status::Interrupted);
		}
		Ok(Status::Solved)
	}

	fn solution(&self) -> Result<Solution, ConvertError> {
		Ok(Solution {
			primal: self.primal.clone(),
			duals: None,
			objective_value: 0.0,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_acceptance_only_covers_plain_algebraic_and_sos_and_indicator_rows() {
		let m = InMemoryModel::new("test");
		assert_eq!(m.acceptance(ConstraintKind::LinConLe), Acceptance::Recommended);
		assert_eq!(m.acceptance(ConstraintKind::Abs), Acceptance::NotAccepted);
		assert_eq!(m.acceptance(ConstraintKind::Sos1), Acceptance::Recommended);
	}

	#[test]
	fn acceptance_override_takes_effect() {
		let m = InMemoryModel::new("test").with_acceptance(ConstraintKind::Abs, Acceptance::Recommended);
		assert_eq!(m.acceptance(ConstraintKind::Abs), Acceptance::Recommended);
	}

	#[test]
	fn backend_reports_interrupted_when_the_flag_is_already_set() {
		let mut backend = InMemoryBackend::default();
		let interrupter = Interrupter::new();
		interrupter.trigger();
		assert_eq!(backend.solve(&interrupter).unwrap(), Status::Interrupted);
	}
}
