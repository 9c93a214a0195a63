//! Shared test scaffolding: a recording [`ModelAPI`] that keeps a full copy
//! of every row pushed to it (unlike `flatconvert::testkit::InMemoryModel`,
//! which only remembers the kind for non-native rows), so a test can assert
//! on the exact coefficients a conversion rule emitted.

use std::collections::HashMap;

use flatconvert::{
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
	kind::{Acceptance, ConstraintKind},
	model_api::{LinearObjective, ModelAPI, QuadraticObjective, VariableSpec},
	ConvertError,
};

/// A [`ModelAPI`] whose acceptance table is set per test (everything
/// defaults to [`Acceptance::NotAccepted`]) and which records every pushed
/// row verbatim.
#[derive(Debug, Default)]
pub struct RecordingModel {
	acceptance: HashMap<ConstraintKind, Acceptance>,
	pub variables: Vec<VariableSpec>,
	pub linear_objective: Option<LinearObjective>,
	pub linear_rows: Vec<LinearConstraint>,
	pub quadratic_rows: Vec<QuadraticConstraint>,
	pub sos_rows: Vec<SosConstraint>,
	pub indicator_rows: Vec<IndicatorConstraint>,
	pub pl_rows: Vec<PlConstraint>,
	pub alldiff_rows: Vec<AllDiffConstraint>,
}

impl RecordingModel {
	/// A model that accepts nothing natively until told otherwise.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare `kind` as [`Acceptance::Recommended`] (accepted natively).
	pub fn accept(mut self, kind: ConstraintKind) -> Self {
		self.acceptance.insert(kind, Acceptance::Recommended);
		self
	}
}

impl ModelAPI for RecordingModel {
	fn name(&self) -> &'static str {
		"recording-test-model"
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

	fn set_quadratic_objective(&mut self, _obj: &QuadraticObjective) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_linear(&mut self, c: &LinearConstraint) -> Result<(), ConvertError> {
		self.linear_rows.push(c.clone());
		Ok(())
	}

	fn add_quadratic(&mut self, c: &QuadraticConstraint) -> Result<(), ConvertError> {
		self.quadratic_rows.push(c.clone());
		Ok(())
	}

	fn add_linear_functional(&mut self, _c: &LinearFunctionalConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_quadratic_functional(&mut self, _c: &QuadraticFunctionalConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_extremum(&mut self, _c: &ExtremumConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_abs(&mut self, _c: &AbsConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_logical(&mut self, _c: &LogicalConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_not(&mut self, _c: &NotConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_div(&mut self, _c: &DivConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_if_then_else(&mut self, _c: &IfThenElseConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_cond_linear(&mut self, _c: &CondLinConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_cond_quadratic(&mut self, _c: &CondQuadConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_count(&mut self, _c: &CountConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_numberof_const(&mut self, _c: &NumberofConstConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_numberof_var(&mut self, _c: &NumberofVarConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_alldiff(&mut self, c: &AllDiffConstraint) -> Result<(), ConvertError> {
		self.alldiff_rows.push(c.clone());
		Ok(())
	}

	fn add_elementary(&mut self, _c: &ElementaryFnConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_indicator(&mut self, c: &IndicatorConstraint) -> Result<(), ConvertError> {
		self.indicator_rows.push(c.clone());
		Ok(())
	}

	fn add_indicator_quad(&mut self, _c: &IndicatorQuadConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_sos(&mut self, c: &SosConstraint) -> Result<(), ConvertError> {
		self.sos_rows.push(c.clone());
		Ok(())
	}

	fn add_complementarity(&mut self, _c: &ComplementarityConstraint) -> Result<(), ConvertError> {
		Ok(())
	}

	fn add_pl(&mut self, c: &PlConstraint) -> Result<(), ConvertError> {
		self.pl_rows.push(c.clone());
		Ok(())
	}
}
