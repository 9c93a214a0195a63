//! [`ModelAPI`]: the abstract contract a solver binding implements so that
//! [`crate::FlatConverter`] can push a fully converted model to it without
//! knowing anything about that solver's native SDK.

use crate::{
	constraints::{
		abs::AbsConstraint, alldiff::AllDiffConstraint, complementarity::ComplementarityConstraint,
		cond::{CondLinConstraint, CondQuadConstraint}, count::{CountConstraint, NumberofConstConstraint, NumberofVarConstraint},
		div::DivConstraint, elementary::ElementaryFnConstraint, extremum::ExtremumConstraint,
		functional::{LinearFunctionalConstraint, QuadraticFunctionalConstraint}, if_then_else::IfThenElseConstraint,
		indicator::{IndicatorConstraint, IndicatorQuadConstraint}, linear::LinearConstraint, logical::{LogicalConstraint, NotConstraint},
		pl::PlConstraint, quadratic::QuadraticConstraint, sos::SosConstraint,
	},
	error::ConvertError,
	kind::{Acceptance, ConstraintKind},
	var::{Num, VarId, VarType},
};

#[derive(Debug, Clone, Copy)]
/// A single variable to be added to the target model.
pub struct VariableSpec {
	/// Lower bound.
	pub lb: Num,
	/// Upper bound.
	pub ub: Num,
	/// Continuous or integer.
	pub var_type: VarType,
}

#[derive(Debug, Clone)]
/// A linear (or affine) objective row.
pub struct LinearObjective {
	/// Which objective this is, for models with more than one row.
	pub iobj: usize,
	/// `true` to maximize, `false` to minimize.
	pub maximize: bool,
	/// `(variable, coefficient)` pairs.
	pub terms: Vec<(VarId, Num)>,
	/// Additive constant.
	pub constant: Num,
}

#[derive(Debug, Clone)]
/// A quadratic objective row.
pub struct QuadraticObjective {
	/// Which objective this is.
	pub iobj: usize,
	/// `true` to maximize, `false` to minimize.
	pub maximize: bool,
	/// Linear part.
	pub linear: Vec<(VarId, Num)>,
	/// Quadratic part as `(i, j, coefficient)` for `coefficient * x_i * x_j`.
	pub quadratic: Vec<(VarId, VarId, Num)>,
	/// Additive constant.
	pub constant: Num,
}

/// The contract between [`crate::FlatConverter`] and a solver binding.
///
/// Every method mirrors one operation from the specification's ModelAPI
/// contract (§4.6): [`ModelAPI::acceptance`] is `Acceptance(C)`,
/// [`ModelAPI::infinity`] is `Infinity`, the `add_*` methods are
/// `AddConstraint(C)` specialized per concrete type, and
/// [`ModelAPI::init_phase`]/[`ModelAPI::finish_phase`] bracket
/// `InitProblemModificationPhase`/`FinishProblemModificationPhase`.
///
/// This is a plain (non-generic) trait rather than a compile-time-generic
/// parameter of [`crate::FlatConverter`]: with close to twenty concrete
/// constraint types, monomorphizing the converter over every solver binding
/// buys nothing a `Box<dyn ModelAPI>` doesn't already give for free, and the
/// specification itself calls `ModelAPI` "abstract".
pub trait ModelAPI {
	/// Name used in diagnostics (`ConvertError::ConstraintConversionFailure`).
	fn name(&self) -> &'static str;

	/// The solver's declared acceptance level for `kind`.
	fn acceptance(&self, kind: ConstraintKind) -> Acceptance;

	/// The value this solver uses to represent `+infinity`.
	fn infinity(&self) -> Num {
		Num::INFINITY
	}

	/// Begin a batch of model-building calls.
	fn init_phase(&mut self) -> Result<(), ConvertError> {
		Ok(())
	}

	/// End a batch of model-building calls; solvers that need to flush
	/// buffered rows do so here.
	fn finish_phase(&mut self) -> Result<(), ConvertError> {
		Ok(())
	}

	/// Add newly created variables, in order; the solver is expected to
	/// assign them column indices matching that order.
	fn add_variables(&mut self, vars: &[VariableSpec]) -> Result<(), ConvertError>;

	/// Set a linear objective row.
	fn set_linear_objective(&mut self, obj: &LinearObjective) -> Result<(), ConvertError>;

	/// Set a quadratic objective row.
	fn set_quadratic_objective(&mut self, obj: &QuadraticObjective) -> Result<(), ConvertError>;

	/// `AddConstraint(LinearConstraint)`.
	fn add_linear(&mut self, c: &LinearConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(QuadraticConstraint)`.
	fn add_quadratic(&mut self, c: &QuadraticConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(LinearFunctionalConstraint)`.
	fn add_linear_functional(&mut self, c: &LinearFunctionalConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(QuadraticFunctionalConstraint)`.
	fn add_quadratic_functional(&mut self, c: &QuadraticFunctionalConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(MaxConstraint | MinConstraint)`.
	fn add_extremum(&mut self, c: &ExtremumConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(AbsConstraint)`.
	fn add_abs(&mut self, c: &AbsConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(AndConstraint | OrConstraint)`.
	fn add_logical(&mut self, c: &LogicalConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(NotConstraint)`.
	fn add_not(&mut self, c: &NotConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(Div)`.
	fn add_div(&mut self, c: &DivConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(IfThen)`.
	fn add_if_then_else(&mut self, c: &IfThenElseConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(CondLinCon{EQ,LE,LT,GE,GT})`.
	fn add_cond_linear(&mut self, c: &CondLinConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(CondQuadCon{EQ,LE,LT,GE,GT})`.
	fn add_cond_quadratic(&mut self, c: &CondQuadConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(Count)`.
	fn add_count(&mut self, c: &CountConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(NumberofConst)`.
	fn add_numberof_const(&mut self, c: &NumberofConstConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(NumberofVar)`.
	fn add_numberof_var(&mut self, c: &NumberofVarConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(AllDiff)`.
	fn add_alldiff(&mut self, c: &AllDiffConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(Exp | ExpA | Log | LogA | Pow | Sin | Cos | Tan)`.
	fn add_elementary(&mut self, c: &ElementaryFnConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(IndicatorConstraintLin{LE,EQ,GE})`.
	fn add_indicator(&mut self, c: &IndicatorConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(IndicatorConstraintQuad{LE,EQ,GE})`.
	fn add_indicator_quad(&mut self, c: &IndicatorQuadConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(SOS1 | SOS2)`.
	fn add_sos(&mut self, c: &SosConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(ComplementarityLinear | ComplementarityQuadratic)`.
	fn add_complementarity(&mut self, c: &ComplementarityConstraint) -> Result<(), ConvertError>;
	/// `AddConstraint(PLConstraint)`.
	fn add_pl(&mut self, c: &PlConstraint) -> Result<(), ConvertError>;
}
