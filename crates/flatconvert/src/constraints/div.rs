//! `Div`: `result = numer / denom`, where `denom` is a variable whose domain
//! is known not to straddle zero.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::ConstraintKind,
	var::VarId,
};

use super::functional::QuadraticFunctionalConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = numer / denom`.
pub struct DivConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// Numerator.
	pub numer: VarId,
	/// Denominator; the redefinition rule requires its domain to exclude 0.
	pub denom: VarId,
	context: Context,
}

impl DivConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, numer: VarId, denom: VarId) -> Self {
		Self { result, numer, denom, context: Context::None }
	}
}

impl Constraint for DivConstraint {
	const KIND: ConstraintKind = ConstraintKind::Div;

	fn result_var(&self) -> Option<VarId> {
		Some(self.result)
	}

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}

	fn dedup_key(&self) -> Option<String> {
		Some(format!("div:{:?}:{:?}", self.numer, self.denom))
	}
}

impl ConvertRule for DivConstraint {
	/// Redefine as the equivalent quadratic functional `numer = result *
	/// denom`, i.e. `result * denom - numer = 0`.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_div(self);
		}
		let denom_b = (cvt.model().var(self.denom).lb(), cvt.model().var(self.denom).ub());
		if denom_b.0 <= 0.0 && denom_b.1 >= 0.0 {
			return Err(ConvertError::InfeasibleDomain {
				var: self.denom,
				lb: denom_b.0,
				ub: denom_b.1,
			});
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		cvt.add_constraint(QuadraticFunctionalConstraint::new(
			self.numer,
			vec![],
			vec![self.result],
			vec![self.denom],
			vec![1.0],
			0.0,
		))?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}
