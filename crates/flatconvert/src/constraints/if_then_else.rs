//! `IfThen`: `result = cond ? then_val : else_val` for a 0/1 `cond`.

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::VarId,
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = if cond then then_val else else_val`.
pub struct IfThenElseConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The 0/1-valued condition.
	pub cond: VarId,
	/// Value taken when `cond = 1`.
	pub then_val: VarId,
	/// Value taken when `cond = 0`.
	pub else_val: VarId,
	context: Context,
}

impl IfThenElseConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, cond: VarId, then_val: VarId, else_val: VarId) -> Self {
		Self { result, cond, then_val, else_val, context: Context::None }
	}
}

impl Constraint for IfThenElseConstraint {
	const KIND: ConstraintKind = ConstraintKind::IfThen;

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
		Some(format!("ifthen:{:?}:{:?}:{:?}", self.cond, self.then_val, self.else_val))
	}
}

impl ConvertRule for IfThenElseConstraint {
	/// Big-M in both directions: `result <= then_val + M1*(1-cond)`,
	/// `result >= then_val - M1*(1-cond)`, and the mirror pair gated on
	/// `cond = 0` for `else_val`.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_if_then_else(self);
		}

		let then_b = Interval::new(cvt.model().var(self.then_val).lb(), cvt.model().var(self.then_val).ub());
		let else_b = Interval::new(cvt.model().var(self.else_val).lb(), cvt.model().var(self.else_val).ub());
		let result_b = Interval::new(then_b.lo.min(else_b.lo), then_b.hi.max(else_b.hi));
		if !result_b.is_finite() {
			return Err(ConvertError::UnboundedBigM { var: self.result });
		}
		let m_then = result_b.hi - then_b.lo + (then_b.hi - result_b.lo);
		let m_else = result_b.hi - else_b.lo + (else_b.hi - result_b.lo);

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		cvt.tighten_lb(self.result, result_b.lo)?;
		cvt.tighten_ub(self.result, result_b.hi)?;

		// cond = 1 => result == then_val.
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.then_val, self.cond],
			coefs: vec![1.0, -1.0, m_then],
			sense: RelSense::Le,
			rhs: m_then,
			rhs2: 0.0,
		})?;
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.then_val, self.cond],
			coefs: vec![1.0, -1.0, -m_then],
			sense: RelSense::Ge,
			rhs: -m_then,
			rhs2: 0.0,
		})?;
		// cond = 0 => result == else_val.
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.else_val, self.cond],
			coefs: vec![1.0, -1.0, -m_else],
			sense: RelSense::Le,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.else_val, self.cond],
			coefs: vec![1.0, -1.0, m_else],
			sense: RelSense::Ge,
			rhs: 0.0,
			rhs2: 0.0,
		})?;

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}
