//! `Count`/`NumberofConst`/`NumberofVar`: counting constraints, all
//! ultimately redefined in terms of [`LinearConstraint`] and reified
//! equality ([`CondLinConstraint`]).

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{CmpOp, ConstraintKind, RelSense},
	var::{Num, VarId, VarType},
};

use super::cond::CondLinConstraint;
use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = sum(args)`, where each `args[i]` is itself a 0/1 variable (the
/// reified truth of some predicate).
pub struct CountConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The 0/1 variables being counted.
	pub args: Vec<VarId>,
	context: Context,
}

impl CountConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, args: Vec<VarId>) -> Self {
		Self { result, args, context: Context::None }
	}
}

impl Constraint for CountConstraint {
	const KIND: ConstraintKind = ConstraintKind::Count;

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
		Some(format!("count:{:?}", self.args))
	}
}

impl ConvertRule for CountConstraint {
	/// Redefine as a `LinConEQ` row: `result - sum(args) = 0`.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_count(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		let mut vars = self.args.clone();
		let mut coefs = vec![-1.0; self.args.len()];
		vars.push(self.result);
		coefs.push(1.0);
		cvt.add_constraint(LinearConstraint {
			vars,
			coefs,
			sense: RelSense::Eq,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// `result = count(vars[i] == value)`, for a fixed constant `value`.
pub struct NumberofConstConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The constant being counted against.
	pub value: Num,
	/// The variables inspected.
	pub vars: Vec<VarId>,
	context: Context,
}

impl NumberofConstConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, value: Num, vars: Vec<VarId>) -> Self {
		Self { result, value, vars, context: Context::None }
	}
}

impl Constraint for NumberofConstConstraint {
	const KIND: ConstraintKind = ConstraintKind::NumberofConst;

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
		Some(format!("numberofconst:{}:{:?}", self.value, self.vars))
	}
}

impl ConvertRule for NumberofConstConstraint {
	/// Per-variable reified equality `b_i <=> (vars[i] == value)`, then
	/// `result = sum(b_i)` via [`CountConstraint`].
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_numberof_const(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		let mut indicators = Vec::with_capacity(self.vars.len());
		for &v in &self.vars {
			let b = cvt.add_var(0.0, 1.0, VarType::Integer)?;
			cvt.add_constraint(CondLinConstraint::new(b, CmpOp::Eq, vec![v], vec![1.0], self.value))?;
			indicators.push(b);
		}
		cvt.add_constraint(CountConstraint::new(self.result, indicators))?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// `result = count(vars[i] == target)`, where `target` is itself a
/// variable.
pub struct NumberofVarConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The target variable being counted against.
	pub target: VarId,
	/// The variables inspected.
	pub vars: Vec<VarId>,
	context: Context,
}

impl NumberofVarConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, target: VarId, vars: Vec<VarId>) -> Self {
		Self { result, target, vars, context: Context::None }
	}
}

impl Constraint for NumberofVarConstraint {
	const KIND: ConstraintKind = ConstraintKind::NumberofVar;

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
		Some(format!("numberofvar:{:?}:{:?}", self.target, self.vars))
	}
}

impl ConvertRule for NumberofVarConstraint {
	/// Per-variable reified equality `b_i <=> (vars[i] - target == 0)`, then
	/// `result = sum(b_i)`.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_numberof_var(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		let mut indicators = Vec::with_capacity(self.vars.len());
		for &v in &self.vars {
			let b = cvt.add_var(0.0, 1.0, VarType::Integer)?;
			cvt.add_constraint(CondLinConstraint::new(b, CmpOp::Eq, vec![v, self.target], vec![1.0, -1.0], 0.0))?;
			indicators.push(b);
		}
		cvt.add_constraint(CountConstraint::new(self.result, indicators))?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn count_dedup_key_ignores_the_result_variable() {
		let a = CountConstraint::new(VarId::from_raw(5), vec![VarId::from_raw(0), VarId::from_raw(1)]);
		let b = CountConstraint::new(VarId::from_raw(6), vec![VarId::from_raw(0), VarId::from_raw(1)]);
		assert_eq!(a.dedup_key(), b.dedup_key());
	}

	#[test]
	fn numberof_const_and_var_have_distinct_keys() {
		let c = NumberofConstConstraint::new(VarId::from_raw(3), 2.0, vec![VarId::from_raw(0)]);
		let v = NumberofVarConstraint::new(VarId::from_raw(3), VarId::from_raw(1), vec![VarId::from_raw(0)]);
		assert_ne!(c.dedup_key(), v.dedup_key());
	}
}
