//! `LinearFunctionalConstraint`/`QuadraticFunctionalConstraint`: `result =
//! expr`, the building block most other functional rewrites bottom out in.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId},
};

use super::linear::LinearConstraint;
use super::quadratic::QuadraticConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = sum(coefs[i] * vars[i]) + constant`.
pub struct LinearFunctionalConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// Argument variables.
	pub vars: Vec<VarId>,
	/// Their coefficients.
	pub coefs: Vec<Num>,
	/// Additive constant.
	pub constant: Num,
	context: Context,
}

impl LinearFunctionalConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, vars: Vec<VarId>, coefs: Vec<Num>, constant: Num) -> Self {
		Self {
			result,
			vars,
			coefs,
			constant,
			context: Context::None,
		}
	}
}

impl Constraint for LinearFunctionalConstraint {
	const KIND: ConstraintKind = ConstraintKind::LinearFunctional;

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
		Some(format!("linfunc:{:?}:{:?}:{}", self.vars, self.coefs, self.constant))
	}
}

impl ConvertRule for LinearFunctionalConstraint {
	/// If not accepted natively, redefine as `result - expr = 0` (a
	/// `LinConEQ` row), linked by a copy link.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_linear_functional(self);
		}
		let source = crate::presolve::NodeRange::single(
			crate::presolve::ValueFamily::Con(Self::KIND),
			idx,
		);
		cvt.open_scope();
		let mut vars = self.vars.clone();
		let mut coefs: Vec<Num> = self.coefs.iter().map(|c| -c).collect();
		vars.push(self.result);
		coefs.push(1.0);
		cvt.add_constraint(LinearConstraint {
			vars,
			coefs,
			sense: RelSense::Eq,
			rhs: self.constant,
			rhs2: 0.0,
		})?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// `result = linear + sum(quad_coefs[k] * quad_i[k] * quad_j[k]) + constant`.
pub struct QuadraticFunctionalConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// Linear part.
	pub linear: Vec<(VarId, Num)>,
	/// First variable of each quadratic term.
	pub quad_i: Vec<VarId>,
	/// Second variable of each quadratic term.
	pub quad_j: Vec<VarId>,
	/// Coefficient of each quadratic term.
	pub quad_coefs: Vec<Num>,
	/// Additive constant.
	pub constant: Num,
	context: Context,
}

impl QuadraticFunctionalConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, linear: Vec<(VarId, Num)>, quad_i: Vec<VarId>, quad_j: Vec<VarId>, quad_coefs: Vec<Num>, constant: Num) -> Self {
		Self {
			result,
			linear,
			quad_i,
			quad_j,
			quad_coefs,
			constant,
			context: Context::None,
		}
	}
}

impl Constraint for QuadraticFunctionalConstraint {
	const KIND: ConstraintKind = ConstraintKind::QuadraticFunctional;

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
		Some(format!(
			"quadfunc:{:?}:{:?}:{:?}:{:?}:{}",
			self.linear, self.quad_i, self.quad_j, self.quad_coefs, self.constant
		))
	}
}

impl ConvertRule for QuadraticFunctionalConstraint {
	/// Same idea as [`LinearFunctionalConstraint::convert`] but targeting a
	/// `QuadConEQ` row.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_quadratic_functional(self);
		}
		let source = crate::presolve::NodeRange::single(
			crate::presolve::ValueFamily::Con(Self::KIND),
			idx,
		);
		cvt.open_scope();
		let mut linear: Vec<(VarId, Num)> = self.linear.iter().map(|&(v, c)| (v, -c)).collect();
		linear.push((self.result, 1.0));
		cvt.add_constraint(QuadraticConstraint {
			linear,
			quad_i: self.quad_i.clone(),
			quad_j: self.quad_j.clone(),
			quad_coefs: self.quad_coefs.iter().map(|c| -c).collect(),
			sense: RelSense::Eq,
			rhs: self.constant,
			rhs2: 0.0,
		})?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::var::VarId;

	#[test]
	fn dedup_key_is_stable_for_identical_expressions() {
		let a = LinearFunctionalConstraint::new(VarId::from_raw(2), vec![VarId::from_raw(0)], vec![1.0], 0.0);
		let b = LinearFunctionalConstraint::new(VarId::from_raw(3), vec![VarId::from_raw(0)], vec![1.0], 0.0);
		assert_eq!(a.dedup_key(), b.dedup_key());
	}
}
