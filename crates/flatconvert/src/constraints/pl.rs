//! `PLConstraint`: `result = pwl(arg)`, a piecewise-linear function given by
//! a sequence of breakpoints.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId, VarType},
};

use super::linear::LinearConstraint;
use super::sos::SosConstraint;
use crate::kind::SosOrder;

#[derive(Debug, Clone, PartialEq)]
/// `result = pwl(arg)`, where `pwl` interpolates linearly between
/// `(breakpoints[i], values[i])` pairs, sorted by `breakpoints`.
pub struct PlConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The function's argument.
	pub arg: VarId,
	/// Breakpoint `x`-coordinates, strictly increasing.
	pub breakpoints: Vec<Num>,
	/// Breakpoint `y`-coordinates, `values[i] = pwl(breakpoints[i])`.
	pub values: Vec<Num>,
	context: Context,
}

impl PlConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, arg: VarId, breakpoints: Vec<Num>, values: Vec<Num>) -> Self {
		Self {
			result,
			arg,
			breakpoints,
			values,
			context: Context::None,
		}
	}
}

impl Constraint for PlConstraint {
	const KIND: ConstraintKind = ConstraintKind::PiecewiseLinear;

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
		Some(format!("pl:{:?}:{:?}:{:?}", self.arg, self.breakpoints, self.values))
	}
}

impl ConvertRule for PlConstraint {
	/// Redefine via the standard SOS2 lambda formulation: one weight `lam_k`
	/// per breakpoint, `sum(lam_k) = 1`, `arg = sum(lam_k * x_k)`, `result =
	/// sum(lam_k * y_k)`, and a [`SosConstraint`] of order 2 over the
	/// weights (at most two, consecutive, nonzero).
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_pl(self);
		}
		let n = self.breakpoints.len();
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();

		let mut lambdas = Vec::with_capacity(n);
		for _ in 0..n {
			lambdas.push(cvt.add_var(0.0, 1.0, VarType::Continuous)?);
		}
		cvt.add_constraint(LinearConstraint {
			vars: lambdas.clone(),
			coefs: vec![1.0; n],
			sense: RelSense::Eq,
			rhs: 1.0,
			rhs2: 0.0,
		})?;
		let mut arg_vars = lambdas.clone();
		arg_vars.push(self.arg);
		let mut arg_coefs = self.breakpoints.clone();
		arg_coefs.push(-1.0);
		cvt.add_constraint(LinearConstraint {
			vars: arg_vars,
			coefs: arg_coefs,
			sense: RelSense::Eq,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		let mut res_vars = lambdas.clone();
		res_vars.push(self.result);
		let mut res_coefs = self.values.clone();
		res_coefs.push(-1.0);
		cvt.add_constraint(LinearConstraint {
			vars: res_vars,
			coefs: res_coefs,
			sense: RelSense::Eq,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		cvt.add_constraint(SosConstraint::new(SosOrder::Sos2, lambdas, self.breakpoints.clone()))?;

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedup_key_ignores_the_result_variable() {
		let a = PlConstraint::new(VarId::from_raw(9), VarId::from_raw(0), vec![0.0, 1.0], vec![0.0, 1.0]);
		let b = PlConstraint::new(VarId::from_raw(8), VarId::from_raw(0), vec![0.0, 1.0], vec![0.0, 1.0]);
		assert_eq!(a.dedup_key(), b.dedup_key());
	}
}
