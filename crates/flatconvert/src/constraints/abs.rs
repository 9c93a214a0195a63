//! `AbsConstraint`: `result = |arg|`.

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{VarId, VarType},
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = |arg|`.
pub struct AbsConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The argument.
	pub arg: VarId,
	context: Context,
}

impl AbsConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, arg: VarId) -> Self {
		Self { result, arg, context: Context::None }
	}
}

impl Constraint for AbsConstraint {
	const KIND: ConstraintKind = ConstraintKind::Abs;

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
		Some(format!("abs:{:?}", self.arg))
	}
}

impl ConvertRule for AbsConstraint {
	/// Redefine via a sign-choice binary `b`: `result >= arg`, `result >=
	/// -arg`, and a big-M pair forcing equality on the branch `b` selects.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_abs(self);
		}

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();

		let arg_b = Interval::new(cvt.model().var(self.arg).lb(), cvt.model().var(self.arg).ub());
		let result_b = Interval::of_abs(arg_b);
		cvt.tighten_lb(self.result, result_b.lo)?;
		cvt.tighten_ub(self.result, result_b.hi)?;

		if arg_b.lo >= 0.0 {
			// Always nonnegative: result == arg.
			cvt.add_constraint(LinearConstraint {
				vars: vec![self.result, self.arg],
				coefs: vec![1.0, -1.0],
				sense: RelSense::Eq,
				rhs: 0.0,
				rhs2: 0.0,
			})?;
			cvt.close_scope(source, crate::presolve::Aggregator::First);
			return Ok(());
		}
		if arg_b.hi <= 0.0 {
			// Always nonpositive: result == -arg.
			cvt.add_constraint(LinearConstraint {
				vars: vec![self.result, self.arg],
				coefs: vec![1.0, 1.0],
				sense: RelSense::Eq,
				rhs: 0.0,
				rhs2: 0.0,
			})?;
			cvt.close_scope(source, crate::presolve::Aggregator::First);
			return Ok(());
		}

		let m = arg_b.hi.max(-arg_b.lo);
		if !m.is_finite() {
			return Err(ConvertError::UnboundedBigM { var: self.arg });
		}
		let b = cvt.add_var(0.0, 1.0, VarType::Integer)?;
		// result >= arg, result >= -arg (always true).
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.arg],
			coefs: vec![1.0, -1.0],
			sense: RelSense::Ge,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.arg],
			coefs: vec![1.0, 1.0],
			sense: RelSense::Ge,
			rhs: 0.0,
			rhs2: 0.0,
		})?;
		// b = 1 => result <= arg + M*(1-b) is vacuous when b = 0.
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.arg, b],
			coefs: vec![1.0, -1.0, m],
			sense: RelSense::Le,
			rhs: m,
			rhs2: 0.0,
		})?;
		// b = 0 => result <= -arg + M*b.
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.arg, b],
			coefs: vec![1.0, 1.0, -m],
			sense: RelSense::Le,
			rhs: 0.0,
			rhs2: 0.0,
		})?;

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedup_key_only_depends_on_the_argument() {
		let a = AbsConstraint::new(VarId::from_raw(5), VarId::from_raw(0));
		let b = AbsConstraint::new(VarId::from_raw(6), VarId::from_raw(0));
		assert_eq!(a.dedup_key(), b.dedup_key());
	}
}
