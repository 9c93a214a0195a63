//! `AllDiff`: a structural constraint (no result variable) requiring every
//! listed variable to take a pairwise distinct value.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::VarId,
};

use itertools::Itertools;

use super::cond::CondLinConstraint;
use super::linear::LinearConstraint;
use crate::kind::CmpOp;

#[derive(Debug, Clone, PartialEq)]
/// All of `vars` take pairwise distinct values.
pub struct AllDiffConstraint {
	/// The variables required to be pairwise distinct.
	pub vars: Vec<VarId>,
	context: Context,
}

impl AllDiffConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(vars: Vec<VarId>) -> Self {
		Self { vars, context: Context::None }
	}
}

impl Constraint for AllDiffConstraint {
	const KIND: ConstraintKind = ConstraintKind::AllDiff;

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}
}

impl ConvertRule for AllDiffConstraint {
	/// Redefine via pairwise disequality: for each pair `(i, j)` introduce a
	/// Boolean `lt_ij <=> (vars[i] < vars[j])`, then force exactly one of
	/// `vars[i] < vars[j]` or `vars[j] < vars[i]` to hold.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_alldiff(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		for (&vi, &vj) in self.vars.iter().tuple_combinations() {
			let lt = cvt.add_var(0.0, 1.0, crate::var::VarType::Integer)?;
			cvt.add_constraint(CondLinConstraint::new(lt, CmpOp::Lt, vec![vi, vj], vec![1.0, -1.0], 0.0))?;
			let gt = cvt.add_var(0.0, 1.0, crate::var::VarType::Integer)?;
			cvt.add_constraint(CondLinConstraint::new(gt, CmpOp::Gt, vec![vi, vj], vec![1.0, -1.0], 0.0))?;
			cvt.add_constraint(LinearConstraint {
				vars: vec![lt, gt],
				coefs: vec![1.0, 1.0],
				sense: RelSense::Eq,
				rhs: 1.0,
				rhs2: 0.0,
			})?;
		}
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn structural_constraint_has_no_result_variable() {
		let c = AllDiffConstraint::new(vec![VarId::from_raw(0), VarId::from_raw(1)]);
		assert_eq!(c.result_var(), None);
	}
}
