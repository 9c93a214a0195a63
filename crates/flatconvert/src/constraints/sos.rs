//! `SOS1`/`SOS2`: special-ordered sets, rewritten to plain MIP via binary
//! activation variables when the solver does not accept SOS rows natively.

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense, SosOrder},
	var::{Num, VarId, VarType},
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// At most one (SOS1), or at most two consecutive-by-`weights` (SOS2),
/// members of `vars` may be nonzero.
pub struct SosConstraint {
	/// Order of the set.
	pub order: SosOrder,
	/// The member variables, in weight order.
	pub vars: Vec<VarId>,
	/// Weights defining "consecutive" for SOS2; ignored for SOS1.
	pub weights: Vec<Num>,
	context: Context,
}

impl SosConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(order: SosOrder, vars: Vec<VarId>, weights: Vec<Num>) -> Self {
		Self { order, vars, weights, context: Context::None }
	}

	fn kind(&self) -> ConstraintKind {
		match self.order {
			SosOrder::Sos1 => ConstraintKind::Sos1,
			SosOrder::Sos2 => ConstraintKind::Sos2,
		}
	}
}

impl Constraint for SosConstraint {
	const KIND: ConstraintKind = ConstraintKind::Sos1;

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}

	fn dedup_key(&self) -> Option<String> {
		Some(format!("sos:{:?}:{:?}:{:?}", self.order, self.vars, self.weights))
	}
}

impl ConvertRule for SosConstraint {
	/// One binary `b_i` per member, `b_i = 1` allowing `vars[i]` to be
	/// nonzero (big-M): `-M*b_i <= vars[i] <= M*b_i`. For SOS1, `sum(b_i) <=
	/// 1`; for SOS2, `sum(b_i) <= 2` plus a pairwise rule forbidding any two
	/// active indices more than one apart in weight order.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_sos(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();

		let n = self.vars.len();
		let mut indicators = Vec::with_capacity(n);
		for &v in &self.vars {
			let bnd = Interval::new(cvt.model().var(v).lb(), cvt.model().var(v).ub());
			let m = bnd.lo.abs().max(bnd.hi.abs());
			if !m.is_finite() {
				return Err(ConvertError::UnboundedBigM { var: v });
			}
			let b = cvt.add_var(0.0, 1.0, VarType::Integer)?;
			cvt.add_constraint(LinearConstraint {
				vars: vec![v, b],
				coefs: vec![1.0, -m],
				sense: RelSense::Le,
				rhs: 0.0,
				rhs2: 0.0,
			})?;
			cvt.add_constraint(LinearConstraint {
				vars: vec![v, b],
				coefs: vec![1.0, m],
				sense: RelSense::Ge,
				rhs: 0.0,
				rhs2: 0.0,
			})?;
			indicators.push(b);
		}

		let cap = match self.order {
			SosOrder::Sos1 => 1.0,
			SosOrder::Sos2 => 2.0,
		};
		cvt.add_constraint(LinearConstraint {
			vars: indicators.clone(),
			coefs: vec![1.0; n],
			sense: RelSense::Le,
			rhs: cap,
			rhs2: 0.0,
		})?;
		if matches!(self.order, SosOrder::Sos2) {
			for i in 0..n {
				for j in (i + 2)..n {
					cvt.add_constraint(LinearConstraint {
						vars: vec![indicators[i], indicators[j]],
						coefs: vec![1.0, 1.0],
						sense: RelSense::Le,
						rhs: 1.0,
						rhs2: 0.0,
					})?;
				}
			}
		}

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sos1_and_sos2_over_the_same_vars_have_distinct_keys() {
		let a = SosConstraint::new(SosOrder::Sos1, vec![VarId::from_raw(0), VarId::from_raw(1)], vec![0.0, 1.0]);
		let b = SosConstraint::new(SosOrder::Sos2, vec![VarId::from_raw(0), VarId::from_raw(1)], vec![0.0, 1.0]);
		assert_ne!(a.dedup_key(), b.dedup_key());
	}
}
