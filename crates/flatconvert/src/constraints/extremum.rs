//! `MaxConstraint`/`MinConstraint`: `result = max(args)` or `min(args)`,
//! redefined via a big-M disjunction when not accepted natively.

use itertools::izip;

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, ExtremumKind, RelSense},
	var::{VarId, VarType},
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = max(args)` (or `min`, per `which`).
pub struct ExtremumConstraint {
	/// Which extremum this computes.
	pub which: ExtremumKind,
	/// The variable this expression defines.
	pub result: VarId,
	/// Argument variables, at least one.
	pub args: Vec<VarId>,
	context: Context,
}

impl ExtremumConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(which: ExtremumKind, result: VarId, args: Vec<VarId>) -> Self {
		Self { which, result, args, context: Context::None }
	}

	fn kind(&self) -> ConstraintKind {
		match self.which {
			ExtremumKind::Max => ConstraintKind::Max,
			ExtremumKind::Min => ConstraintKind::Min,
		}
	}
}

impl Constraint for ExtremumConstraint {
	const KIND: ConstraintKind = ConstraintKind::Max;

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
		Some(format!("extremum:{:?}:{:?}", self.which, self.args))
	}
}

impl ConvertRule for ExtremumConstraint {
	/// Redefine via a choice of binary indicators `b_i`, `sum(b_i) = 1`,
	/// a one-sided bound `result <sense> arg_i` that holds unconditionally,
	/// and a big-M bound that only binds when `b_i = 1` (the chosen
	/// argument realizes the extremum).
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_extremum(self);
		}

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();

		let arg_bounds: Vec<Interval> = self
			.args
			.iter()
			.map(|&v| Interval::new(cvt.model().var(v).lb(), cvt.model().var(v).ub()))
			.collect();
		let result_bounds = match self.which {
			ExtremumKind::Max => Interval::of_max(&arg_bounds),
			ExtremumKind::Min => Interval::of_min(&arg_bounds),
		};
		cvt.tighten_lb(self.result, result_bounds.lo)?;
		cvt.tighten_ub(self.result, result_bounds.hi)?;

		let mut indicators = Vec::with_capacity(self.args.len());
		for _ in &self.args {
			indicators.push(cvt.add_var(0.0, 1.0, VarType::Integer)?);
		}
		cvt.add_constraint(LinearConstraint {
			vars: indicators.clone(),
			coefs: vec![1.0; indicators.len()],
			sense: RelSense::Eq,
			rhs: 1.0,
			rhs2: 0.0,
		})?;

		for (&arg, &arg_b, &indicator) in izip!(&self.args, &arg_bounds, &indicators) {
			// result relates to arg_i unconditionally in the "always at
			// least as extreme" direction.
			let (sense, m) = match self.which {
				ExtremumKind::Max => (RelSense::Ge, result_bounds.hi - arg_b.lo),
				ExtremumKind::Min => (RelSense::Le, arg_b.hi - result_bounds.lo),
			};
			cvt.add_constraint(LinearConstraint {
				vars: vec![self.result, arg],
				coefs: vec![1.0, -1.0],
				sense,
				rhs: 0.0,
				rhs2: 0.0,
			})?;
			if !m.is_finite() {
				return Err(ConvertError::UnboundedBigM { var: arg });
			}
			// big-M: when b_i = 1, result == arg_i (tight in the opposite
			// direction too); when b_i = 0, the constraint is vacuous.
			let (tight_sense, sign) = match self.which {
				ExtremumKind::Max => (RelSense::Le, 1.0),
				ExtremumKind::Min => (RelSense::Ge, -1.0),
			};
			cvt.add_constraint(LinearConstraint {
				vars: vec![self.result, arg, indicator],
				coefs: vec![sign, -sign, sign * m],
				sense: tight_sense,
				rhs: sign * m,
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
	fn dedup_key_distinguishes_max_from_min_over_the_same_args() {
		let max = ExtremumConstraint::new(ExtremumKind::Max, VarId::from_raw(9), vec![VarId::from_raw(0), VarId::from_raw(1)]);
		let min = ExtremumConstraint::new(ExtremumKind::Min, VarId::from_raw(9), vec![VarId::from_raw(0), VarId::from_raw(1)]);
		assert_ne!(max.dedup_key(), min.dedup_key());
	}
}
