//! `Exp`/`ExpA`/`Log`/`LogA`/`Pow`/`Sin`/`Cos`/`Tan`: elementary nonlinear
//! univariate functions, parameterized by [`ElemFunc`].

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, ElemFunc},
	var::{Num, VarId},
};

use super::pl::PlConstraint;

/// Number of piecewise-linear segments used to approximate a function not
/// natively accepted by the target solver. A real driver would expose this
/// via an option; a fixed value keeps the redefinition rule deterministic.
const PWL_SEGMENTS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
/// `result = f(arg)`, for one of the elementary functions in [`ElemFunc`].
/// `param` holds the base (`ExpA`/`LogA`) or exponent (`Pow`); unused for
/// the others.
pub struct ElementaryFnConstraint {
	/// Which function.
	pub func: ElemFunc,
	/// The variable this expression defines.
	pub result: VarId,
	/// The function's argument.
	pub arg: VarId,
	/// Base or exponent parameter, meaningful only for `ExpA`/`LogA`/`Pow`.
	pub param: Num,
	context: Context,
}

impl ElementaryFnConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(func: ElemFunc, result: VarId, arg: VarId, param: Num) -> Self {
		Self { func, result, arg, param, context: Context::None }
	}

	fn kind(&self) -> ConstraintKind {
		match self.func {
			ElemFunc::Exp => ConstraintKind::Exp,
			ElemFunc::ExpA => ConstraintKind::ExpA,
			ElemFunc::Log => ConstraintKind::Log,
			ElemFunc::LogA => ConstraintKind::LogA,
			ElemFunc::Pow => ConstraintKind::Pow,
			ElemFunc::Sin => ConstraintKind::Sin,
			ElemFunc::Cos => ConstraintKind::Cos,
			ElemFunc::Tan => ConstraintKind::Tan,
		}
	}

	fn eval(&self, x: Num) -> Num {
		match self.func {
			ElemFunc::Exp => x.exp(),
			ElemFunc::ExpA => self.param.powf(x),
			ElemFunc::Log => x.ln(),
			ElemFunc::LogA => x.log(self.param),
			ElemFunc::Pow => x.powf(self.param),
			ElemFunc::Sin => x.sin(),
			ElemFunc::Cos => x.cos(),
			ElemFunc::Tan => x.tan(),
		}
	}

	/// Bounds on `result` given `arg`'s current bounds. Only `Exp` has a
	/// closed-form [`Interval`] helper; the rest fall back to sampling the
	/// function at its endpoints, which is exact for every monotone case
	/// here (`Log`, `LogA` with base > 1, `Pow` with even/odd exponent
	/// handled by `powf`) and merely a safe (if loose) envelope for the
	/// periodic `Sin`/`Cos`/`Tan`.
	fn result_bounds(&self, arg_b: Interval) -> Interval {
		match self.func {
			ElemFunc::Exp => Interval::of_exp(arg_b),
			ElemFunc::Sin | ElemFunc::Cos => Interval::new(-1.0, 1.0),
			ElemFunc::Tan => Interval::new(Num::NEG_INFINITY, Num::INFINITY),
			_ => {
				let a = self.eval(arg_b.lo);
				let b = self.eval(arg_b.hi);
				Interval::new(a.min(b), a.max(b))
			}
		}
	}
}

impl Constraint for ElementaryFnConstraint {
	const KIND: ConstraintKind = ConstraintKind::Exp;

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
		Some(format!("elem:{:?}:{:?}:{}", self.func, self.arg, self.param))
	}
}

impl ConvertRule for ElementaryFnConstraint {
	/// If not accepted natively, tighten `result`'s bounds from `arg`'s
	/// current interval, then redefine via a sampled
	/// [`PlConstraint`] over `arg`'s (necessarily finite) domain.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_elementary(self);
		}

		let arg_b = Interval::new(cvt.model().var(self.arg).lb(), cvt.model().var(self.arg).ub());
		if !arg_b.is_finite() {
			return Err(ConvertError::UnboundedBigM { var: self.arg });
		}
		let result_b = self.result_bounds(arg_b);
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();
		if result_b.is_finite() {
			cvt.tighten_lb(self.result, result_b.lo)?;
			cvt.tighten_ub(self.result, result_b.hi)?;
		}

		let n = PWL_SEGMENTS;
		let step = (arg_b.hi - arg_b.lo) / n as Num;
		let mut breakpoints = Vec::with_capacity(n + 1);
		let mut values = Vec::with_capacity(n + 1);
		for k in 0..=n {
			let x = arg_b.lo + step * k as Num;
			breakpoints.push(x);
			values.push(self.eval(x));
		}
		cvt.add_constraint(PlConstraint::new(self.result, self.arg, breakpoints, values))?;

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedup_key_distinguishes_functions_over_the_same_argument() {
		let exp = ElementaryFnConstraint::new(ElemFunc::Exp, VarId::from_raw(2), VarId::from_raw(0), 0.0);
		let log = ElementaryFnConstraint::new(ElemFunc::Log, VarId::from_raw(2), VarId::from_raw(0), 0.0);
		assert_ne!(exp.dedup_key(), log.dedup_key());
	}

	#[test]
	fn exp_result_bounds_match_interval_of_exp() {
		let c = ElementaryFnConstraint::new(ElemFunc::Exp, VarId::from_raw(1), VarId::from_raw(0), 0.0);
		let b = c.result_bounds(Interval::new(0.0, 1.0));
		assert_eq!(b, Interval::of_exp(Interval::new(0.0, 1.0)));
	}
}
