//! `CondLinCon{EQ,LE,LT,GE,GT}`/`CondQuadCon{EQ,LE,LT,GE,GT}`: a reified
//! comparison, `result <=> (expr <op> rhs)`.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{CmpOp, ConstraintKind},
	var::{Num, VarId, VarType},
};

use super::linear::LinearConstraint;
use crate::kind::RelSense;

#[derive(Debug, Clone, PartialEq)]
/// `result <=> (sum(coefs[i] * vars[i]) <op> rhs)`.
pub struct CondLinConstraint {
	/// The Boolean variable this reification defines.
	pub result: VarId,
	/// Comparison operator.
	pub op: CmpOp,
	/// Variables in the compared expression.
	pub vars: Vec<VarId>,
	/// Their coefficients.
	pub coefs: Vec<Num>,
	/// Right-hand side.
	pub rhs: Num,
	context: Context,
}

impl CondLinConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, op: CmpOp, vars: Vec<VarId>, coefs: Vec<Num>, rhs: Num) -> Self {
		Self { result, op, vars, coefs, rhs, context: Context::None }
	}

	fn kind(&self) -> ConstraintKind {
		match self.op {
			CmpOp::Eq => ConstraintKind::CondLinConEq,
			CmpOp::Le => ConstraintKind::CondLinConLe,
			CmpOp::Lt => ConstraintKind::CondLinConLt,
			CmpOp::Ge => ConstraintKind::CondLinConGe,
			CmpOp::Gt => ConstraintKind::CondLinConGt,
		}
	}
}

impl Constraint for CondLinConstraint {
	const KIND: ConstraintKind = ConstraintKind::CondLinConEq;

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
		Some(format!("condlin:{:?}:{:?}:{:?}:{}", self.op, self.vars, self.coefs, self.rhs))
	}
}

impl ConvertRule for CondLinConstraint {
	/// Big-M reification: introduce a small epsilon for strict comparisons,
	/// and emit both implication directions unless [`Context`] already rules
	/// one out.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_cond_linear(self);
		}

		let bounds: Vec<_> = self
			.vars
			.iter()
			.map(|&v| (cvt.model().var(v).lb(), cvt.model().var(v).ub()))
			.collect();
		let lo: Num = bounds
			.iter()
			.zip(&self.coefs)
			.map(|(&(lb, ub), &c)| if c >= 0.0 { c * lb } else { c * ub })
			.sum();
		let hi: Num = bounds
			.iter()
			.zip(&self.coefs)
			.map(|(&(lb, ub), &c)| if c >= 0.0 { c * ub } else { c * lb })
			.sum();
		let m = (hi - self.rhs).max(self.rhs - lo);
		if !m.is_finite() {
			return Err(ConvertError::UnboundedBigM {
				var: *self.vars.first().unwrap_or(&self.result),
			});
		}
		const EPS: Num = 1e-6;

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();

		let (sense_pos, rhs_shift) = match self.op {
			CmpOp::Le => (RelSense::Le, 0.0),
			CmpOp::Lt => (RelSense::Le, -EPS),
			CmpOp::Ge => (RelSense::Ge, 0.0),
			CmpOp::Gt => (RelSense::Ge, EPS),
			CmpOp::Eq => (RelSense::Eq, 0.0),
		};

		let need_pos = !matches!(self.context, Context::Negative);
		let need_neg = !matches!(self.context, Context::Positive);

		if need_pos {
			// result = 1 => expr <op> rhs (within the big-M slack).
			let (s, sign) = match sense_pos {
				RelSense::Le => (RelSense::Le, 1.0),
				RelSense::Ge => (RelSense::Ge, 1.0),
				_ => (RelSense::Le, 1.0),
			};
			let mut vars = self.vars.clone();
			let mut coefs = self.coefs.clone();
			vars.push(self.result);
			coefs.push(sign * m);
			cvt.add_constraint(LinearConstraint {
				vars,
				coefs,
				sense: s,
				rhs: self.rhs + rhs_shift + sign * m,
				rhs2: 0.0,
			})?;
		}
		if need_neg && !matches!(self.op, CmpOp::Eq) {
			// result = 0 => expr violates the comparison (within slack).
			let (s, sign) = match sense_pos {
				RelSense::Le => (RelSense::Ge, -1.0),
				RelSense::Ge => (RelSense::Le, -1.0),
				_ => (RelSense::Ge, -1.0),
			};
			let mut vars = self.vars.clone();
			let mut coefs = self.coefs.clone();
			vars.push(self.result);
			coefs.push(sign * m);
			cvt.add_constraint(LinearConstraint {
				vars,
				coefs,
				sense: s,
				rhs: self.rhs + rhs_shift,
				rhs2: 0.0,
			})?;
		}

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// `result <=> (linear + quadratic <op> rhs)`.
pub struct CondQuadConstraint {
	/// The Boolean variable this reification defines.
	pub result: VarId,
	/// Comparison operator.
	pub op: CmpOp,
	/// Linear part.
	pub linear: Vec<(VarId, Num)>,
	/// First variable of each quadratic term.
	pub quad_i: Vec<VarId>,
	/// Second variable of each quadratic term.
	pub quad_j: Vec<VarId>,
	/// Coefficient of each quadratic term.
	pub quad_coefs: Vec<Num>,
	/// Right-hand side.
	pub rhs: Num,
	context: Context,
}

impl CondQuadConstraint {
	fn kind(&self) -> ConstraintKind {
		match self.op {
			CmpOp::Eq => ConstraintKind::CondQuadConEq,
			CmpOp::Le => ConstraintKind::CondQuadConLe,
			CmpOp::Lt => ConstraintKind::CondQuadConLt,
			CmpOp::Ge => ConstraintKind::CondQuadConGe,
			CmpOp::Gt => ConstraintKind::CondQuadConGt,
		}
	}
}

impl Constraint for CondQuadConstraint {
	const KIND: ConstraintKind = ConstraintKind::CondQuadConEq;

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
			"condquad:{:?}:{:?}:{:?}:{:?}:{}",
			self.op, self.linear, self.quad_i, self.quad_coefs, self.rhs
		))
	}
}

impl ConvertRule for CondQuadConstraint {
	/// Not yet reduced directly to big-M linear rows here (the quadratic
	/// part's bound is not generally a finite interval without a dedicated
	/// McCormick envelope); when the solver cannot accept the type
	/// natively, the quadratic terms are first linearized via an auxiliary
	/// [`super::functional::QuadraticFunctionalConstraint`] result variable,
	/// reducing to the linear case.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_cond_quadratic(self);
		}
		if self.quad_i.is_empty() {
			let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
			cvt.open_scope();
			let (vars, coefs): (Vec<_>, Vec<_>) = self.linear.iter().cloned().unzip();
			cvt.add_constraint(CondLinConstraint::new(self.result, self.op, vars, coefs, self.rhs))?;
			cvt.close_scope(source, crate::presolve::Aggregator::First);
			return Ok(());
		}

		let aux = cvt.add_var(Num::NEG_INFINITY, Num::INFINITY, VarType::Continuous)?;
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();
		cvt.add_constraint(super::functional::QuadraticFunctionalConstraint::new(
			aux,
			self.linear.clone(),
			self.quad_i.clone(),
			self.quad_j.clone(),
			self.quad_coefs.clone(),
			0.0,
		))?;
		cvt.add_constraint(CondLinConstraint::new(self.result, self.op, vec![aux], vec![1.0], self.rhs))?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedup_key_ignores_the_reified_result_variable() {
		let a = CondLinConstraint::new(VarId::from_raw(1), CmpOp::Le, vec![VarId::from_raw(0)], vec![1.0], 5.0);
		let b = CondLinConstraint::new(VarId::from_raw(2), CmpOp::Le, vec![VarId::from_raw(0)], vec![1.0], 5.0);
		assert_eq!(a.dedup_key(), b.dedup_key());
	}

	#[test]
	fn context_merge_narrows_which_direction_is_needed() {
		let mut c = CondLinConstraint::new(VarId::from_raw(1), CmpOp::Le, vec![VarId::from_raw(0)], vec![1.0], 5.0);
		assert_eq!(c.context(), Context::None);
		c.merge_context(Context::Positive);
		assert_eq!(c.context(), Context::Positive);
	}
}
