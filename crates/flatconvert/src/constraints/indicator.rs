//! `IndicatorConstraintLin{LE,EQ,GE}`/`IndicatorConstraintQuad{LE,EQ,GE}`:
//! `bin_var == activate_on => (body <op> rhs)`. Unlike [`super::cond`]'s
//! reification, only the forward implication holds — the body may also be
//! satisfied when the indicator is inactive.

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId},
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `bin_var == activate_on => (sum(coefs[i] * vars[i]) <sense> rhs)`.
pub struct IndicatorConstraint {
	/// The activating 0/1 variable.
	pub bin_var: VarId,
	/// Whether activation is `bin_var == 1` (`true`) or `bin_var == 0`.
	pub activate_on: bool,
	/// Variables in the body.
	pub vars: Vec<VarId>,
	/// Their coefficients.
	pub coefs: Vec<Num>,
	/// Relational sense of the body.
	pub sense: RelSense,
	/// Right-hand side.
	pub rhs: Num,
	context: Context,
}

impl IndicatorConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(bin_var: VarId, activate_on: bool, vars: Vec<VarId>, coefs: Vec<Num>, sense: RelSense, rhs: Num) -> Self {
		Self {
			bin_var,
			activate_on,
			vars,
			coefs,
			sense,
			rhs,
			context: Context::None,
		}
	}

	fn kind(&self) -> ConstraintKind {
		match self.sense {
			RelSense::Le => ConstraintKind::IndicatorLinLe,
			RelSense::Eq => ConstraintKind::IndicatorLinEq,
			RelSense::Ge | RelSense::Range => ConstraintKind::IndicatorLinGe,
		}
	}
}

impl Constraint for IndicatorConstraint {
	const KIND: ConstraintKind = ConstraintKind::IndicatorLinLe;

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}

	fn dedup_key(&self) -> Option<String> {
		None
	}
}

impl ConvertRule for IndicatorConstraint {
	/// Big-M, one direction only: when `bin_var` realizes `activate_on`, the
	/// body must hold within the slack `M*(1 - activation literal)`.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_indicator(self);
		}

		let bounds: Vec<_> = self
			.vars
			.iter()
			.map(|&v| Interval::new(cvt.model().var(v).lb(), cvt.model().var(v).ub()))
			.collect();
		let body = Interval::of_linear_combination(&bounds.iter().zip(&self.coefs).map(|(&iv, &c)| (iv, c)).collect::<Vec<_>>(), 0.0);
		let m = (body.hi - self.rhs).abs().max((self.rhs - body.lo).abs());
		if !m.is_finite() {
			return Err(ConvertError::UnboundedBigM {
				var: *self.vars.first().unwrap_or(&self.bin_var),
			});
		}

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();

		// `body <= rhs + M*(1-bin)` when `activate_on`, or `body <= rhs +
		// M*bin` otherwise; rearranged to move the indicator into the row.
		let emit_le = |cvt: &mut FlatConverter<'_>| -> Result<(), ConvertError> {
			let mut vars = self.vars.clone();
			let mut coefs = self.coefs.clone();
			vars.push(self.bin_var);
			let (bin_coef, rhs) = if self.activate_on { (m, self.rhs + m) } else { (-m, self.rhs) };
			coefs.push(bin_coef);
			cvt.add_constraint(LinearConstraint { vars, coefs, sense: RelSense::Le, rhs, rhs2: 0.0 })?;
			Ok(())
		};
		let emit_ge = |cvt: &mut FlatConverter<'_>| -> Result<(), ConvertError> {
			let mut vars = self.vars.clone();
			let mut coefs = self.coefs.clone();
			vars.push(self.bin_var);
			let (bin_coef, rhs) = if self.activate_on { (-m, self.rhs - m) } else { (m, self.rhs) };
			coefs.push(bin_coef);
			cvt.add_constraint(LinearConstraint { vars, coefs, sense: RelSense::Ge, rhs, rhs2: 0.0 })?;
			Ok(())
		};

		match self.sense {
			RelSense::Le => emit_le(cvt)?,
			RelSense::Ge | RelSense::Range => emit_ge(cvt)?,
			RelSense::Eq => {
				emit_le(cvt)?;
				emit_ge(cvt)?;
			}
		}

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// Quadratic analogue of [`IndicatorConstraint`]: `bin_var == activate_on
/// => (linear + quadratic <sense> rhs)`.
pub struct IndicatorQuadConstraint {
	/// The activating 0/1 variable.
	pub bin_var: VarId,
	/// Whether activation is `bin_var == 1` (`true`) or `bin_var == 0`.
	pub activate_on: bool,
	/// Linear part of the body.
	pub linear: Vec<(VarId, Num)>,
	/// First variable of each quadratic term.
	pub quad_i: Vec<VarId>,
	/// Second variable of each quadratic term.
	pub quad_j: Vec<VarId>,
	/// Coefficient of each quadratic term.
	pub quad_coefs: Vec<Num>,
	/// Relational sense of the body.
	pub sense: RelSense,
	/// Right-hand side.
	pub rhs: Num,
	context: Context,
}

impl IndicatorQuadConstraint {
	fn kind(&self) -> ConstraintKind {
		match self.sense {
			RelSense::Le => ConstraintKind::IndicatorQuadLe,
			RelSense::Eq => ConstraintKind::IndicatorQuadEq,
			RelSense::Ge | RelSense::Range => ConstraintKind::IndicatorQuadGe,
		}
	}
}

impl Constraint for IndicatorQuadConstraint {
	const KIND: ConstraintKind = ConstraintKind::IndicatorQuadLe;

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}
}

impl ConvertRule for IndicatorQuadConstraint {
	/// Linearize the quadratic part through an auxiliary functional result
	/// variable, then defer to [`IndicatorConstraint`]'s big-M rewrite.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_indicator_quad(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();
		if self.quad_i.is_empty() {
			let (vars, coefs): (Vec<_>, Vec<_>) = self.linear.iter().cloned().unzip();
			cvt.add_constraint(IndicatorConstraint::new(self.bin_var, self.activate_on, vars, coefs, self.sense, self.rhs))?;
			cvt.close_scope(source, crate::presolve::Aggregator::First);
			return Ok(());
		}
		let aux = cvt.add_var(Num::NEG_INFINITY, Num::INFINITY, crate::var::VarType::Continuous)?;
		cvt.add_constraint(super::functional::QuadraticFunctionalConstraint::new(
			aux,
			self.linear.clone(),
			self.quad_i.clone(),
			self.quad_j.clone(),
			self.quad_coefs.clone(),
			0.0,
		))?;
		cvt.add_constraint(IndicatorConstraint::new(self.bin_var, self.activate_on, vec![aux], vec![1.0], self.sense, self.rhs))?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn structural_indicator_is_never_deduplicated() {
		let c = IndicatorConstraint::new(VarId::from_raw(0), true, vec![VarId::from_raw(1)], vec![1.0], RelSense::Le, 0.0);
		assert_eq!(c.dedup_key(), None);
	}
}
