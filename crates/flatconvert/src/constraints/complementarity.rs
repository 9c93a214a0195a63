//! `ComplementarityLinear`/`ComplementarityQuadratic`: `0 <= (a^T x + c) ⊥
//! v >= 0`, i.e. the (possibly affine, possibly quadratic) expression and
//! the complementary variable `v` cannot both be strictly positive.

use crate::{
	bounds::Interval,
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId, VarType},
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `0 <= expr ⊥ compl_var >= 0`, where `expr = sum(coefs[i]*vars[i]) +
/// sum(quad_coefs[k]*quad_i[k]*quad_j[k]) + constant`. When `quad_i` is
/// empty the pair is [`ConstraintKind::ComplementarityLinear`], otherwise
/// [`ConstraintKind::ComplementarityQuadratic`].
///
/// Postsolve for the quadratic case (recovering which side of the pair is
/// active from the solver's returned basis/multiplier information) is not
/// specified beyond the linear case; see `DESIGN.md`.
pub struct ComplementarityConstraint {
	/// The nonnegative variable complementary to `expr`.
	pub compl_var: VarId,
	/// Variables in the linear part of `expr`.
	pub vars: Vec<VarId>,
	/// Their coefficients.
	pub coefs: Vec<Num>,
	/// First variable of each quadratic term, empty for the linear case.
	pub quad_i: Vec<VarId>,
	/// Second variable of each quadratic term.
	pub quad_j: Vec<VarId>,
	/// Coefficient of each quadratic term.
	pub quad_coefs: Vec<Num>,
	/// Additive constant.
	pub constant: Num,
	context: Context,
}

impl ComplementarityConstraint {
	/// Build a linear complementarity pair.
	pub fn linear(compl_var: VarId, vars: Vec<VarId>, coefs: Vec<Num>, constant: Num) -> Self {
		Self {
			compl_var,
			vars,
			coefs,
			quad_i: vec![],
			quad_j: vec![],
			quad_coefs: vec![],
			constant,
			context: Context::None,
		}
	}

	fn kind(&self) -> ConstraintKind {
		if self.quad_i.is_empty() {
			ConstraintKind::ComplementarityLinear
		} else {
			ConstraintKind::ComplementarityQuadratic
		}
	}
}

impl Constraint for ComplementarityConstraint {
	const KIND: ConstraintKind = ConstraintKind::ComplementarityLinear;

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		self.context = self.context.merge(ctx);
	}
}

impl ConvertRule for ComplementarityConstraint {
	/// Redefine via a disjunctive big-M: a binary `active` selects which
	/// side of the pair is allowed to be strictly positive, `expr <=
	/// M*(1-active)`, `compl_var <= M*active`, with both sides already
	/// constrained `>= 0` by their own bounds.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_complementarity(self);
		}
		if !self.quad_i.is_empty() {
			let aux = cvt.add_var(0.0, Num::INFINITY, VarType::Continuous)?;
			let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
			cvt.open_scope();
			cvt.add_constraint(super::functional::QuadraticFunctionalConstraint::new(
				aux,
				self.vars.iter().cloned().zip(self.coefs.iter().cloned()).collect(),
				self.quad_i.clone(),
				self.quad_j.clone(),
				self.quad_coefs.clone(),
				self.constant,
			))?;
			cvt.add_constraint(ComplementarityConstraint::linear(self.compl_var, vec![aux], vec![1.0], 0.0))?;
			cvt.close_scope(source, crate::presolve::Aggregator::First);
			return Ok(());
		}

		let bounds: Vec<_> = self
			.vars
			.iter()
			.map(|&v| Interval::new(cvt.model().var(v).lb(), cvt.model().var(v).ub()))
			.collect();
		let expr_b = Interval::of_linear_combination(&bounds.iter().zip(&self.coefs).map(|(&iv, &c)| (iv, c)).collect::<Vec<_>>(), self.constant);
		let compl_b = Interval::new(cvt.model().var(self.compl_var).lb(), cvt.model().var(self.compl_var).ub());
		let m = expr_b.hi.max(compl_b.hi);
		if !m.is_finite() {
			return Err(ConvertError::UnboundedBigM { var: self.compl_var });
		}

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		let active = cvt.add_var(0.0, 1.0, VarType::Integer)?;
		let mut vars = self.vars.clone();
		let mut coefs = self.coefs.clone();
		vars.push(active);
		coefs.push(m);
		cvt.add_constraint(LinearConstraint {
			vars,
			coefs,
			sense: RelSense::Le,
			rhs: m - self.constant,
			rhs2: 0.0,
		})?;
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.compl_var, active],
			coefs: vec![1.0, -m],
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
	fn kind_depends_on_whether_a_quadratic_term_is_present() {
		let linear = ComplementarityConstraint::linear(VarId::from_raw(0), vec![VarId::from_raw(1)], vec![1.0], 0.0);
		assert_eq!(linear.kind(), ConstraintKind::ComplementarityLinear);
	}
}
