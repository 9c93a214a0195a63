//! `QuadConLE`/`QuadConEQ`/`QuadConGE`/`QuadConRange`: a single quadratic row.

use crate::{
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId},
};

#[derive(Debug, Clone, PartialEq)]
/// A quadratic row: `linear + sum(quad_coefs[k] * quad_i[k] * quad_j[k])
/// <sense> rhs` (or ranged between `rhs` and `rhs2`).
pub struct QuadraticConstraint {
	/// Linear part, `(variable, coefficient)`.
	pub linear: Vec<(VarId, Num)>,
	/// First variable of each quadratic term.
	pub quad_i: Vec<VarId>,
	/// Second variable of each quadratic term.
	pub quad_j: Vec<VarId>,
	/// Coefficient of each quadratic term.
	pub quad_coefs: Vec<Num>,
	/// Relational sense.
	pub sense: RelSense,
	/// Right-hand side.
	pub rhs: Num,
	/// Second right-hand side, for [`RelSense::Range`].
	pub rhs2: Num,
}

impl Constraint for QuadraticConstraint {
	const KIND: ConstraintKind = ConstraintKind::QuadConLe;
}

impl QuadraticConstraint {
	/// Fine-grained kind, derived from `sense`.
	pub fn kind(&self) -> ConstraintKind {
		match self.sense {
			RelSense::Le => ConstraintKind::QuadConLe,
			RelSense::Eq => ConstraintKind::QuadConEq,
			RelSense::Ge => ConstraintKind::QuadConGe,
			RelSense::Range => ConstraintKind::QuadConRange,
		}
	}
}

impl ConvertRule for QuadraticConstraint {
	/// Same range-splitting rule as [`super::linear::LinearConstraint`];
	/// otherwise pushed natively or reported as unconvertible.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(self.kind());
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_quadratic(self);
		}
		match self.sense {
			RelSense::Range => {
				let source = crate::presolve::NodeRange::single(
					crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND),
					idx,
				);
				cvt.open_scope();
				let le = QuadraticConstraint {
					linear: self.linear.clone(),
					quad_i: self.quad_i.clone(),
					quad_j: self.quad_j.clone(),
					quad_coefs: self.quad_coefs.clone(),
					sense: RelSense::Le,
					rhs: self.rhs2,
					rhs2: 0.0,
				};
				let ge = QuadraticConstraint {
					linear: self.linear.clone(),
					quad_i: self.quad_i.clone(),
					quad_j: self.quad_j.clone(),
					quad_coefs: self.quad_coefs.clone(),
					sense: RelSense::Ge,
					rhs: self.rhs,
					rhs2: 0.0,
				};
				cvt.add_constraint(le)?;
				cvt.add_constraint(ge)?;
				cvt.close_scope(source, crate::presolve::Aggregator::Sum);
				Ok(())
			}
			_ => Err(ConvertError::ConstraintConversionFailure {
				from: self.kind().name(),
				solver: cvt.model_api_name(),
			}),
		}
	}
}
