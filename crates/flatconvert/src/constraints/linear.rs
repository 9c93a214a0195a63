//! `LinConLE`/`LinConEQ`/`LinConGE`/`LinConRange`: a single linear row.

use crate::{
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, RelSense},
	var::{Num, VarId},
};

#[derive(Debug, Clone, PartialEq)]
/// A linear row `sum(coefs[i] * vars[i]) <sense> rhs` (or, for
/// [`RelSense::Range`], `rhs <= sum(...) <= rhs2`).
pub struct LinearConstraint {
	/// Variables appearing in the row.
	pub vars: Vec<VarId>,
	/// Their coefficients, parallel to `vars`.
	pub coefs: Vec<Num>,
	/// Relational sense of the row.
	pub sense: RelSense,
	/// Right-hand side.
	pub rhs: Num,
	/// Second right-hand side, only meaningful when `sense` is
	/// [`RelSense::Range`].
	pub rhs2: Num,
}

impl Constraint for LinearConstraint {
	const KIND: ConstraintKind = ConstraintKind::LinConLe;
}

impl LinearConstraint {
	/// The fine-grained kind this particular row reports for acceptance and
	/// `acc:<tag>` purposes, derived from `sense` (see `kind.rs`'s module
	/// doc comment for why several spec-named types share this struct).
	pub fn kind(&self) -> ConstraintKind {
		match self.sense {
			RelSense::Le => ConstraintKind::LinConLe,
			RelSense::Eq => ConstraintKind::LinConEq,
			RelSense::Ge => ConstraintKind::LinConGe,
			RelSense::Range => ConstraintKind::LinConRange,
		}
	}

}

impl ConvertRule for LinearConstraint {
	/// Rewrite a `Range` row not accepted as such into an `LE` row and a
	/// `GE` row over the same linear expression, linked so their duals sum
	/// back to the original row's dual during postsolve.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(self.kind());
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_linear(self);
		}
		match self.sense {
			RelSense::Range => {
				// The source node lives in the family `keeper::add` actually
				// grew this row under: the keeper-identifying `Self::KIND`,
				// not this instance's fine-grained `self.kind()`.
				let source = crate::presolve::NodeRange::single(
					crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND),
					idx,
				);
				cvt.open_scope();
				let le = LinearConstraint {
					vars: self.vars.clone(),
					coefs: self.coefs.clone(),
					sense: RelSense::Le,
					rhs: self.rhs2,
					rhs2: 0.0,
				};
				let ge = LinearConstraint {
					vars: self.vars.clone(),
					coefs: self.coefs.clone(),
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

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn range_row_reports_range_kind() {
		let c = LinearConstraint {
			vars: vec![],
			coefs: vec![],
			sense: RelSense::Range,
			rhs: 0.0,
			rhs2: 1.0,
		};
		assert_eq!(c.kind(), ConstraintKind::LinConRange);
	}
}
