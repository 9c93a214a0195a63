//! `AndConstraint`/`OrConstraint`/`NotConstraint`: Boolean connectives over
//! 0/1-valued variables.

use crate::{
	context::Context,
	convert::{ConvertRule, FlatConverter},
	error::ConvertError,
	keeper::Constraint,
	kind::{ConstraintKind, LogicalOp, RelSense},
	var::VarId,
};

use super::linear::LinearConstraint;

#[derive(Debug, Clone, PartialEq)]
/// `result = AND(args)` or `result = OR(args)`, per `op`.
pub struct LogicalConstraint {
	/// Which connective.
	pub op: LogicalOp,
	/// The variable this expression defines.
	pub result: VarId,
	/// Argument (Boolean) variables.
	pub args: Vec<VarId>,
	context: Context,
}

impl LogicalConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(op: LogicalOp, result: VarId, args: Vec<VarId>) -> Self {
		Self { op, result, args, context: Context::None }
	}

	fn kind(&self) -> ConstraintKind {
		match self.op {
			LogicalOp::And => ConstraintKind::And,
			LogicalOp::Or => ConstraintKind::Or,
		}
	}
}

impl Constraint for LogicalConstraint {
	const KIND: ConstraintKind = ConstraintKind::And;

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
		Some(format!("logical:{:?}:{:?}", self.op, self.args))
	}
}

impl ConvertRule for LogicalConstraint {
	/// `AND`: `result <= arg_i` for each `i`, `result >= sum(args) - (n-1)`.
	/// `OR`: `result >= arg_i` for each `i`, `result <= sum(args)`. Both are
	/// the standard linearizations; only the "positive" half is emitted
	/// when [`Context`] rules out the other direction ever being needed.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let kind = self.kind();
		let acc = cvt.effective_acceptance(kind);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_logical(self);
		}

		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(<Self as Constraint>::KIND), idx);
		cvt.open_scope();
		let n = self.args.len() as f64;

		let need_negative = !matches!(self.context, Context::Positive);
		let need_positive = !matches!(self.context, Context::Negative);

		match self.op {
			LogicalOp::And => {
				if need_negative {
					for &arg in &self.args {
						cvt.add_constraint(LinearConstraint {
							vars: vec![self.result, arg],
							coefs: vec![1.0, -1.0],
							sense: RelSense::Le,
							rhs: 0.0,
							rhs2: 0.0,
						})?;
					}
				}
				if need_positive {
					let mut vars = self.args.clone();
					let mut coefs = vec![-1.0; self.args.len()];
					vars.push(self.result);
					coefs.push(1.0);
					cvt.add_constraint(LinearConstraint {
						vars,
						coefs,
						sense: RelSense::Ge,
						rhs: 1.0 - n,
						rhs2: 0.0,
					})?;
				}
			}
			LogicalOp::Or => {
				if need_positive {
					for &arg in &self.args {
						cvt.add_constraint(LinearConstraint {
							vars: vec![self.result, arg],
							coefs: vec![1.0, -1.0],
							sense: RelSense::Ge,
							rhs: 0.0,
							rhs2: 0.0,
						})?;
					}
				}
				if need_negative {
					let mut vars = self.args.clone();
					let mut coefs = vec![-1.0; self.args.len()];
					vars.push(self.result);
					coefs.push(1.0);
					cvt.add_constraint(LinearConstraint {
						vars,
						coefs,
						sense: RelSense::Le,
						rhs: 0.0,
						rhs2: 0.0,
					})?;
				}
			}
		}

		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
/// `result = NOT(arg)` over 0/1-valued variables: `result = 1 - arg`.
pub struct NotConstraint {
	/// The variable this expression defines.
	pub result: VarId,
	/// The argument.
	pub arg: VarId,
	context: Context,
}

impl NotConstraint {
	/// Build a new instance with [`Context::None`].
	pub fn new(result: VarId, arg: VarId) -> Self {
		Self { result, arg, context: Context::None }
	}
}

impl Constraint for NotConstraint {
	const KIND: ConstraintKind = ConstraintKind::Not;

	fn result_var(&self) -> Option<VarId> {
		Some(self.result)
	}

	fn context(&self) -> Context {
		self.context
	}

	fn merge_context(&mut self, ctx: Context) {
		// Propagating through `Not` flips the direction (see `Context::not`).
		self.context = self.context.merge(!ctx);
	}

	fn dedup_key(&self) -> Option<String> {
		Some(format!("not:{:?}", self.arg))
	}
}

impl ConvertRule for NotConstraint {
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError> {
		let acc = cvt.effective_acceptance(Self::KIND);
		if acc != crate::kind::Acceptance::NotAccepted {
			return cvt.model_api_mut().add_not(self);
		}
		let source = crate::presolve::NodeRange::single(crate::presolve::ValueFamily::Con(Self::KIND), idx);
		cvt.open_scope();
		cvt.add_constraint(LinearConstraint {
			vars: vec![self.result, self.arg],
			coefs: vec![1.0, 1.0],
			sense: RelSense::Eq,
			rhs: 1.0,
			rhs2: 0.0,
		})?;
		cvt.close_scope(source, crate::presolve::Aggregator::First);
		Ok(())
	}
}
