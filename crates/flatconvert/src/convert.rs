//! [`FlatConverter`]: the dispatch engine. Runs the conversion cascade to a
//! fixed point and pushes the result to a [`ModelAPI`].

use delegate::delegate;
use tracing::{debug, trace, warn};

use crate::{
	context::Context,
	error::ConvertError,
	keeper::Constraint,
	kind::{Acceptance, ConstraintKind, LogicalOp},
	model::{FlatModel, HasKeeper},
	model_api::ModelAPI,
	options::ConvertOptions,
	presolve::{Aggregator, NodeRange, ValueFamily},
	var::{InitExpr, Num, VarId, VarType},
};

/// Ties a [`FlatModel`] under construction to the target [`ModelAPI`] and the
/// active [`ConvertOptions`], and drives the redefinition cascade.
///
/// Individual redefinition rules (one inherent `convert` method per concrete
/// constraint struct under `crate::constraints`) only ever see this type;
/// they never touch `FlatModel` or the `ModelAPI` directly, so every
/// constraint a rule adds goes through the same dedup, value-node, and
/// autolink bookkeeping.
pub struct FlatConverter<'a> {
	model: &'a mut FlatModel,
	model_api: &'a mut dyn ModelAPI,
	options: &'a ConvertOptions,
}

impl<'a> FlatConverter<'a> {
	/// Borrow a model, a `ModelAPI`, and options together.
	pub fn new(model: &'a mut FlatModel, model_api: &'a mut dyn ModelAPI, options: &'a ConvertOptions) -> Self {
		Self { model, model_api, options }
	}

	/// Read-only access to the model under construction.
	pub fn model(&self) -> &FlatModel {
		self.model
	}

	delegate! {
		to self.model {
			/// Number of variables currently in the model.
			pub fn num_vars(&self) -> usize;
			/// Whether `FinishModelInput` has already run.
			pub fn is_frozen(&self) -> bool;
		}
	}

	/// Mutable access to the target `ModelAPI`, for rules that have decided
	/// to push a constraint natively.
	pub fn model_api_mut(&mut self) -> &mut dyn ModelAPI {
		self.model_api
	}

	/// Name of the target solver, for diagnostics.
	pub fn model_api_name(&self) -> &'static str {
		self.model_api.name()
	}

	/// Active options.
	pub fn options(&self) -> &ConvertOptions {
		self.options
	}

	/// The acceptance level to use for `kind`: the user's `acc:<tag>`
	/// override if set, else the `ModelAPI`'s declared level.
	pub fn effective_acceptance(&self, kind: ConstraintKind) -> Acceptance {
		self.options
			.acceptance_override(&kind.option_tag())
			.unwrap_or_else(|| self.model_api.acceptance(kind))
	}

	/// `AddVariable`: create a new variable (an auxiliary variable, in most
	/// call sites, since source variables are added before conversion
	/// starts).
	pub fn add_var(&mut self, lb: Num, ub: Num, ty: VarType) -> Result<VarId, ConvertError> {
		let ty = if self.options.relax() { VarType::Continuous } else { ty };
		self.model.add_var(lb, ub, ty)
	}

	/// The canonical fixed variable for a literal constant.
	pub fn fixed_var(&mut self, value: Num) -> Result<VarId, ConvertError> {
		self.model.fixed_var(value)
	}

	/// `FixAsTrue`: narrow a 0/1 variable's domain to the single value `1`,
	/// and set positive context downward into whatever reified subexpression
	/// defines `var` (see §4.4's context propagation).
	pub fn fix_as_true(&mut self, var: VarId) -> Result<(), ConvertError> {
		self.model.tighten_lb(var, 1.0)?;
		self.propagate_context(var, Context::Positive);
		Ok(())
	}

	/// `FixAsFalse`: narrow a 0/1 variable's domain to the single value `0`,
	/// and set negative context downward.
	pub fn fix_as_false(&mut self, var: VarId) -> Result<(), ConvertError> {
		self.model.tighten_ub(var, 0.0)?;
		self.propagate_context(var, Context::Negative);
		Ok(())
	}

	/// `PropagateResult`: merge `ctx` into the constraint that defines `var`
	/// (if any), then recurse into its arguments per the `And`/`Or`/`Not`
	/// composition rules (§4.4) — structural leaves (linear rows, algebraic
	/// constraints with no Boolean sub-arguments) just absorb `ctx` and stop.
	fn propagate_context(&mut self, var: VarId, ctx: Context) {
		let Some(expr) = self.model.var(var).init_expr() else {
			return;
		};
		match expr.keeper {
			ConstraintKind::And | ConstraintKind::Or => {
				let item = self.model.keepers.logical.get_mut(expr.index);
				item.merge_context(ctx);
				let op = item.op;
				let args = item.args.clone();
				let child_ctx = match (op, ctx) {
					(LogicalOp::And, Context::Positive) => Context::Positive,
					(LogicalOp::And, _) => Context::Mixed,
					(LogicalOp::Or, Context::Negative) => Context::Negative,
					(LogicalOp::Or, _) => Context::Mixed,
				};
				for arg in args {
					self.propagate_context(arg, child_ctx);
				}
			}
			ConstraintKind::Not => {
				let item = self.model.keepers.not_c.get_mut(expr.index);
				item.merge_context(ctx);
				let arg = item.arg;
				self.propagate_context(arg, !ctx);
			}
			keeper => self.model.merge_context_at(keeper, expr.index, ctx),
		}
	}

	/// Narrow a variable's lower bound, as part of bound propagation.
	pub fn tighten_lb(&mut self, var: VarId, lb: Num) -> Result<bool, ConvertError> {
		self.model.tighten_lb(var, lb)
	}

	/// Narrow a variable's upper bound, as part of bound propagation.
	pub fn tighten_ub(&mut self, var: VarId, ub: Num) -> Result<bool, ConvertError> {
		self.model.tighten_ub(var, ub)
	}

	/// `AddConstraint(C)`: append `item` to its keeper (deduplicating via
	/// `MapFind`/`MapInsert` if it has a dedup key), and record the new
	/// item's range in the innermost open autolink scope, if any.
	///
	/// Returns the item's index within its keeper and the `NodeRange`
	/// allocated for it (or, for a deduplicated item, the existing one).
	pub fn add_constraint<C: Constraint>(&mut self, item: C) -> Result<(usize, NodeRange), ConvertError>
	where
		FlatModel: HasKeeper<C>,
	{
		if let Some(key) = item.dedup_key() {
			if let Some(existing) = self.model.keeper::<C>().find(&key) {
				trace!(kind = %C::KIND, index = existing, "AddConstraint: dedup hit");
				let range = NodeRange::single(ValueFamily::Con(C::KIND), existing);
				return Ok((existing, range));
			}
		}
		let result_var = item.result_var();
		let (keeper, presolver) = self.model.split_mut::<C>();
		let (index, range) = keeper.add(item, presolver)?;
		debug!(kind = %C::KIND, index, "AddConstraint");
		if let Some(result_var) = result_var {
			self.model.vars[result_var].set_init_expr(InitExpr { keeper: C::KIND, index });
		}
		Ok((index, range))
	}

	/// Open an autolink scope before dispatching a rewrite (see
	/// [`crate::presolve::ValuePresolver::open_autolink_scope`]).
	pub fn open_scope(&mut self) {
		self.model.presolver.open_autolink_scope();
	}

	/// Close the innermost autolink scope, linking `source` to whatever was
	/// grown inside it.
	pub fn close_scope(&mut self, source: NodeRange, aggregator: Aggregator) {
		self.model.presolver.close_autolink_scope(source, aggregator);
	}

	/// Run the conversion cascade to a fixed point: repeatedly visit every
	/// keeper's not-yet-converted items (in the fixed registration order
	/// from [`ConstraintKind::ALL`]) until a full pass adds nothing new.
	pub fn convert_items(&mut self) -> Result<(), ConvertError> {
		loop {
			let mut grew = false;
			grew |= self.drain_keeper::<crate::constraints::linear::LinearConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::quadratic::QuadraticConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::functional::LinearFunctionalConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::functional::QuadraticFunctionalConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::extremum::ExtremumConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::abs::AbsConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::logical::LogicalConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::logical::NotConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::div::DivConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::if_then_else::IfThenElseConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::cond::CondLinConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::cond::CondQuadConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::count::CountConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::count::NumberofConstConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::count::NumberofVarConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::alldiff::AllDiffConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::elementary::ElementaryFnConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::indicator::IndicatorConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::indicator::IndicatorQuadConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::sos::SosConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::complementarity::ComplementarityConstraint>()?;
			grew |= self.drain_keeper::<crate::constraints::pl::PlConstraint>()?;
			if !grew {
				break;
			}
		}
		Ok(())
	}

	fn drain_keeper<C>(&mut self) -> Result<bool, ConvertError>
	where
		FlatModel: HasKeeper<C>,
		C: Constraint + ConvertRule,
	{
		let mut any = false;
		loop {
			let next = self.model.keeper::<C>().pending_range_start();
			let len = self.model.keeper::<C>().len();
			if next >= len {
				break;
			}
			let item = self.model.keeper::<C>().get(next).clone();
			item.convert(next, self)?;
			self.model.advance_cursor::<C>(next + 1);
			any = true;
		}
		Ok(any)
	}

	/// Push every variable and objective row to the `ModelAPI`, in
	/// `InitProblemModificationPhase`/`FinishProblemModificationPhase`
	/// brackets.
	pub fn finish(&mut self) -> Result<(), ConvertError> {
		self.model_api.init_phase()?;
		let specs: Vec<_> = self
			.model
			.vars
			.iter()
			.map(|v| crate::model_api::VariableSpec {
				lb: v.lb(),
				ub: v.ub(),
				var_type: v.var_type(),
			})
			.collect();
		self.model_api.add_variables(&specs)?;
		for (iobj, obj) in self.model.objectives().iter().enumerate() {
			if obj.quadratic.is_empty() {
				self.model_api.set_linear_objective(&crate::model_api::LinearObjective {
					iobj,
					maximize: obj.maximize,
					terms: obj.linear.clone(),
					constant: obj.constant,
				})?;
			} else {
				self.model_api.set_quadratic_objective(&crate::model_api::QuadraticObjective {
					iobj,
					maximize: obj.maximize,
					linear: obj.linear.clone(),
					quadratic: obj.quadratic.clone(),
					constant: obj.constant,
				})?;
			}
		}
		self.model_api.finish_phase()?;
		warn!(num_vars = self.model.num_vars(), "model finished and pushed to ModelAPI");
		#[cfg(feature = "writegraph")]
		if let Some(path) = self.options.writegraph_path() {
			self.model.presolver.write_graph(path)?;
		}
		Ok(())
	}
}

/// Implemented (as an inherent `convert` method, not this trait) by every
/// concrete constraint struct; declared here only so [`FlatConverter::drain_keeper`]
/// can name the bound it needs.
pub trait ConvertRule {
	/// Dispatch this item: push it natively if accepted, else rewrite it.
	fn convert(&self, idx: usize, cvt: &mut FlatConverter<'_>) -> Result<(), ConvertError>;
}
