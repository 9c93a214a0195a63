//! [`FlatModel`]: the converter's working model — variables, objectives, and
//! one [`ConstraintKeeper`] per concrete constraint type — plus the
//! [`ValuePresolver`] that ties it to postsolve.

use index_vec::IndexVec;

use crate::{
	constraints::{
		abs::AbsConstraint, alldiff::AllDiffConstraint, complementarity::ComplementarityConstraint,
		cond::{CondLinConstraint, CondQuadConstraint},
		count::{CountConstraint, NumberofConstConstraint, NumberofVarConstraint},
		div::DivConstraint,
		elementary::ElementaryFnConstraint,
		extremum::ExtremumConstraint,
		functional::{LinearFunctionalConstraint, QuadraticFunctionalConstraint},
		if_then_else::IfThenElseConstraint,
		indicator::{IndicatorConstraint, IndicatorQuadConstraint},
		linear::LinearConstraint,
		logical::{LogicalConstraint, NotConstraint},
		pl::PlConstraint,
		quadratic::QuadraticConstraint,
		sos::SosConstraint,
	},
	context::Context,
	error::ConvertError,
	keeper::{Constraint, ConstraintKeeper},
	kind::ConstraintKind,
	presolve::{ValueFamily, ValuePresolver},
	var::{FixedValueCache, Num, VarId, VarType, Variable},
};

/// A single objective row: linear always, with an optional quadratic part.
#[derive(Debug, Clone, Default)]
pub struct Objective {
	/// `true` to maximize.
	pub maximize: bool,
	/// Linear terms.
	pub linear: Vec<(VarId, Num)>,
	/// Quadratic terms, `(i, j, coefficient)`.
	pub quadratic: Vec<(VarId, VarId, Num)>,
	/// Additive constant.
	pub constant: Num,
}

macro_rules! keepers_struct {
	($($field:ident : $ty:ty),+ $(,)?) => {
		#[derive(Debug, Default)]
		/// One typed pool per concrete constraint type. Field order is the
		/// fixed round-robin registration order the conversion loop visits.
		pub struct Keepers {
			$(pub(crate) $field: ConstraintKeeper<$ty>),+
		}

		$(
			impl HasKeeper<$ty> for FlatModel {
				fn split_mut(&mut self) -> (&mut ConstraintKeeper<$ty>, &mut ValuePresolver) {
					(&mut self.keepers.$field, &mut self.presolver)
				}

				fn keeper(&self) -> &ConstraintKeeper<$ty> {
					&self.keepers.$field
				}
			}
		)+

		impl FlatModel {
			/// Merge `ctx` into the item at `(keeper, index)`, dispatching on
			/// the keeper's [`ConstraintKind`] at runtime (`keeper` is the
			/// `KIND` a constraint's [`crate::var::InitExpr`] was stamped
			/// with when it was added, so it always names exactly one of
			/// these fields).
			pub(crate) fn merge_context_at(&mut self, keeper: ConstraintKind, index: usize, ctx: Context) {
				match keeper {
					$(<$ty as Constraint>::KIND => self.keepers.$field.get_mut(index).merge_context(ctx),)+
					// Every other `ConstraintKind` variant shares a struct (and
					// hence a `KIND`) with one of the arms above; a `KeeperId`
					// never holds one of them directly (see `InitExpr`).
					_ => {}
				}
			}
		}
	};
}

/// Disjoint access to one keeper and the shared presolver, so
/// `ConstraintKeeper::add` can grow the right value-node family without
/// the borrow checker seeing a conflict with the rest of [`FlatModel`].
pub trait HasKeeper<C: Constraint> {
	/// The keeper for `C`, plus the presolver (for [`ConstraintKeeper::add`]).
	fn split_mut(&mut self) -> (&mut ConstraintKeeper<C>, &mut ValuePresolver);
	/// Read-only access to the keeper for `C`.
	fn keeper(&self) -> &ConstraintKeeper<C>;
}

keepers_struct! {
	lin_con: LinearConstraint,
	quad_con: QuadraticConstraint,
	lin_func: LinearFunctionalConstraint,
	quad_func: QuadraticFunctionalConstraint,
	extremum: ExtremumConstraint,
	abs: AbsConstraint,
	logical: LogicalConstraint,
	not_c: NotConstraint,
	div_c: DivConstraint,
	if_then_else: IfThenElseConstraint,
	cond_lin: CondLinConstraint,
	cond_quad: CondQuadConstraint,
	count: CountConstraint,
	numberof_const: NumberofConstConstraint,
	numberof_var: NumberofVarConstraint,
	alldiff: AllDiffConstraint,
	elementary: ElementaryFnConstraint,
	indicator: IndicatorConstraint,
	indicator_quad: IndicatorQuadConstraint,
	sos: SosConstraint,
	complementarity: ComplementarityConstraint,
	pl: PlConstraint,
}

#[derive(Debug, Default)]
/// The model under construction: variables, objectives, every constraint
/// keeper, and the value-presolve graph linking them all together.
pub struct FlatModel {
	pub(crate) vars: IndexVec<VarId, Variable>,
	pub(crate) fixed_cache: FixedValueCache,
	pub(crate) objectives: Vec<Objective>,
	pub(crate) keepers: Keepers,
	pub(crate) presolver: ValuePresolver,
	/// Set by `FinishModelInput`; once `true`, no new variables may be added
	/// (constraints may still be rewritten in place during conversion).
	pub(crate) frozen: bool,
}

impl FlatModel {
	/// Add a new variable and allocate its value-node slot. Returns its id.
	pub fn add_var(&mut self, lb: Num, ub: Num, ty: VarType) -> Result<VarId, ConvertError> {
		let var = Variable::new(lb, ub, ty)?;
		let id = self.vars.push(var);
		self.presolver.grow(ValueFamily::Var, 1);
		Ok(id)
	}

	/// Look up (or lazily create) the canonical fixed variable for `value`.
	pub fn fixed_var(&mut self, value: Num) -> Result<VarId, ConvertError> {
		if let Some(id) = self.fixed_cache.get(value) {
			return Ok(id);
		}
		let id = self.add_var(value, value, VarType::Continuous)?;
		self.fixed_cache.insert(value, id);
		Ok(id)
	}

	/// Number of variables.
	pub fn num_vars(&self) -> usize {
		self.vars.len()
	}

	/// Read a variable's current bounds/type.
	pub fn var(&self, id: VarId) -> &Variable {
		&self.vars[id]
	}

	/// Narrow a variable's lower bound in place.
	pub fn tighten_lb(&mut self, id: VarId, lb: Num) -> Result<bool, ConvertError> {
		self.vars[id].tighten_lb(id, lb)
	}

	/// Narrow a variable's upper bound in place.
	pub fn tighten_ub(&mut self, id: VarId, ub: Num) -> Result<bool, ConvertError> {
		self.vars[id].tighten_ub(id, ub)
	}

	/// Add (or replace) an objective row.
	pub fn set_objective(&mut self, iobj: usize, obj: Objective) {
		if iobj >= self.objectives.len() {
			self.objectives.resize(iobj + 1, Objective::default());
			self.presolver.grow(ValueFamily::Obj, self.objectives.len());
		}
		self.objectives[iobj] = obj;
	}

	/// All objective rows.
	pub fn objectives(&self) -> &[Objective] {
		&self.objectives
	}

	/// Freeze the model: `FinishModelInput`. After this, [`Self::add_var`]
	/// is still technically callable (rewrites add auxiliary variables
	/// throughout conversion) but no more *user*-facing variables should be
	/// introduced.
	pub fn finish_model_input(&mut self) {
		self.frozen = true;
	}

	/// Whether [`Self::finish_model_input`] has been called.
	pub fn is_frozen(&self) -> bool {
		self.frozen
	}

	/// Read-only access to `C`'s keeper.
	pub(crate) fn keeper<C: Constraint>(&self) -> &ConstraintKeeper<C>
	where
		Self: HasKeeper<C>,
	{
		HasKeeper::keeper(self)
	}

	/// Disjoint mutable access to `C`'s keeper and the presolver.
	pub(crate) fn split_mut<C: Constraint>(&mut self) -> (&mut ConstraintKeeper<C>, &mut ValuePresolver)
	where
		Self: HasKeeper<C>,
	{
		HasKeeper::split_mut(self)
	}

	/// Advance `C`'s conversion cursor to `cursor`.
	pub(crate) fn advance_cursor<C: Constraint>(&mut self, cursor: usize)
	where
		Self: HasKeeper<C>,
	{
		self.split_mut::<C>().0.converted_upto = cursor;
	}
}
