//! Decision variables: identifiers, bounds, type, and the fixed-value cache.

use std::collections::HashMap;

use index_vec::define_index_type;
use ordered_float::OrderedFloat;

use crate::{error::ConvertError, keeper::KeeperId};

/// Type alias for a bound or coefficient value.
///
/// The converter works over continuous/mixed-integer NLP models, so (unlike
/// the teacher's `IntVal = i64`) the natural scalar type is `f64`; integer
/// variables are a [`VarType`] tag on top of the same bound representation.
pub type Num = f64;

define_index_type! {
	/// Reference to a variable stored in a [`crate::FlatModel`].
	///
	/// Variables are always identified by this non-negative integer index, per
	/// the data-model invariant in the specification: nothing outside
	/// [`crate::FlatModel`] ever hands out a raw `usize`.
	pub struct VarId = u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Domain type of a decision variable.
pub enum VarType {
	/// The variable may take any real value within its bounds.
	Continuous,
	/// The variable is restricted to integer values within its bounds.
	Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Reference to the functional constraint whose result variable a given
/// variable is, i.e. `(keeper, index)` such that
/// `keeper.get(index).result_var() == Some(this_var)`.
pub struct InitExpr {
	/// The keeper owning the functional constraint.
	pub(crate) keeper: KeeperId,
	/// Index of the constraint within that keeper.
	pub(crate) index: usize,
}

#[derive(Debug, Clone, Copy)]
/// A single decision variable: its bounds, type, and (if it is the result of
/// a functional expression) the init expression that defines it.
pub struct Variable {
	lb: Num,
	ub: Num,
	ty: VarType,
	/// At most one init expression per variable; see the data-model invariant.
	init_expr: Option<InitExpr>,
}

impl Variable {
	/// Create a new variable, checking the `lb <= ub` invariant.
	pub fn new(lb: Num, ub: Num, ty: VarType) -> Result<Self, ConvertError> {
		let v = Self {
			lb,
			ub,
			ty,
			init_expr: None,
		};
		v.check_feasible(VarId::from_raw(0))?;
		Ok(v)
	}

	/// Lower bound.
	pub fn lb(&self) -> Num {
		self.lb
	}

	/// Upper bound.
	pub fn ub(&self) -> Num {
		self.ub
	}

	/// Variable type.
	pub fn var_type(&self) -> VarType {
		self.ty
	}

	/// The init expression, if this variable is the result of a functional
	/// constraint.
	pub fn init_expr(&self) -> Option<InitExpr> {
		self.init_expr
	}

	/// Overwrite the init expression. Used by lazy rewrites
	/// (`RedefineVariable` in the specification).
	pub(crate) fn set_init_expr(&mut self, expr: InitExpr) {
		self.init_expr = Some(expr);
	}

	/// Narrow the lower bound, returning an error if this makes the domain
	/// empty. Bounds only ever narrow: the caller is responsible for passing a
	/// value at least as tight as the current bound.
	pub(crate) fn tighten_lb(&mut self, id: VarId, lb: Num) -> Result<bool, ConvertError> {
		if lb <= self.lb {
			return Ok(false);
		}
		self.lb = if self.ty == VarType::Integer {
			lb.ceil()
		} else {
			lb
		};
		self.check_feasible(id)?;
		Ok(true)
	}

	/// Narrow the upper bound, returning an error if this makes the domain
	/// empty.
	pub(crate) fn tighten_ub(&mut self, id: VarId, ub: Num) -> Result<bool, ConvertError> {
		if ub >= self.ub {
			return Ok(false);
		}
		self.ub = if self.ty == VarType::Integer {
			ub.floor()
		} else {
			ub
		};
		self.check_feasible(id)?;
		Ok(true)
	}

	fn check_feasible(&self, id: VarId) -> Result<(), ConvertError> {
		if self.lb > self.ub {
			Err(ConvertError::InfeasibleDomain {
				var: id,
				lb: self.lb,
				ub: self.ub,
			})
		} else {
			Ok(())
		}
	}
}

#[derive(Debug, Clone, Default)]
/// Maps a literal constant value to the canonical fixed variable that
/// represents it, so that adding the same constant twice returns the same
/// variable (the "Fixed-value cache" of the data model).
pub(crate) struct FixedValueCache {
	map: HashMap<OrderedFloat<Num>, VarId>,
}

impl FixedValueCache {
	/// Look up the canonical fixed variable for `value`, if one has already
	/// been created.
	pub(crate) fn get(&self, value: Num) -> Option<VarId> {
		self.map.get(&OrderedFloat(value)).copied()
	}

	/// Record that `var` is now the canonical fixed variable for `value`.
	pub(crate) fn insert(&mut self, value: Num, var: VarId) {
		let _ = self.map.insert(OrderedFloat(value), var);
	}
}
