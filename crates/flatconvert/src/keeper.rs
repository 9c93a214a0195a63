//! [`ConstraintKeeper`]: a typed pool for one concrete constraint type,
//! providing `O(1)` add/find/dedup and backing the value node that the
//! [`crate::presolve::ValuePresolver`] links into.

use std::collections::HashMap;

use crate::{
	context::Context,
	kind::ConstraintKind,
	presolve::{NodeRange, ValueFamily, ValuePresolver},
};

/// Identifies which keeper a variable's `InitExpr` (or a [`crate::presolve::Link`])
/// refers to. Every concrete constraint type has exactly one keeper, so its
/// [`ConstraintKind`] already uniquely names it.
pub type KeeperId = ConstraintKind;

/// What a concrete constraint type must provide to live in a
/// [`ConstraintKeeper`] and be dispatched by the conversion loop.
pub trait Constraint: Clone + std::fmt::Debug {
	/// The static kind tag for this type (used for acceptance lookup,
	/// `acc:<tag>` options, and the value node family).
	const KIND: ConstraintKind;

	/// The result variable this constraint defines, for functional
	/// constraints (`y = f(args)`). Structural/algebraic constraints return
	/// `None`.
	fn result_var(&self) -> Option<crate::var::VarId> {
		None
	}

	/// Current propagation context; only meaningful for reified logical
	/// subexpressions (see [`Context`]).
	fn context(&self) -> Context {
		Context::None
	}

	/// Merge `ctx` into this constraint's context in place.
	fn merge_context(&mut self, ctx: Context) {
		let _ = ctx;
	}

	/// A structural dedup key shared by all constraints representing the
	/// same expression, or `None` for types that are never deduplicated
	/// (algebraic rows, `AllDiff`, SOS sets, ...). Functional constraints
	/// override this so that e.g. `abs(x)` requested twice returns the same
	/// result variable instead of adding a second, identical row.
	fn dedup_key(&self) -> Option<String> {
		None
	}
}

#[derive(Debug, Clone, Default)]
/// A typed pool of constraints of one concrete type `C`.
///
/// Mirrors the specification's per-type storage: items are appended in
/// arrival order (`AddConstraint`), looked up by dedup key in `O(1)`
/// (`MapFind`/`MapInsert`), and the keeper tracks how much of itself has
/// already been through the conversion cascade (`converted_upto`) so the
/// outer loop can detect when it has grown.
pub struct ConstraintKeeper<C: Constraint> {
	items: Vec<C>,
	dedup: HashMap<String, usize>,
	/// Index of the first item not yet visited by the conversion loop.
	pub(crate) converted_upto: usize,
}

impl<C: Constraint> ConstraintKeeper<C> {
	/// Number of items currently stored.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the keeper holds no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Look up an existing item by its dedup key, returning its index if
	/// found (`MapFind`).
	pub fn find(&self, key: &str) -> Option<usize> {
		self.dedup.get(key).copied()
	}

	/// Read the item at `index`.
	pub fn get(&self, index: usize) -> &C {
		&self.items[index]
	}

	/// Read-write access to the item at `index`, e.g. for context merges.
	pub fn get_mut(&mut self, index: usize) -> &mut C {
		&mut self.items[index]
	}

	/// Append `item`, registering it in the dedup map (`MapInsert`) if it has
	/// a dedup key, and allocate its value-node slot. Returns the new
	/// item's index and the [`NodeRange`] allocated for it.
	///
	/// If `item` has a dedup key already present in the map, the caller made
	/// a mistake (callers are expected to `find` first); this is reported as
	/// [`crate::error::ConvertError::DuplicateMapInsert`] rather than
	/// silently overwriting the existing entry.
	pub fn add(&mut self, item: C, presolver: &mut ValuePresolver) -> Result<(usize, NodeRange), crate::error::ConvertError> {
		if let Some(key) = item.dedup_key() {
			if let Some(&existing) = self.dedup.get(&key) {
				return Err(crate::error::ConvertError::DuplicateMapInsert { index: existing });
			}
		}
		let index = self.items.len();
		if let Some(key) = item.dedup_key() {
			self.dedup.insert(key, index);
		}
		let range = presolver.grow(ValueFamily::Con(C::KIND), 1);
		self.items.push(item);
		Ok((index, range))
	}

	/// Items at or beyond `converted_upto`, i.e. not yet visited by the
	/// conversion loop.
	pub(crate) fn pending_indices(&self) -> std::ops::Range<usize> {
		self.converted_upto..self.items.len()
	}

	/// Index of the first item not yet visited by the conversion loop.
	pub(crate) fn pending_range_start(&self) -> usize {
		self.converted_upto
	}

	/// All stored items, in arrival order.
	pub fn iter(&self) -> impl Iterator<Item = &C> {
		self.items.iter()
	}
}
