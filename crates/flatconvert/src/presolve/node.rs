//! Value nodes: growable per-family scalar storage, and ranges into them.

use super::family::ValueFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "writegraph", derive(serde::Serialize))]
/// A contiguous range of entries within one [`ValueFamily`]'s [`ValueNode`].
///
/// `NodeRange`s are what [`super::link::Link`]s connect: a rewrite rule opens
/// an autolink scope over the source range it is about to replace, and
/// whatever target ranges get allocated (possibly across several different
/// families) before the scope closes become that link's targets.
pub struct NodeRange {
	/// Which pool this range lives in.
	pub family: ValueFamily,
	/// Index of the first entry.
	pub first: usize,
	/// Number of entries.
	pub len: usize,
}

impl NodeRange {
	/// A single-entry range at `index` within `family`.
	pub fn single(family: ValueFamily, index: usize) -> Self {
		Self {
			family,
			first: index,
			len: 1,
		}
	}

	/// Indices covered by this range.
	pub fn indices(&self) -> std::ops::Range<usize> {
		self.first..self.first + self.len
	}
}

#[derive(Debug, Clone, Default)]
/// Growable scalar storage for one [`ValueFamily`].
///
/// Every constraint (and variable, and objective) gets exactly one slot here
/// the moment it is created, whether or not a solution value is ever filled
/// in; `postsolve` only ever reads slots that were written.
pub struct ValueNode {
	values: Vec<Option<f64>>,
}

impl ValueNode {
	/// Allocate `n` new, unset slots and return the range they occupy.
	pub fn grow(&mut self, family: ValueFamily, n: usize) -> NodeRange {
		let first = self.values.len();
		self.values.resize(first + n, None);
		NodeRange {
			family,
			first,
			len: n,
		}
	}

	/// Number of slots allocated so far.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether any slots have been allocated.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Record a final (solver-reported) value at `index`.
	pub fn set(&mut self, index: usize, value: f64) {
		self.values[index] = Some(value);
	}

	/// Read back a value previously set, or produced by [`super::ValuePresolver::postsolve`].
	pub fn get(&self, index: usize) -> Option<f64> {
		self.values[index]
	}

	/// All values in `range`, in order. Panics if any slot in the range is
	/// still unset; callers resolve [`super::ValuePresolver::postsolve`]
	/// before reading.
	pub fn slice_values(&self, range: &NodeRange) -> Vec<f64> {
		range
			.indices()
			.map(|i| self.values[i].expect("value node slot read before it was resolved"))
			.collect()
	}
}
