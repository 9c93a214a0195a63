//! Links between a rewritten-away source range and the target ranges its
//! rewrite produced, and the aggregators used to fold target values back to
//! a single source value during postsolve.

use super::node::NodeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "writegraph", derive(serde::Serialize))]
/// How a [`Link`]'s target values are folded back into its source value
/// during postsolve.
///
/// `CopyLink` (the 1-to-1 case) is modeled as [`Aggregator::First`] over a
/// single-target range; `One2ManyLink` is any other aggregator over a
/// possibly-multi-target range.
pub enum Aggregator {
	/// Take the first (and, for a true `CopyLink`, only) target value.
	First,
	/// Sum all target values (e.g. recombining a split range row's two duals).
	Sum,
	/// Take the target value at the given offset within the target range
	/// (e.g. picking out one binary indicator's dual among several).
	Select(usize),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "writegraph", derive(serde::Serialize))]
/// Connects one source range (a constraint or variable rewritten away) to
/// the target range(s) its rewrite produced, with the aggregator used to
/// recombine target values into the source's postsolve value.
///
/// A plain 1-to-1 rewrite (`CopyLink` in the specification) is `targets.len()
/// == 1` with [`Aggregator::First`]; a one-to-many rewrite (`One2ManyLink`)
/// has more targets, or a non-trivial aggregator, or both.
pub struct Link {
	pub(crate) source: NodeRange,
	pub(crate) targets: Vec<NodeRange>,
	pub(crate) aggregator: Aggregator,
}

impl Link {
	/// A straightforward 1-to-1 link: the constraint at `source` was
	/// rewritten into exactly the constraint at `target`, value-for-value.
	pub fn copy(source: NodeRange, target: NodeRange) -> Self {
		Self {
			source,
			targets: vec![target],
			aggregator: Aggregator::First,
		}
	}

	/// A link from one source range to several target ranges, recombined by
	/// `aggregator` (e.g. a range row split into an LE and a GE row, whose
	/// duals sum back to the original row's dual).
	pub fn one_to_many(source: NodeRange, targets: Vec<NodeRange>, aggregator: Aggregator) -> Self {
		Self {
			source,
			targets,
			aggregator,
		}
	}
}
