//! The value-presolve graph: per-family value storage plus the DAG of
//! [`Link`]s connecting source-model items to the items their conversion
//! produced, so a solver's solution can be mapped back to the user's model.

pub mod family;
pub mod link;
pub mod node;

use std::collections::HashMap;

pub use family::ValueFamily;
pub use link::{Aggregator, Link};
pub use node::{NodeRange, ValueNode};

#[derive(Debug, Default)]
/// Owns one [`ValueNode`] per [`ValueFamily`] that has been touched, and the
/// full set of [`Link`]s recorded while converting the model.
pub struct ValuePresolver {
	nodes: HashMap<ValueFamily, ValueNode>,
	links: Vec<Link>,
	scopes: Vec<Vec<NodeRange>>,
}

impl ValuePresolver {
	/// Allocate `n` new slots in `family`'s value node.
	pub fn grow(&mut self, family: ValueFamily, n: usize) -> NodeRange {
		let range = self.nodes.entry(family).or_default().grow(family, n);
		if let Some(scope) = self.scopes.last_mut() {
			scope.push(range);
		}
		range
	}

	/// Record a final value produced (or fed in) for a single entity.
	pub fn set(&mut self, family: ValueFamily, index: usize, value: f64) {
		self.nodes.entry(family).or_default().set(index, value);
	}

	/// Read back a value, if one has been recorded or resolved by
	/// [`Self::postsolve`].
	pub fn get(&self, family: ValueFamily, index: usize) -> Option<f64> {
		self.nodes.get(&family).and_then(|n| n.get(index))
	}

	/// Open an autolink scope: every [`Self::grow`] call made before the
	/// matching [`Self::close_autolink_scope`] is collected as a candidate
	/// target range for the link this conversion call produces.
	///
	/// Scopes are a stack (not a single flag) so nested `RunConversion`
	/// calls compose, even though in practice a redefinition rule never
	/// triggers another `RunConversion` directly: it only calls converter
	/// methods that themselves grow ranges within the same outer scope.
	pub fn open_autolink_scope(&mut self) {
		self.scopes.push(Vec::new());
	}

	/// Close the innermost autolink scope and link `source` to whatever
	/// ranges were grown inside it, using `aggregator` to recombine their
	/// postsolve values. Returns `None` (and records no link) if nothing
	/// was grown, which happens when a rewrite rule fully absorbed the
	/// source into already-existing variables or constraints.
	pub fn close_autolink_scope(&mut self, source: NodeRange, aggregator: Aggregator) -> Option<&Link> {
		let targets = self.scopes.pop().unwrap_or_default();
		if targets.is_empty() {
			return None;
		}
		self.links.push(Link {
			source,
			targets,
			aggregator,
		});
		self.links.last()
	}

	/// Fold every link's target values back into its source value, in
	/// reverse creation order so that a link whose source is itself another
	/// link's target always sees an already-resolved value.
	pub fn postsolve(&mut self) {
		for link in self.links.clone().into_iter().rev() {
			let mut values = Vec::with_capacity(link.targets.len());
			for target in &link.targets {
				values.extend(
					self.nodes
						.get(&target.family)
						.into_iter()
						.flat_map(|node| target.indices().map(move |i| node.get(i).unwrap_or(0.0))),
				);
			}
			let resolved = match link.aggregator {
				Aggregator::First => values.first().copied().unwrap_or(0.0),
				Aggregator::Sum => values.iter().sum(),
				Aggregator::Select(offset) => values.get(offset).copied().unwrap_or(0.0),
			};
			for i in link.source.indices() {
				self.nodes.entry(link.source.family).or_default().set(i, resolved);
			}
		}
	}

	/// All recorded links, in creation order. Exposed read-only for the
	/// `tech:writegraph` export.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// `tech:writegraph`: dump every recorded link as one JSON object per
	/// line, in creation order, for offline inspection of the presolve DAG.
	#[cfg(feature = "writegraph")]
	pub fn write_graph(&self, path: &str) -> Result<(), crate::error::ConvertError> {
		use std::io::Write as _;

		let to_err = |message: String| crate::error::ConvertError::SolverNativeError {
			call: "tech:writegraph",
			code: -1,
			message,
		};
		let mut file = std::fs::File::create(path).map_err(|e| to_err(e.to_string()))?;
		for link in &self.links {
			let line = serde_json::to_string(link).map_err(|e| to_err(e.to_string()))?;
			writeln!(file, "{line}").map_err(|e| to_err(e.to_string()))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn copy_link_roundtrips_a_single_value() {
		let mut p = ValuePresolver::default();
		let src = p.grow(ValueFamily::Var, 1);
		p.open_autolink_scope();
		let tgt = p.grow(ValueFamily::Obj, 1);
		p.close_autolink_scope(src, Aggregator::First);
		p.set(ValueFamily::Obj, tgt.first, 42.0);
		p.postsolve();
		assert_eq!(p.get(ValueFamily::Var, src.first), Some(42.0));
	}

	#[test]
	fn one_to_many_link_sums_split_row_duals() {
		let mut p = ValuePresolver::default();
		let src = p.grow(ValueFamily::Obj, 1);
		p.open_autolink_scope();
		let a = p.grow(ValueFamily::Var, 1);
		let b = p.grow(ValueFamily::Var, 1);
		p.close_autolink_scope(src, Aggregator::Sum);
		p.set(ValueFamily::Var, a.first, 1.5);
		p.set(ValueFamily::Var, b.first, 2.5);
		p.postsolve();
		assert_eq!(p.get(ValueFamily::Obj, src.first), Some(4.0));
	}

	#[test]
	fn empty_scope_records_no_link() {
		let mut p = ValuePresolver::default();
		let src = p.grow(ValueFamily::Var, 1);
		p.open_autolink_scope();
		assert!(p.close_autolink_scope(src, Aggregator::First).is_none());
		assert!(p.links().is_empty());
	}

	#[test]
	fn chained_links_resolve_through_an_intermediate() {
		// original -> intermediate -> final, each a copy link, created in order.
		let mut p = ValuePresolver::default();
		let original = p.grow(ValueFamily::Obj, 1);
		p.open_autolink_scope();
		let intermediate = p.grow(ValueFamily::Obj, 1);
		p.close_autolink_scope(original, Aggregator::First);

		p.open_autolink_scope();
		let final_range = p.grow(ValueFamily::Var, 1);
		p.close_autolink_scope(intermediate, Aggregator::First);

		p.set(ValueFamily::Var, final_range.first, 7.0);
		p.postsolve();
		assert_eq!(p.get(ValueFamily::Obj, intermediate.first), Some(7.0));
		assert_eq!(p.get(ValueFamily::Obj, original.first), Some(7.0));
	}
}
