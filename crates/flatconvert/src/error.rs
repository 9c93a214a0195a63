//! Error types produced by the model construction and conversion process.

use thiserror::Error;

use crate::var::VarId;

#[derive(Error, Debug, Clone, PartialEq)]
/// Errors that can occur while building a [`crate::FlatModel`], running the
/// conversion cascade, or pushing the result to a [`crate::ModelAPI`].
///
/// The variants correspond one-to-one to the error kinds a reimplementer is
/// expected to surface; callers should not need to pattern-match deeper than
/// this enum to decide whether a failure is a user error (bad option, bad
/// bounds) or an internal defect (duplicate map insert).
pub enum ConvertError {
	#[error("unknown option `{name}` or value `{value}` out of range")]
	/// An option name was not recognized, or its value was out of the range the
	/// option accepts.
	InvalidOption {
		/// The option name as given by the caller.
		name: String,
		/// The raw value string that failed to parse.
		value: String,
	},

	#[error("no conversion rule from `{from}` is registered for solver `{solver}`")]
	/// A constraint of a type the target `ModelAPI` does not accept was
	/// presented to the conversion loop, but the redefinition catalog has no
	/// rule to rewrite it.
	ConstraintConversionFailure {
		/// Static type name of the rejected constraint.
		from: &'static str,
		/// Name of the solver's `ModelAPI` that rejected the type.
		solver: &'static str,
	},

	#[error("cannot derive a finite big-M for constraint over variable {var:?}: bounds are not both finite")]
	/// An indicator or complementarity rewrite needed a finite big-M constant
	/// but one or both bounds of the governing expression were infinite.
	UnboundedBigM {
		/// The argument variable whose bounds were required to be finite.
		var: VarId,
	},

	#[error("infeasible domain for variable {var:?}: lower bound {lb} exceeds upper bound {ub}")]
	/// Bound propagation (or a user-supplied bound) produced `lb > ub`.
	InfeasibleDomain {
		/// The variable whose domain became empty.
		var: VarId,
		/// The offending lower bound.
		lb: f64,
		/// The offending upper bound.
		ub: f64,
	},

	#[error("solver call `{call}` failed with native code {code}: {message}")]
	/// A `ModelAPI`/`Backend` call returned a non-OK native result.
	SolverNativeError {
		/// Name of the failing call, e.g. `"AddConstraint"`.
		call: &'static str,
		/// Native error code reported by the solver SDK.
		code: i32,
		/// Native error message, if the SDK provided one.
		message: String,
	},

	#[error("duplicate map insert for a functional constraint already present at index {index}")]
	/// A mapped [`crate::keeper::ConstraintKeeper`] found a dedup-map entry
	/// already present for a constraint being inserted; this should never
	/// happen given that callers always check `MapFind` first, so it
	/// indicates an internal defect in a redefinition rule.
	DuplicateMapInsert {
		/// Index already held by the dedup map.
		index: usize,
	},
}
