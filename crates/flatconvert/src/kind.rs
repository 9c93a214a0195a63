//! The full taxonomy of constraint kinds the converter understands, and the
//! acceptance levels a [`crate::ModelAPI`] can declare for each of them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A relational sense for an algebraic (linear or quadratic) row.
///
/// Collapsing `LinConLE`/`LinConEQ`/`LinConGE`/`LinConRange` (and their
/// quadratic analogues) into one struct parameterized by `RelSense` mirrors
/// the way real solver SDKs take a row-sense parameter (e.g. CPLEX's
/// `rowsense` array, Gurobi's ranged-constraint API) rather than exposing a
/// distinct type per sense; see `DESIGN.md` for the full rationale.
pub enum RelSense {
	/// `expr <= rhs`.
	Le,
	/// `expr == rhs`.
	Eq,
	/// `expr >= rhs`.
	Ge,
	/// `rhs <= expr <= rhs2`.
	Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A strict/non-strict comparison used by conditional-comparison and
/// numberof-style constraints.
pub enum CmpOp {
	/// `==`
	Eq,
	/// `<=`
	Le,
	/// `<`
	Lt,
	/// `>=`
	Ge,
	/// `>`
	Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which extremum a [`crate::constraints::extremum::ExtremumConstraint`]
/// computes.
pub enum ExtremumKind {
	/// `y = max(args)`.
	Max,
	/// `y = min(args)`.
	Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which Boolean connective a
/// [`crate::constraints::logical::LogicalConstraint`] encodes.
pub enum LogicalOp {
	/// `y = AND(args)`.
	And,
	/// `y = OR(args)`.
	Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which elementary nonlinear function a
/// [`crate::constraints::elementary::ElementaryFnConstraint`] computes.
pub enum ElemFunc {
	/// `y = exp(x)`.
	Exp,
	/// `y = a^x` for constant base `a`.
	ExpA,
	/// `y = ln(x)`.
	Log,
	/// `y = log_a(x)` for constant base `a`.
	LogA,
	/// `y = x^p` for constant exponent `p`.
	Pow,
	/// `y = sin(x)`.
	Sin,
	/// `y = cos(x)`.
	Cos,
	/// `y = tan(x)`.
	Tan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Whether an SOS is of order 1 (at most one nonzero) or 2 (at most two
/// consecutive nonzero).
pub enum SosOrder {
	/// SOS1: at most one nonzero member.
	Sos1,
	/// SOS2: at most two *consecutive* (by weight order) nonzero members.
	Sos2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "writegraph", derive(serde::Serialize))]
/// The full, closed taxonomy of structured constraint kinds the converter
/// understands. Every value this enum takes corresponds to a named
/// constraint type in the specification; several of them are represented by
/// the same Rust struct (e.g. all four `RelSense` variants of
/// [`crate::constraints::linear::LinearConstraint`] share one struct), but
/// each still has a distinct `ConstraintKind` so a [`crate::ModelAPI`] can
/// declare acceptance, and the converter can look up the user's `acc:<tag>`
/// override, at the same granularity the specification names them.
pub enum ConstraintKind {
	/// `LinConLE`.
	LinConLe,
	/// `LinConEQ`.
	LinConEq,
	/// `LinConGE`.
	LinConGe,
	/// `LinConRange`.
	LinConRange,
	/// `QuadConLE`.
	QuadConLe,
	/// `QuadConEQ`.
	QuadConEq,
	/// `QuadConGE`.
	QuadConGe,
	/// `QuadConRange`.
	QuadConRange,
	/// `LinearFunctionalConstraint`.
	LinearFunctional,
	/// `QuadraticFunctionalConstraint`.
	QuadraticFunctional,
	/// `MaxConstraint`.
	Max,
	/// `MinConstraint`.
	Min,
	/// `AbsConstraint`.
	Abs,
	/// `AndConstraint`.
	And,
	/// `OrConstraint`.
	Or,
	/// `NotConstraint`.
	Not,
	/// `Div`.
	Div,
	/// `IfThen`.
	IfThen,
	/// `CondLinConEQ`.
	CondLinConEq,
	/// `CondLinConLE`.
	CondLinConLe,
	/// `CondLinConLT`.
	CondLinConLt,
	/// `CondLinConGE`.
	CondLinConGe,
	/// `CondLinConGT`.
	CondLinConGt,
	/// `CondQuadConEQ`.
	CondQuadConEq,
	/// `CondQuadConLE`.
	CondQuadConLe,
	/// `CondQuadConLT`.
	CondQuadConLt,
	/// `CondQuadConGE`.
	CondQuadConGe,
	/// `CondQuadConGT`.
	CondQuadConGt,
	/// `Count`.
	Count,
	/// `NumberofConst`.
	NumberofConst,
	/// `NumberofVar`.
	NumberofVar,
	/// `AllDiff`.
	AllDiff,
	/// `Exp`.
	Exp,
	/// `ExpA`.
	ExpA,
	/// `Log`.
	Log,
	/// `LogA`.
	LogA,
	/// `Pow`.
	Pow,
	/// `Sin`.
	Sin,
	/// `Cos`.
	Cos,
	/// `Tan`.
	Tan,
	/// `IndicatorConstraintLinLE`.
	IndicatorLinLe,
	/// `IndicatorConstraintLinEQ`.
	IndicatorLinEq,
	/// `IndicatorConstraintLinGE`.
	IndicatorLinGe,
	/// `IndicatorConstraintQuadLE`.
	IndicatorQuadLe,
	/// `IndicatorConstraintQuadEQ`.
	IndicatorQuadEq,
	/// `IndicatorConstraintQuadGE`.
	IndicatorQuadGe,
	/// `SOS1`.
	Sos1,
	/// `SOS2`.
	Sos2,
	/// `ComplementarityLinear`.
	ComplementarityLinear,
	/// `ComplementarityQuadratic`.
	ComplementarityQuadratic,
	/// `PLConstraint`.
	PiecewiseLinear,
}

impl ConstraintKind {
	/// All kinds, in the fixed registration order used for round-robin
	/// conversion across keepers (see `spec.md` §5, "Ordering").
	pub const ALL: &'static [ConstraintKind] = &[
		Self::LinConLe,
		Self::LinConEq,
		Self::LinConGe,
		Self::LinConRange,
		Self::QuadConLe,
		Self::QuadConEq,
		Self::QuadConGe,
		Self::QuadConRange,
		Self::LinearFunctional,
		Self::QuadraticFunctional,
		Self::Max,
		Self::Min,
		Self::Abs,
		Self::And,
		Self::Or,
		Self::Not,
		Self::Div,
		Self::IfThen,
		Self::CondLinConEq,
		Self::CondLinConLe,
		Self::CondLinConLt,
		Self::CondLinConGe,
		Self::CondLinConGt,
		Self::CondQuadConEq,
		Self::CondQuadConLe,
		Self::CondQuadConLt,
		Self::CondQuadConGe,
		Self::CondQuadConGt,
		Self::Count,
		Self::NumberofConst,
		Self::NumberofVar,
		Self::AllDiff,
		Self::Exp,
		Self::ExpA,
		Self::Log,
		Self::LogA,
		Self::Pow,
		Self::Sin,
		Self::Cos,
		Self::Tan,
		Self::IndicatorLinLe,
		Self::IndicatorLinEq,
		Self::IndicatorLinGe,
		Self::IndicatorQuadLe,
		Self::IndicatorQuadEq,
		Self::IndicatorQuadGe,
		Self::Sos1,
		Self::Sos2,
		Self::ComplementarityLinear,
		Self::ComplementarityQuadratic,
		Self::PiecewiseLinear,
	];

	/// The static, human-readable type name used for `GetDescription()` and
	/// `acc:<tag>` option names.
	pub fn name(self) -> &'static str {
		use ConstraintKind::*;
		match self {
			LinConLe => "LinConLE",
			LinConEq => "LinConEQ",
			LinConGe => "LinConGE",
			LinConRange => "LinConRange",
			QuadConLe => "QuadConLE",
			QuadConEq => "QuadConEQ",
			QuadConGe => "QuadConGE",
			QuadConRange => "QuadConRange",
			LinearFunctional => "LinearFunctionalConstraint",
			QuadraticFunctional => "QuadraticFunctionalConstraint",
			Max => "MaxConstraint",
			Min => "MinConstraint",
			Abs => "AbsConstraint",
			And => "AndConstraint",
			Or => "OrConstraint",
			Not => "NotConstraint",
			Div => "Div",
			IfThen => "IfThen",
			CondLinConEq => "CondLinConEQ",
			CondLinConLe => "CondLinConLE",
			CondLinConLt => "CondLinConLT",
			CondLinConGe => "CondLinConGE",
			CondLinConGt => "CondLinConGT",
			CondQuadConEq => "CondQuadConEQ",
			CondQuadConLe => "CondQuadConLE",
			CondQuadConLt => "CondQuadConLT",
			CondQuadConGe => "CondQuadConGE",
			CondQuadConGt => "CondQuadConGT",
			Count => "Count",
			NumberofConst => "NumberofConst",
			NumberofVar => "NumberofVar",
			AllDiff => "AllDiff",
			Exp => "Exp",
			ExpA => "ExpA",
			Log => "Log",
			LogA => "LogA",
			Pow => "Pow",
			Sin => "Sin",
			Cos => "Cos",
			Tan => "Tan",
			IndicatorLinLe => "IndicatorConstraintLinLE",
			IndicatorLinEq => "IndicatorConstraintLinEQ",
			IndicatorLinGe => "IndicatorConstraintLinGE",
			IndicatorQuadLe => "IndicatorConstraintQuadLE",
			IndicatorQuadEq => "IndicatorConstraintQuadEQ",
			IndicatorQuadGe => "IndicatorConstraintQuadGE",
			Sos1 => "SOS1",
			Sos2 => "SOS2",
			ComplementarityLinear => "ComplementarityLinear",
			ComplementarityQuadratic => "ComplementarityQuadratic",
			PiecewiseLinear => "PLConstraint",
		}
	}

	/// The `acc:<tag>` option suffix for this kind (lower-case type name).
	pub fn option_tag(self) -> String {
		self.name().to_ascii_lowercase()
	}
}

impl fmt::Display for ConstraintKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Declared acceptance level of a constraint kind by a [`crate::ModelAPI`].
pub enum Acceptance {
	/// The solver cannot ingest this kind natively; it must be converted.
	NotAccepted,
	/// The solver can ingest this kind, but a conversion is still preferred
	/// (e.g. it is numerically fragile or slow for that solver).
	AcceptedButNotRecommended,
	/// The solver's native support for this kind is the recommended target.
	Recommended,
}

impl Acceptance {
	/// Parse the `0`/`1`/`2` values used by the `acc:<tag>` option.
	pub fn from_option_value(v: i32) -> Option<Self> {
		match v {
			0 => Some(Self::NotAccepted),
			1 => Some(Self::AcceptedButNotRecommended),
			2 => Some(Self::Recommended),
			_ => None,
		}
	}
}
