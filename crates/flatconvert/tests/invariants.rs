//! General invariants the conversion cascade and its supporting data
//! structures must uphold regardless of which constraint types are in play.

mod common;

use common::RecordingModel;
use flatconvert::{
	constraints::abs::AbsConstraint,
	context::Context,
	error::ConvertError,
	keeper::Constraint,
	model::FlatModel,
	options::ConvertOptions,
	presolve::{Aggregator, ValueFamily, ValuePresolver},
	var::VarType,
	FlatConverter,
};

/// Invariant 1: once [`FlatConverter::convert_items`] has run to a fixed
/// point, running it again is a no-op — every rejected constraint type has
/// already been fully drained, so a second pass pushes nothing new.
#[test]
fn convert_items_is_idempotent_once_drained() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let x = model.add_var(-5.0, 5.0, VarType::Continuous)?;
	let y = model.add_var(0.0, f64::INFINITY, VarType::Continuous)?;

	let mut model_api = RecordingModel::new();
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.add_constraint(AbsConstraint::new(y, x))?;
	cvt.convert_items()?;
	let rows_after_first_pass = model_api.linear_rows.len();
	assert!(rows_after_first_pass > 0);

	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	cvt.convert_items()?;
	assert_eq!(model_api.linear_rows.len(), rows_after_first_pass);
	Ok(())
}

/// Invariant 2: a mapped keeper never stores two structurally-equal
/// constraints; re-adding one with the same dedup key returns the existing
/// index instead of growing the pool.
#[test]
fn dedup_keeps_only_one_copy_of_structurally_equal_constraints() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let arg = model.add_var(-5.0, 5.0, VarType::Continuous)?;
	let result_a = model.add_var(0.0, 5.0, VarType::Continuous)?;
	let result_b = model.add_var(0.0, 5.0, VarType::Continuous)?;

	let mut model_api = RecordingModel::new();
	let options = ConvertOptions::default();
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, &options);
	let (idx_a, _) = cvt.add_constraint(AbsConstraint::new(result_a, arg))?;
	// Same argument, different result: the dedup key only depends on `arg`.
	let (idx_b, _) = cvt.add_constraint(AbsConstraint::new(result_b, arg))?;
	assert_eq!(idx_a, idx_b);
	Ok(())
}

/// Invariant 3: bounds only ever narrow. Tightening to a looser value than
/// the current bound is a no-op, and repeated tightening never loosens.
#[test]
fn bounds_only_ever_narrow() -> Result<(), ConvertError> {
	let mut model = FlatModel::default();
	let v = model.add_var(0.0, 5.0, VarType::Continuous)?;

	assert!(!model.tighten_ub(v, 10.0)?);
	assert_eq!(model.var(v).ub(), 5.0);

	assert!(model.tighten_ub(v, 2.0)?);
	assert_eq!(model.var(v).ub(), 2.0);

	assert!(!model.tighten_ub(v, 3.0)?);
	assert_eq!(model.var(v).ub(), 2.0);

	assert!(!model.tighten_lb(v, -1.0)?);
	assert_eq!(model.var(v).lb(), 0.0);

	assert!(model.tighten_lb(v, 1.0)?);
	assert_eq!(model.var(v).lb(), 1.0);
	Ok(())
}

/// Invariant 4: every value-node range grown inside an autolink scope ends
/// up as exactly one link's target — no allocated range is left dangling
/// once the scope closes.
#[test]
fn every_range_grown_inside_a_scope_is_linked_exactly_once() {
	let mut presolver = ValuePresolver::default();
	let source = presolver.grow(ValueFamily::Var, 1);
	presolver.open_autolink_scope();
	let a = presolver.grow(ValueFamily::Obj, 1);
	let b = presolver.grow(ValueFamily::Obj, 1);
	presolver.close_autolink_scope(source, Aggregator::Sum);
	assert_eq!(presolver.links().len(), 1);

	// If both `a` and `b` were really captured as this link's targets, a
	// `Sum` aggregator should fold both of their values into `source`; if
	// either range had been left unlinked, the sum would be short.
	presolver.set(ValueFamily::Obj, a.first, 3.0);
	presolver.set(ValueFamily::Obj, b.first, 4.0);
	presolver.postsolve();
	assert_eq!(presolver.get(ValueFamily::Var, source.first), Some(7.0));
}

/// Invariant 5: postsolve round-trips a value set on a link's target back
/// to its source, through an arbitrary chain of links.
#[test]
fn postsolve_round_trips_through_a_link() {
	let mut presolver = ValuePresolver::default();
	let source = presolver.grow(ValueFamily::Var, 1);
	presolver.open_autolink_scope();
	let target = presolver.grow(ValueFamily::Obj, 1);
	presolver.close_autolink_scope(source, Aggregator::First);

	presolver.set(ValueFamily::Obj, target.first, 13.0);
	presolver.postsolve();
	assert_eq!(presolver.get(ValueFamily::Var, source.first), Some(13.0));
}

/// Invariant 6: the context lattice's merge is idempotent, and so is a
/// constraint's `merge_context` built on top of it.
#[test]
fn context_merge_is_idempotent_on_a_constraint() {
	let mut c = AbsConstraint::new(flatconvert::var::VarId::from_raw(1), flatconvert::var::VarId::from_raw(0));
	assert_eq!(c.context(), Context::None);

	c.merge_context(Context::Positive);
	c.merge_context(Context::Positive);
	assert_eq!(c.context(), Context::Positive);

	c.merge_context(Context::Negative);
	assert_eq!(c.context(), Context::Mixed);

	c.merge_context(Context::Mixed);
	assert_eq!(c.context(), Context::Mixed);
}
