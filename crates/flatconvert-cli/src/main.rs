//! `flatconvert`: a CLI driver exercising the redefinition cascade end to end
//! against an in-memory stand-in for a commercial solver binding.
//!
//! The real `<solver_exe> <stub> -AMPL` invocation — reading `<stub>.nl`,
//! writing `<stub>.sol`, talking to a native solver SDK — is external
//! plumbing the specification explicitly puts out of scope (see
//! `DESIGN.md`). This driver accepts the same invocation shape for
//! compatibility, but converts and "solves" a small bundled demo model
//! through [`flatconvert::testkit`] instead of reading a real NL file.

mod trace;

use std::{io::IsTerminal, process::ExitCode};

use flatconvert::{
	backend::{Backend, Interrupter, Status},
	constraints::abs::AbsConstraint,
	model::{FlatModel, Objective},
	options::ConvertOptions,
	testkit::{InMemoryBackend, InMemoryModel},
	var::VarType,
	ConvertError, FlatConverter,
};
use tracing::{error, info};

/// `-h`/`--help` text.
const HELP: &str = "\
flatconvert [OPTIONS] [STUB]

  -AMPL              accepted for compatibility with the AMPL solver-executable
                      invocation convention; NL-file reading is out of scope
                      for this driver, so a bundled demo model is converted
                      and solved in its place
  -v                  increase log verbosity (repeatable)
  -t <duration>       shorthand for tech:timelimit=<duration> (e.g. 10s, 2m)
  -=, --options       list recognized cvt:/acc:/alg:/tech: options and exit
  key:value           a converter option, may be repeated (e.g. cvt:pre:all=1)
";

/// Parse CLI options, then build, convert, and solve the bundled demo model.
fn main() -> ExitCode {
	let mut args = pico_args::Arguments::from_env();

	if args.contains(["-h", "--help"]) {
		print!("{HELP}");
		return ExitCode::SUCCESS;
	}
	if args.contains(["-=", "--options"]) {
		for (name, doc) in ConvertOptions::descriptions() {
			println!("{name}\t{doc}");
		}
		return ExitCode::SUCCESS;
	}

	let verbose: u8 = args.opt_value_from_str("-v").ok().flatten().unwrap_or(0);
	let ansi = std::io::stderr().is_terminal();
	let subscriber = trace::create_subscriber(verbose, std::io::stderr, ansi);
	if tracing::subscriber::set_global_default(subscriber).is_err() {
		eprintln!("a global tracing subscriber was already installed");
	}

	let _ampl_compat = args.contains("-AMPL");
	let dash_t: Option<String> = args.opt_value_from_str("-t").ok().flatten();
	let stub: Option<String> = args.free_from_str().ok();
	if let Some(stub) = &stub {
		info!(stub, "NL-file reading is out of scope for this driver; running the bundled demo model instead");
	}

	let mut options = ConvertOptions::default();
	if let Some(t) = dash_t {
		options = options.with_timelimit_raw(t);
	}
	for arg in args.finish() {
		let Some(arg) = arg.to_str() else {
			error!("ignoring a non-UTF8 option");
			continue;
		};
		if let Err(e) = options.apply(arg) {
			error!(option = arg, error = %e, "rejected converter option");
			return ExitCode::FAILURE;
		}
	}

	let time_limit = match options.timelimit_raw().map(humantime::parse_duration) {
		Some(Ok(d)) => Some(d),
		Some(Err(e)) => {
			error!(error = %e, "invalid tech:timelimit duration");
			return ExitCode::FAILURE;
		}
		None => None,
	};

	match run(&options, time_limit) {
		Ok((status, report)) => {
			// Exit 0 for any status the solver itself reached; 1 is reserved
			// for configuration and I/O failures, surfaced via `Err` below.
			println!("{report}");
			info!(?status, "finished");
			ExitCode::SUCCESS
		}
		Err(e) => {
			error!(error = %e, "conversion or solve failed");
			ExitCode::FAILURE
		}
	}
}

/// Build a small demo model (`y = |x|`, minimize `y`, `-5 <= x <= 5`),
/// convert it with `options` against [`InMemoryModel`]'s realistic
/// commercial-solver acceptance profile, and solve it with
/// [`InMemoryBackend`]. Exercises [`AbsConstraint`]'s redefinition rule
/// since `Abs` is never natively accepted by the demo model.
///
/// Returns the solve status and a JSON-lines summary (status, objective,
/// primal) suitable for a driver script to consume.
fn run(options: &ConvertOptions, time_limit: Option<std::time::Duration>) -> Result<(Status, String), ConvertError> {
	let mut model = FlatModel::default();
	let x = model.add_var(-5.0, 5.0, VarType::Continuous)?;
	let y = model.add_var(0.0, f64::INFINITY, VarType::Continuous)?;
	model.set_objective(
		0,
		Objective {
			maximize: false,
			linear: vec![(y, 1.0)],
			quadratic: Vec::new(),
			constant: 0.0,
		},
	);
	model.finish_model_input();

	let mut model_api = InMemoryModel::new("flatconvert-demo");
	let mut cvt = FlatConverter::new(&mut model, &mut model_api, options);
	let _ = cvt.add_constraint(AbsConstraint::new(y, x))?;
	cvt.convert_items()?;
	cvt.finish()?;

	let mut backend = InMemoryBackend::from_model(&model_api);
	let interrupter = Interrupter::new();
	let for_handler = interrupter.clone();
	if ctrlc::set_handler(move || for_handler.trigger()).is_err() {
		error!("failed to install the interrupt handler; Ctrl-C will not stop a running solve");
	}
	if let Some(limit) = time_limit {
		let for_timer = interrupter.clone();
		let _handle = std::thread::spawn(move || {
			std::thread::sleep(limit);
			for_timer.trigger();
		});
	}

	let status = backend.solve(&interrupter)?;
	let (objective, primal) = if status == Status::Solved {
		let solution = backend.solution()?;
		info!(objective = solution.objective_value, primal = ?solution.primal, "solved");
		(Some(solution.objective_value), Some(solution.primal))
	} else {
		(None, None)
	};
	let report = serde_json::json!({
		"status": format!("{status:?}"),
		"objective": objective,
		"primal": primal,
	})
	.to_string();
	Ok((status, report))
}
