//! [`ConvertOptions`]: the converter's configuration, parsed from
//! `key:value`/`key=value` option strings the way an AMPL solver driver
//! accepts `cvt:*`, `acc:*`, `alg:*` and `tech:*` options on its command
//! line.

use std::collections::HashMap;

use crate::{error::ConvertError, kind::Acceptance};

#[derive(Debug, Clone, Default)]
/// Options controlling the conversion cascade, built up via `with_*`
/// setters or parsed from option strings with [`ConvertOptions::apply`].
pub struct ConvertOptions {
	per_kind_acceptance: HashMap<String, Acceptance>,
	presolve_all: bool,
	presolve_eq_result: bool,
	presolve_eq_binary: bool,
	relax: bool,
	writegraph_path: Option<String>,
	timelimit_raw: Option<String>,
}

impl ConvertOptions {
	/// `cvt:pre:all` default: presolve simplifications (other than the
	/// structural rewrites needed for acceptance) are off unless requested.
	pub const DEFAULT_PRESOLVE_ALL: bool = false;
	/// `cvt:pre:eqresult` default.
	pub const DEFAULT_PRESOLVE_EQ_RESULT: bool = true;
	/// `cvt:pre:eqbinary` default.
	pub const DEFAULT_PRESOLVE_EQ_BINARY: bool = true;
	/// `alg:relax` default: keep integrality.
	pub const DEFAULT_RELAX: bool = false;

	/// Override the acceptance level declared by the `ModelAPI` for a given
	/// kind (`acc:<name>`).
	pub fn with_acceptance_override(mut self, kind_name: impl Into<String>, acc: Acceptance) -> Self {
		self.per_kind_acceptance.insert(kind_name.into(), acc);
		self
	}

	/// Enable all optional presolve simplifications (`cvt:pre:all`).
	pub fn with_presolve_all(mut self, on: bool) -> Self {
		self.presolve_all = on;
		self
	}

	/// Enable folding `y = x` functional results into `x` directly
	/// (`cvt:pre:eqresult`).
	pub fn with_presolve_eq_result(mut self, on: bool) -> Self {
		self.presolve_eq_result = on;
		self
	}

	/// Enable folding binary-valued equality results (`cvt:pre:eqbinary`).
	pub fn with_presolve_eq_binary(mut self, on: bool) -> Self {
		self.presolve_eq_binary = on;
		self
	}

	/// Relax all integer variables to continuous (`alg:relax`).
	pub fn with_relax(mut self, on: bool) -> Self {
		self.relax = on;
		self
	}

	/// Write the presolve DAG as JSON-lines to `path` (`tech:writegraph`).
	pub fn with_writegraph_path(mut self, path: impl Into<String>) -> Self {
		self.writegraph_path = Some(path.into());
		self
	}

	/// Set the raw (unparsed) `tech:timelimit` value; the converter core has
	/// no business depending on a duration-parsing crate, so this is left as
	/// a string for the driver (which does) to parse.
	pub fn with_timelimit_raw(mut self, value: impl Into<String>) -> Self {
		self.timelimit_raw = Some(value.into());
		self
	}

	/// The acceptance override for `kind_name`, if the user set one.
	pub fn acceptance_override(&self, kind_name: &str) -> Option<Acceptance> {
		self.per_kind_acceptance.get(kind_name).copied()
	}

	/// `cvt:pre:all`.
	pub fn presolve_all(&self) -> bool {
		self.presolve_all
	}

	/// `cvt:pre:eqresult`.
	pub fn presolve_eq_result(&self) -> bool {
		self.presolve_eq_result || self.presolve_all
	}

	/// `cvt:pre:eqbinary`.
	pub fn presolve_eq_binary(&self) -> bool {
		self.presolve_eq_binary || self.presolve_all
	}

	/// `alg:relax`.
	pub fn relax(&self) -> bool {
		self.relax
	}

	/// `tech:writegraph <path>`, if set.
	pub fn writegraph_path(&self) -> Option<&str> {
		self.writegraph_path.as_deref()
	}

	/// `tech:timelimit <duration>`, unparsed; the driver owns duration
	/// parsing (e.g. via `humantime`).
	pub fn timelimit_raw(&self) -> Option<&str> {
		self.timelimit_raw.as_deref()
	}

	/// Parse and apply one `key:value` or `key=value` option string.
	///
	/// Recognized keys: `acc:<tag>` (value `0`/`1`/`2`), `cvt:pre:all`,
	/// `cvt:pre:eqresult`, `cvt:pre:eqbinary` (each a `0`/`1` flag),
	/// `alg:relax` (`0`/`1`), `tech:writegraph` (a path).
	pub fn apply(&mut self, option: &str) -> Result<(), ConvertError> {
		let (key, value) = split_option(option)?;
		if let Some(tag) = key.strip_prefix("acc:") {
			let n: i32 = value.parse().map_err(|_| invalid(key, value))?;
			let acc = Acceptance::from_option_value(n).ok_or_else(|| invalid(key, value))?;
			self.per_kind_acceptance.insert(tag.to_string(), acc);
			return Ok(());
		}
		match key {
			"cvt:pre:all" => self.presolve_all = parse_flag(key, value)?,
			"cvt:pre:eqresult" => self.presolve_eq_result = parse_flag(key, value)?,
			"cvt:pre:eqbinary" => self.presolve_eq_binary = parse_flag(key, value)?,
			"alg:relax" => self.relax = parse_flag(key, value)?,
			"tech:writegraph" => self.writegraph_path = Some(value.to_string()),
			"tech:timelimit" => self.timelimit_raw = Some(value.to_string()),
			_ => return Err(invalid(key, value)),
		}
		Ok(())
	}

	/// One-line descriptions of every recognized option, for a driver's
	/// `--options`/`-=` listing flag.
	pub fn descriptions() -> &'static [(&'static str, &'static str)] {
		&[
			("acc:<tag>", "override acceptance level (0/1/2) for a constraint kind"),
			("cvt:pre:all", "enable all optional presolve simplifications"),
			("cvt:pre:eqresult", "fold y=x functional results into x directly"),
			("cvt:pre:eqbinary", "fold binary-valued equality results"),
			("alg:relax", "relax all integer variables to continuous"),
			("tech:writegraph", "write the presolve DAG as JSON-lines to <path>"),
			("tech:timelimit", "stop the solve after <duration> (e.g. 10s, 2m)"),
		]
	}
}

fn split_option(option: &str) -> Result<(&str, &str), ConvertError> {
	if let Some(pos) = option.find('=') {
		Ok((&option[..pos], &option[pos + 1..]))
	} else if let Some(pos) = option.rfind(':') {
		Ok((&option[..pos], &option[pos + 1..]))
	} else {
		Err(invalid(option, ""))
	}
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConvertError> {
	match value {
		"0" => Ok(false),
		"1" => Ok(true),
		_ => Err(invalid(key, value)),
	}
}

fn invalid(name: &str, value: &str) -> ConvertError {
	ConvertError::InvalidOption {
		name: name.to_string(),
		value: value.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn acc_option_overrides_a_specific_kind() {
		let mut opts = ConvertOptions::default();
		opts.apply("acc:linconrange:0").unwrap();
		assert_eq!(opts.acceptance_override("linconrange"), Some(Acceptance::NotAccepted));
	}

	#[test]
	fn pre_all_implies_the_individual_flags() {
		let opts = ConvertOptions::default().with_presolve_all(true);
		assert!(opts.presolve_eq_result());
		assert!(opts.presolve_eq_binary());
	}

	#[test]
	fn writegraph_takes_a_path() {
		let mut opts = ConvertOptions::default();
		opts.apply("tech:writegraph=/tmp/graph.jsonl").unwrap();
		assert_eq!(opts.writegraph_path(), Some("/tmp/graph.jsonl"));
	}

	#[test]
	fn timelimit_is_kept_as_a_raw_string() {
		let mut opts = ConvertOptions::default();
		opts.apply("tech:timelimit=10s").unwrap();
		assert_eq!(opts.timelimit_raw(), Some("10s"));
	}

	#[test]
	fn unknown_option_is_an_error() {
		let mut opts = ConvertOptions::default();
		assert!(opts.apply("bogus:1").is_err());
	}
}
