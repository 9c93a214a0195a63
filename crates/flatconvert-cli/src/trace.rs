//! Module that contains the implementation of a [`tracing::Subscriber`]
//! factory for `flatconvert`'s CLI driver.

use tracing::Level;
use tracing_subscriber::fmt::{time::uptime, MakeWriter};

/// Create a [`tracing::Subscriber`] for the driver, with verbosity mapped
/// from the repeated `-v` CLI flag: `0` is `INFO`, `1` is `DEBUG`, `2` or
/// more is `TRACE`.
pub(crate) fn create_subscriber<W>(verbose: u8, make_writer: W, ansi: bool) -> impl tracing::Subscriber
where
	W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::fmt()
		.with_max_level(match verbose {
			0 => Level::INFO,
			1 => Level::DEBUG,
			_ => Level::TRACE,
		})
		.with_writer(make_writer)
		.with_ansi(ansi)
		.with_timer(uptime())
		.finish()
}
