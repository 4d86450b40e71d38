//! The three line-oriented log sinks: access, debug and request. Reflected
//! as a small capability trait rather than a concrete type, so tests can
//! substitute an in-memory recorder.

use std::io::Write;
use std::sync::Mutex;

/// A line-oriented log destination, safe for concurrent per-line appends.
pub trait Sink: Send + Sync {
	/// Writes `line`, appending exactly one trailing newline.
	fn println(&self, line: &str);

	/// Formats `args` and writes the result via [`Sink::println`].
	fn printf(&self, args: std::fmt::Arguments<'_>) {
		self.println(&args.to_string());
	}
}

/// Default sink: line-buffered writes to an arbitrary [`Write`], guarded by
/// a mutex so concurrent handlers never interleave a line.
pub struct WriterSink<W> {
	inner: Mutex<W>,
}

impl<W: Write> WriterSink<W> {
	pub fn new(writer: W) -> Self {
		WriterSink {
			inner: Mutex::new(writer),
		}
	}
}

impl<W: Write + Send> Sink for WriterSink<W> {
	fn println(&self, line: &str) {
		let mut w = self.inner.lock().expect("sink mutex poisoned");
		let _ = writeln!(w, "{line}");
	}
}

/// The default access/debug/request sinks write to stderr.
pub fn stderr_sink() -> WriterSink<std::io::Stderr> {
	WriterSink::new(std::io::stderr())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex as StdMutex};

	struct RecordingSink(Arc<StdMutex<Vec<String>>>);
	impl Sink for RecordingSink {
		fn println(&self, line: &str) {
			self.0.lock().unwrap().push(line.to_string());
		}
	}

	#[test]
	fn printf_defaults_to_formatting_then_println() {
		let lines = Arc::new(StdMutex::new(Vec::new()));
		let sink = RecordingSink(lines.clone());
		sink.printf(format_args!("{} - {}:{}", 200, "GET", "/a"));
		assert_eq!(lines.lock().unwrap().as_slice(), ["200 - GET:/a"]);
	}
}
