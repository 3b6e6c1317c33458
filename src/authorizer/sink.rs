//! Log sinks for per-request gate messages
//!
//! Denials, verification failures and decoded-claim notices go through a
//! [`LogSink`] chosen at configuration time. The default, [`TracingSink`],
//! hands them to `tracing`, so they land wherever the host's subscriber
//! writes.

use std::io::Write;

/// Severity attached to a sink message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLevel {
    Debug,
    Info,
    Warn,
}

/// Receiver for gate messages
pub trait LogSink: Send + Sync {
    fn log(&self, level: SinkLevel, message: &str);
}

/// Forwards messages to `tracing` at their level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: SinkLevel, message: &str) {
        match level {
            SinkLevel::Debug => tracing::debug!(target: "authgate", "{message}"),
            SinkLevel::Info => tracing::info!(target: "authgate", "{message}"),
            SinkLevel::Warn => tracing::warn!(target: "authgate", "{message}"),
        }
    }
}

/// Writes every message as a plain line on standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn log(&self, _level: SinkLevel, message: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{message}");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: SinkLevel, _message: &str) {}
}

/// Sink backed by a closure; see [`sink_fn`]
#[derive(Clone)]
pub struct FnSink<F>(F);

impl<F> LogSink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, _level: SinkLevel, message: &str) {
        (self.0)(message)
    }
}

/// Use a unary closure as a sink
///
/// ```
/// use authgate::authorizer::sink_fn;
///
/// let sink = sink_fn(|message| eprintln!("[gate] {message}"));
/// # let _ = sink;
/// ```
pub fn sink_fn<F>(f: F) -> FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    FnSink(f)
}
