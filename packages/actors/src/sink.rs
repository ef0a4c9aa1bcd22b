//! Event sink trait and helpers.

/// Receives one rendered line per state-changing event.
///
/// Sinks are called synchronously, sometimes while the controller lock is
/// held, so they must return quickly. They are treated as infallible.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, text: &str);
}

impl<F> EventSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn emit(&self, text: &str) {
        self(text)
    }
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _text: &str) {}
}
