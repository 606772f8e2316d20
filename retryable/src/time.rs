use jiff::{Span, Timestamp};
use std::cell::Cell;
use std::rc::Rc;

/// Where cache ages are measured from.
///
/// The system source reads the wall clock. A mock source holds a fixed
/// instant that only moves through [`TimeSource::advance`] or
/// [`TimeSource::set`]; clones share the same instant.
#[derive(Clone, Default)]
pub struct TimeSource {
    mock: Option<Rc<Cell<Timestamp>>>,
}

impl TimeSource {
    pub fn new() -> Self {
        Self { mock: None }
    }

    pub fn mock(initial_time: Timestamp) -> Self {
        Self {
            mock: Some(Rc::new(Cell::new(initial_time))),
        }
    }

    pub fn now(&self) -> Timestamp {
        match &self.mock {
            Some(time) => time.get(),
            None => Timestamp::now(),
        }
    }

    /// Milliseconds since the Unix epoch, the unit cache entries are stamped
    /// with.
    pub fn now_ms(&self) -> i64 {
        self.now().as_millisecond()
    }

    pub fn advance(&self, duration: Span) {
        match &self.mock {
            Some(time) => time.set(time.get() + duration),
            None => tracing::warn!("ignoring advance on the system time source"),
        }
    }

    pub fn set(&self, time: Timestamp) {
        match &self.mock {
            Some(current) => current.set(time),
            None => tracing::warn!("ignoring set on the system time source"),
        }
    }
}
