use std::cell::Cell;
use std::rc::Rc;

/// Absolute time or time delta, in microseconds
pub type Longtime = i64;

pub const LONGTIME_SECOND: Longtime = 1_000_000;
pub const LONGTIME_MILLISECOND: Longtime = 1_000;

/// Microseconds since the Unix epoch.
/// Sourced from the wall clock, so it follows any adjustment of the system time.
pub fn longtime_now() -> Longtime {
    chrono::Utc::now().timestamp_micros()
}

/// Source of the current time for timer scheduling
pub trait Clock {
    fn now(&self) -> Longtime;
}

/// Wall clock, see longtime_now()
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Longtime {
        longtime_now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Longtime>>,
}

impl ManualClock {
    pub fn new(start: Longtime) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, t: Longtime) {
        self.now.set(t);
    }

    pub fn advance(&self, delta: Longtime) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Longtime {
        self.now.get()
    }
}
