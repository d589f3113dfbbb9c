//! Time sources for the update gate.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of wall-clock time for [`StateMachine::update`](crate::StateMachine::update).
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the machine.
///
/// # Example
///
/// ```rust
/// use switchyard::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!((clock.now() - start).num_seconds(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    /// Start at the current system time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(instant: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(instant)),
        }
    }

    /// Move the clock forward, saturating at the latest representable instant.
    pub fn advance(&self, by: Duration) {
        let current = self.now.get();
        let next = chrono::Duration::from_std(by)
            .ok()
            .and_then(|delta| current.checked_add_signed(delta));
        self.now.set(next.unwrap_or(DateTime::<Utc>::MAX_UTC));
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Whether at least `interval` has passed between `last` and `now`.
///
/// With no previous update the gate is open. A clock that moved backwards
/// only passes a zero interval.
pub(crate) fn interval_elapsed(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: Duration,
) -> bool {
    let Some(last) = last else {
        return true;
    };
    match now.signed_duration_since(last).to_std() {
        Ok(elapsed) => elapsed >= interval,
        Err(_) => interval.is_zero(),
    }
}
