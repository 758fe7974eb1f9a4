//! Simulation context implementing ClientContext for deterministic testing.

use endernode_env::{ClientContext, Location};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Simulation context backed by a virtual clock.
///
/// Time only moves when the scenario advances it, so every run with the same
/// seed sees exactly the same timestamps. Clones share the clock and the
/// location.
#[derive(Clone)]
pub struct SimContext {
    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,

    /// Where the simulated player is
    location: Arc<Mutex<Location>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl SimContext {
    /// Creates a context at t=0, standing in the End.
    pub fn new() -> Self {
        Self {
            virtual_time_ns: Arc::new(Mutex::new(0)),
            location: Arc::new(Mutex::new(Location::TheEnd)),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = lock(&self.virtual_time_ns);
        *time = time.saturating_add(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX));
    }

    /// Sets the virtual time to a specific value.
    pub fn set_time(&self, time: Duration) {
        *lock(&self.virtual_time_ns) = u64::try_from(time.as_nanos()).unwrap_or(u64::MAX);
    }

    /// Sets the virtual time in milliseconds.
    pub fn set_millis(&self, millis: u64) {
        self.set_time(Duration::from_millis(millis));
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *lock(&self.virtual_time_ns)
    }

    /// Moves the simulated player.
    pub fn set_location(&self, location: Location) {
        *lock(&self.location) = location;
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    fn location(&self) -> Location {
        *lock(&self.location)
    }
}
