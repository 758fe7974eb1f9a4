//! Live implementation of ClientContext for a running game client.

use crate::types::Location;
use crate::ClientContext;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Live context backed by the OS monotonic clock.
///
/// This is the "real" implementation used inside a running client. Time
/// comes from `Instant`, and the location is pushed in by the host whenever
/// its location tracker changes (scoreboard parse, server switch, ...).
pub struct LiveContext {
    /// Start time for monotonic duration calculations
    start: Instant,

    /// Last location reported by the host
    location: RwLock<Location>,
}

impl LiveContext {
    /// Creates a new LiveContext in an unknown location.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            location: RwLock::new(Location::Unknown),
        }
    }

    /// Creates an Arc-wrapped context for sharing across threads.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Records a location change reported by the host.
    pub fn set_location(&self, location: Location) {
        let mut slot = self.location.write().unwrap_or_else(|e| e.into_inner());
        *slot = location;
    }
}

impl Default for LiveContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientContext for LiveContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn location(&self) -> Location {
        *self.location.read().unwrap_or_else(|e| e.into_inner())
    }
}
