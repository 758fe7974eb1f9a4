//! Core environment context trait for the detector.

use crate::types::Location;
use std::time::Duration;

/// The central interface for environment interaction.
///
/// This trait abstracts the game client so the detector can run against a
/// live client or against the simulator.
///
/// # Implementations
///
/// - **Live**: `LiveContext` - wraps `std::time::Instant` and a location slot
///   updated by the host
/// - **Simulation**: `SimContext` - virtual clock advanced by the scenario
///
/// # Monotonicity
///
/// `now()` must never go backwards. The detector does not guard against a
/// clock that does; it only uses saturating arithmetic so a misbehaving clock
/// cannot panic it.
pub trait ClientContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Returns the location the client is currently in.
    ///
    /// Used together with the configuration flag to decide whether particle
    /// and tick events are processed at all.
    fn location(&self) -> Location;

    /// Returns `now()` truncated to whole milliseconds.
    fn now_millis(&self) -> u64 {
        u64::try_from(self.now().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Duration);

    impl ClientContext for Fixed {
        fn now(&self) -> Duration {
            self.0
        }

        fn location(&self) -> Location {
            Location::TheEnd
        }
    }

    #[test]
    fn test_now_millis_truncates() {
        let ctx = Fixed(Duration::from_micros(1_500_999));
        assert_eq!(ctx.now_millis(), 1_500);
    }

    #[test]
    fn test_now_millis_saturates() {
        let ctx = Fixed(Duration::MAX);
        assert_eq!(ctx.now_millis(), u64::MAX);
    }
}
