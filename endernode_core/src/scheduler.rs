//! Game-tick divider for the periodic pass.

/// Fires once every `interval` game ticks.
///
/// The first firing is on the `interval`-th call to [`advance`](Self::advance),
/// so with the default of 5 the pass runs on ticks 5, 10, 15, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicSchedule {
    interval: u32,
    counter: u32,
}

impl CyclicSchedule {
    /// Creates a schedule firing every `interval` ticks. An interval of zero
    /// is treated as one.
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Counts one game tick and returns true if the pass is due.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Ticks remaining until the next firing.
    pub fn ticks_until_due(&self) -> u32 {
        self.interval - self.counter
    }
}
