//! Detector Metrics
//! ================
//!
//! Plain counters describing what the detector has done since construction.
//! The detection pass never logs; hosts read these (or the per-pass
//! [`TickOutcome`]) and decide what to report.

use crate::reaper::RemovalReason;
use serde::Serialize;

/// Cumulative counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectorMetrics {
    /// Particle events handed to the router
    pub particles_received: u64,
    /// Dropped because the detector was disabled or outside the End
    pub particles_gated: u64,
    /// Dropped by the geometry decoder
    pub particles_ignored: u64,
    /// Attributed to a candidate
    pub particles_ingested: u64,
    /// Fresh candidates created
    pub candidates_created: u64,
    /// Candidates promoted to nodes
    pub nodes_confirmed: u64,
    pub removed_mined: u64,
    pub removed_expired: u64,
    pub removed_attacked: u64,
    /// World joins (each clears the table)
    pub resets: u64,
    /// Candidates discarded by resets
    pub reset_discarded: u64,
    /// Tick passes that ran to completion
    pub passes_run: u64,
    /// Tick passes skipped because no world was loaded
    pub passes_without_world: u64,
}

impl DetectorMetrics {
    pub(crate) fn record_removal(&mut self, reason: RemovalReason, count: u64) {
        match reason {
            RemovalReason::Mined => self.removed_mined += count,
            RemovalReason::Expired => self.removed_expired += count,
            RemovalReason::Attacked => self.removed_attacked += count,
            RemovalReason::Reset => self.reset_discarded += count,
        }
    }

    /// Total removals for any reason other than a reset.
    pub fn removals(&self) -> u64 {
        self.removed_mined + self.removed_expired + self.removed_attacked
    }
}

/// What one pass over the table did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Candidates visited
    pub visited: usize,
    /// Evaluated and still unconfirmed
    pub pending: usize,
    /// Skipped by the per-candidate rate limit
    pub rate_limited: usize,
    pub promoted: usize,
    pub mined: usize,
    pub expired: usize,
}

impl PassSummary {
    /// Returns true if the pass changed the set of confirmed nodes.
    pub fn changed_nodes(&self) -> bool {
        self.promoted > 0 || self.mined > 0 || self.expired > 0
    }
}

/// Result of a tick event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Not a pass tick
    NotDue,
    /// Detector disabled or player outside the End
    Disabled,
    /// Pass tick, but no world to query
    NoWorld,
    /// Pass ran
    Completed(PassSummary),
}

impl TickOutcome {
    /// The pass summary, if a pass ran.
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            TickOutcome::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}
