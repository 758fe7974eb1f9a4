//! The "CONFIRMATION" Engine - promotes candidates to nodes.
//!
//! A genuine node keeps emitting both portal and witch particles on every
//! exposed face. Requiring both kinds on the *same* face keeps stray particles
//! that happen to land on nearby cells from adding up to a false node.

use crate::config::DetectorConfig;
use crate::evidence::Candidate;

/// Result of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Already a node; nothing to do
    AlreadyConfirmed,
    /// Evaluated too recently; counters untouched
    RateLimited,
    /// Threshold met; candidate promoted and counters cleared
    Promoted,
    /// Threshold not met; attempt stamped, counters kept
    Pending,
}

/// Thresholds and pacing for promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Portal particles needed on one face
    pub min_portal: u32,

    /// Witch particles needed on that same face
    pub min_witch: u32,

    /// Minimum time between evaluations of one candidate (ms)
    pub interval_ms: u64,
}

impl ConfirmationPolicy {
    /// Builds the policy from `config`. Thresholds below one are raised to
    /// one, so a face always needs both kinds.
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            min_portal: config.min_portal_per_face.max(1),
            min_witch: config.min_witch_per_face.max(1),
            interval_ms: config.confirmation_interval_ms,
        }
    }

    /// Returns true if `candidate` was evaluated less than `interval_ms` ago.
    ///
    /// A candidate that has never been evaluated is never rate-limited.
    pub fn is_rate_limited(&self, candidate: &Candidate, now_ms: u64) -> bool {
        candidate
            .last_confirmation_attempt()
            .is_some_and(|last| now_ms.saturating_sub(last) < self.interval_ms)
    }

    /// Evaluates `candidate` and promotes it if a single face carries enough
    /// of both particle kinds.
    pub fn evaluate(&self, candidate: &mut Candidate, now_ms: u64) -> Verdict {
        if candidate.is_confirmed() {
            return Verdict::AlreadyConfirmed;
        }
        if self.is_rate_limited(candidate, now_ms) {
            return Verdict::RateLimited;
        }

        if candidate.has_coincident_face(self.min_portal.max(1), self.min_witch.max(1)) {
            candidate.confirm(now_ms);
            Verdict::Promoted
        } else {
            candidate.mark_attempt(now_ms);
            Verdict::Pending
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}
