//! The "REAPER" - decides when a tracked block stops being a node.

use crate::config::DetectorConfig;
use crate::evidence::Candidate;
use endernode_env::{BlockId, BlockPos, BlockView};
use serde::Serialize;

/// Why a candidate left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The block now reads as the post-mine marker
    Mined,
    /// Confirmed node went silent for longer than the timeout
    Expired,
    /// The player attacked the block
    Attacked,
    /// World change cleared the table
    Reset,
}

/// Eviction rules applied during the tick pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaperPolicy {
    /// Tile that marks a mined node
    pub mined_block: BlockId,

    /// Silence allowed for a confirmed node before it is dropped (ms)
    pub timeout_ms: u64,
}

impl ReaperPolicy {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            mined_block: config.mined_block,
            timeout_ms: config.particle_timeout_ms,
        }
    }

    /// Returns the reason `candidate` should be removed, if any.
    ///
    /// The block check applies to every candidate. The silence check only
    /// applies to confirmed nodes; unconfirmed candidates simply never
    /// promote if their particles stop.
    pub fn check<W>(
        &self,
        pos: BlockPos,
        candidate: &Candidate,
        world: &W,
        now_ms: u64,
    ) -> Option<RemovalReason>
    where
        W: BlockView + ?Sized,
    {
        if world.block_at(pos) == self.mined_block {
            return Some(RemovalReason::Mined);
        }
        if candidate.is_confirmed() && candidate.silence_ms(now_ms) > self.timeout_ms {
            return Some(RemovalReason::Expired);
        }
        None
    }
}

impl Default for ReaperPolicy {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}
