//! Block-state access for the detector.

use crate::types::{BlockId, BlockPos};

/// Read-only view of the loaded world.
///
/// # Implementations
///
/// - **Live**: adapter over the client's chunk cache
/// - **Simulation**: `SimWorld`, a sparse block grid
///
/// Positions outside loaded chunks should report [`BlockId::AIR`].
pub trait BlockView {
    /// Returns the tile at `pos`.
    fn block_at(&self, pos: BlockPos) -> BlockId;
}

impl<W: BlockView + ?Sized> BlockView for &W {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        (**self).block_at(pos)
    }
}

impl<W: BlockView + ?Sized> BlockView for std::sync::Arc<W> {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        (**self).block_at(pos)
    }
}

impl BlockView for std::collections::HashMap<BlockPos, BlockId> {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.get(&pos).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_hashmap_view_defaults_to_air() {
        let mut blocks = HashMap::new();
        blocks.insert(BlockPos::new(1, 2, 3), BlockId::BEDROCK);

        assert_eq!(blocks.block_at(BlockPos::new(1, 2, 3)), BlockId::BEDROCK);
        assert_eq!(blocks.block_at(BlockPos::new(0, 0, 0)), BlockId::AIR);
    }

    #[test]
    fn test_arc_view_delegates() {
        let mut blocks = HashMap::new();
        blocks.insert(BlockPos::new(0, 0, 0), BlockId::END_STONE);
        let shared = Arc::new(blocks);

        assert_eq!(shared.block_at(BlockPos::new(0, 0, 0)), BlockId::END_STONE);
    }
}
