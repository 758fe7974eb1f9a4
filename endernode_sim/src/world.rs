//! Block grid queried by the detector during its tick pass.

use endernode_env::{BlockId, BlockPos, BlockView};
use std::collections::HashMap;

/// Sparse block grid. Unset positions read as `fill`.
#[derive(Debug, Clone)]
pub struct SimWorld {
    blocks: HashMap<BlockPos, BlockId>,
    fill: BlockId,
}

impl SimWorld {
    /// Creates a world where every unset block is end stone.
    pub fn new() -> Self {
        Self::filled_with(BlockId::END_STONE)
    }

    pub fn filled_with(fill: BlockId) -> Self {
        Self {
            blocks: HashMap::new(),
            fill,
        }
    }

    pub fn set_block(&mut self, pos: BlockPos, block: BlockId) {
        if block == self.fill {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Number of blocks that differ from the fill.
    pub fn modified_blocks(&self) -> usize {
        self.blocks.len()
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockView for SimWorld {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.blocks.get(&pos).copied().unwrap_or(self.fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_blocks_read_as_fill() {
        let world = SimWorld::new();
        assert_eq!(world.block_at(BlockPos::new(5, 5, 5)), BlockId::END_STONE);
    }

    #[test]
    fn test_set_and_reset_block() {
        let mut world = SimWorld::new();
        let pos = BlockPos::new(1, 2, 3);

        world.set_block(pos, BlockId::BEDROCK);
        assert_eq!(world.block_at(pos), BlockId::BEDROCK);
        assert_eq!(world.modified_blocks(), 1);

        world.set_block(pos, BlockId::END_STONE);
        assert_eq!(world.modified_blocks(), 0);
    }
}
