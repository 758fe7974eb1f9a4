//! Ender Node Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the detector to run
//! both inside a **live client** and inside the **deterministic simulator**.
//!
//! # Core Concept
//!
//! Everything the detector reads from the outside world goes through a trait:
//! - Time and location (`ClientContext::now()`, `ClientContext::location()`)
//! - Block state (`BlockView::block_at()`)
//!
//! The simulator swaps in a virtual clock and a scripted block grid, so every
//! scenario is reproducible down to the millisecond.
//!
//! # Example
//!
//! ```ignore
//! use endernode_env::{BlockPos, BlockView, ClientContext};
//!
//! fn is_mined<Ctx: ClientContext, W: BlockView>(ctx: &Ctx, world: &W, pos: BlockPos) -> bool {
//!     ctx.location().is_the_end() && world.block_at(pos).is_bedrock()
//! }
//! ```

mod context;
mod error;
mod live;
mod types;
mod world;

pub use context::ClientContext;
pub use error::EnvError;
pub use live::LiveContext;
pub use types::{BlockId, BlockPos, Direction, Location};
pub use world::BlockView;
