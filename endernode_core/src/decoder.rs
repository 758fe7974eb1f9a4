//! The "GEOMETRY" Decoder - particle coordinates to emitting block face.
//!
//! A live node emits particles on each exposed face, three quarters of a block
//! out from the block centre along the face normal. That puts exactly one
//! coordinate of every such particle on a quarter boundary (`.25` or `.75`)
//! of the neighbouring cell, and that coordinate tells us both the axis and
//! the side of the face.
//!
//! ```text
//!            y = n + 1.25  ─ ─ ● ─ ─   fy = 0.25  →  block below, face UP
//!                         ┌─────────┐
//!            y = n + 1    │         │
//!                         │  node   │
//!            y = n        │         │
//!                         └─────────┘
//!            y = n - 0.25 ─ ─ ● ─ ─   fy = 0.75  →  block above, face DOWN
//! ```
//!
//! Both `0.25` and `0.75` are exact in binary floating point, so the
//! comparisons are exact equality. A tolerance would let unrelated particle
//! streams through.

use endernode_env::{BlockPos, Direction};
use serde::{Deserialize, Serialize};

/// Fraction marking a particle a quarter block past the lower cell boundary.
const LOW_QUARTER: f64 = 0.25;

/// Fraction marking a particle a quarter block short of the upper boundary.
const HIGH_QUARTER: f64 = 0.75;

// ============================================================================
// INPUT
// ============================================================================

/// Particle types the client can receive from the server.
///
/// Only [`ParticleKind::Portal`] and [`ParticleKind::Witch`] carry node
/// evidence. The rest are common in the End and must never reach the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Portal,
    Witch,
    ReversePortal,
    DragonBreath,
    Enchant,
    Smoke,
    Flame,
    Crit,
}

impl ParticleKind {
    /// Every kind, for exhaustive tests and random generation.
    pub const ALL: [ParticleKind; 8] = [
        ParticleKind::Portal,
        ParticleKind::Witch,
        ParticleKind::ReversePortal,
        ParticleKind::DragonBreath,
        ParticleKind::Enchant,
        ParticleKind::Smoke,
        ParticleKind::Flame,
        ParticleKind::Crit,
    ];

    /// Returns true for the two kinds that count as node evidence.
    pub const fn is_node_evidence(self) -> bool {
        matches!(self, ParticleKind::Portal | ParticleKind::Witch)
    }
}

/// A particle spawn received from the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleEvent {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub kind: ParticleKind,
}

impl ParticleEvent {
    /// Creates a particle event.
    pub const fn new(x: f64, y: f64, z: f64, kind: ParticleKind) -> Self {
        Self { x, y, z, kind }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// The block and face a particle was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceHit {
    /// The candidate node block
    pub pos: BlockPos,

    /// The face of that block the particle came off
    pub face: Direction,
}

// ============================================================================
// DECODING
// ============================================================================

/// Maps a particle to the block face that emitted it.
///
/// Rows are tried in order (y before x before z, low quarter before high
/// quarter) and the first match wins. Returns `None` for non-evidence kinds,
/// for particles with no coordinate on a quarter boundary, and for
/// coordinates that are non-finite or whose block falls outside the `i32`
/// range.
pub fn decode(event: &ParticleEvent) -> Option<FaceHit> {
    if !event.kind.is_node_evidence() {
        return None;
    }

    let cell = BlockPos::containing(event.x, event.y, event.z)?;
    let fx = fraction(event.x);
    let fy = fraction(event.y);
    let fz = fraction(event.z);

    // (trigger fraction, face) in precedence order. The emitting block sits on
    // the opposite side of the face from the particle's own cell.
    let rows = [
        (fy, LOW_QUARTER, Direction::Up),
        (fy, HIGH_QUARTER, Direction::Down),
        (fx, LOW_QUARTER, Direction::East),
        (fx, HIGH_QUARTER, Direction::West),
        (fz, LOW_QUARTER, Direction::South),
        (fz, HIGH_QUARTER, Direction::North),
    ];

    let (_, _, face) = rows
        .into_iter()
        .find(|&(frac, trigger, _)| frac == trigger)?;
    Some(FaceHit {
        pos: cell.offset(face.opposite())?,
        face,
    })
}

/// Returns `value - floor(value)`, in `[0, 1)` for finite input.
fn fraction(value: f64) -> f64 {
    value - value.floor()
}
