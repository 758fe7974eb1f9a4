//! Ground truth oracle for simulation.
//!
//! The Oracle maintains the "God's eye view" of the simulated End:
//! - Which blocks really are nodes, and which of their faces are exposed
//! - Node particle emission (portal and witch, off every exposed face)
//! - Ambient particles that must never produce a node

use endernode_core::{ParticleEvent, ParticleKind};
use endernode_env::{BlockPos, Direction};
use nalgebra::Vector3;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Distance from block centre to an emitted particle along the face normal.
const EMISSION_DEPTH: f64 = 0.75;

/// Tangential jitter is clamped so particles stay inside the neighbouring cell.
const MAX_TANGENT_OFFSET: f64 = 0.45;

/// A node that really exists in the simulated world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundTruthNode {
    /// Unique node ID
    pub id: u64,

    /// Block the node occupies
    pub pos: BlockPos,

    /// Faces not covered by other blocks; only these emit
    pub exposed: Vec<Direction>,

    /// False once mined
    pub active: bool,
}

/// The Oracle - maintains ground truth and generates particles.
pub struct Oracle {
    /// RNG for emission and spawning
    rng: ChaCha8Rng,

    /// All nodes ever spawned, keyed by ID (ordered, so RNG use is stable)
    nodes: BTreeMap<u64, GroundTruthNode>,

    next_id: u64,

    /// Half-extent of the cube around the origin nodes spawn in
    region: i32,

    /// Chance per tick that an exposed face emits each evidence kind
    emission_chance: f64,

    /// Standard deviation of the tangential jitter (blocks)
    jitter_std: f64,

    /// Off-grid ambient particles per tick
    ambient_per_tick: usize,

    /// Chance per tick of a stray evidence particle on a random face
    stray_chance: f64,
}

impl Oracle {
    /// Creates a new Oracle with the given physics seed.
    pub fn new(physics_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(physics_seed),
            nodes: BTreeMap::new(),
            next_id: 0,
            region: 16,
            emission_chance: 0.5,
            jitter_std: 0.15,
            ambient_per_tick: 0,
            stray_chance: 0.0,
        }
    }

    /// Sets how many ambient particles (any kind, off the quarter grid) are
    /// emitted per tick, and the per-tick chance of a stray evidence particle.
    pub fn set_ambient(&mut self, per_tick: usize, stray_chance: f64) {
        self.ambient_per_tick = per_tick;
        self.stray_chance = stray_chance.clamp(0.0, 1.0);
    }

    /// Sets the per-face, per-kind emission chance.
    pub fn set_emission_chance(&mut self, chance: f64) {
        self.emission_chance = chance.clamp(0.0, 1.0);
    }

    /// Spawns a node at `pos` with the given exposed faces and returns its ID.
    pub fn spawn_node(&mut self, pos: BlockPos, exposed: &[Direction]) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            GroundTruthNode {
                id,
                pos,
                exposed: exposed.to_vec(),
                active: true,
            },
        );
        id
    }

    /// Spawns a node at a random free position with a random, non-empty set
    /// of exposed faces.
    pub fn spawn_random_node(&mut self) -> u64 {
        let pos = loop {
            let candidate = BlockPos::new(
                self.rng.gen_range(-self.region..self.region),
                self.rng.gen_range(-self.region..self.region),
                self.rng.gen_range(-self.region..self.region),
            );
            if !self.nodes.values().any(|n| n.active && n.pos == candidate) {
                break candidate;
            }
        };

        let mut exposed: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|_| self.rng.gen_bool(0.5))
            .collect();
        if exposed.is_empty() {
            if let Some(face) = Direction::ALL.choose(&mut self.rng) {
                exposed.push(*face);
            }
        }

        self.spawn_node(pos, &exposed)
    }

    /// Marks a node as mined and returns its position. The caller is
    /// responsible for placing the post-mine block in the world.
    pub fn mine_node(&mut self, id: u64) -> Option<BlockPos> {
        let node = self.nodes.get_mut(&id)?;
        if !node.active {
            return None;
        }
        node.active = false;
        Some(node.pos)
    }

    /// Forgets every node (the player left for another world).
    pub fn despawn_all(&mut self) {
        self.nodes.clear();
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = &GroundTruthNode> {
        self.nodes.values().filter(|n| n.active)
    }

    /// IDs of active nodes, in spawn order.
    pub fn active_ids(&self) -> Vec<u64> {
        self.active_nodes().map(|n| n.id).collect()
    }

    /// Positions of active nodes, sorted.
    pub fn ground_truth_positions(&self) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self.active_nodes().map(|n| n.pos).collect();
        positions.sort();
        positions
    }

    /// Generates one game tick worth of particles.
    pub fn emit(&mut self) -> Vec<ParticleEvent> {
        let emitters: Vec<(BlockPos, Direction)> = self
            .active_nodes()
            .flat_map(|n| n.exposed.iter().map(move |face| (n.pos, *face)))
            .collect();

        let mut particles = Vec::new();
        for (pos, face) in emitters {
            for kind in [ParticleKind::Portal, ParticleKind::Witch] {
                if self.rng.gen_bool(self.emission_chance) {
                    particles.push(self.face_particle(pos, face, kind));
                }
            }
        }

        for _ in 0..self.ambient_per_tick {
            particles.push(self.ambient_particle());
        }
        if self.rng.gen_bool(self.stray_chance) {
            particles.push(self.stray_particle());
        }

        particles
    }

    /// A particle off `face` of `pos`, exactly on the quarter grid along the
    /// normal and jittered along the other two axes.
    fn face_particle(&mut self, pos: BlockPos, face: Direction, kind: ParticleKind) -> ParticleEvent {
        let (dx, dy, dz) = face.vector();
        let normal = Vector3::new(f64::from(dx), f64::from(dy), f64::from(dz));

        let mut offset = normal * EMISSION_DEPTH;
        for axis in 0..3 {
            if normal[axis] == 0.0 {
                offset[axis] = self.tangent_jitter();
            }
        }

        let p = Vector3::from(pos.center()) + offset;
        ParticleEvent::new(p.x, p.y, p.z, kind)
    }

    fn tangent_jitter(&mut self) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        (z * self.jitter_std).clamp(-MAX_TANGENT_OFFSET, MAX_TANGENT_OFFSET)
    }

    /// Any particle kind at a continuous random position.
    fn ambient_particle(&mut self) -> ParticleEvent {
        let extent = f64::from(self.region);
        let kind = ParticleKind::ALL[self.rng.gen_range(0..ParticleKind::ALL.len())];
        ParticleEvent::new(
            self.rng.gen_range(-extent..extent),
            self.rng.gen_range(-extent..extent),
            self.rng.gen_range(-extent..extent),
            kind,
        )
    }

    /// An evidence particle that does decode, on a random face of a random
    /// block.
    fn stray_particle(&mut self) -> ParticleEvent {
        let pos = BlockPos::new(
            self.rng.gen_range(-self.region..self.region),
            self.rng.gen_range(-self.region..self.region),
            self.rng.gen_range(-self.region..self.region),
        );
        let face = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let kind = if self.rng.gen_bool(0.5) {
            ParticleKind::Portal
        } else {
            ParticleKind::Witch
        };
        self.face_particle(pos, face, kind)
    }
}
