//! The "EVIDENCE" Table - per-block, per-face particle tallies.
//!
//! Every block that has had at least one particle attributed to it gets a
//! [`Candidate`]. A candidate counts portal and witch particles separately on
//! each of its six faces until the confirmation engine promotes it; from then
//! on the counters are frozen at zero and only the last-seen timestamp moves.

use crate::decoder::ParticleKind;
use endernode_env::{BlockPos, Direction};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// FACE EVIDENCE
// ============================================================================

/// Portal and witch particle counts observed on one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FaceEvidence {
    pub portal: u32,
    pub witch: u32,
}

impl FaceEvidence {
    /// Returns true if both counters meet their thresholds.
    pub const fn meets(&self, min_portal: u32, min_witch: u32) -> bool {
        self.portal >= min_portal && self.witch >= min_witch
    }

    /// Returns the sum of both counters.
    pub const fn total(&self) -> u64 {
        self.portal as u64 + self.witch as u64
    }

    fn record(&mut self, kind: ParticleKind) {
        match kind {
            ParticleKind::Portal => self.portal = self.portal.saturating_add(1),
            ParticleKind::Witch => self.witch = self.witch.saturating_add(1),
            _ => {}
        }
    }
}

// ============================================================================
// CANDIDATE
// ============================================================================

/// A block position accumulating evidence of being a node.
///
/// A candidate is either tracking (`confirmed == false`) or reporting
/// (`confirmed == true`); there is no third state and no way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Evidence per face, indexed by [`Direction::index`]
    faces: [FaceEvidence; 6],

    /// Promoted to a confirmed node
    confirmed: bool,

    /// When the confirmation engine last evaluated this candidate (ms).
    /// `None` until the first evaluation.
    last_confirmation_attempt: Option<u64>,

    /// When a particle was last attributed to this block (ms)
    last_particle_seen: u64,

    /// When the candidate was created (ms)
    created_at: u64,
}

impl Candidate {
    /// Creates an empty, unconfirmed candidate.
    pub fn new(now_ms: u64) -> Self {
        Self {
            faces: [FaceEvidence::default(); 6],
            confirmed: false,
            last_confirmation_attempt: None,
            last_particle_seen: now_ms,
            created_at: now_ms,
        }
    }

    /// Returns the evidence recorded on `face`.
    pub fn face(&self, face: Direction) -> FaceEvidence {
        self.faces[face.index()]
    }

    /// Returns `(direction, evidence)` for all six faces.
    pub fn faces(&self) -> impl Iterator<Item = (Direction, FaceEvidence)> + '_ {
        Direction::ALL.into_iter().map(move |d| (d, self.faces[d.index()]))
    }

    /// Sum of every counter on every face.
    pub fn total_evidence(&self) -> u64 {
        self.faces.iter().map(FaceEvidence::total).sum()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn last_confirmation_attempt(&self) -> Option<u64> {
        self.last_confirmation_attempt
    }

    pub fn last_particle_seen(&self) -> u64 {
        self.last_particle_seen
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns true if a single face has at least `min_portal` portal and
    /// `min_witch` witch particles.
    pub fn has_coincident_face(&self, min_portal: u32, min_witch: u32) -> bool {
        self.faces.iter().any(|f| f.meets(min_portal, min_witch))
    }

    /// Milliseconds since the last particle, saturating at zero.
    pub fn silence_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_particle_seen)
    }

    /// Attributes one particle on `face` to this candidate.
    ///
    /// Confirmed candidates only refresh their last-seen time.
    pub(crate) fn observe(&mut self, face: Direction, kind: ParticleKind, now_ms: u64) {
        if !self.confirmed {
            self.faces[face.index()].record(kind);
        }
        self.last_particle_seen = self.last_particle_seen.max(now_ms);
    }

    /// Records an evaluation that did not promote the candidate.
    pub(crate) fn mark_attempt(&mut self, now_ms: u64) {
        self.last_confirmation_attempt = Some(now_ms);
    }

    /// Promotes the candidate and clears every counter.
    pub(crate) fn confirm(&mut self, now_ms: u64) {
        self.confirmed = true;
        self.last_confirmation_attempt = Some(now_ms);
        self.faces = [FaceEvidence::default(); 6];
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// What an ingest did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A fresh candidate was created and the particle counted
    Created,
    /// An existing unconfirmed candidate counted the particle
    Counted,
    /// An existing confirmed node had its last-seen time refreshed
    Refreshed,
}

/// All candidates, keyed by block position.
#[derive(Debug, Clone, Default)]
pub struct EvidenceTable {
    candidates: HashMap<BlockPos, Candidate>,
}

impl EvidenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up or inserts the candidate at `pos` and records one particle.
    ///
    /// Never resets an existing candidate.
    pub fn ingest(
        &mut self,
        pos: BlockPos,
        face: Direction,
        kind: ParticleKind,
        now_ms: u64,
    ) -> IngestOutcome {
        let mut created = false;
        let candidate = self.candidates.entry(pos).or_insert_with(|| {
            created = true;
            Candidate::new(now_ms)
        });

        let outcome = if created {
            IngestOutcome::Created
        } else if candidate.is_confirmed() {
            IngestOutcome::Refreshed
        } else {
            IngestOutcome::Counted
        };

        candidate.observe(face, kind, now_ms);
        outcome
    }

    /// Removes the candidate at `pos`, if any. Idempotent.
    pub fn remove_at(&mut self, pos: BlockPos) -> Option<Candidate> {
        self.candidates.remove(&pos)
    }

    /// Removes every candidate and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.candidates.len();
        self.candidates.clear();
        count
    }

    /// Returns the candidate at `pos`.
    pub fn get(&self, pos: BlockPos) -> Option<&Candidate> {
        self.candidates.get(&pos)
    }

    /// Iterates over all candidates, confirmed or not.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &Candidate)> {
        self.candidates.iter().map(|(pos, c)| (*pos, c))
    }

    /// Visits every candidate mutably and drops those for which `keep`
    /// returns false. Removal happens in place during the traversal.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(BlockPos, &mut Candidate) -> bool,
    {
        self.candidates.retain(|pos, candidate| keep(*pos, candidate));
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of confirmed candidates.
    pub fn confirmed_count(&self) -> usize {
        self.candidates.values().filter(|c| c.is_confirmed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: BlockPos = BlockPos::new(10, 20, 30);

    #[test]
    fn test_new_candidate_has_six_empty_faces() {
        let candidate = Candidate::new(100);
        assert_eq!(candidate.faces().count(), 6);
        assert!(candidate.faces().all(|(_, f)| f == FaceEvidence::default()));
        assert!(!candidate.is_confirmed());
        assert_eq!(candidate.last_confirmation_attempt(), None);
        assert_eq!(candidate.last_particle_seen(), 100);
        assert_eq!(candidate.created_at(), 100);
    }

    #[test]
    fn test_ingest_creates_then_counts() {
        let mut table = EvidenceTable::new();

        let first = table.ingest(POS, Direction::Up, ParticleKind::Portal, 100);
        let second = table.ingest(POS, Direction::Up, ParticleKind::Witch, 150);

        assert_eq!(first, IngestOutcome::Created);
        assert_eq!(second, IngestOutcome::Counted);
        assert_eq!(table.len(), 1);

        let candidate = table.get(POS).unwrap();
        assert_eq!(candidate.face(Direction::Up), FaceEvidence { portal: 1, witch: 1 });
        assert_eq!(candidate.face(Direction::Down), FaceEvidence::default());
        assert_eq!(candidate.last_particle_seen(), 150);
        assert_eq!(candidate.created_at(), 100);
    }

    #[test]
    fn test_ingest_never_resets_existing() {
        let mut table = EvidenceTable::new();
        for t in 0..4 {
            table.ingest(POS, Direction::North, ParticleKind::Portal, t);
        }
        table.ingest(POS, Direction::South, ParticleKind::Witch, 10);

        let candidate = table.get(POS).unwrap();
        assert_eq!(candidate.face(Direction::North).portal, 4);
        assert_eq!(candidate.face(Direction::South).witch, 1);
        assert_eq!(candidate.total_evidence(), 5);
    }

    #[test]
    fn test_confirmed_candidate_only_refreshes() {
        let mut table = EvidenceTable::new();
        table.ingest(POS, Direction::Up, ParticleKind::Portal, 0);
        table.retain(|_, c| {
            c.confirm(600);
            true
        });

        let outcome = table.ingest(POS, Direction::Up, ParticleKind::Witch, 900);
        assert_eq!(outcome, IngestOutcome::Refreshed);

        let candidate = table.get(POS).unwrap();
        assert_eq!(candidate.total_evidence(), 0);
        assert_eq!(candidate.last_particle_seen(), 900);
    }

    #[test]
    fn test_coincident_face_requires_same_face() {
        let mut candidate = Candidate::new(0);
        for _ in 0..10 {
            candidate.observe(Direction::Up, ParticleKind::Portal, 0);
            candidate.observe(Direction::East, ParticleKind::Witch, 0);
        }
        assert!(!candidate.has_coincident_face(5, 5));

        for _ in 0..5 {
            candidate.observe(Direction::East, ParticleKind::Portal, 0);
        }
        assert!(candidate.has_coincident_face(5, 5));
    }

    #[test]
    fn test_confirm_resets_all_counters() {
        let mut candidate = Candidate::new(0);
        for d in Direction::ALL {
            candidate.observe(d, ParticleKind::Portal, 0);
            candidate.observe(d, ParticleKind::Witch, 0);
        }
        candidate.confirm(500);

        assert!(candidate.is_confirmed());
        assert_eq!(candidate.total_evidence(), 0);
        assert_eq!(candidate.last_confirmation_attempt(), Some(500));
    }

    #[test]
    fn test_remove_and_clear_are_idempotent() {
        let mut table = EvidenceTable::new();
        table.ingest(POS, Direction::Up, ParticleKind::Portal, 0);

        assert!(table.remove_at(POS).is_some());
        assert!(table.remove_at(POS).is_none());
        assert!(table.is_empty());

        table.ingest(POS, Direction::Up, ParticleKind::Portal, 0);
        assert_eq!(table.clear(), 1);
        assert_eq!(table.clear(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_retain_removes_in_place() {
        let mut table = EvidenceTable::new();
        for x in 0..10 {
            table.ingest(BlockPos::new(x, 0, 0), Direction::Up, ParticleKind::Portal, 0);
        }

        table.retain(|pos, _| pos.x % 2 == 0);

        assert_eq!(table.len(), 5);
        assert!(table.iter().all(|(pos, _)| pos.x % 2 == 0));
    }

    #[test]
    fn test_silence_saturates() {
        let candidate = Candidate::new(1_000);
        assert_eq!(candidate.silence_ms(500), 0);
        assert_eq!(candidate.silence_ms(1_750), 750);
    }
}
