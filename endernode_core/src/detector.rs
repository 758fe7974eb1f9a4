//! The "DETECTOR" - event router over the evidence table.
//!
//! Wires the four host callbacks to the pipeline:
//!
//! ```text
//! particle ──► gate ──► decode ──► EvidenceTable::ingest
//! game tick ─► schedule ─► gate ─► world? ─► [confirm ─► reap] per candidate
//! attack ────► remove_at(pos)
//! world join ► clear()
//! ```
//!
//! Everything runs on the caller's thread and completes before returning.
//! Hosts that receive events elsewhere should funnel them through
//! [`DetectorRuntime`](crate::DetectorRuntime).

use crate::config::DetectorConfig;
use crate::confirmation::{ConfirmationPolicy, Verdict};
use crate::decoder::{decode, FaceHit, ParticleEvent};
use crate::evidence::{EvidenceTable, IngestOutcome};
use crate::metrics::{DetectorMetrics, PassSummary, TickOutcome};
use crate::reaper::{ReaperPolicy, RemovalReason};
use crate::scheduler::CyclicSchedule;
use crate::waypoint::{EnderNode, Waypoint, WaypointRenderer, WaypointStyle};
use endernode_env::{BlockPos, BlockView, ClientContext};
use std::sync::Arc;

/// What happened to a particle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleOutcome {
    /// Detector disabled or player outside the End
    Gated,
    /// Not node evidence, or not on a face boundary
    Ignored,
    /// Attributed to a block face
    Ingested(FaceHit, IngestOutcome),
}

/// Returned from [`EnderNodeDetector::on_attack`].
///
/// The detector never consumes an attack; the host's own handling proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    Pass,
}

/// Passive Ender Node detector.
pub struct EnderNodeDetector<Ctx: ClientContext> {
    context: Arc<Ctx>,
    config: DetectorConfig,
    confirmation: ConfirmationPolicy,
    reaper: ReaperPolicy,
    style: WaypointStyle,
    schedule: CyclicSchedule,
    table: EvidenceTable,
    metrics: DetectorMetrics,
}

impl<Ctx: ClientContext> EnderNodeDetector<Ctx> {
    /// Creates a detector. Policies and the render style are fixed from
    /// `config` here.
    pub fn new(context: Arc<Ctx>, config: DetectorConfig) -> Self {
        Self {
            confirmation: ConfirmationPolicy::from_config(&config),
            reaper: ReaperPolicy::from_config(&config),
            style: WaypointStyle::from_config(&config.waypoint),
            schedule: CyclicSchedule::new(config.update_interval_ticks),
            table: EvidenceTable::new(),
            metrics: DetectorMetrics::default(),
            context,
            config,
        }
    }

    /// Creates a detector with [`DetectorConfig::default`].
    pub fn with_defaults(context: Arc<Ctx>) -> Self {
        Self::new(context, DetectorConfig::default())
    }

    /// Particle and tick handling only run when enabled and in the End.
    pub fn should_process(&self) -> bool {
        self.config.enabled && self.context.location().is_the_end()
    }

    // ========================================================================
    // ROUTER
    // ========================================================================

    /// Handles a particle spawn.
    pub fn on_particle(&mut self, event: &ParticleEvent) -> ParticleOutcome {
        self.metrics.particles_received += 1;

        if !self.should_process() {
            self.metrics.particles_gated += 1;
            return ParticleOutcome::Gated;
        }

        let Some(hit) = decode(event) else {
            self.metrics.particles_ignored += 1;
            return ParticleOutcome::Ignored;
        };

        let now = self.context.now_millis();
        let outcome = self.table.ingest(hit.pos, hit.face, event.kind, now);

        self.metrics.particles_ingested += 1;
        if outcome == IngestOutcome::Created {
            self.metrics.candidates_created += 1;
        }
        ParticleOutcome::Ingested(hit, outcome)
    }

    /// Handles one game tick; runs the pass every `update_interval_ticks`.
    ///
    /// The schedule keeps counting while the detector is gated.
    pub fn on_game_tick<W>(&mut self, world: Option<&W>) -> TickOutcome
    where
        W: BlockView + ?Sized,
    {
        if !self.schedule.advance() {
            return TickOutcome::NotDue;
        }
        self.update(world)
    }

    /// Runs the confirmation and reaper pass now.
    ///
    /// Without a world nothing is evaluated; particles keep accumulating and
    /// the next pass with a world catches up.
    pub fn update<W>(&mut self, world: Option<&W>) -> TickOutcome
    where
        W: BlockView + ?Sized,
    {
        if !self.should_process() {
            return TickOutcome::Disabled;
        }
        let Some(world) = world else {
            self.metrics.passes_without_world += 1;
            return TickOutcome::NoWorld;
        };

        let now = self.context.now_millis();
        let confirmation = self.confirmation;
        let reaper = self.reaper;
        let mut summary = PassSummary::default();

        self.table.retain(|pos, candidate| {
            summary.visited += 1;
            match confirmation.evaluate(candidate, now) {
                Verdict::Promoted => summary.promoted += 1,
                Verdict::Pending => summary.pending += 1,
                Verdict::RateLimited => summary.rate_limited += 1,
                Verdict::AlreadyConfirmed => {}
            }

            match reaper.check(pos, candidate, world, now) {
                Some(RemovalReason::Mined) => summary.mined += 1,
                Some(RemovalReason::Expired) => summary.expired += 1,
                Some(_) | None => return true,
            }
            false
        });

        self.metrics.passes_run += 1;
        self.metrics.nodes_confirmed += summary.promoted as u64;
        self.metrics
            .record_removal(RemovalReason::Mined, summary.mined as u64);
        self.metrics
            .record_removal(RemovalReason::Expired, summary.expired as u64);

        TickOutcome::Completed(summary)
    }

    /// Handles the player attacking a block. Not gated.
    pub fn on_attack(&mut self, pos: BlockPos) -> AttackResult {
        if self.table.remove_at(pos).is_some() {
            self.metrics.record_removal(RemovalReason::Attacked, 1);
        }
        AttackResult::Pass
    }

    /// Handles joining a world. Not gated. Returns how many candidates were
    /// discarded.
    pub fn on_world_join(&mut self) -> usize {
        let discarded = self.table.clear();
        self.metrics.resets += 1;
        self.metrics
            .record_removal(RemovalReason::Reset, discarded as u64);
        discarded
    }

    // ========================================================================
    // EXPOSURE
    // ========================================================================

    /// Confirmed nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = EnderNode> + '_ {
        self.table
            .iter()
            .filter(|(_, c)| c.is_confirmed())
            .map(|(pos, c)| EnderNode {
                pos,
                confirmed_at: c.last_confirmation_attempt().unwrap_or(c.created_at()),
                last_particle_seen: c.last_particle_seen(),
            })
    }

    /// Positions of confirmed nodes, in no particular order.
    pub fn confirmed_positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.nodes().map(|node| node.pos)
    }

    /// Returns true if a confirmed node sits at `pos`.
    pub fn is_node(&self, pos: BlockPos) -> bool {
        self.table.get(pos).is_some_and(|c| c.is_confirmed())
    }

    /// One waypoint per confirmed node, ordered by position.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        let mut waypoints: Vec<Waypoint> = self
            .confirmed_positions()
            .map(|pos| self.style.waypoint_at(pos))
            .collect();
        waypoints.sort_by_key(|w| w.pos);
        waypoints
    }

    /// Draws every confirmed node. Returns how many were drawn.
    ///
    /// Draws nothing when gated or when waypoints are disabled.
    pub fn render<R>(&self, renderer: &mut R) -> usize
    where
        R: WaypointRenderer + ?Sized,
    {
        if !self.should_process() || !self.config.waypoint.enabled {
            return 0;
        }
        let mut drawn = 0;
        for pos in self.confirmed_positions() {
            renderer.draw(&self.style.waypoint_at(pos));
            drawn += 1;
        }
        drawn
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Read-only view of every candidate, confirmed or not.
    ///
    /// For the simulation harness and tests. Collaborators must go through
    /// [`nodes`](Self::nodes), [`waypoints`](Self::waypoints) or
    /// [`render`](Self::render), which only ever show confirmed nodes.
    #[doc(hidden)]
    pub fn table(&self) -> &EvidenceTable {
        &self.table
    }

    pub fn metrics(&self) -> &DetectorMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ParticleKind;
    use endernode_env::{BlockId, Direction, Location};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::RwLock;
    use std::time::Duration;

    type World = HashMap<BlockPos, BlockId>;

    const NODE: BlockPos = BlockPos::new(10, 20, 30);

    struct TestContext {
        millis: AtomicU64,
        location: RwLock<Location>,
    }

    impl TestContext {
        fn in_the_end() -> Arc<Self> {
            Arc::new(Self {
                millis: AtomicU64::new(0),
                location: RwLock::new(Location::TheEnd),
            })
        }

        fn set(&self, millis: u64) {
            self.millis.store(millis, Ordering::SeqCst);
        }

        fn go_to(&self, location: Location) {
            *self.location.write().unwrap() = location;
        }
    }

    impl ClientContext for TestContext {
        fn now(&self) -> Duration {
            Duration::from_millis(self.millis.load(Ordering::SeqCst))
        }

        fn location(&self) -> Location {
            *self.location.read().unwrap()
        }
    }

    fn detector() -> (Arc<TestContext>, EnderNodeDetector<TestContext>) {
        let ctx = TestContext::in_the_end();
        let detector = EnderNodeDetector::with_defaults(ctx.clone());
        (ctx, detector)
    }

    fn particle_at(
        ctx: &TestContext,
        detector: &mut EnderNodeDetector<TestContext>,
        t: u64,
        event: ParticleEvent,
    ) -> ParticleOutcome {
        ctx.set(t);
        detector.on_particle(&event)
    }

    fn tick_at(
        ctx: &TestContext,
        detector: &mut EnderNodeDetector<TestContext>,
        t: u64,
        world: &World,
    ) -> TickOutcome {
        ctx.set(t);
        detector.update(Some(world))
    }

    /// Five portal and five witch on the UP face of (10, 20, 30) between
    /// t=100 and t=460, pass at t=600.
    fn confirm_node(ctx: &TestContext, detector: &mut EnderNodeDetector<TestContext>) {
        for i in 0..5u64 {
            let t = 100 + i * 80;
            particle_at(ctx, detector, t, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
            particle_at(ctx, detector, t + 40, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Witch));
        }
        let outcome = tick_at(ctx, detector, 600, &World::new());
        assert_eq!(outcome.summary().map(|s| s.promoted), Some(1));
    }

    #[test]
    fn test_five_and_five_on_one_face_confirms() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);

        let candidate = detector.table().get(NODE).unwrap();
        assert!(candidate.is_confirmed());
        assert_eq!(candidate.total_evidence(), 0);
        assert_eq!(detector.confirmed_positions().collect::<Vec<_>>(), vec![NODE]);
        assert!(detector.is_node(NODE));
        assert_eq!(detector.metrics().nodes_confirmed, 1);
        assert_eq!(detector.metrics().candidates_created, 1);
    }

    #[test]
    fn test_cross_face_does_not_confirm() {
        let (ctx, mut detector) = detector();
        let origin = BlockPos::new(0, 0, 0);

        for t in 0..5 {
            let up = particle_at(&ctx, &mut detector, t, ParticleEvent::new(0.5, 1.25, 0.5, ParticleKind::Portal));
            let down = particle_at(&ctx, &mut detector, t, ParticleEvent::new(0.5, -0.25, 0.5, ParticleKind::Witch));
            assert!(matches!(up, ParticleOutcome::Ingested(FaceHit { pos, face: Direction::Up }, _) if pos == origin));
            assert!(matches!(down, ParticleOutcome::Ingested(FaceHit { pos, face: Direction::Down }, _) if pos == origin));
        }

        let outcome = tick_at(&ctx, &mut detector, 600, &World::new());
        assert_eq!(outcome.summary().map(|s| s.pending), Some(1));

        let candidate = detector.table().get(origin).unwrap();
        assert!(!candidate.is_confirmed());
        assert_eq!(candidate.face(Direction::Up).portal, 5);
        assert_eq!(candidate.face(Direction::Down).witch, 5);
        assert_eq!(detector.confirmed_positions().count(), 0);
    }

    #[test]
    fn test_particle_at_minus_three_quarters_is_up_face_below() {
        // fy of -0.75 is 0.25, so this is the top face of the block two below
        let (ctx, mut detector) = detector();
        let outcome = particle_at(&ctx, &mut detector, 0, ParticleEvent::new(0.5, -0.75, 0.5, ParticleKind::Witch));

        let expected = FaceHit {
            pos: BlockPos::new(0, -2, 0),
            face: Direction::Up,
        };
        assert_eq!(outcome, ParticleOutcome::Ingested(expected, IngestOutcome::Created));
    }

    #[test]
    fn test_mined_eviction() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);

        let mut world = World::new();
        world.insert(NODE, BlockId::BEDROCK);
        let outcome = tick_at(&ctx, &mut detector, 1_000, &world);

        assert_eq!(outcome.summary().map(|s| s.mined), Some(1));
        assert!(detector.table().get(NODE).is_none());
        assert_eq!(detector.metrics().removed_mined, 1);
    }

    #[test]
    fn test_silence_eviction() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);
        let world = World::new();

        // Last particle at t=460
        tick_at(&ctx, &mut detector, 10_250, &world);
        assert!(detector.is_node(NODE));

        let outcome = tick_at(&ctx, &mut detector, 10_750, &world);
        assert_eq!(outcome.summary().map(|s| s.expired), Some(1));
        assert!(detector.table().is_empty());
    }

    #[test]
    fn test_confirmed_node_kept_alive_by_particles() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);
        let world = World::new();

        for t in (1_000..30_000).step_by(1_000) {
            let outcome = particle_at(&ctx, &mut detector, t, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
            assert!(matches!(outcome, ParticleOutcome::Ingested(_, IngestOutcome::Refreshed)));
            tick_at(&ctx, &mut detector, t + 250, &world);
        }

        let candidate = detector.table().get(NODE).unwrap();
        assert!(candidate.is_confirmed());
        assert_eq!(candidate.total_evidence(), 0);
        assert_eq!(candidate.last_particle_seen(), 29_000);
    }

    #[test]
    fn test_attack_removal() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);

        ctx.set(700);
        assert_eq!(detector.on_attack(NODE), AttackResult::Pass);
        assert!(detector.table().get(NODE).is_none());

        let outcome = particle_at(&ctx, &mut detector, 720, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
        assert!(matches!(outcome, ParticleOutcome::Ingested(_, IngestOutcome::Created)));

        let candidate = detector.table().get(NODE).unwrap();
        assert!(!candidate.is_confirmed());
        assert_eq!(candidate.total_evidence(), 1);
        assert_eq!(candidate.created_at(), 720);
    }

    #[test]
    fn test_rate_limited_confirmation() {
        let (ctx, mut detector) = detector();
        let world = World::new();
        let up = |kind| ParticleEvent::new(10.5, 21.25, 30.5, kind);

        for t in 0..4 {
            particle_at(&ctx, &mut detector, t * 10, up(ParticleKind::Portal));
            particle_at(&ctx, &mut detector, t * 10, up(ParticleKind::Witch));
        }

        let first = tick_at(&ctx, &mut detector, 250, &world);
        assert_eq!(first.summary().map(|s| s.pending), Some(1));
        assert_eq!(detector.table().get(NODE).unwrap().last_confirmation_attempt(), Some(250));

        particle_at(&ctx, &mut detector, 300, up(ParticleKind::Portal));
        particle_at(&ctx, &mut detector, 300, up(ParticleKind::Witch));

        let second = tick_at(&ctx, &mut detector, 500, &world);
        assert_eq!(second.summary().map(|s| s.rate_limited), Some(1));
        assert!(!detector.is_node(NODE));

        let third = tick_at(&ctx, &mut detector, 750, &world);
        assert_eq!(third.summary().map(|s| s.promoted), Some(1));
        assert!(detector.is_node(NODE));
    }

    #[test]
    fn test_ambient_particles_never_enter_table() {
        let (ctx, mut detector) = detector();
        for kind in ParticleKind::ALL.into_iter().filter(|k| !k.is_node_evidence()) {
            let outcome = particle_at(&ctx, &mut detector, 0, ParticleEvent::new(10.5, 21.25, 30.5, kind));
            assert_eq!(outcome, ParticleOutcome::Ignored);
        }
        let outcome = particle_at(&ctx, &mut detector, 0, ParticleEvent::new(10.5, 21.5, 30.5, ParticleKind::Portal));
        assert_eq!(outcome, ParticleOutcome::Ignored);

        let other_kinds = ParticleKind::ALL.iter().filter(|k| !k.is_node_evidence()).count();
        assert!(detector.table().is_empty());
        assert_eq!(detector.metrics().particles_ignored, other_kinds as u64 + 1);
    }

    #[test]
    fn test_gate_blocks_particles_and_ticks_outside_the_end() {
        let (ctx, mut detector) = detector();
        ctx.go_to(Location::Hub);

        let outcome = particle_at(&ctx, &mut detector, 0, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
        assert_eq!(outcome, ParticleOutcome::Gated);
        assert_eq!(tick_at(&ctx, &mut detector, 600, &World::new()), TickOutcome::Disabled);
        assert!(detector.table().is_empty());
        assert_eq!(detector.metrics().particles_gated, 1);
    }

    #[test]
    fn test_disabled_config_blocks_processing() {
        let ctx = TestContext::in_the_end();
        let config = DetectorConfig {
            enabled: false,
            ..Default::default()
        };
        let mut detector = EnderNodeDetector::new(ctx.clone(), config);

        assert!(!detector.should_process());
        let outcome = particle_at(&ctx, &mut detector, 0, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
        assert_eq!(outcome, ParticleOutcome::Gated);
        assert_eq!(detector.update(Some(&World::new())), TickOutcome::Disabled);
    }

    #[test]
    fn test_zero_witch_threshold_does_not_confirm_portal_only_face() {
        let ctx = TestContext::in_the_end();
        let config = DetectorConfig {
            min_witch_per_face: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let mut detector = EnderNodeDetector::new(ctx.clone(), config);

        for t in 0..5 {
            particle_at(&ctx, &mut detector, t * 10, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
        }
        let outcome = tick_at(&ctx, &mut detector, 250, &World::new());
        assert_eq!(outcome.summary().map(|s| s.pending), Some(1));
        assert!(!detector.is_node(NODE));

        particle_at(&ctx, &mut detector, 300, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Witch));
        let outcome = tick_at(&ctx, &mut detector, 750, &World::new());
        assert_eq!(outcome.summary().map(|s| s.promoted), Some(1));
        assert!(detector.is_node(NODE));
    }

    #[test]
    fn test_attack_and_join_ignore_gate() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);
        particle_at(&ctx, &mut detector, 650, ParticleEvent::new(0.5, 1.25, 0.5, ParticleKind::Portal));
        ctx.go_to(Location::Hub);

        detector.on_attack(NODE);
        assert!(detector.table().get(NODE).is_none());
        assert_eq!(detector.metrics().removed_attacked, 1);

        assert_eq!(detector.on_world_join(), 1);
        assert!(detector.table().is_empty());
        assert_eq!(detector.on_world_join(), 0);
        assert_eq!(detector.metrics().resets, 2);
    }

    #[test]
    fn test_repeated_attacks_equal_one() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);

        for _ in 0..3 {
            detector.on_attack(NODE);
        }
        assert_eq!(detector.metrics().removed_attacked, 1);
        assert!(detector.table().is_empty());
    }

    #[test]
    fn test_missing_world_skips_pass_but_keeps_evidence() {
        let (ctx, mut detector) = detector();
        for _ in 0..5 {
            particle_at(&ctx, &mut detector, 100, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
            particle_at(&ctx, &mut detector, 100, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Witch));
        }

        ctx.set(600);
        assert_eq!(detector.update(None::<&World>), TickOutcome::NoWorld);
        assert!(!detector.is_node(NODE));
        assert_eq!(detector.table().get(NODE).unwrap().total_evidence(), 10);
        assert_eq!(detector.metrics().passes_without_world, 1);

        let outcome = tick_at(&ctx, &mut detector, 650, &World::new());
        assert_eq!(outcome.summary().map(|s| s.promoted), Some(1));
    }

    #[test]
    fn test_game_ticks_run_pass_every_fifth() {
        let (ctx, mut detector) = detector();
        let world = World::new();
        ctx.set(100);

        let outcomes: Vec<TickOutcome> = (0..10).map(|_| detector.on_game_tick(Some(&world))).collect();
        let passes: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.summary().is_some())
            .map(|(i, _)| i + 1)
            .collect();

        assert_eq!(passes, vec![5, 10]);
        assert_eq!(detector.metrics().passes_run, 2);
    }

    #[test]
    fn test_unconfirmed_candidate_is_never_expired() {
        let (ctx, mut detector) = detector();
        particle_at(&ctx, &mut detector, 0, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));

        tick_at(&ctx, &mut detector, 1_000_000, &World::new());
        assert!(detector.table().get(NODE).is_some());
    }

    #[test]
    fn test_render_draws_confirmed_only() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);
        particle_at(&ctx, &mut detector, 650, ParticleEvent::new(0.5, 1.25, 0.5, ParticleKind::Portal));

        let mut drawn: Vec<Waypoint> = Vec::new();
        assert_eq!(detector.render(&mut drawn), 1);
        assert_eq!(drawn[0].pos, NODE);
        assert_eq!(detector.waypoints(), drawn);

        ctx.go_to(Location::DwarvenMines);
        drawn.clear();
        assert_eq!(detector.render(&mut drawn), 0);
    }

    #[test]
    fn test_unconfirmed_candidates_are_not_exposed() {
        let (ctx, mut detector) = detector();
        for t in 0..4 {
            particle_at(&ctx, &mut detector, t, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Portal));
            particle_at(&ctx, &mut detector, t, ParticleEvent::new(10.5, 21.25, 30.5, ParticleKind::Witch));
        }
        tick_at(&ctx, &mut detector, 250, &World::new());
        assert_eq!(detector.table().len(), 1);

        let mut drawn: Vec<Waypoint> = Vec::new();
        assert_eq!(detector.nodes().count(), 0);
        assert_eq!(detector.confirmed_positions().count(), 0);
        assert!(!detector.is_node(NODE));
        assert!(detector.waypoints().is_empty());
        assert_eq!(detector.render(&mut drawn), 0);
    }

    #[test]
    fn test_render_respects_waypoint_toggle() {
        let ctx = TestContext::in_the_end();
        let mut config = DetectorConfig::default();
        config.waypoint.enabled = false;
        let mut detector = EnderNodeDetector::new(ctx.clone(), config);
        confirm_node(&ctx, &mut detector);

        let mut drawn: Vec<Waypoint> = Vec::new();
        assert_eq!(detector.render(&mut drawn), 0);
        assert_eq!(detector.waypoints().len(), 1);
    }

    #[test]
    fn test_node_view_timestamps() {
        let (ctx, mut detector) = detector();
        confirm_node(&ctx, &mut detector);

        let node = detector.nodes().next().unwrap();
        assert_eq!(node.confirmed_at, 600);
        assert_eq!(node.last_particle_seen, 460);
    }
}
