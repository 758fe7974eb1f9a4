//! SimulatedClient - runs the detector inside the deterministic environment.
//!
//! Plays the role of the game client: owns the virtual clock, the loaded
//! world (if any) and the detector, and forwards particles, game ticks,
//! attacks and world changes in the same order a live client would.

use crate::context::SimContext;
use crate::exporter::{SimEvent, SimExport, SimFrame};
use crate::world::SimWorld;

use endernode_core::{DetectorConfig, EnderNodeDetector, ParticleEvent, ParticleKind, ParticleOutcome, TickOutcome};
use endernode_env::{BlockPos, ClientContext, Location};
use std::sync::Arc;
use std::time::Duration;

/// A simulated game client with an Ender Node detector attached.
pub struct SimulatedClient {
    context: Arc<SimContext>,
    detector: EnderNodeDetector<SimContext>,

    /// `None` while between worlds
    world: Option<SimWorld>,

    /// Game ticks stepped so far
    game_ticks: u64,

    /// Frame recorder, when exporting
    export: Option<SimExport>,
}

impl SimulatedClient {
    /// Creates a client at t=0, in the End, with an empty world loaded.
    pub fn new(config: DetectorConfig) -> Self {
        let context = SimContext::shared();
        Self {
            detector: EnderNodeDetector::new(context.clone(), config),
            context,
            world: Some(SimWorld::new()),
            game_ticks: 0,
            export: None,
        }
    }

    /// Starts recording frames into `export`.
    pub fn with_export(mut self, export: SimExport) -> Self {
        self.export = Some(export);
        self
    }

    pub fn context(&self) -> &Arc<SimContext> {
        &self.context
    }

    pub fn detector(&self) -> &EnderNodeDetector<SimContext> {
        &self.detector
    }

    pub fn world_mut(&mut self) -> Option<&mut SimWorld> {
        self.world.as_mut()
    }

    pub fn game_ticks(&self) -> u64 {
        self.game_ticks
    }

    pub fn now_secs(&self) -> f64 {
        self.context.now().as_secs_f64()
    }

    pub fn set_location(&mut self, location: Location) {
        self.context.set_location(location);
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Delivers one particle at the current time.
    pub fn particle(&mut self, event: &ParticleEvent) -> ParticleOutcome {
        self.detector.on_particle(event)
    }

    /// Delivers one particle at `millis`.
    pub fn particle_at(&mut self, millis: u64, x: f64, y: f64, z: f64, kind: ParticleKind) -> ParticleOutcome {
        self.context.set_millis(millis);
        self.particle(&ParticleEvent::new(x, y, z, kind))
    }

    /// Runs the tick pass at `millis`, bypassing the game-tick divider.
    pub fn pass_at(&mut self, millis: u64) -> TickOutcome {
        self.context.set_millis(millis);
        self.detector.update(self.world.as_ref())
    }

    /// Advances the clock by `dt`, delivers `particles`, then one game tick.
    pub fn step(&mut self, dt: Duration, particles: &[ParticleEvent]) -> TickOutcome {
        self.context.advance_time(dt);
        for particle in particles {
            self.detector.on_particle(particle);
        }
        self.game_ticks += 1;
        self.detector.on_game_tick(self.world.as_ref())
    }

    pub fn attack(&mut self, pos: BlockPos) {
        self.detector.on_attack(pos);
    }

    /// Loads a new world; the detector resets.
    pub fn join_world(&mut self, world: SimWorld) -> usize {
        self.world = Some(world);
        self.detector.on_world_join()
    }

    pub fn unload_world(&mut self) {
        self.world = None;
    }

    // ========================================================================
    // INSPECTION
    // ========================================================================

    /// Confirmed node positions, sorted.
    pub fn confirmed_positions(&self) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self.detector.confirmed_positions().collect();
        positions.sort();
        positions
    }

    /// Records a frame if exporting.
    pub fn record(&mut self, ground_truth: &[BlockPos], events: Vec<SimEvent>) {
        let confirmed = self.confirmed_positions();
        let candidates = self.detector.table().len();
        let time_sec = self.now_secs();

        if let Some(export) = self.export.as_mut() {
            export.add_frame(SimFrame {
                time_sec,
                ground_truth: ground_truth.iter().map(|&p| p.into()).collect(),
                confirmed: confirmed.into_iter().map(Into::into).collect(),
                candidates,
                events,
            });
        }
    }

    /// Hands back the recorder, finalized with the detector's metrics.
    pub fn finish_export(&mut self, passed: bool) -> Option<SimExport> {
        let mut export = self.export.take()?;
        export.finalize(passed, self.detector.metrics().clone());
        Some(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endernode_env::BlockId;

    #[test]
    fn test_step_advances_clock_and_schedule() {
        let mut client = SimulatedClient::new(DetectorConfig::default());
        let dt = Duration::from_millis(50);

        let outcomes: Vec<TickOutcome> = (0..5).map(|_| client.step(dt, &[])).collect();

        assert_eq!(client.context().now_millis(), 250);
        assert_eq!(client.game_ticks(), 5);
        assert!(outcomes[..4].iter().all(|o| *o == TickOutcome::NotDue));
        assert!(matches!(outcomes[4], TickOutcome::Completed(_)));
    }

    #[test]
    fn test_unloaded_world_skips_pass() {
        let mut client = SimulatedClient::new(DetectorConfig::default());
        client.unload_world();
        assert_eq!(client.pass_at(100), TickOutcome::NoWorld);
    }

    #[test]
    fn test_world_edits_reach_the_detector() {
        let mut client = SimulatedClient::new(DetectorConfig::default());
        client.particle_at(0, 0.5, 1.25, 0.5, ParticleKind::Portal);

        if let Some(world) = client.world_mut() {
            world.set_block(BlockPos::new(0, 0, 0), BlockId::BEDROCK);
        }
        client.pass_at(250);
        assert!(client.detector().table().is_empty());
    }

    #[test]
    fn test_record_without_export_is_noop() {
        let mut client = SimulatedClient::new(DetectorConfig::default());
        client.record(&[], vec![SimEvent::new("ignored")]);
        assert!(client.finish_export(true).is_none());
    }
}
