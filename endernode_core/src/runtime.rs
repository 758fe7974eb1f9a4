//! Detector Runtime - serializes host callbacks onto one task.
//!
//! Game clients tend to fire particle, input and world callbacks from
//! different threads. The detector itself is single-owner, so the host
//! forwards every callback as a [`ClientEvent`] through a [`DetectorHandle`]
//! and the runtime applies them strictly in arrival order.
//!
//! ```text
//!  network thread ──┐
//!  input thread ────┼──► mpsc ──► DetectorRuntime ──► EnderNodeDetector
//!  client tick ─────┘                    │
//!                                        └──► watch<Vec<Waypoint>> ──► render thread
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use endernode_core::{DetectorConfig, DetectorRuntime, EnderNodeDetector};
//! use endernode_env::LiveContext;
//!
//! let ctx = LiveContext::shared();
//! let detector = EnderNodeDetector::new(ctx, DetectorConfig::load("endernode.toml")?);
//! let (runtime, handle, waypoints) = DetectorRuntime::new(detector);
//! tokio::spawn(runtime.run());
//!
//! handle.particle(event)?;
//! let visible = waypoints.borrow().clone();
//! ```

use crate::decoder::ParticleEvent;
use crate::detector::{EnderNodeDetector, ParticleOutcome};
use crate::error::DetectorError;
use crate::evidence::IngestOutcome;
use crate::metrics::{DetectorMetrics, TickOutcome};
use crate::waypoint::Waypoint;
use endernode_env::{BlockPos, BlockView, ClientContext};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

/// A host callback, forwarded to the runtime.
#[derive(Debug)]
pub enum ClientEvent<W> {
    /// Server spawned a particle
    Particle(ParticleEvent),
    /// One client game tick elapsed
    GameTick,
    /// Player attacked a block
    Attack(BlockPos),
    /// Player joined a world; the runtime queries this world from now on
    WorldJoin(Arc<W>),
    /// The client world went away (disconnect, loading screen)
    WorldUnload,
}

/// Cloneable sender side of the runtime.
#[derive(Debug)]
pub struct DetectorHandle<W> {
    tx: mpsc::UnboundedSender<ClientEvent<W>>,
}

impl<W> Clone for DetectorHandle<W> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<W> DetectorHandle<W> {
    /// Forwards an event. Fails once the runtime has stopped.
    pub fn send(&self, event: ClientEvent<W>) -> Result<(), DetectorError> {
        self.tx
            .send(event)
            .map_err(|_| DetectorError::ChannelClosed)
    }

    pub fn particle(&self, event: ParticleEvent) -> Result<(), DetectorError> {
        self.send(ClientEvent::Particle(event))
    }

    pub fn game_tick(&self) -> Result<(), DetectorError> {
        self.send(ClientEvent::GameTick)
    }

    pub fn attack(&self, pos: BlockPos) -> Result<(), DetectorError> {
        self.send(ClientEvent::Attack(pos))
    }

    pub fn world_join(&self, world: Arc<W>) -> Result<(), DetectorError> {
        self.send(ClientEvent::WorldJoin(world))
    }

    pub fn world_unload(&self) -> Result<(), DetectorError> {
        self.send(ClientEvent::WorldUnload)
    }

    /// Returns true once the runtime has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns a detector and the current world, and applies events in order.
pub struct DetectorRuntime<Ctx, W>
where
    Ctx: ClientContext,
{
    detector: EnderNodeDetector<Ctx>,
    world: Option<Arc<W>>,
    rx: mpsc::UnboundedReceiver<ClientEvent<W>>,
    waypoints: watch::Sender<Vec<Waypoint>>,
}

impl<Ctx, W> DetectorRuntime<Ctx, W>
where
    Ctx: ClientContext,
    W: BlockView + Send + Sync + 'static,
{
    /// Creates a runtime with no world loaded.
    ///
    /// Returns the runtime, a handle for feeding it and a receiver that
    /// always holds the waypoints currently visible.
    pub fn new(
        detector: EnderNodeDetector<Ctx>,
    ) -> (Self, DetectorHandle<W>, watch::Receiver<Vec<Waypoint>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (waypoints, waypoints_rx) = watch::channel(Vec::new());
        let runtime = Self {
            detector,
            world: None,
            rx,
            waypoints,
        };
        (runtime, DetectorHandle { tx }, waypoints_rx)
    }

    /// Applies events until every handle has been dropped, then returns the
    /// final metrics.
    pub async fn run(mut self) -> DetectorMetrics {
        info!("Ender node detector started");
        while let Some(event) = self.rx.recv().await {
            self.apply(event);
        }
        let metrics = self.detector.metrics().clone();
        info!(
            confirmed = metrics.nodes_confirmed,
            removed = metrics.removals(),
            "Ender node detector stopped"
        );
        metrics
    }

    /// Applies one event synchronously.
    pub fn apply(&mut self, event: ClientEvent<W>) {
        match event {
            ClientEvent::Particle(particle) => {
                if let ParticleOutcome::Ingested(hit, IngestOutcome::Created) =
                    self.detector.on_particle(&particle)
                {
                    trace!(pos = %hit.pos, face = %hit.face, "New candidate");
                }
            }
            ClientEvent::GameTick => {
                let outcome = self.detector.on_game_tick(self.world.as_deref());
                if let TickOutcome::Completed(summary) = outcome {
                    if summary.changed_nodes() {
                        debug!(
                            promoted = summary.promoted,
                            mined = summary.mined,
                            expired = summary.expired,
                            candidates = self.detector.table().len(),
                            "Node set changed"
                        );
                    }
                }
                if outcome != TickOutcome::NotDue {
                    self.publish();
                }
            }
            ClientEvent::Attack(pos) => {
                let was_node = self.detector.is_node(pos);
                self.detector.on_attack(pos);
                if was_node {
                    debug!(%pos, "Node attacked");
                    self.publish();
                }
            }
            ClientEvent::WorldJoin(world) => {
                let discarded = self.detector.on_world_join();
                info!(discarded, "World joined; detector reset");
                self.world = Some(world);
                self.publish();
            }
            ClientEvent::WorldUnload => {
                self.world = None;
                debug!("World unloaded");
            }
        }
    }

    /// Read-only access to the detector.
    pub fn detector(&self) -> &EnderNodeDetector<Ctx> {
        &self.detector
    }

    /// Returns true while a world is loaded.
    pub fn has_world(&self) -> bool {
        self.world.is_some()
    }

    fn publish(&self) {
        let visible = if self.detector.should_process() && self.detector.config().waypoint.enabled {
            self.detector.waypoints()
        } else {
            Vec::new()
        };
        self.waypoints.send_if_modified(|current| {
            if *current == visible {
                false
            } else {
                *current = visible;
                true
            }
        });
    }
}
