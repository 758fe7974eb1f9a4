//! Ender Node Detector - passive, particle-driven node recognition
//!
//! Hidden resource nodes in the End give themselves away by constantly
//! emitting portal and witch particles off their exposed faces. This crate
//! turns that noisy particle stream into a stable set of block positions:
//! 1. **Decoding**: every particle is mapped to the block face it came off,
//!    or dropped
//! 2. **Evidence**: per-block, per-face counters accumulate until a single
//!    face has seen enough of both kinds
//! 3. **Reaping**: nodes disappear when mined, attacked, silent for too long,
//!    or when the world changes
//!
//! The detector is Sans-IO: time and location come from a
//! [`ClientContext`](endernode_env::ClientContext), block state from a
//! [`BlockView`](endernode_env::BlockView).

pub mod config;
pub mod confirmation;
pub mod decoder;
pub mod detector;
pub mod error;
pub mod evidence;
pub mod metrics;
pub mod reaper;
pub mod runtime;
pub mod scheduler;
pub mod waypoint;

// Re-export key types for convenience
pub use config::{Color, DetectorConfig, WaypointConfig, WaypointKind};
pub use confirmation::{ConfirmationPolicy, Verdict};
pub use decoder::{decode, FaceHit, ParticleEvent, ParticleKind};
pub use detector::{AttackResult, EnderNodeDetector, ParticleOutcome};
pub use error::DetectorError;
pub use evidence::{Candidate, EvidenceTable, FaceEvidence, IngestOutcome};
pub use metrics::{DetectorMetrics, PassSummary, TickOutcome};
pub use reaper::{ReaperPolicy, RemovalReason};
pub use runtime::{ClientEvent, DetectorHandle, DetectorRuntime};
pub use scheduler::CyclicSchedule;
pub use waypoint::{EnderNode, Waypoint, WaypointRenderer};
