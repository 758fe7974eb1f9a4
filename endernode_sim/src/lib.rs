//! Ender Node Deterministic Simulation Testing (DST) Harness
//!
//! This crate provides a controlled End where the detector runs
//! deterministically against a known ground truth.
//!
//! # Core Principle: Nothing Is Left To Chance
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: Virtual clock advances only when the scenario steps it
//! - **Particles**: Emitted by the Oracle from a seeded ChaCha8 RNG
//! - **World**: Block state lives in a sparse grid the scenario edits
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                         │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │ SimulatedClient                                       │  │
//! │  │   SimContext (virtual clock + location)               │  │
//! │  │   SimWorld   (block grid)                             │  │
//! │  │   EnderNodeDetector                                   │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                           ▲ particles                       │
//! │  ┌────────────────────────┴──────────────────────────────┐  │
//! │  │            Oracle (ground truth nodes)                │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use endernode_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).with_duration(5.0).run(ScenarioId::NodeField);
//! assert!(result.passed);
//! ```

mod client;
mod context;
mod error;
mod exporter;
mod oracle;
mod runner;
pub mod scenarios;
mod world;

pub use client::SimulatedClient;
pub use context::SimContext;
pub use error::SimError;
pub use exporter::{NodePosition, SimEvent, SimExport, SimFrame};
pub use oracle::{GroundTruthNode, Oracle};
pub use runner::{ScenarioResult, ScenarioRunner};
pub use world::SimWorld;
