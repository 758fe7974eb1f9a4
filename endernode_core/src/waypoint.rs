//! The "EXPOSURE" Surface - what renderers get to see.
//!
//! Only confirmed nodes are exposed. The detector does not draw anything
//! itself: it hands one [`Waypoint`] per node to a [`WaypointRenderer`]
//! supplied by the host, with the style fixed from configuration when the
//! detector was built.

use crate::config::{WaypointConfig, WaypointKind};
use endernode_env::BlockPos;
use serde::Serialize;

/// A confirmed node as seen from outside the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EnderNode {
    pub pos: BlockPos,

    /// When the node was confirmed (ms)
    pub confirmed_at: u64,

    /// When its last particle arrived (ms)
    pub last_particle_seen: u64,
}

/// Everything a renderer needs to draw one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub pos: BlockPos,
    pub kind: WaypointKind,

    /// RGB in `[0, 1]`
    pub color: [f32; 3],

    /// Alpha in `[0, 1]`
    pub alpha: f32,

    pub line_width: f32,
    pub through_walls: bool,
}

/// Pre-resolved render style, built once from [`WaypointConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WaypointStyle {
    kind: WaypointKind,
    color: [f32; 3],
    alpha: f32,
    line_width: f32,
    through_walls: bool,
}

impl WaypointStyle {
    pub(crate) fn from_config(config: &WaypointConfig) -> Self {
        Self {
            kind: config.kind,
            color: config.color.components(),
            alpha: config.color.alpha(),
            line_width: config.line_width,
            through_walls: config.through_walls,
        }
    }

    pub(crate) fn waypoint_at(&self, pos: BlockPos) -> Waypoint {
        Waypoint {
            pos,
            kind: self.kind,
            color: self.color,
            alpha: self.alpha,
            line_width: self.line_width,
            through_walls: self.through_walls,
        }
    }
}

/// Drawing collaborator.
///
/// Implemented by the host's render pipeline; called once per confirmed node
/// per frame.
pub trait WaypointRenderer {
    fn draw(&mut self, waypoint: &Waypoint);
}

/// Collects waypoints instead of drawing them.
impl WaypointRenderer for Vec<Waypoint> {
    fn draw(&mut self, waypoint: &Waypoint) {
        self.push(*waypoint);
    }
}

impl<R: WaypointRenderer + ?Sized> WaypointRenderer for &mut R {
    fn draw(&mut self, waypoint: &Waypoint) {
        (**self).draw(waypoint);
    }
}
