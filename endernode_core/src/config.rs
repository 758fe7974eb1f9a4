//! Detector configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the stock behaviour. Partial files only override what they name:
//!
//! ```toml
//! enabled = true
//! particle_timeout_ms = 15000
//!
//! [waypoint]
//! kind = "outlined_highlight"
//! color = { r = 255, g = 85, b = 255, a = 160 }
//! ```

use crate::error::DetectorError;
use endernode_env::BlockId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the [`EnderNodeDetector`](crate::EnderNodeDetector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Master switch; combined with the location check (default: true)
    pub enabled: bool,

    /// Portal particles needed on a single face (default: 5)
    pub min_portal_per_face: u32,

    /// Witch particles needed on that same face (default: 5)
    pub min_witch_per_face: u32,

    /// Minimum spacing between confirmation attempts per candidate
    /// (default: 500 ms)
    pub confirmation_interval_ms: u64,

    /// Confirmed nodes are dropped after this much particle silence
    /// (default: 10 s)
    pub particle_timeout_ms: u64,

    /// Game ticks between tick passes (default: 5 = 250 ms at 20 TPS)
    pub update_interval_ticks: u32,

    /// Tile the server leaves behind once a node is mined (default: bedrock)
    pub mined_block: BlockId,

    /// How confirmed nodes are drawn
    pub waypoint: WaypointConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_portal_per_face: 5,
            min_witch_per_face: 5,
            confirmation_interval_ms: 500,
            particle_timeout_ms: 10_000,
            update_interval_ticks: 5,
            mined_block: BlockId::BEDROCK,
            waypoint: WaypointConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(source: &str) -> Result<Self, DetectorError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Checks that thresholds and intervals are usable.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.min_portal_per_face == 0 || self.min_witch_per_face == 0 {
            return Err(DetectorError::invalid_config(
                "per-face particle thresholds must be at least 1",
            ));
        }
        if self.update_interval_ticks == 0 {
            return Err(DetectorError::invalid_config(
                "update_interval_ticks must be at least 1",
            ));
        }
        if self.particle_timeout_ms == 0 {
            return Err(DetectorError::invalid_config(
                "particle_timeout_ms must be positive",
            ));
        }
        self.waypoint.validate()
    }
}

// ============================================================================
// WAYPOINT STYLE
// ============================================================================

/// Drawing style of a node waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    /// Beacon beam plus filled box
    Waypoint,
    /// Beacon beam plus filled and outlined box
    OutlinedWaypoint,
    /// Filled box
    #[default]
    Highlight,
    /// Filled and outlined box
    OutlinedHighlight,
    /// Outline only
    Outline,
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    u8::MAX
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// RGB as floats in `[0, 1]`.
    pub fn components(&self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Alpha as a float in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        // light purple
        Self::rgba(0xFF, 0x55, 0xFF, 0xFF)
    }
}

/// Render settings handed to the waypoint collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    /// Draw waypoints at all (default: true)
    pub enabled: bool,

    /// Drawing style (default: highlight)
    pub kind: WaypointKind,

    /// Fill / outline color, alpha included
    pub color: Color,

    /// Outline width in pixels (default: 1.0)
    pub line_width: f32,

    /// Draw through terrain (default: true)
    pub through_walls: bool,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: WaypointKind::default(),
            color: Color::default(),
            line_width: 1.0,
            through_walls: true,
        }
    }
}

impl WaypointConfig {
    fn validate(&self) -> Result<(), DetectorError> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(DetectorError::invalid_config(format!(
                "waypoint.line_width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}
