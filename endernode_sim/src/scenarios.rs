//! Detection scenarios for DST.

use crate::error::SimError;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    /// DST-001: five portal + five witch on one face confirm a node
    HappyPath,

    /// DST-002: evidence split across two faces never confirms
    CrossFace,

    /// DST-003: a confirmed node is dropped once its block turns to bedrock
    Mined,

    /// DST-004: a confirmed node is dropped after ten seconds of silence
    Silence,

    /// DST-005: attacking a node removes it between ticks
    Attack,

    /// DST-006: re-evaluation is rate limited per candidate
    RateLimit,

    // ═══════════════════════════════════════════════════
    // GENERATED SCENARIOS - Oracle-driven, seed dependent
    // ═══════════════════════════════════════════════════

    /// DST-007: heavy ambient particle load, zero nodes
    AmbientNoise,

    /// DST-008: a field of random nodes, half of them mined mid-run
    NodeField,

    /// DST-009: world changes and location gating
    WorldHop,

    /// DST-010: detector switched off
    Disabled,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        let mut all = Self::literal();
        all.extend(Self::generated());
        all
    }

    /// Scenarios with fixed timestamps and coordinates; independent of seed.
    pub fn literal() -> Vec<ScenarioId> {
        vec![
            ScenarioId::HappyPath,
            ScenarioId::CrossFace,
            ScenarioId::Mined,
            ScenarioId::Silence,
            ScenarioId::Attack,
            ScenarioId::RateLimit,
        ]
    }

    /// Scenarios driven by the Oracle.
    pub fn generated() -> Vec<ScenarioId> {
        vec![
            ScenarioId::AmbientNoise,
            ScenarioId::NodeField,
            ScenarioId::WorldHop,
            ScenarioId::Disabled,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::HappyPath => "happy_path",
            ScenarioId::CrossFace => "cross_face",
            ScenarioId::Mined => "mined",
            ScenarioId::Silence => "silence",
            ScenarioId::Attack => "attack",
            ScenarioId::RateLimit => "rate_limit",
            ScenarioId::AmbientNoise => "ambient_noise",
            ScenarioId::NodeField => "node_field",
            ScenarioId::WorldHop => "world_hop",
            ScenarioId::Disabled => "disabled",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::HappyPath => "5 portal + 5 witch on the UP face of (10, 20, 30), pass at 600ms",
            ScenarioId::CrossFace => "5 portal on UP, 5 witch on DOWN of (0, 0, 0): no confirmation",
            ScenarioId::Mined => "Confirmed node replaced by bedrock at 1000ms",
            ScenarioId::Silence => "Confirmed node silent until 10750ms",
            ScenarioId::Attack => "Confirmed node attacked at 700ms, then re-seen",
            ScenarioId::RateLimit => "4+4 fails at 250ms, skipped at 500ms, confirms at 750ms",
            ScenarioId::AmbientNoise => "Ambient and stray particles only; no node may appear",
            ScenarioId::NodeField => "8 random nodes, half mined halfway through",
            ScenarioId::WorldHop => "Reset on world join, gated outside the End, reconfirm after return",
            ScenarioId::Disabled => "Detector disabled; nothing may be tracked",
        }
    }

    /// Returns true if the scenario uses the Oracle (and thus the seed).
    pub fn is_generated(&self) -> bool {
        !Self::literal().contains(self)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy_path" | "happypath" | "dst-001" => Ok(ScenarioId::HappyPath),
            "cross_face" | "crossface" | "dst-002" => Ok(ScenarioId::CrossFace),
            "mined" | "dst-003" => Ok(ScenarioId::Mined),
            "silence" | "dst-004" => Ok(ScenarioId::Silence),
            "attack" | "dst-005" => Ok(ScenarioId::Attack),
            "rate_limit" | "ratelimit" | "dst-006" => Ok(ScenarioId::RateLimit),
            "ambient_noise" | "ambientnoise" | "dst-007" => Ok(ScenarioId::AmbientNoise),
            "node_field" | "nodefield" | "dst-008" => Ok(ScenarioId::NodeField),
            "world_hop" | "worldhop" | "dst-009" => Ok(ScenarioId::WorldHop),
            "disabled" | "dst-010" => Ok(ScenarioId::Disabled),
            _ => Err(SimError::UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
            assert_eq!(scenario.to_string(), scenario.name());
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("DST-004".parse::<ScenarioId>().unwrap(), ScenarioId::Silence);
        assert_eq!("DST-008".parse::<ScenarioId>().unwrap(), ScenarioId::NodeField);
        assert!(matches!(
            "teleport".parse::<ScenarioId>(),
            Err(SimError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_groups_partition_all() {
        assert_eq!(ScenarioId::all().len(), 10);
        assert!(ScenarioId::literal().iter().all(|s| !s.is_generated()));
        assert!(ScenarioId::generated().iter().all(|s| s.is_generated()));
    }
}
