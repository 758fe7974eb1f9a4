//! End-to-end scenario sweeps across seeds.

use endernode_core::DetectorConfig;
use endernode_sim::scenarios::ScenarioId;
use endernode_sim::ScenarioRunner;
use proptest::prelude::*;

#[test]
fn all_scenarios_pass_for_several_seeds() {
    for seed in [1, 42, 1337, 0xdead_beef] {
        let runner = ScenarioRunner::new(seed).with_duration(4.0);
        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(
                result.passed,
                "{} seed={} failed: {:?}",
                scenario, seed, result.failure_reason
            );
        }
    }
}

#[test]
fn literal_scenarios_ignore_the_seed() {
    for scenario in ScenarioId::literal() {
        let a = ScenarioRunner::new(3).run(scenario);
        let b = ScenarioRunner::new(99).run(scenario);
        assert_eq!(a.metrics, b.metrics, "{}", scenario);
    }
}

#[test]
fn generated_scenarios_are_reproducible() {
    for scenario in ScenarioId::generated() {
        let a = ScenarioRunner::new(2024).with_duration(3.0).run(scenario);
        let b = ScenarioRunner::new(2024).with_duration(3.0).run(scenario);
        assert_eq!(a.metrics, b.metrics, "{}", scenario);
        assert_eq!(a.confirmed_nodes, b.confirmed_nodes);
        assert_eq!(a.total_ticks, b.total_ticks);
    }
}

#[test]
fn literal_scenarios_keep_default_timing_under_custom_config() {
    let config = DetectorConfig {
        particle_timeout_ms: 500,
        ..DetectorConfig::default()
    };
    let result = ScenarioRunner::new(5)
        .with_config(config)
        .run(ScenarioId::Silence);
    assert!(result.passed, "{:?}", result.failure_reason);
}

#[test]
fn export_serializes_to_json() {
    let result = ScenarioRunner::new(8)
        .with_recording(true)
        .run(ScenarioId::Attack);

    let export = result.export.expect("recording requested");
    let json = export.to_json().expect("export serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["scenario"], "attack");
    assert_eq!(value["passed"], true);
    assert_eq!(value["metrics"]["removed_attacked"], 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn ambient_noise_never_confirms(seed in any::<u64>()) {
        let result = ScenarioRunner::new(seed).with_duration(2.0).run(ScenarioId::AmbientNoise);
        prop_assert!(result.passed, "{:?}", result.failure_reason);
        prop_assert_eq!(result.confirmed_nodes, 0);
    }

    #[test]
    fn node_field_finds_every_node(seed in any::<u64>()) {
        let result = ScenarioRunner::new(seed).with_duration(4.0).run(ScenarioId::NodeField);
        prop_assert!(result.passed, "{:?}", result.failure_reason);
        prop_assert_eq!(result.confirmed_nodes, result.ground_truth_nodes);
    }
}
