use proptest::prelude::*;
use tb_workflow::{Persona, TransitionDirection, Workflow, WorkflowConfig};

fn persona() -> impl Strategy<Value = Persona> {
    prop_oneof![
        Just(Persona::Client),
        Just(Persona::Consultant),
        Just(Persona::Developer),
        Just(Persona::QA),
        Just(Persona::Default),
    ]
}

fn bundled_stage() -> impl Strategy<Value = String> {
    let names: Vec<String> = Workflow::bundled()
        .unwrap()
        .stages()
        .map(ToString::to_string)
        .collect();
    proptest::sample::select(names)
}

/// Random small graph: stage names S0..Sn, edges as index pairs (self edges dropped)
fn random_config() -> impl Strategy<Value = WorkflowConfig> {
    (2..8usize)
        .prop_flat_map(|n| {
            (
                Just(n),
                proptest::collection::vec((0..n, 0..n), 0..20),
                proptest::collection::vec((0..n, 0..n), 0..20),
            )
        })
        .prop_map(|(n, forward, backtrack)| {
            let mut yaml = String::from("stages: [");
            yaml.push_str(&(0..n).map(|i| format!("S{i}")).collect::<Vec<_>>().join(", "));
            yaml.push_str("]\ninitial_stage: S0\n");
            for (name, edges) in [("forward", forward), ("backtrack", backtrack)] {
                yaml.push_str(name);
                yaml.push_str(":\n");
                for from in 0..n {
                    let mut targets: Vec<usize> = edges
                        .iter()
                        .filter(|(f, t)| *f == from && f != t)
                        .map(|(_, t)| *t)
                        .collect();
                    targets.dedup();
                    let list = targets
                        .iter()
                        .map(|t| format!("S{t}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    yaml.push_str(&format!("  S{from}: [{list}]\n"));
                }
            }
            WorkflowConfig::from_yaml_str(&yaml).unwrap()
        })
}

proptest! {
    #[test]
    fn prop_advance_never_offers_current_stage(stage in bundled_stage(), who in persona()) {
        let wf = Workflow::bundled().unwrap();
        let options = wf.advance_options(&stage, who);
        prop_assert!(options.iter().all(|o| o.target != stage.as_str()));
        prop_assert!(options.iter().all(|o| o.direction == TransitionDirection::Advance));
    }

    #[test]
    fn prop_advance_options_mirror_forward_edges(config in random_config(), who in persona()) {
        let wf = config.validate().unwrap();
        for stage in wf.stages() {
            let options = wf.advance_options(stage.as_str(), who);
            let targets: Vec<&str> = options.iter().map(|o| o.target.as_str()).collect();
            let expected: Vec<&str> = wf.forward_targets(stage.as_str()).iter().map(|s| s.as_str()).collect();
            prop_assert_eq!(targets, expected);
        }
    }

    #[test]
    fn prop_backtrack_without_overrides_follows_table(config in random_config(), who in persona()) {
        let wf = config.validate().unwrap();
        for stage in wf.stages() {
            let options = wf.backtrack_options(stage.as_str(), who);
            prop_assert_eq!(options.len(), wf.backtrack_targets(stage.as_str()).len());
            prop_assert!(options.iter().all(|o| o.icon == wf.glyphs().backtrack));
        }
    }

    #[test]
    fn prop_every_stage_reachable_from_itself(config in random_config()) {
        let wf = config.validate().unwrap();
        for stage in wf.stages() {
            prop_assert!(wf.reachable_from(stage.as_str()).contains(&stage));
        }
    }
}
