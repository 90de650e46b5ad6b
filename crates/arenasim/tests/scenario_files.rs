//! # Scenario File Tests
//!
//! The scenario files shipped with the crate must parse, match the built-in
//! demos, and run to completion.

use std::path::PathBuf;

use arenasim::{Domain, HarnessConfig, Renderer, Runner, Scenario};
use arenasim_core::{Block, BlockState, StrategyKind};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn shipped_scenarios_match_demos() {
    let files = [
        ("linear.toml", StrategyKind::Linear),
        ("free_list.toml", StrategyKind::FreeList),
        ("boundary_tag.toml", StrategyKind::BoundaryTag),
    ];

    for (file, kind) in files {
        let scenario = Scenario::load(&scenario_path(file)).unwrap();
        assert_eq!(scenario, Scenario::demo(kind), "{file}");
    }
}

#[test]
fn boundary_tag_demo_ends_with_one_free_block() {
    let scenario = Scenario::load(&scenario_path("boundary_tag.toml")).unwrap();
    let mut runner = Runner::<u8>::new(&scenario).unwrap();
    let renderer = Renderer::new(80, false);

    let mut frames = Vec::new();
    let summary = runner
        .run(|report| {
            frames.push(renderer.render(&report.snapshot));
            Ok(())
        })
        .unwrap();

    assert_eq!(summary.steps, 8);
    assert_eq!(frames.len(), 9);
    assert!(frames[4].ends_with("Total blocks: 1 free; 4 used\n"));
    assert!(frames[8].ends_with("Total blocks: 1 free; 0 used\n"));
    assert_eq!(
        runner.strategy().blocks(),
        vec![Block::new(0, 29, BlockState::Free)]
    );
}

#[test]
fn wide_scenario_runs_in_u16() {
    let scenario = Scenario::load(&scenario_path("wide_boundary_tag.toml")).unwrap();
    assert_eq!(scenario.domain, Domain::U16);
    assert!(Runner::<u8>::new(&scenario).is_err());

    let mut runner = Runner::<u16>::new(&scenario).unwrap();
    runner.run(|_| Ok(())).unwrap();

    assert_eq!(
        runner.strategy().blocks(),
        vec![
            Block::new(0, 40, BlockState::Used),
            Block::new(43, 254, BlockState::Free),
        ]
    );
}

#[test]
fn shipped_config_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("arenasim.toml");
    let config = HarnessConfig::load(&path).unwrap();
    assert!(config.display.color);
    assert!(!config.display.step);
    assert_eq!(config.logging.filter, "warn");
}

#[test]
fn missing_file_reports_path() {
    let err = Scenario::load(&scenario_path("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}
