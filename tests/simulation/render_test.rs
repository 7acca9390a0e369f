/*!
 * Render Tests
 * Text and JSON views of a running simulation
 */

use memsim::render::defrag_section;
use memsim::{ProcessSpec, SimConfig, SharedSimulation, Simulation, Snapshot, Strategy};
use pretty_assertions::assert_eq;

fn running() -> Simulation {
    let config = SimConfig {
        capacity: 100,
        strategy: Strategy::FirstFit,
        quantum: 10,
    };
    let specs = vec![ProcessSpec::new(0, 40, 0, 20), ProcessSpec::new(1, 30, 0, 20)];
    let mut sim = Simulation::new(config, specs).unwrap();
    sim.step_once().unwrap();
    sim
}

#[test]
fn test_snapshot_text() {
    let text = running().snapshot().to_string();
    let rule = "-".repeat(37);

    let expected = vec![
        "=====System=====".to_string(),
        "System Time: 10".to_string(),
        "Active Processes:".to_string(),
        "PID  |Memory Location|Time Remaining ".to_string(),
        rule.clone(),
        "0    |[0, 39]        |20             ".to_string(),
        rule.clone(),
        "1    |[40, 69]       |10             ".to_string(),
        rule,
        String::new(),
        "=====Memory=====".to_string(),
        "Memory Free: 30".to_string(),
        "Memory Allocated: 70".to_string(),
        String::new(),
        "----------".to_string(),
        "[xx][x][ ]".to_string(),
        "----------".to_string(),
    ];
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    assert_eq!(lines, expected);
}

#[test]
fn test_snapshot_json_round_trips() {
    let snapshot = running().snapshot();
    let json = snapshot.to_json().unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, snapshot);
    assert!(json.contains("\"strategy\": \"first-fit\""));
}

#[test]
fn test_shared_handle_renders_same_state() {
    let sim = running();
    let expected = sim.snapshot();
    let shared = SharedSimulation::new(sim);

    assert_eq!(shared.snapshot(), expected);
    let report = shared.run(100).unwrap();
    assert!(report.complete);
    assert!(shared.is_complete());
    assert_eq!(shared.summary().completed.len(), 2);
}

#[test]
fn test_coalesce_renders_before_and_after() {
    let config = SimConfig {
        capacity: 100,
        strategy: Strategy::FirstFit,
        quantum: 10,
    };
    let specs = vec![
        ProcessSpec::new(0, 50, 0, 10),
        ProcessSpec::new(1, 50, 0, 10),
        ProcessSpec::new(2, 80, 0, 10),
    ];
    let mut sim = Simulation::new(config, specs).unwrap();

    let report = sim.run(3).unwrap();
    let third = &report.steps[2];
    assert_eq!(third.admitted, vec![2]);
    assert_eq!(third.defrag.len(), 1);

    let text = defrag_section(&third.defrag[0], 10);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "No block available with size 80. Coalescing memory...",
            "Before:",
            "----------",
            "[   ][   ]",
            "----------",
            "After:",
            "----------",
            "[        ]",
            "----------",
        ]
    );
}
