use dagrun::dag::{LayerPlan, RunState, ValidationError, ValidationOptions, plan_layers};
use dagrun_test_utils::fake_body::Recorder;

#[test]
fn plan_matches_layering_without_running_bodies() {
    let r = Recorder::new();
    let tasks = vec![
        r.task("A", []),
        r.task("B", ["A"]),
        r.task("C", ["A"]),
        r.task("D", ["B", "C"]),
    ];

    let plan = plan_layers(&tasks, &ValidationOptions::default()).unwrap();

    assert_eq!(
        plan,
        LayerPlan {
            layers: vec![
                vec!["A".into()],
                vec!["B".into(), "C".into()],
                vec!["D".into()],
            ],
            unplaceable: vec![],
        }
    );
    assert!(r.events().is_empty());
}

#[test]
fn run_state_moves_tasks_from_open_to_done() {
    let r = Recorder::new();
    let mut state = RunState::new(vec![r.task("A", []), r.task("B", ["A"])]);

    let frontier: Vec<String> = state
        .ready_frontier()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(frontier, vec!["A".to_string()]);

    state.advance(["A"]);
    assert!(state.is_done("A"));
    assert_eq!(state.open_names(), vec!["B".to_string()]);
    assert_eq!(state.open_len() + state.done_len(), 2);

    // Advancing an unknown or already-done task changes nothing.
    state.advance(["A", "nope"]);
    assert_eq!(state.done_len(), 1);

    state.advance(["B"]);
    assert!(state.is_complete());
    assert!(state.ready_frontier().is_empty());
}

#[test]
fn plan_rejects_duplicate_names_instead_of_dropping_one() {
    let r = Recorder::new();
    let tasks = vec![r.task("A", []), r.task("A", []), r.task("B", ["A"])];

    assert_eq!(
        plan_layers(&tasks, &ValidationOptions::default()),
        Err(ValidationError::DuplicateName("A".into()))
    );
}

#[test]
fn plan_rejects_unknown_dependency_instead_of_leaving_it_unplaced() {
    let r = Recorder::new();
    let tasks = vec![r.task("A", []), r.task("B", ["ghost"])];

    assert_eq!(
        plan_layers(&tasks, &ValidationOptions::default()),
        Err(ValidationError::UnknownDependency {
            task: "B".into(),
            dependency: "ghost".into(),
        })
    );
}

#[test]
fn plan_applies_the_single_entry_point_rule() {
    let r = Recorder::new();
    let tasks = vec![r.task("A", []), r.task("B", [])];

    assert_eq!(
        plan_layers(&tasks, &ValidationOptions::single_entry_point()),
        Err(ValidationError::MultipleEntryPoints(vec!["A".into(), "B".into()]))
    );
}
