//! End-to-end scenarios driving a machine through its public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use switchyard::{Level, ManualClock, MachineError, RecordingSink, StateMachine};

fn counter() -> (Rc<Cell<usize>>, impl Fn() -> Box<dyn FnMut()>) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    let make = move || -> Box<dyn FnMut()> {
        let c = Rc::clone(&handle);
        Box::new(move || c.set(c.get() + 1))
    };
    (count, make)
}

fn start_process_end() -> StateMachine {
    let mut machine = StateMachine::new();
    machine.add_state("Start").unwrap();
    machine.add_state("Process").unwrap();
    machine.add_state("End").unwrap();
    machine
}

#[test]
fn current_state_follows_transitions() {
    let (count, make) = counter();
    let mut machine = start_process_end();
    machine.start_with("Start");
    machine.add_transition("Transition1", "Start", "Process").unwrap();
    machine.on_transition_action("Transition1", make()).unwrap();
    machine.add_transition("Transition2", "Process", "End").unwrap();
    machine.on_transition_action("Transition2", make()).unwrap();

    let first = machine.current_state_name().map(str::to_string);
    machine.transition("Transition1").unwrap();

    assert_eq!(first.as_deref(), Some("Start"));
    assert_eq!(machine.current_state_name(), Some("Process"));
    assert_eq!(count.get(), 1);
}

#[test]
fn transitions_must_leave_the_current_state() {
    let mut machine = start_process_end();
    machine.add_transition("T1", "Start", "Process").unwrap();
    machine.add_transition("T2", "Process", "End").unwrap();
    machine.start_with("Start");

    assert!(machine.transition("T2").is_err());
    assert_eq!(machine.current_state_name(), Some("Start"));

    assert!(machine.transition("T1").is_ok());
    assert_eq!(machine.current_state_name(), Some("Process"));

    assert!(machine.transition("T2").is_ok());
    assert_eq!(machine.current_state_name(), Some("End"));
}

#[test]
fn transition_without_action_succeeds() {
    let mut machine = start_process_end();
    machine.start_with("Start");
    machine.add_transition("Transition1", "Start", "Process").unwrap();
    machine.add_transition("Transition2", "Process", "End").unwrap();

    assert!(machine.transition("Transition1").is_ok());
}

#[test]
fn rejected_transition_runs_no_action() {
    let (count, make) = counter();
    let mut machine = start_process_end();
    machine.start_with("Start");
    machine.add_transition("Transition1", "Start", "Process").unwrap();
    machine.on_transition_action("Transition1", make()).unwrap();
    machine.add_transition("Transition2", "Process", "End").unwrap();
    machine.on_transition_action("Transition2", make()).unwrap();

    let result = machine.transition("Transition2");

    assert!(matches!(result, Err(MachineError::WrongOrigin { .. })));
    assert_eq!(count.get(), 0);
}

#[test]
fn transition_to_reaches_only_direct_neighbours() {
    for (target, expected) in [("Process", true), ("End", false)] {
        let (count, make) = counter();
        let mut machine = start_process_end();
        machine.start_with("Start");
        machine.add_transition("Start2Process", "Start", "Process").unwrap();
        machine.on_transition_action("Start2Process", make()).unwrap();
        machine.add_transition("Process2End", "Process", "End").unwrap();
        machine.on_transition_action("Process2End", make()).unwrap();

        let happened = machine.transition_to(target).is_ok();

        assert_eq!(happened, expected, "target {target}");
        assert_eq!(count.get(), usize::from(expected), "target {target}");
    }
}

#[test]
fn every_callback_runs_once_per_documented_step() {
    let (count, make) = counter();
    let mut machine = start_process_end();
    for state in ["Start", "Process", "End"] {
        machine.on_state_enter(state, make()).unwrap();
        machine.on_state_update(state, make()).unwrap();
        machine.on_state_exit(state, make()).unwrap();
    }

    machine.start_with("Start");
    machine.add_transition("Transition1", "Start", "Process").unwrap();
    machine.on_transition_action("Transition1", make()).unwrap();
    machine.add_transition("Transition2", "Process", "End").unwrap();
    machine.on_transition_action("Transition2", make()).unwrap();

    assert!(machine.transition("Transition1").is_ok());
    assert!(machine.transition("Transition2").is_ok());
    machine.update();

    // start enter, 2 x (exit + enter + action), one update of End
    assert_eq!(count.get(), 8);
}

#[test]
fn transition_enter_and_exit_callbacks_run() {
    let (count, make) = counter();
    let mut machine = start_process_end();
    machine.start_with("Start");
    for (name, from, to) in [
        ("Transition1", "Start", "Process"),
        ("Transition2", "Process", "End"),
    ] {
        machine.add_transition(name, from, to).unwrap();
        machine.on_transition_enter(name, make()).unwrap();
        machine.on_transition_action(name, make()).unwrap();
        machine.on_transition_exit(name, make()).unwrap();
    }

    assert!(machine.transition("Transition1").is_ok());
    assert_eq!(count.get(), 3);
}

#[test]
fn full_sequence_interleaves_state_and_transition_callbacks() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let trace = |label: &str| {
        let log = Rc::clone(&log);
        let label = label.to_string();
        move || log.borrow_mut().push(label.clone())
    };
    let mut machine = start_process_end();
    machine.add_transition("T1", "Start", "Process").unwrap();
    machine.add_transition("T2", "Process", "End").unwrap();
    for state in ["Start", "Process", "End"] {
        machine.on_state_enter(state, trace(&format!("{state}.enter"))).unwrap();
        machine.on_state_exit(state, trace(&format!("{state}.exit"))).unwrap();
    }
    for name in ["T1", "T2"] {
        machine.on_transition_enter(name, trace(&format!("{name}.enter"))).unwrap();
        machine.on_transition_exit(name, trace(&format!("{name}.exit"))).unwrap();
        machine.on_transition_action(name, trace(&format!("{name}.action"))).unwrap();
    }

    machine.start_with("Start");
    machine.transition("T1").unwrap();
    machine.transition_to("End").unwrap();

    assert_eq!(
        *log.borrow(),
        [
            "Start.enter",
            "Start.exit",
            "T1.enter",
            "Process.enter",
            "T1.exit",
            "T1.action",
            "Process.exit",
            "T2.enter",
            "End.enter",
            "T2.exit",
            "T2.action",
        ]
    );
}

#[test]
fn repeated_update_within_interval_ticks_once() {
    let (count, make) = counter();
    let clock = ManualClock::new();
    let mut machine = StateMachine::builder()
        .clock(clock.clone())
        .update_interval(Duration::from_millis(200))
        .build();
    machine.add_state("Polling").unwrap();
    machine.on_state_update("Polling", make()).unwrap();
    machine.start_with("Polling");

    machine.update();
    clock.advance(Duration::from_millis(199));
    machine.update();

    assert_eq!(count.get(), 1);
}

#[test]
fn update_with_system_clock_and_long_interval_ticks_once() {
    let (count, make) = counter();
    let mut machine = StateMachine::new();
    machine.set_update_interval(Duration::from_secs(3600));
    machine.add_state("Polling").unwrap();
    machine.on_state_update("Polling", make()).unwrap();
    machine.start_with("Polling");

    machine.update();
    machine.update();

    assert_eq!(count.get(), 1);
}

#[test]
fn export_has_header_and_one_line_per_transition() {
    let mut machine = StateMachine::new();
    for state in ["Start", "Process", "ProcessParallel", "End"] {
        machine.add_state(state).unwrap();
    }
    machine.start_with("Start");
    machine.add_transition("Transition1", "Start", "Process").unwrap();
    machine
        .add_transition("Transition11", "Start", "ProcessParallel")
        .unwrap();
    machine.on_transition_action("Transition1", || {}).unwrap();
    machine.add_transition("Transition2", "Process", "End").unwrap();
    machine
        .add_transition("Transition21", "ProcessParallel", "End")
        .unwrap();

    let output = machine.to_mermaid();

    assert!(!output.is_empty());
    // Header, four transitions, and the empty tail after the final newline.
    assert_eq!(output.split('\n').count(), 6);
    assert!(output.starts_with("graph LR\n"));
    assert!(output.contains("Start -- Transition11 --> ProcessParallel\n"));
}

#[test]
fn import_counts_states_and_transitions() {
    let cases = [
        ("graph LR\na --> b\nb --> a", 2, 2),
        ("graph LR\na --> b --> a", 2, 2),
        ("graph LR\nA -- text --> B -- text2 --> C", 3, 2),
        ("graph LR\na --> b & c --> d", 4, 4),
    ];

    for (input, states, transitions) in cases {
        let mut machine = StateMachine::new();

        machine.from_mermaid(input);

        assert_eq!(machine.state_count(), states, "{input:?}");
        assert_eq!(machine.transition_count(), transitions, "{input:?}");
    }
}

#[test]
fn fan_out_import_links_both_branches() {
    let mut machine = StateMachine::new();

    machine.from_mermaid("graph LR\na --> b & c --> d");

    let edges: Vec<(&str, &str)> = machine.transitions().map(|t| (t.from(), t.to())).collect();
    for expected in [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")] {
        assert!(edges.contains(&expected), "missing {expected:?}");
    }

    machine.start_with("a");
    machine.transition_to("c").unwrap();
    machine.transition_to("d").unwrap();
    assert_eq!(machine.current_state_name(), Some("d"));
}

#[test]
fn labeled_export_round_trips_exactly() {
    let mut source = start_process_end();
    source.add_transition("Begin", "Start", "Process").unwrap();
    source.add_transition("Finish", "Process", "End").unwrap();
    source.add_transition("Retry", "Process", "Start").unwrap();

    let text = source.to_mermaid();
    let mut copy = StateMachine::new();
    copy.from_mermaid(&text);

    assert_eq!(copy.to_mermaid(), text);
    assert_eq!(copy.transition_count(), 3);
}

#[test]
fn import_ignores_unrecognised_lines() {
    let mut machine = StateMachine::new();

    let summary = machine.from_mermaid("flowchart LR\n%% comment\n\nIdle --> Busy\nnot an edge");

    assert_eq!(summary.states_added, 2);
    assert_eq!(summary.transitions_added, 1);
    assert!(machine.has_transition("IdleToBusy"));
}

#[test]
fn duplicate_registration_logs_one_warning() {
    let sink = RecordingSink::new();
    let mut machine = StateMachine::builder().sink(sink.clone()).build();

    machine.add_state("A").unwrap();
    let second = machine.add_state("A");

    assert_eq!(second, Err(MachineError::DuplicateState("A".to_string())));
    assert_eq!(machine.state_count(), 1);
    let warnings = sink.at_level(Level::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("'A'"));
}

#[test]
#[should_panic(expected = "callback failed")]
fn callback_panics_reach_the_caller() {
    let mut machine = start_process_end();
    machine.add_transition("T1", "Start", "Process").unwrap();
    machine
        .on_transition_action("T1", || panic!("callback failed"))
        .unwrap();
    machine.start_with("Start");

    let _ = machine.transition("T1");
}
