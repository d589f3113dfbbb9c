//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Building a topology from Mermaid text
//! - Attaching state and transition callbacks
//! - Driving the machine with `transition_to` and `update`
//! - Exporting the topology back to Mermaid
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use std::cell::Cell;
use std::rc::Rc;
use switchyard::StateMachine;
use tracing_subscriber::EnvFilter;

const TOPOLOGY: &str = "\
graph LR
Red -- go --> Green -- caution --> Yellow -- stop --> Red
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut machine = StateMachine::new();
    let summary = machine.from_mermaid(TOPOLOGY);
    println!(
        "Imported {} states and {} transitions\n",
        summary.states_added, summary.transitions_added
    );

    let cycles = Rc::new(Cell::new(0));
    for light in ["Red", "Green", "Yellow"] {
        machine.on_state_enter(light, move || println!("  light is now {light}"))?;
    }
    let counter = Rc::clone(&cycles);
    machine.on_transition_action("stop", move || counter.set(counter.get() + 1))?;
    machine.on_state_update("Green", || println!("  (traffic flowing)"))?;

    machine.start_with("Red");
    for _ in 0..2 {
        machine.transition_to("Green")?;
        machine.update();
        machine.transition_to("Yellow")?;
        machine.transition_to("Red")?;
    }

    println!("\nCompleted {} full cycles", cycles.get());

    if let Err(err) = machine.transition_to("Yellow") {
        println!("Red cannot skip ahead: {err}");
    }

    println!("\nExported topology:\n{}", machine.to_mermaid());
    println!("=== Example Complete ===");
    Ok(())
}
