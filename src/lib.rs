//! Switchyard: a string-keyed finite state machine
//!
//! States and transitions are registered by name and carry optional
//! callbacks. The machine tracks a single current state and runs those
//! callbacks in a fixed order whenever a transition fires. Topologies can be
//! exported to, and imported from, a small subset of Mermaid.
//!
//! # Core Concepts
//!
//! - **State**: a named node with optional enter/update/exit callbacks
//! - **Transition**: a named edge between two state names with optional
//!   enter/action/exit callbacks
//! - **Update tick**: the current state's update callback, rate-limited by a
//!   configurable minimum interval
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use switchyard::StateMachine;
//!
//! let fired = Rc::new(Cell::new(0));
//! let mut machine = StateMachine::new();
//!
//! machine.from_mermaid("graph LR\nIdle -- start --> Running -- stop --> Idle");
//! let counter = Rc::clone(&fired);
//! machine
//!     .on_transition_action("start", move || counter.set(counter.get() + 1))
//!     .unwrap();
//!
//! machine.start_with("Idle");
//! machine.transition_to("Running").unwrap();
//!
//! assert_eq!(machine.current_state_name(), Some("Running"));
//! assert_eq!(fired.get(), 1);
//! assert!(machine.transition("start").is_err());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod machine;
pub mod mermaid;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use config::MachineConfig;
pub use core::{Callback, State, Transition};
pub use diagnostics::{DiagnosticSink, Level, MachineId, RecordingSink, TracingSink};
pub use error::{ConfigError, MachineError};
pub use machine::{Clock, ManualClock, StateMachine, SystemClock};
pub use mermaid::{ExportStyle, ImportSummary};
