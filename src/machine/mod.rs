//! The state machine engine.
//!
//! [`StateMachine`] owns an ordered registry of [`State`]s and one of
//! [`Transition`]s, tracks the single current state name, and runs the
//! callbacks attached to both when a transition fires.
//!
//! Firing a transition runs, in this order and skipping absent callbacks:
//!
//! 1. exit of the old state
//! 2. enter of the transition
//! 3. the current state name moves to the target
//! 4. enter of the new state
//! 5. exit of the transition
//! 6. the transition's action
//!
//! A rejected call runs no callback and changes nothing.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::builder::StateMachineBuilder;
use crate::config::MachineConfig;
use crate::core::{State, Transition};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Level, MachineId};
use crate::error::MachineError;
use crate::mermaid::{self, ExportStyle, ImportSummary, ParsedLine};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::time::Duration;

/// A string-keyed finite state machine.
///
/// # Example
///
/// ```rust
/// use switchyard::StateMachine;
///
/// let mut machine = StateMachine::new();
/// machine.add_state("Start").unwrap();
/// machine.add_state("Process").unwrap();
/// machine.add_transition("Begin", "Start", "Process").unwrap();
///
/// machine.start_with("Start");
/// machine.transition("Begin").unwrap();
///
/// assert_eq!(machine.current_state_name(), Some("Process"));
/// ```
pub struct StateMachine {
    id: MachineId,
    states: IndexMap<String, State>,
    transitions: IndexMap<String, Transition>,
    current: Option<String>,
    update_interval: Duration,
    last_updated_at: Option<DateTime<Utc>>,
    export_style: ExportStyle,
    sink: Box<dyn DiagnosticSink>,
    clock: Box<dyn Clock>,
}

impl StateMachine {
    /// Create an empty machine that logs through `tracing` and reads the
    /// system clock.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::new()
    }

    pub(crate) fn from_parts(
        config: MachineConfig,
        sink: Box<dyn DiagnosticSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            id: MachineId::new(),
            states: IndexMap::new(),
            transitions: IndexMap::new(),
            current: None,
            update_interval: config.update_interval,
            last_updated_at: None,
            export_style: config.export_style,
            sink,
            clock,
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    fn log(&self, level: Level, operation: &str, message: &str) {
        self.sink.record(&Diagnostic {
            machine: self.id,
            level,
            operation,
            message,
        });
    }

    // Registration

    /// Register a state with no callbacks.
    ///
    /// Registering a name twice leaves the first state in place, logs a
    /// warning and returns [`MachineError::DuplicateState`].
    pub fn add_state(&mut self, name: &str) -> Result<(), MachineError> {
        if self.states.contains_key(name) {
            self.log(
                Level::Warning,
                "add_state",
                &format!("State '{name}' is already in the list of states, will not be added."),
            );
            return Err(MachineError::DuplicateState(name.to_string()));
        }

        self.states.insert(name.to_string(), State::new(name));
        self.log(
            Level::Info,
            "add_state",
            &format!("State '{name}' has been added."),
        );
        Ok(())
    }

    /// Register a transition from `from` to `to`.
    ///
    /// The endpoints are not checked against the registered states.
    pub fn add_transition(&mut self, name: &str, from: &str, to: &str) -> Result<(), MachineError> {
        if self.transitions.contains_key(name) {
            self.log(
                Level::Warning,
                "add_transition",
                &format!(
                    "Transition '{name}' is already in the list of transitions, will not be added."
                ),
            );
            return Err(MachineError::DuplicateTransition(name.to_string()));
        }

        self.transitions
            .insert(name.to_string(), Transition::new(name, from, to));
        self.log(
            Level::Info,
            "add_transition",
            &format!("Transition '{name}', from '{from}' to '{to}', has been added."),
        );
        Ok(())
    }

    fn with_state(
        &mut self,
        operation: &str,
        name: &str,
        apply: impl FnOnce(&mut State),
    ) -> Result<(), MachineError> {
        let Some(state) = self.states.get_mut(name) else {
            self.log(
                Level::Error,
                operation,
                &format!("State '{name}' not found"),
            );
            return Err(MachineError::StateNotFound(name.to_string()));
        };

        apply(state);
        self.log(
            Level::Info,
            operation,
            &format!("Action set successfully for state '{name}'"),
        );
        Ok(())
    }

    fn with_transition(
        &mut self,
        operation: &str,
        name: &str,
        apply: impl FnOnce(&mut Transition),
    ) -> Result<(), MachineError> {
        let Some(transition) = self.transitions.get_mut(name) else {
            self.log(
                Level::Error,
                operation,
                &format!("Transition '{name}' not found"),
            );
            return Err(MachineError::TransitionNotFound(name.to_string()));
        };

        apply(transition);
        self.log(
            Level::Info,
            operation,
            &format!("Action set successfully for transition '{name}'"),
        );
        Ok(())
    }

    /// Attach the callback run when `state` becomes current.
    pub fn on_state_enter<F>(&mut self, state: &str, action: F) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_state("on_state_enter", state, |s| {
            s.set_enter_action(Box::new(action))
        })
    }

    /// Attach the callback run on each effective update while `state` is current.
    pub fn on_state_update<F>(&mut self, state: &str, action: F) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_state("on_state_update", state, |s| {
            s.set_update_action(Box::new(action))
        })
    }

    /// Attach the callback run when `state` stops being current.
    pub fn on_state_exit<F>(&mut self, state: &str, action: F) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_state("on_state_exit", state, |s| s.set_exit_action(Box::new(action)))
    }

    pub fn on_transition_enter<F>(&mut self, transition: &str, action: F) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_transition("on_transition_enter", transition, |t| {
            t.set_enter_action(Box::new(action))
        })
    }

    /// Attach the primary action, run last when `transition` fires.
    pub fn on_transition_action<F>(
        &mut self,
        transition: &str,
        action: F,
    ) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_transition("on_transition_action", transition, |t| {
            t.set_action(Box::new(action))
        })
    }

    pub fn on_transition_exit<F>(&mut self, transition: &str, action: F) -> Result<(), MachineError>
    where
        F: FnMut() + 'static,
    {
        self.with_transition("on_transition_exit", transition, |t| {
            t.set_exit_action(Box::new(action))
        })
    }

    /// Store the reserved duration on a transition. Firing ignores it.
    pub fn set_transition_duration(
        &mut self,
        transition: &str,
        duration: Duration,
    ) -> Result<(), MachineError> {
        self.with_transition("set_transition_duration", transition, |t| {
            t.set_duration(duration)
        })
    }

    /// Make `name` the current state and run its enter callback.
    ///
    /// The name does not have to be registered; if it is not, no callback
    /// runs but the name still becomes current.
    pub fn start_with(&mut self, name: &str) {
        self.current = Some(name.to_string());

        if self.states.get_mut(name).is_some_and(State::enter) {
            self.log(
                Level::Info,
                "start_with",
                &format!("Finished invoking Enter Action for State '{name}'."),
            );
        } else {
            self.log(
                Level::Debug,
                "start_with",
                &format!("Started with '{name}' without an enter action."),
            );
        }
    }

    // Execution

    /// Fire the transition called `name`.
    ///
    /// Fails without running any callback if the transition is unknown or
    /// does not leave the current state.
    pub fn transition(&mut self, name: &str) -> Result<(), MachineError> {
        const OP: &str = "transition";

        let Some(transition) = self.transitions.get(name) else {
            self.log(
                Level::Error,
                OP,
                &format!("Transition '{name}' not found"),
            );
            return Err(MachineError::TransitionNotFound(name.to_string()));
        };

        let Some(current) = self.current.as_deref() else {
            self.log(
                Level::Error,
                OP,
                &format!("Transition '{name}' fired before a current state was set"),
            );
            return Err(MachineError::NoCurrentState);
        };

        if !transition.leaves(current) {
            let err = MachineError::WrongOrigin {
                transition: name.to_string(),
                expected: transition.from().to_string(),
                actual: current.to_string(),
            };
            self.log(Level::Error, OP, &err.to_string());
            return Err(err);
        }

        let from = transition.from().to_string();
        let to = transition.to().to_string();

        if self.states.get_mut(&from).is_some_and(State::exit) {
            self.log(
                Level::Info,
                OP,
                &format!("Finished invoking Exit Action for State '{from}'."),
            );
        } else {
            self.log(Level::Debug, OP, &format!("No Exit Action for State '{from}'."));
        }

        if self.transitions.get_mut(name).is_some_and(Transition::enter) {
            self.log(
                Level::Info,
                OP,
                &format!("Finished invoking Enter Action for Transition '{name}'."),
            );
        } else {
            self.log(
                Level::Debug,
                OP,
                &format!("No Enter Action for Transition '{name}'."),
            );
        }

        self.current = Some(to.clone());

        if self.states.get_mut(&to).is_some_and(State::enter) {
            self.log(
                Level::Info,
                OP,
                &format!("Finished invoking Enter Action for State '{to}'."),
            );
        } else {
            self.log(Level::Debug, OP, &format!("No Enter Action for State '{to}'."));
        }

        if self.transitions.get_mut(name).is_some_and(Transition::exit) {
            self.log(
                Level::Info,
                OP,
                &format!("Finished invoking Exit Action for Transition '{name}'."),
            );
        } else {
            self.log(
                Level::Debug,
                OP,
                &format!("No Exit Action for Transition '{name}'."),
            );
        }

        self.log(
            Level::Info,
            OP,
            &format!("Successfully changed the state from '{from}' to '{to}', invoking action now."),
        );

        if self.transitions.get_mut(name).is_some_and(Transition::act) {
            self.log(
                Level::Info,
                OP,
                &format!("Finished invoking Action for Transition '{name}'."),
            );
        } else {
            self.log(
                Level::Debug,
                OP,
                &format!("No Action defined for Transition '{name}', not invoking anything."),
            );
        }

        Ok(())
    }

    /// Fire the first registered transition leading from the current state
    /// to `target`.
    pub fn transition_to(&mut self, target: &str) -> Result<(), MachineError> {
        let Some(current) = self.current.as_deref() else {
            self.log(
                Level::Warning,
                "transition_to",
                &format!("Cannot move to '{target}' before a current state was set"),
            );
            return Err(MachineError::NoCurrentState);
        };

        let found = self
            .transitions
            .values()
            .find(|t| t.connects(current, target))
            .map(|t| t.name().to_string());

        match found {
            Some(name) => self.transition(&name),
            None => {
                let err = MachineError::UnmatchedTarget {
                    from: current.to_string(),
                    to: target.to_string(),
                };
                self.log(Level::Warning, "transition_to", &err.to_string());
                Err(err)
            }
        }
    }

    /// Name of the current state, if one was set.
    pub fn current_state_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current state record, if the current name is registered.
    pub fn current_state(&self) -> Option<&State> {
        self.current.as_deref().and_then(|name| self.states.get(name))
    }

    // Update cycle

    /// Run the current state's update callback if at least the update
    /// interval has passed since the last effective update.
    ///
    /// Returns whether the interval gate was open.
    pub fn update(&mut self) -> bool {
        let now = self.clock.now();
        if !clock::interval_elapsed(self.last_updated_at, now, self.update_interval) {
            return false;
        }

        self.last_updated_at = Some(now);
        self.immediate_update();
        true
    }

    /// Run the current state's update callback regardless of the interval.
    ///
    /// Returns whether a callback ran.
    pub fn immediate_update(&mut self) -> bool {
        let Some(name) = self.current.as_deref() else {
            return false;
        };
        self.states.get_mut(name).is_some_and(State::update)
    }

    /// Takes effect on the next call to [`Self::update`].
    pub fn set_update_interval(&mut self, interval: Duration) {
        self.update_interval = interval;
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// When the last effective [`Self::update`] happened.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    // Registry inspection

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.transitions.contains_key(name)
    }

    pub fn get_state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn get_transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.get(name)
    }

    /// State names in registration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.keys().map(String::as_str)
    }

    /// Transitions in registration order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.values()
    }

    /// Remove every state and transition.
    ///
    /// The current state name, update interval and last update time are
    /// kept.
    pub fn clear(&mut self) {
        let names = self.state_names().collect::<Vec<_>>().join(", ");
        self.log(
            Level::Info,
            "clear",
            &format!("Attempting to clear StateMachine with States '{names}'"),
        );
        self.states.clear();
        self.transitions.clear();
        self.log(Level::Info, "clear", "Cleared StateMachine");
    }

    // Text import/export

    pub fn export_style(&self) -> ExportStyle {
        self.export_style
    }

    pub fn set_export_style(&mut self, style: ExportStyle) {
        self.export_style = style;
    }

    /// Describe every transition, in registration order, as Mermaid text.
    ///
    /// States without transitions do not appear.
    pub fn to_mermaid(&self) -> String {
        mermaid::render(
            self.export_style,
            self.transitions.values().map(|t| (t.name(), t.from(), t.to())),
        )
    }

    /// Replace the topology with the one described by `text`.
    ///
    /// Lines that are neither chains nor labeled edges are skipped. Names
    /// already registered by an earlier line are reused silently.
    pub fn from_mermaid(&mut self, text: &str) -> ImportSummary {
        self.clear();

        let mut summary = ImportSummary::default();
        for line in text.lines() {
            let parsed = mermaid::parse_line(line);
            if parsed.is_empty() {
                continue;
            }
            self.log(
                Level::Debug,
                "from_mermaid",
                &format!("Found state connection '{}'", line.trim()),
            );
            let added = self.apply_parsed(&parsed);
            self.log(
                Level::Debug,
                "from_mermaid",
                &format!(
                    "Added '{}' states and '{}' transitions",
                    added.states_added, added.transitions_added
                ),
            );
            summary.absorb(added);
        }
        summary
    }

    fn apply_parsed(&mut self, parsed: &ParsedLine) -> ImportSummary {
        let mut added = ImportSummary::default();

        for name in &parsed.states {
            if !self.has_state(name) && self.add_state(name).is_ok() {
                added.states_added += 1;
            }
        }
        for edge in &parsed.edges {
            if !self.has_transition(&edge.name)
                && self.add_transition(&edge.name, &edge.from, &edge.to).is_ok()
            {
                added.transitions_added += 1;
            }
        }

        added
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("states", &self.states.values().collect::<Vec<_>>())
            .field("transitions", &self.transitions.values().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("update_interval", &self.update_interval)
            .field("last_updated_at", &self.last_updated_at)
            .field("export_style", &self.export_style)
            .finish_non_exhaustive()
    }
}
