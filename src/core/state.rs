//! Named state record with optional lifecycle callbacks.

use super::{invoke, Callback};
use std::fmt;

/// A named node of the state machine.
///
/// A state carries up to three independent callbacks: one run when the
/// machine enters it, one run on every effective update tick while it is
/// current, and one run when the machine leaves it. Any of them may be
/// absent, in which case that step is skipped.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
///
/// let mut idle = State::new("Idle");
/// assert_eq!(idle.name(), "Idle");
/// assert!(!idle.has_enter_action());
///
/// idle.set_enter_action(Box::new(|| println!("entered Idle")));
/// assert!(idle.has_enter_action());
/// ```
pub struct State {
    name: String,
    on_enter: Option<Callback>,
    on_update: Option<Callback>,
    on_exit: Option<Callback>,
}

impl State {
    /// Create a state with no callbacks attached.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_enter: None,
            on_update: None,
            on_exit: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the enter callback.
    pub fn set_enter_action(&mut self, action: Callback) {
        self.on_enter = Some(action);
    }

    /// Replace the update callback.
    pub fn set_update_action(&mut self, action: Callback) {
        self.on_update = Some(action);
    }

    /// Replace the exit callback.
    pub fn set_exit_action(&mut self, action: Callback) {
        self.on_exit = Some(action);
    }

    pub fn has_enter_action(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_update_action(&self) -> bool {
        self.on_update.is_some()
    }

    pub fn has_exit_action(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Run the enter callback if present. Returns whether it ran.
    pub(crate) fn enter(&mut self) -> bool {
        invoke(&mut self.on_enter)
    }

    /// Run the update callback if present. Returns whether it ran.
    pub(crate) fn update(&mut self) -> bool {
        invoke(&mut self.on_update)
    }

    /// Run the exit callback if present. Returns whether it ran.
    pub(crate) fn exit(&mut self) -> bool {
        invoke(&mut self.on_exit)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("on_enter", &self.has_enter_action())
            .field("on_update", &self.has_update_action())
            .field("on_exit", &self.has_exit_action())
            .finish()
    }
}
