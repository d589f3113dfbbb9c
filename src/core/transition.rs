//! Named transition record between two state names.

use super::{invoke, Callback};
use std::fmt;
use std::time::Duration;

/// A named, directed edge from one state name to another.
///
/// The endpoints are plain names. They are not required to refer to
/// registered states; a transition may be declared before its states are.
///
/// `duration` is stored but not read when the transition fires.
pub struct Transition {
    name: String,
    from: String,
    to: String,
    on_enter: Option<Callback>,
    on_action: Option<Callback>,
    on_exit: Option<Callback>,
    duration: Duration,
}

impl Transition {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            on_enter: None,
            on_action: None,
            on_exit: None,
            duration: Duration::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the state this transition leaves.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Name of the state this transition enters.
    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn set_enter_action(&mut self, action: Callback) {
        self.on_enter = Some(action);
    }

    /// Set the primary action, run last when the transition fires.
    pub fn set_action(&mut self, action: Callback) {
        self.on_action = Some(action);
    }

    pub fn set_exit_action(&mut self, action: Callback) {
        self.on_exit = Some(action);
    }

    pub fn has_enter_action(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_action(&self) -> bool {
        self.on_action.is_some()
    }

    pub fn has_exit_action(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Check whether this transition may fire from `current` (pure).
    pub fn leaves(&self, current: &str) -> bool {
        self.from == current
    }

    /// Check whether this transition connects `from` to `to` (pure).
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    pub(crate) fn enter(&mut self) -> bool {
        invoke(&mut self.on_enter)
    }

    pub(crate) fn act(&mut self) -> bool {
        invoke(&mut self.on_action)
    }

    pub(crate) fn exit(&mut self) -> bool {
        invoke(&mut self.on_exit)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("on_enter", &self.has_enter_action())
            .field("on_action", &self.has_action())
            .field("on_exit", &self.has_exit_action())
            .field("duration", &self.duration)
            .finish()
    }
}
