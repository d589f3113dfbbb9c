//! Core records of the state machine.
//!
//! This module contains the two building blocks the engine stores:
//! - [`State`]: a named node with optional enter/update/exit callbacks
//! - [`Transition`]: a named edge between two state names with optional
//!   enter/action/exit callbacks
//!
//! Both are identified solely by their name; matching is exact and
//! case-sensitive.

mod state;
mod transition;

pub use state::State;
pub use transition::Transition;

/// A side-effecting callback attached to a state or transition.
///
/// Callbacks run synchronously on the caller's stack. A panic inside a
/// callback unwinds through the machine to the caller.
pub type Callback = Box<dyn FnMut()>;

/// Run the callback in `slot` if one is set. Returns whether it ran.
fn invoke(slot: &mut Option<Callback>) -> bool {
    match slot {
        Some(action) => {
            action();
            true
        }
        None => false,
    }
}
