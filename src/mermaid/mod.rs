//! Mermaid text import/export.
//!
//! Only the subset needed to describe a flat machine is supported:
//!
//! - chains of bare state names: `A --> B --> C`
//! - fan-out groups inside a chain: `A --> B & C --> D`
//! - labeled edges naming the transition: `A -- go --> B -- stop --> C`
//!
//! Parsing is pure: [`parse_line`] turns one line into the states and edges
//! it declares, and the machine registers them. Rendering is likewise a pure
//! function of the transition list.

mod export;
mod parse;

pub use export::render;
pub use parse::{classify, parse_line, Edge, LineKind, ParsedLine};

use serde::{Deserialize, Serialize};

/// Token separating consecutive states in a chain.
pub const CHAIN_SEPARATOR: &str = " --> ";

/// Token opening a transition label on a labeled-edge line.
pub const LABEL_MARKER: &str = " -- ";

/// Notation produced by [`render`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    /// `graph LR` with one `FROM -- NAME --> TO` line per transition.
    /// Importing it back reproduces the transition names exactly.
    #[default]
    Labeled,

    /// `stateDiagram-v2` with one `FROM --> TO` line per transition.
    /// Transition names are lost on import and regenerated as `FROMToTO`.
    Plain,
}

impl ExportStyle {
    /// Diagram-type line written first.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Labeled => "graph LR",
            Self::Plain => "stateDiagram-v2",
        }
    }
}

/// What a call to `from_mermaid` registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub states_added: usize,
    pub transitions_added: usize,
}

impl ImportSummary {
    pub(crate) fn absorb(&mut self, other: ImportSummary) {
        self.states_added += other.states_added;
        self.transitions_added += other.transitions_added;
    }
}

/// Name given to a transition synthesized from a bare chain.
pub fn generated_name(from: &str, to: &str) -> String {
    format!("{from}To{to}")
}
