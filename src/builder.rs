//! Builder for constructing state machines with explicit collaborators.

use crate::config::MachineConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::machine::{Clock, StateMachine, SystemClock};
use crate::mermaid::ExportStyle;
use std::time::Duration;

/// Builder for a [`StateMachine`] with a fluent API.
///
/// Anything not set falls back to the defaults: [`TracingSink`],
/// [`SystemClock`] and [`MachineConfig::default`].
///
/// # Example
///
/// ```rust
/// use switchyard::{ManualClock, RecordingSink, StateMachine};
/// use std::time::Duration;
///
/// let machine = StateMachine::builder()
///     .sink(RecordingSink::new())
///     .clock(ManualClock::new())
///     .update_interval(Duration::from_millis(100))
///     .build();
///
/// assert_eq!(machine.update_interval(), Duration::from_millis(100));
/// ```
#[derive(Default)]
pub struct StateMachineBuilder {
    config: MachineConfig,
    sink: Option<Box<dyn DiagnosticSink>>,
    clock: Option<Box<dyn Clock>>,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.config.update_interval = interval;
        self
    }

    pub fn export_style(mut self, style: ExportStyle) -> Self {
        self.config.export_style = style;
        self
    }

    /// Set where diagnostics go.
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Set the time source used by the update gate.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn build(self) -> StateMachine {
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        StateMachine::from_parts(self.config, sink, clock)
    }
}
