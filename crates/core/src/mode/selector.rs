//! Mode selector state machine
//!
//! Cycles through a mode table on the rising edge of a trigger input while the
//! robot waits in init. The selection is shown on telemetry every tick and
//! locked when the start signal fires.

use log::warn;

use super::{next_in_cycle, OperatingMode};
use crate::traits::TelemetrySink;

/// Circular, edge-triggered mode selector
#[derive(Debug, Clone, Copy)]
pub struct ModeSelector {
    cycle: &'static [OperatingMode],
    current: OperatingMode,
    locked: bool,
}

impl ModeSelector {
    /// Create a selector over `cycle` starting at `initial`.
    pub const fn new(cycle: &'static [OperatingMode], initial: OperatingMode) -> Self {
        Self {
            cycle,
            current: initial,
            locked: false,
        }
    }

    /// Current selection.
    pub fn current(&self) -> OperatingMode {
        self.current
    }

    /// True once [`lock`](Self::lock) has been called.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Init-loop tick.
    ///
    /// Advances on `cycle_next` (an edge read, not a level read) and displays
    /// the selection. After locking, edges are ignored.
    pub fn update(&mut self, cycle_next: bool, telemetry: &mut dyn TelemetrySink) -> OperatingMode {
        if cycle_next && !self.locked {
            match next_in_cycle(self.cycle, self.current) {
                Some(next) => self.current = next,
                None => {
                    warn!("mode selector in unknown state {}", self.current);
                    telemetry.add_data(
                        "WARNING",
                        &"Unknown Operation State Reached - Restart Program",
                    );
                }
            }
        }

        self.display(telemetry);
        self.current
    }

    /// Lock the selection at the start signal and return it.
    pub fn lock(&mut self) -> OperatingMode {
        self.locked = true;
        self.current
    }

    fn display(&self, telemetry: &mut dyn TelemetrySink) {
        telemetry.add_line("Press Home Button to cycle options");
        telemetry.add_data("CURRENT SELECTION", &self.current);
        if self.current.is_autonomous() {
            telemetry.add_line("Please remember to enable the AUTO timer!");
        }
        telemetry.add_line("Press START to start your program");
    }
}
