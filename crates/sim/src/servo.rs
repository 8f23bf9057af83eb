//! Simulated positional servo

use std::cell::Cell;
use std::rc::Rc;

use starterbot_core::traits::{check_position, ActuatorError, GateServo};

/// Cloneable handle to one simulated servo; moves instantly.
#[derive(Debug, Clone, Default)]
pub struct SimServo {
    position: Rc<Cell<f32>>,
    moves: Rc<Cell<u32>>,
}

impl SimServo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of position commands that changed the position.
    pub fn moves(&self) -> u32 {
        self.moves.get()
    }
}

impl GateServo for SimServo {
    fn set_position(&mut self, position: f32) -> Result<(), ActuatorError> {
        let position = check_position(position)?;
        if position != self.position.get() {
            self.moves.set(self.moves.get() + 1);
        }
        self.position.set(position);
        Ok(())
    }

    fn position(&self) -> f32 {
        self.position.get()
    }
}
