//! Command-based control for lights.

use crate::types::UseType;

/// Actions for controlling lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightAction {
    /// Write the initial value or start animating.
    Spawn,
    /// Host use event.
    Use(UseType),
}

/// Command targeting a specific light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCommand<Id> {
    pub light_id: Id,
    pub action: LightAction,
}

impl<Id> LightCommand<Id> {
    /// Creates command.
    pub fn new(light_id: Id, action: LightAction) -> Self {
        Self { light_id, action }
    }
}
