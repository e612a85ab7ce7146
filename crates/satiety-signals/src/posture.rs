//! Posture, Movement and Control Signals
//!
//! Snapshots of an agent's seat, movement flags and mouse-style controls as
//! the host reports them at the moment of a query.

use serde::{Deserialize, Serialize};

/// What an agent is mounted on, if anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Whether the agent currently occupies a seat
    pub mounted: bool,
    /// Host type name of the seat, e.g. "BlockEntityBedSeat" or "EntityBoatSeat"
    #[serde(default)]
    pub seat_kind: String,
    /// The entity carrying the seat, when the seat belongs to one
    #[serde(default)]
    pub carrier: Option<Carrier>,
}

impl MountInfo {
    /// A mounted seat with no carrier entity.
    pub fn seat(kind: impl Into<String>) -> Self {
        Self {
            mounted: true,
            seat_kind: kind.into(),
            carrier: None,
        }
    }

    pub fn with_carrier(mut self, carrier: Carrier) -> Self {
        self.carrier = Some(carrier);
        self
    }
}

/// The entity a seat is attached to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    /// Host type name, e.g. "EntityAgent"
    pub type_name: String,
    /// Entity code, e.g. "game:elk-male"
    #[serde(default)]
    pub code: Option<String>,
    /// Whether the carrier is a living creature
    #[serde(default)]
    pub is_living: bool,
}

impl Carrier {
    pub fn creature(type_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            code: Some(code.into()),
            is_living: true,
        }
    }

    pub fn object(type_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            code: Some(code.into()),
            is_living: false,
        }
    }
}

/// Continuous movement flags for an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementState {
    pub trying_to_move: bool,
    pub sprinting: bool,
    pub sneaking: bool,
    pub floor_sitting: bool,
    /// Fully submerged and swimming
    pub swimming: bool,
    pub feet_in_liquid: bool,
}

impl MovementState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walking() -> Self {
        Self {
            trying_to_move: true,
            ..Self::default()
        }
    }

    pub fn sprinting() -> Self {
        Self {
            trying_to_move: true,
            sprinting: true,
            ..Self::default()
        }
    }

    pub fn sneaking() -> Self {
        Self {
            trying_to_move: true,
            sneaking: true,
            ..Self::default()
        }
    }

    pub fn wading() -> Self {
        Self {
            feet_in_liquid: true,
            ..Self::default()
        }
    }
}

/// Primary (attack) and secondary (use) control state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerControls {
    pub primary_down: bool,
    pub secondary_down: bool,
}

impl TriggerControls {
    pub fn released() -> Self {
        Self::default()
    }

    pub fn primary() -> Self {
        Self {
            primary_down: true,
            secondary_down: false,
        }
    }

    pub fn secondary() -> Self {
        Self {
            primary_down: false,
            secondary_down: true,
        }
    }
}
