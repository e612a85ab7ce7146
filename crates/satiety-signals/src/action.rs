//! Action Categories
//!
//! The mutually exclusive answer to "what is this agent doing this tick".
//!
//! # Example
//!
//! ```
//! use satiety_signals::ActionKind;
//!
//! let kind: ActionKind = "weapon_swing".parse().unwrap();
//! assert_eq!(kind, ActionKind::WeaponSwing);
//! assert!(kind.is_one_shot());
//! assert_eq!(kind.to_string(), "weapon_swing");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an agent is doing when its depletion tick fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    // Movement states
    Standing,
    Sprinting,
    Sneaking,
    Swimming,

    // Seated and resting
    Sitting,
    SittingMount,
    SittingFurniture,
    Sleeping,

    // Work tools and interactions
    Mining,
    Chopping,
    Digging,
    HammerUse,
    BowUse,
    FireStarting,
    QuernGrinding,

    WeaponSwing,
    Panning,
}

/// Order in which one-shot pending flags are inspected on a tick.
///
/// Panning and weapon swings go before the work tools. Fire starting is last.
pub const PENDING_PRIORITY: [ActionKind; 9] = [
    ActionKind::Panning,
    ActionKind::WeaponSwing,
    ActionKind::Mining,
    ActionKind::Chopping,
    ActionKind::Digging,
    ActionKind::HammerUse,
    ActionKind::BowUse,
    ActionKind::QuernGrinding,
    ActionKind::FireStarting,
];

impl ActionKind {
    /// Every action kind, in declaration order.
    pub const ALL: [ActionKind; 17] = [
        ActionKind::Standing,
        ActionKind::Sprinting,
        ActionKind::Sneaking,
        ActionKind::Swimming,
        ActionKind::Sitting,
        ActionKind::SittingMount,
        ActionKind::SittingFurniture,
        ActionKind::Sleeping,
        ActionKind::Mining,
        ActionKind::Chopping,
        ActionKind::Digging,
        ActionKind::HammerUse,
        ActionKind::BowUse,
        ActionKind::FireStarting,
        ActionKind::QuernGrinding,
        ActionKind::WeaponSwing,
        ActionKind::Panning,
    ];

    /// Returns true if this kind is produced by consuming a pending flag.
    pub fn is_one_shot(self) -> bool {
        PENDING_PRIORITY.contains(&self)
    }

    /// Returns true for the on-foot states the path discount applies to.
    pub fn is_on_foot(self) -> bool {
        matches!(
            self,
            ActionKind::Standing | ActionKind::Sprinting | ActionKind::Sneaking
        )
    }

    /// Returns true for mounted or seated postures.
    pub fn is_seated(self) -> bool {
        matches!(
            self,
            ActionKind::Sitting
                | ActionKind::SittingMount
                | ActionKind::SittingFurniture
                | ActionKind::Sleeping
        )
    }

    /// The snake_case name used in config files and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Standing => "standing",
            ActionKind::Sprinting => "sprinting",
            ActionKind::Sneaking => "sneaking",
            ActionKind::Swimming => "swimming",
            ActionKind::Sitting => "sitting",
            ActionKind::SittingMount => "sitting_mount",
            ActionKind::SittingFurniture => "sitting_furniture",
            ActionKind::Sleeping => "sleeping",
            ActionKind::Mining => "mining",
            ActionKind::Chopping => "chopping",
            ActionKind::Digging => "digging",
            ActionKind::HammerUse => "hammer_use",
            ActionKind::BowUse => "bow_use",
            ActionKind::FireStarting => "fire_starting",
            ActionKind::QuernGrinding => "quern_grinding",
            ActionKind::WeaponSwing => "weapon_swing",
            ActionKind::Panning => "panning",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// Error returned when a string does not name an action kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseActionError(pub String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action kind: '{}'", self.0)
    }
}

impl std::error::Error for ParseActionError {}
