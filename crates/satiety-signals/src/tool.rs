//! Tool categories reported by the host when an agent starts using an item.

use serde::{Deserialize, Serialize};

/// Tool category of a held collectible.
///
/// Mirrors the host's own tool enumeration. Items without a tool category
/// (food, blocks, empty hands) are reported as `None` by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Knife,
    Pickaxe,
    ProspectingPick,
    Axe,
    Sword,
    Shovel,
    Hammer,
    Spear,
    Bow,
    Crossbow,
    Sling,
    Club,
    Hoe,
    Saw,
    Chisel,
    Scythe,
    Shears,
    Wrench,
    Meteorite,
}

impl ToolCategory {
    /// Returns true for tools that count as work rather than combat.
    ///
    /// Bows and crossbows count as work: they have their own action kind.
    pub fn is_work_tool(self) -> bool {
        matches!(
            self,
            ToolCategory::Pickaxe
                | ToolCategory::ProspectingPick
                | ToolCategory::Axe
                | ToolCategory::Shovel
                | ToolCategory::Hammer
                | ToolCategory::Bow
                | ToolCategory::Crossbow
        )
    }

    /// Returns true for aim-and-release weapons.
    pub fn is_bow_like(self) -> bool {
        matches!(self, ToolCategory::Bow | ToolCategory::Crossbow)
    }
}

/// The item involved in a tool-use trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Tool category, if the item has one
    #[serde(default)]
    pub tool: Option<ToolCategory>,
    /// Full item code, e.g. "game:pickaxe-copper"
    #[serde(default)]
    pub item_code: Option<String>,
}

impl ToolUse {
    pub fn new(tool: Option<ToolCategory>, item_code: Option<String>) -> Self {
        Self { tool, item_code }
    }

    /// A use of a categorised tool with no item code.
    pub fn tool(tool: ToolCategory) -> Self {
        Self {
            tool: Some(tool),
            item_code: None,
        }
    }

    /// A use of an uncategorised item identified only by its code.
    pub fn item(code: impl Into<String>) -> Self {
        Self {
            tool: None,
            item_code: Some(code.into()),
        }
    }

    pub fn with_item_code(mut self, code: impl Into<String>) -> Self {
        self.item_code = Some(code.into());
        self
    }

    /// Lower-cased item code, or an empty string.
    pub fn code_lower(&self) -> String {
        self.item_code
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}
