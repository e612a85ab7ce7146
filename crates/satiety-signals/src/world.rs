//! World Position and Material Types
//!
//! Positions are continuous; material lookups use the integer block grid.

use serde::{Deserialize, Serialize};

/// Continuous world position of an agent's feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The block containing this position.
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block directly beneath this one.
    pub fn below(self) -> Self {
        Self {
            y: self.y.saturating_sub(1),
            ..self
        }
    }
}

/// Which layer of a block position to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialLayer {
    /// Whatever the host considers the visible block
    #[default]
    Default,
    /// Only the fluid layer
    Fluid,
    /// Only the solid layer
    Solid,
}

/// Replaceability at or above which a block does not hold anyone up.
pub const NON_SUPPORTING_REPLACEABLE: u32 = 6000;

/// A block or fluid occupying one layer of a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Numeric block id; 0 is air
    pub id: u32,
    /// Full code, e.g. "game:water-still-7"
    pub code: String,
    /// Whether the material is a liquid
    #[serde(default)]
    pub is_liquid: bool,
    /// How easily other blocks replace this one (tall grass is high, stone low)
    #[serde(default)]
    pub replaceable: u32,
}

impl Material {
    pub fn new(id: u32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            is_liquid: false,
            replaceable: 0,
        }
    }

    pub fn liquid(id: u32, code: impl Into<String>) -> Self {
        Self {
            is_liquid: true,
            replaceable: 9500,
            ..Self::new(id, code)
        }
    }

    pub fn air() -> Self {
        Self {
            replaceable: 9999,
            ..Self::new(0, "game:air")
        }
    }

    pub fn with_replaceable(mut self, replaceable: u32) -> Self {
        self.replaceable = replaceable;
        self
    }

    /// Whether an agent can stand on this material.
    pub fn supports_standing(&self) -> bool {
        self.id != 0 && self.replaceable < NON_SUPPORTING_REPLACEABLE
    }

    /// Lower-cased material code.
    pub fn code_lower(&self) -> String {
        self.code.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_floors_negative_coordinates() {
        let pos = Position::new(-0.5, 3.99, 10.0);
        assert_eq!(pos.block(), BlockPos::new(-1, 3, 10));
        assert_eq!(pos.block().below(), BlockPos::new(-1, 2, 10));
    }

    #[test]
    fn test_below_saturates_at_bottom_of_world() {
        let pos = Position::new(0.0, f64::NEG_INFINITY, 0.0);
        assert_eq!(pos.block().y, i32::MIN);
        assert_eq!(pos.block().below().y, i32::MIN);
    }

    #[test]
    fn test_supports_standing() {
        assert!(Material::new(12, "game:rock-granite").supports_standing());
        assert!(!Material::air().supports_standing());
        assert!(!Material::liquid(40, "game:water-still-7").supports_standing());
        assert!(!Material::new(80, "game:tallgrass-eaten")
            .with_replaceable(6000)
            .supports_standing());
    }
}
