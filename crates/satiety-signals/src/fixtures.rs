//! Sample signal values for testing.
//!
//! This module provides ready-made host readings for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // satiety-signals = { path = "../satiety-signals", features = ["test-fixtures"] }
//!
//! use satiety_signals::fixtures;
//!
//! let calendar = fixtures::normal_calendar();
//! let water = fixtures::still_water();
//! ```

use crate::{CalendarSample, Carrier, Material, MountInfo, ToolUse, ToolCategory};

/// 9 days of 24 hours at 60x speed: 3.6 real hours per month.
pub fn normal_calendar() -> CalendarSample {
    CalendarSample::new(9.0, 24.0, 60.0)
}

/// 12 days of 24 hours at 40x speed: 7.2 real hours per month.
pub fn reference_calendar() -> CalendarSample {
    CalendarSample::new(12.0, 24.0, 40.0)
}

/// The normal calendar fast-forwarded well past the acceleration threshold.
pub fn fast_forward_calendar() -> CalendarSample {
    CalendarSample::new(9.0, 24.0, 600.0)
}

pub fn still_water() -> Material {
    Material::liquid(40, "game:water-still-7")
}

pub fn seawater() -> Material {
    Material::liquid(41, "game:saltwater-still-7")
}

pub fn lava() -> Material {
    Material::liquid(50, "game:lava-still-7")
}

pub fn granite() -> Material {
    Material::new(12, "game:rock-granite")
}

pub fn wattle_wall() -> Material {
    Material::new(90, "game:wattle-wall")
}

pub fn packed_dirt_path() -> Material {
    Material::new(30, "game:packeddirt-Path")
}

pub fn stone_path() -> Material {
    Material::new(31, "game:stonepath-free")
}

pub fn bed_seat() -> MountInfo {
    MountInfo::seat("BlockEntityBedSeat")
}

pub fn chair_seat() -> MountInfo {
    MountInfo::seat("EntityChairSeat")
}

pub fn horse_saddle() -> MountInfo {
    MountInfo::seat("EntityRideable")
        .with_carrier(Carrier::creature("EntityAgent", "game:horse-brown"))
}

pub fn boat_seat() -> MountInfo {
    MountInfo::seat("EntityRaftPassenger")
        .with_carrier(Carrier::object("EntityBoat", "game:raft"))
}

pub fn wooden_pan_code() -> &'static str {
    "game:pan-wooden"
}

pub fn copper_pickaxe() -> ToolUse {
    ToolUse::tool(ToolCategory::Pickaxe).with_item_code("game:pickaxe-copper")
}

pub fn iron_sword() -> ToolUse {
    ToolUse::tool(ToolCategory::Sword).with_item_code("game:blade-falx-iron")
}
