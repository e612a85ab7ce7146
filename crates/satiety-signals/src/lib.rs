//! Shared signal types for the satiety rate-scaling engine.
//!
//! This crate contains pure data structures with no scaling logic: the action
//! categories the engine classifies, the tool table inputs, and the records a
//! host hands over when the engine asks about an agent or the world.
//! It is a dependency for all other crates in the workspace.

pub mod action;
pub mod agent;
pub mod environment;
pub mod posture;
pub mod tool;
pub mod world;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export action types
pub use action::{ActionKind, ParseActionError, PENDING_PRIORITY};

// Re-export agent types
pub use agent::{AgentId, SimMillis};

// Re-export environment types
pub use environment::{CalendarSample, HazardSample};

// Re-export posture types
pub use posture::{Carrier, MountInfo, MovementState, TriggerControls};

// Re-export tool types
pub use tool::{ToolCategory, ToolUse};

// Re-export world types
pub use world::{BlockPos, Material, MaterialLayer, Position};
