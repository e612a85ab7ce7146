//! Satiety: action-aware depletion rate scaling.
//!
//! The host reports two unrelated streams: tool-use triggers and control
//! samples whenever they happen, and a periodic depletion tick per agent.
//! The engine remembers recent actions as one-shot pending flags, settles
//! each tick on exactly one [`ActionKind`], and multiplies the raw depletion
//! amount by a factor built from independent sources.
//!
//! # Architecture
//!
//! ```text
//! triggers / sampler ──▶ FlagStore ──▶ classify ──▶ compose ──▶ rescaled amount
//!                                          ▲            ▲
//!                                    AgentSignals   CalendarNormalizer
//! ```
//!
//! # Modules
//!
//! - [`config`]: Tunables, defaults and TOML I/O
//! - [`host`]: The [`Host`] trait the engine queries
//! - [`flags`]: Per-agent state and pending triggers
//! - [`taps`]: Tool table and sampler detection rules
//! - [`classifier`]: One action per tick, in strict priority order
//! - [`calendar`]: Month-length normalization with fast-forward hysteresis
//! - [`composer`]: Path, storm, month and action multipliers
//! - [`engine`]: Entry points and agent lifecycle
//! - [`diagnostics`]: Tick breakdowns, rate-limited logs, JSONL reports
//! - [`scripted`], [`scenario`], [`soak`]: In-memory host and drivers

pub mod calendar;
pub mod classifier;
pub mod composer;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod flags;
pub mod host;
pub mod scenario;
pub mod scripted;
pub mod soak;
pub mod taps;

pub use satiety_signals::ActionKind;

// Re-export config types
pub use config::{
    default_config_toml, ActionMultipliers, ConfigError, EngineConfig, EnvironmentMultipliers,
    MonthLengthScalingConfig, PendingWindows, DEFAULT_CONFIG_PATH,
};

// Re-export engine types
pub use calendar::CalendarNormalizer;
pub use composer::Composition;
pub use engine::Engine;
pub use flags::{AgentActionState, FlagStore, PendingTrigger};
pub use host::{AgentSignals, Host};

// Re-export diagnostics and driver types
pub use diagnostics::{ReportError, ReportWriter, TickBreakdown, TickReport};
pub use scenario::{Scenario, ScenarioError, Step, StepOp};
pub use scripted::ScriptedHost;
pub use soak::{SoakOptions, SoakSummary};
