//! Rate Multiplier Composer
//!
//! Combines the independent multiplier sources into one factor:
//! `global × month × path × storm × action`.

use serde::{Deserialize, Serialize};

use satiety_signals::{ActionKind, HazardSample};

use crate::config::{EngineConfig, EnvironmentMultipliers};
use crate::host::AgentSignals;

/// Every factor that went into one depletion tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub global: f64,
    pub month: f64,
    pub path: f64,
    pub storm: f64,
    pub action: f64,
}

impl Composition {
    /// Environment factor: path × storm.
    pub fn environment(&self) -> f64 {
        self.path * self.storm
    }

    /// The composed multiplier.
    pub fn total(&self) -> f64 {
        self.global * self.month * self.environment() * self.action
    }

    /// Whether the composed multiplier may be applied.
    ///
    /// Zero, negative and non-finite totals come from a misconfiguration and
    /// leave the depletion amount alone.
    pub fn is_applicable(&self) -> bool {
        let total = self.total();
        total.is_finite() && total > 0.0
    }

    /// Rescales a raw depletion amount, or passes it through unchanged.
    pub fn apply(&self, raw: f32) -> f32 {
        if !self.is_applicable() {
            return raw;
        }
        (raw as f64 * self.total()) as f32
    }
}

/// Builds the composition for one tick.
pub fn compose(
    config: &EngineConfig,
    signals: &AgentSignals,
    action: ActionKind,
    month: f64,
    hazard: Option<&HazardSample>,
) -> Composition {
    let env = &config.environment_multipliers;
    Composition {
        global: config.global_multiplier,
        month,
        path: path_multiplier(env, signals, action),
        storm: storm_multiplier(env, hazard),
        action: config.action_multipliers.get(action),
    }
}

/// Discount for walking on path or road blocks.
pub fn path_multiplier(env: &EnvironmentMultipliers, signals: &AgentSignals, action: ActionKind) -> f64 {
    if !env.path_bonus_enabled || !action.is_on_foot() {
        return 1.0;
    }
    if env.path_requires_moving && !signals.movement.trying_to_move {
        return 1.0;
    }

    let Some(ground) = &signals.ground else {
        return 1.0;
    };
    if matches_any_keyword(&ground.code, &env.path_keywords) {
        env.path_multiplier
    } else {
        1.0
    }
}

fn matches_any_keyword(code: &str, keywords: &[String]) -> bool {
    let code = code.to_lowercase();
    keywords
        .iter()
        .map(|kw| kw.trim())
        .filter(|kw| !kw.is_empty())
        .any(|kw| code.contains(&kw.to_lowercase()))
}

/// Whether a hazard reading counts as an active storm.
pub fn storm_active(env: &EnvironmentMultipliers, hazard: &HazardSample) -> bool {
    let flagged = hazard.active.unwrap_or(false);
    let strong = hazard
        .strength
        .map(|s| s > env.storm_strength_threshold)
        .unwrap_or(false);
    flagged || strong
}

/// Surge during storms. A missing reading means no storm.
pub fn storm_multiplier(env: &EnvironmentMultipliers, hazard: Option<&HazardSample>) -> f64 {
    if !env.storm_multiplier_enabled {
        return 1.0;
    }
    match hazard {
        Some(sample) if storm_active(env, sample) => env.storm_multiplier,
        _ => 1.0,
    }
}
