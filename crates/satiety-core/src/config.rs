//! Configuration System
//!
//! All scaling tunables live in one TOML file. Every section is optional and
//! falls back to the product defaults, so a partial file only overrides what
//! it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use satiety_signals::{ActionKind, SimMillis};

/// Default config file name.
pub const DEFAULT_CONFIG_PATH: &str = "satiety.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Applied to every depletion tick
    pub global_multiplier: f64,
    /// Emit rate-limited tick breakdowns through `tracing`
    pub debug_logging: bool,
    /// Calendar normalization
    pub month_length_scaling: MonthLengthScalingConfig,
    /// Per-action multipliers
    pub action_multipliers: ActionMultipliers,
    /// How long pending flags wait for a tick, plus sampler timings
    pub pending_windows: PendingWindows,
    /// Path and storm rules
    pub environment_multipliers: EnvironmentMultipliers,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_multiplier: 1.0,
            debug_logging: false,
            month_length_scaling: MonthLengthScalingConfig::default(),
            action_multipliers: ActionMultipliers::default(),
            pending_windows: PendingWindows::default(),
            environment_multipliers: EnvironmentMultipliers::default(),
        }
    }
}

impl EngineConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the configuration to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_toml()?)?;
        Ok(())
    }

    /// Loads `path`, writing the defaults there first if it does not exist.
    ///
    /// An unreadable or invalid file is reported and replaced by the defaults
    /// in memory; the file itself is left untouched.
    pub fn load_or_create(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => tracing::info!("Wrote default config to {:?}", path),
                Err(e) => tracing::warn!("Could not write default config to {:?}: {}", path, e),
            }
            return config;
        }

        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Checks the invariants the engine relies on for sensible output.
    ///
    /// The engine never panics on an invalid config; this only lets file
    /// loading reject obvious mistakes early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.global_multiplier.is_finite() || self.global_multiplier < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "global_multiplier must be finite and >= 0, got {}",
                self.global_multiplier
            )));
        }

        let month = &self.month_length_scaling;
        if month.min_multiplier > month.max_multiplier {
            return Err(ConfigError::Invalid(format!(
                "month_length_scaling.min_multiplier ({}) exceeds max_multiplier ({})",
                month.min_multiplier, month.max_multiplier
            )));
        }

        for kind in ActionKind::ALL {
            let value = self.action_multipliers.get(kind);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "action_multipliers.{} must be finite and >= 0, got {}",
                    kind, value
                )));
            }
        }

        let windows = &self.pending_windows;
        let named = [
            ("weapon_swing_click_window_ms", windows.weapon_swing_click_window_ms),
            ("quern_spin_hold_ms", windows.quern_spin_hold_ms),
            ("quern_flag_refresh_ms", windows.quern_flag_refresh_ms),
        ];
        for (name, value) in named {
            if value < 0 {
                return Err(ConfigError::Invalid(format!(
                    "pending_windows.{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        for kind in satiety_signals::PENDING_PRIORITY {
            if windows.window_for(kind) < 0 {
                return Err(ConfigError::Invalid(format!(
                    "pending window for {} must be >= 0",
                    kind
                )));
            }
        }

        Ok(())
    }
}

/// Calendar normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthLengthScalingConfig {
    pub enabled: bool,
    /// Real hours per month the base depletion rate was balanced for
    pub reference_real_hours_per_month: f64,
    /// Derive actual month length from the host calendar
    pub use_host_calendar: bool,
    /// Used when the calendar is off or unavailable
    pub override_actual_real_hours_per_month: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for MonthLengthScalingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reference_real_hours_per_month: 7.2,
            use_host_calendar: true,
            override_actual_real_hours_per_month: 7.2,
            min_multiplier: 0.1,
            max_multiplier: 10.0,
        }
    }
}

/// Depletion multiplier for each action kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionMultipliers {
    // Movement states
    pub standing: f64,
    pub sprinting: f64,
    pub sneaking: f64,
    pub swimming: f64,

    // Sitting variants
    pub sitting: f64,
    pub sitting_mount: f64,
    pub sitting_furniture: f64,
    pub sleeping: f64,

    // Tools and interactions
    pub mining: f64,
    pub chopping: f64,
    pub digging: f64,
    pub hammer_use: f64,
    pub bow_use: f64,
    pub fire_starting: f64,
    pub quern_grinding: f64,
    pub weapon_swing: f64,
    pub panning: f64,
}

impl Default for ActionMultipliers {
    fn default() -> Self {
        Self {
            standing: 1.0,
            sprinting: 1.5,
            sneaking: 1.1,
            swimming: 2.5,
            sitting: 0.75,
            sitting_mount: 0.80,
            sitting_furniture: 0.70,
            sleeping: 0.70,
            mining: 1.25,
            chopping: 1.20,
            digging: 1.15,
            hammer_use: 1.15,
            bow_use: 1.20,
            fire_starting: 8.0,
            quern_grinding: 2.25,
            weapon_swing: 1.15,
            panning: 0.85,
        }
    }
}

impl ActionMultipliers {
    /// Every kind set to 1.0.
    pub fn neutral() -> Self {
        let mut table = Self::default();
        for kind in ActionKind::ALL {
            table.set(kind, 1.0);
        }
        table
    }

    /// Gets the multiplier for an action kind.
    pub fn get(&self, kind: ActionKind) -> f64 {
        match kind {
            ActionKind::Standing => self.standing,
            ActionKind::Sprinting => self.sprinting,
            ActionKind::Sneaking => self.sneaking,
            ActionKind::Swimming => self.swimming,
            ActionKind::Sitting => self.sitting,
            ActionKind::SittingMount => self.sitting_mount,
            ActionKind::SittingFurniture => self.sitting_furniture,
            ActionKind::Sleeping => self.sleeping,
            ActionKind::Mining => self.mining,
            ActionKind::Chopping => self.chopping,
            ActionKind::Digging => self.digging,
            ActionKind::HammerUse => self.hammer_use,
            ActionKind::BowUse => self.bow_use,
            ActionKind::FireStarting => self.fire_starting,
            ActionKind::QuernGrinding => self.quern_grinding,
            ActionKind::WeaponSwing => self.weapon_swing,
            ActionKind::Panning => self.panning,
        }
    }

    /// Sets the multiplier for an action kind.
    pub fn set(&mut self, kind: ActionKind, value: f64) {
        let slot = match kind {
            ActionKind::Standing => &mut self.standing,
            ActionKind::Sprinting => &mut self.sprinting,
            ActionKind::Sneaking => &mut self.sneaking,
            ActionKind::Swimming => &mut self.swimming,
            ActionKind::Sitting => &mut self.sitting,
            ActionKind::SittingMount => &mut self.sitting_mount,
            ActionKind::SittingFurniture => &mut self.sitting_furniture,
            ActionKind::Sleeping => &mut self.sleeping,
            ActionKind::Mining => &mut self.mining,
            ActionKind::Chopping => &mut self.chopping,
            ActionKind::Digging => &mut self.digging,
            ActionKind::HammerUse => &mut self.hammer_use,
            ActionKind::BowUse => &mut self.bow_use,
            ActionKind::FireStarting => &mut self.fire_starting,
            ActionKind::QuernGrinding => &mut self.quern_grinding,
            ActionKind::WeaponSwing => &mut self.weapon_swing,
            ActionKind::Panning => &mut self.panning,
        };
        *slot = value;
    }

    pub fn with(mut self, kind: ActionKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }
}

/// Pending-flag expiry windows and sampler timings, in milliseconds.
///
/// Depletion ticks can be ~10s apart, so the windows are generous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingWindows {
    pub panning_ms: SimMillis,
    pub weapon_swing_ms: SimMillis,
    pub mining_ms: SimMillis,
    pub chopping_ms: SimMillis,
    pub digging_ms: SimMillis,
    pub hammer_use_ms: SimMillis,
    pub bow_use_ms: SimMillis,
    pub quern_grinding_ms: SimMillis,
    pub fire_starting_ms: SimMillis,
    /// A primary click this recent counts as a weapon swing; 0 disables
    pub weapon_swing_click_window_ms: SimMillis,
    /// Secondary control must be held on a quern this long before it counts
    pub quern_spin_hold_ms: SimMillis,
    /// Minimum spacing between quern flag refreshes while spinning
    pub quern_flag_refresh_ms: SimMillis,
}

impl Default for PendingWindows {
    fn default() -> Self {
        Self {
            panning_ms: 30_000,
            weapon_swing_ms: 3_000,
            mining_ms: 30_000,
            chopping_ms: 30_000,
            digging_ms: 30_000,
            hammer_use_ms: 30_000,
            bow_use_ms: 30_000,
            quern_grinding_ms: 30_000,
            fire_starting_ms: 30_000,
            weapon_swing_click_window_ms: 250,
            quern_spin_hold_ms: 2_000,
            quern_flag_refresh_ms: 500,
        }
    }
}

impl PendingWindows {
    /// Expiry window for a pending kind. Continuous kinds have no window.
    pub fn window_for(&self, kind: ActionKind) -> SimMillis {
        match kind {
            ActionKind::Panning => self.panning_ms,
            ActionKind::WeaponSwing => self.weapon_swing_ms,
            ActionKind::Mining => self.mining_ms,
            ActionKind::Chopping => self.chopping_ms,
            ActionKind::Digging => self.digging_ms,
            ActionKind::HammerUse => self.hammer_use_ms,
            ActionKind::BowUse => self.bow_use_ms,
            ActionKind::QuernGrinding => self.quern_grinding_ms,
            ActionKind::FireStarting => self.fire_starting_ms,
            _ => 0,
        }
    }

    /// Sets every pending-flag window to the same value.
    pub fn uniform(window_ms: SimMillis) -> Self {
        Self {
            panning_ms: window_ms,
            weapon_swing_ms: window_ms,
            mining_ms: window_ms,
            chopping_ms: window_ms,
            digging_ms: window_ms,
            hammer_use_ms: window_ms,
            bow_use_ms: window_ms,
            quern_grinding_ms: window_ms,
            fire_starting_ms: window_ms,
            ..Self::default()
        }
    }
}

/// Environment rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentMultipliers {
    /// Path and road blocks reduce depletion slightly while moving
    pub path_bonus_enabled: bool,
    pub path_multiplier: f64,
    pub path_requires_moving: bool,
    /// Matched case-insensitively against the block code beneath the agent
    pub path_keywords: Vec<String>,

    /// Storms increase depletion
    pub storm_multiplier_enabled: bool,
    pub storm_multiplier: f64,
    pub storm_strength_threshold: f64,
}

impl Default for EnvironmentMultipliers {
    fn default() -> Self {
        Self {
            path_bonus_enabled: true,
            path_multiplier: 0.90,
            path_requires_moving: true,
            path_keywords: vec!["path".to_string(), "road".to_string()],
            storm_multiplier_enabled: true,
            storm_multiplier: 4.0,
            storm_strength_threshold: 0.0001,
        }
    }
}

impl EnvironmentMultipliers {
    /// Both rules switched off.
    pub fn disabled() -> Self {
        Self {
            path_bonus_enabled: false,
            storm_multiplier_enabled: false,
            ..Self::default()
        }
    }
}

/// Errors that can occur during configuration loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading or writing the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Error serializing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Config parsed but breaks an invariant
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Satiety Configuration

global_multiplier = 1.0
debug_logging = false

[month_length_scaling]
enabled = true
reference_real_hours_per_month = 7.2
use_host_calendar = true
override_actual_real_hours_per_month = 7.2
min_multiplier = 0.1
max_multiplier = 10.0

[action_multipliers]
standing = 1.0
sprinting = 1.5
sneaking = 1.1
swimming = 2.5
sitting = 0.75
sitting_mount = 0.8
sitting_furniture = 0.7
sleeping = 0.7
mining = 1.25
chopping = 1.2
digging = 1.15
hammer_use = 1.15
bow_use = 1.2
fire_starting = 8.0
quern_grinding = 2.25
weapon_swing = 1.15
panning = 0.85

[pending_windows]
panning_ms = 30000
weapon_swing_ms = 3000
mining_ms = 30000
chopping_ms = 30000
digging_ms = 30000
hammer_use_ms = 30000
bow_use_ms = 30000
quern_grinding_ms = 30000
fire_starting_ms = 30000
weapon_swing_click_window_ms = 250
quern_spin_hold_ms = 2000
quern_flag_refresh_ms = 500

[environment_multipliers]
path_bonus_enabled = true
path_multiplier = 0.9
path_requires_moving = true
path_keywords = ["path", "road"]
storm_multiplier_enabled = true
storm_multiplier = 4.0
storm_strength_threshold = 0.0001
"#
    .to_string()
}
