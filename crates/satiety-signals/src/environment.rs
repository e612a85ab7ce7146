//! Calendar and hazard readings.

use serde::{Deserialize, Serialize};

/// One reading of the host calendar.
///
/// Real hours per simulated month are
/// `days_per_month * hours_per_day / (speed_of_time * speed_multiplier)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarSample {
    pub days_per_month: f64,
    pub hours_per_day: f64,
    /// Simulated seconds per real second
    pub speed_of_time: f64,
    /// Extra multiplier applied on top of `speed_of_time`
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
}

fn default_speed_multiplier() -> f64 {
    1.0
}

impl CalendarSample {
    pub fn new(days_per_month: f64, hours_per_day: f64, speed_of_time: f64) -> Self {
        Self {
            days_per_month,
            hours_per_day,
            speed_of_time,
            speed_multiplier: 1.0,
        }
    }

    pub fn with_speed_multiplier(mut self, speed_multiplier: f64) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    /// Effective time acceleration.
    pub fn effective_speed(&self) -> f64 {
        self.speed_of_time * self.speed_multiplier
    }
}

/// Reading from the environmental hazard (storm) source.
///
/// Either field may be missing when the source does not expose it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardSample {
    pub active: Option<bool>,
    pub strength: Option<f64>,
}

impl HazardSample {
    pub fn active() -> Self {
        Self {
            active: Some(true),
            strength: None,
        }
    }

    pub fn calm() -> Self {
        Self {
            active: Some(false),
            strength: Some(0.0),
        }
    }

    pub fn with_strength(strength: f64) -> Self {
        Self {
            active: None,
            strength: Some(strength),
        }
    }
}
