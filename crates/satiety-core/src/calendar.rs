//! Calendar Normalizer
//!
//! Depletion rates are balanced for a reference month length in real hours.
//! When the host calendar runs faster or slower, the month multiplier keeps
//! depletion per simulated month roughly constant.
//!
//! Sleeping and fast-forwarding run the calendar at abnormal speed for a
//! while. Readings taken then are "accelerated": the normalizer ignores them
//! and reuses the last normal-speed month length instead.

use std::sync::Mutex;

use satiety_signals::{ActionKind, CalendarSample};

use crate::config::MonthLengthScalingConfig;

/// Calendar speed above which a reading counts as accelerated.
pub const ACCELERATED_SPEED_OF_TIME: f64 = 120.0;

/// Denominators and month lengths at or below this are treated as zero.
const EPSILON: f64 = 0.000001;

/// Month length in real hours derived from one calendar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthObservation {
    /// Real hours per month this reading implies
    pub candidate_hours: f64,
    /// Whether the reading was taken at abnormal speed
    pub accelerated: bool,
}

/// Interprets a calendar reading without touching any cache.
pub fn observe(
    config: &MonthLengthScalingConfig,
    action: ActionKind,
    sample: Option<&CalendarSample>,
) -> MonthObservation {
    let mut observation = MonthObservation {
        candidate_hours: config.override_actual_real_hours_per_month,
        accelerated: false,
    };

    let Some(cal) = sample.filter(|_| config.use_host_calendar) else {
        return observation;
    };

    if action == ActionKind::Sleeping {
        observation.accelerated = true;
    }

    let denom = cal.effective_speed();
    if denom > EPSILON {
        observation.candidate_hours = cal.days_per_month * cal.hours_per_day / denom;
        if cal.speed_of_time > ACCELERATED_SPEED_OF_TIME {
            observation.accelerated = true;
        }
    }

    observation
}

/// `reference / actual`, clamped to the configured bounds.
///
/// Returns 1.0 when `actual` is zero or negative. An inverted clamp range
/// yields `max_multiplier` rather than panicking.
pub fn ratio_multiplier(config: &MonthLengthScalingConfig, actual_hours: f64) -> f64 {
    if !(actual_hours > EPSILON) {
        return 1.0;
    }
    let multiplier = config.reference_real_hours_per_month / actual_hours;
    multiplier.max(config.min_multiplier).min(config.max_multiplier)
}

/// Month multiplier with memory of the last normal-speed month length.
#[derive(Debug, Default)]
pub struct CalendarNormalizer {
    cached_normal_hours: Mutex<Option<f64>>,
}

impl CalendarNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last month length observed at normal speed.
    pub fn cached_normal_hours(&self) -> Option<f64> {
        *self
            .cached_normal_hours
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Forgets the cached month length.
    pub fn reset(&self) {
        *self
            .cached_normal_hours
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    /// Computes the month multiplier for one depletion tick.
    pub fn month_multiplier(
        &self,
        config: &MonthLengthScalingConfig,
        action: ActionKind,
        sample: Option<&CalendarSample>,
    ) -> f64 {
        if !config.enabled {
            return 1.0;
        }

        let observation = observe(config, action, sample);
        let actual_used = {
            let mut cached = self
                .cached_normal_hours
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if observation.accelerated {
                match *cached {
                    Some(hours) if hours > EPSILON => hours,
                    _ if config.override_actual_real_hours_per_month > EPSILON => {
                        config.override_actual_real_hours_per_month
                    }
                    _ => observation.candidate_hours,
                }
            } else {
                if observation.candidate_hours > EPSILON {
                    *cached = Some(observation.candidate_hours);
                }
                observation.candidate_hours
            }
        };

        ratio_multiplier(config, actual_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satiety_signals::fixtures;

    fn config() -> MonthLengthScalingConfig {
        MonthLengthScalingConfig::default()
    }

    #[test]
    fn test_disabled_returns_one() {
        let normalizer = CalendarNormalizer::new();
        let cfg = MonthLengthScalingConfig {
            enabled: false,
            ..config()
        };
        let sample = fixtures::normal_calendar();
        assert_eq!(
            normalizer.month_multiplier(&cfg, ActionKind::Standing, Some(&sample)),
            1.0
        );
        assert_eq!(normalizer.cached_normal_hours(), None);
    }

    #[test]
    fn test_reference_calendar_is_neutral() {
        let normalizer = CalendarNormalizer::new();
        let sample = fixtures::reference_calendar();
        let multiplier = normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&sample));
        assert!((multiplier - 1.0).abs() < 1e-9);
        assert_eq!(normalizer.cached_normal_hours(), Some(7.2));
    }

    #[test]
    fn test_shorter_month_scales_up() {
        let normalizer = CalendarNormalizer::new();
        // 3.6 real hours per month against a 7.2 hour reference
        let sample = fixtures::normal_calendar();
        let multiplier = normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&sample));
        assert!((multiplier - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let normalizer = CalendarNormalizer::new();
        let cfg = MonthLengthScalingConfig {
            min_multiplier: 0.5,
            max_multiplier: 1.5,
            ..config()
        };

        let fast = fixtures::normal_calendar();
        assert_eq!(normalizer.month_multiplier(&cfg, ActionKind::Standing, Some(&fast)), 1.5);

        let slow = CalendarSample::new(30.0, 24.0, 10.0);
        assert_eq!(normalizer.month_multiplier(&cfg, ActionKind::Standing, Some(&slow)), 0.5);
    }

    #[test]
    fn test_inverted_clamp_does_not_panic() {
        let cfg = MonthLengthScalingConfig {
            min_multiplier: 3.0,
            max_multiplier: 2.0,
            ..config()
        };
        assert_eq!(ratio_multiplier(&cfg, 7.2), 2.0);
    }

    #[test]
    fn test_zero_speed_uses_override() {
        let normalizer = CalendarNormalizer::new();
        let cfg = MonthLengthScalingConfig {
            override_actual_real_hours_per_month: 14.4,
            ..config()
        };
        let stopped = CalendarSample::new(9.0, 24.0, 0.0);
        let multiplier = normalizer.month_multiplier(&cfg, ActionKind::Standing, Some(&stopped));
        assert!((multiplier - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_month_length_is_neutral() {
        let normalizer = CalendarNormalizer::new();
        let cfg = MonthLengthScalingConfig {
            use_host_calendar: false,
            override_actual_real_hours_per_month: 0.0,
            ..config()
        };
        assert_eq!(normalizer.month_multiplier(&cfg, ActionKind::Standing, None), 1.0);
    }

    #[test]
    fn test_missing_calendar_uses_override() {
        let normalizer = CalendarNormalizer::new();
        let multiplier = normalizer.month_multiplier(&config(), ActionKind::Standing, None);
        assert!((multiplier - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fast_forward_reuses_cached_normal_month() {
        let normalizer = CalendarNormalizer::new();
        let normal = fixtures::normal_calendar();
        let expected = normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&normal));

        let fast = fixtures::fast_forward_calendar();
        let during = normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&fast));
        assert_eq!(during, expected);
        // Cache untouched by the accelerated reading
        assert_eq!(normalizer.cached_normal_hours(), Some(3.6));
    }

    #[test]
    fn test_sleeping_counts_as_accelerated() {
        let normalizer = CalendarNormalizer::new();
        let normal = fixtures::normal_calendar();
        let expected = normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&normal));

        // Sleep at 200x with the same calendar shape
        let sleeping = CalendarSample::new(9.0, 24.0, 200.0);
        let during = normalizer.month_multiplier(&config(), ActionKind::Sleeping, Some(&sleeping));
        assert_eq!(during, expected);
    }

    #[test]
    fn test_accelerated_without_cache_falls_back_to_override() {
        let normalizer = CalendarNormalizer::new();
        let cfg = MonthLengthScalingConfig {
            override_actual_real_hours_per_month: 3.6,
            ..config()
        };
        let fast = fixtures::fast_forward_calendar();
        let multiplier = normalizer.month_multiplier(&cfg, ActionKind::Standing, Some(&fast));
        assert!((multiplier - 2.0).abs() < 1e-9);
        assert_eq!(normalizer.cached_normal_hours(), None);
    }

    #[test]
    fn test_observe_ignores_calendar_when_disabled_in_config() {
        let cfg = MonthLengthScalingConfig {
            use_host_calendar: false,
            ..config()
        };
        let fast = fixtures::fast_forward_calendar();
        let observation = observe(&cfg, ActionKind::Sleeping, Some(&fast));
        assert_eq!(observation.candidate_hours, 7.2);
        assert!(!observation.accelerated);
    }

    #[test]
    fn test_reset_forgets_cache() {
        let normalizer = CalendarNormalizer::new();
        let normal = fixtures::normal_calendar();
        normalizer.month_multiplier(&config(), ActionKind::Standing, Some(&normal));
        assert!(normalizer.cached_normal_hours().is_some());

        normalizer.reset();
        assert_eq!(normalizer.cached_normal_hours(), None);
    }
}
