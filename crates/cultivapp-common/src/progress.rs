//! Crop progress and health derivations
//!
//! Pure, stateless transforms from the numeric fields of a crop payload into
//! display-ready percentages and severity bands. The band thresholds are shared
//! by progress bars, health badges and percentage pills:
//!
//! | percent        | band     |
//! |----------------|----------|
//! | `< 50`         | `Low`    |
//! | `50..=75`      | `Medium` |
//! | `> 75`         | `High`   |

use crate::types::HealthCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Percentage of the stage sequence reached.
///
/// Returns 0 when `total_stages <= 0`; otherwise
/// `round(current_stage_index * 100 / total_stages)` clamped to `[0, 100]`.
pub fn overall_percent(current_stage_index: i64, total_stages: i64) -> u8 {
    if total_stages <= 0 {
        return 0;
    }
    let raw = (current_stage_index as f64 * 100.0 / total_stages as f64).round();
    raw.clamp(0.0, 100.0) as u8
}

/// Percentage of the species' growth cycle elapsed since sowing.
///
/// `min(floor(days_since_sowing * 100 / cycle_days), 100)`, never negative.
/// Missing inputs or a zero-day cycle yield 0.
pub fn cycle_percent(sown_on: Option<NaiveDate>, cycle_days: Option<u32>, today: NaiveDate) -> u8 {
    let (Some(sown_on), Some(cycle_days)) = (sown_on, cycle_days) else {
        return 0;
    };
    if cycle_days == 0 {
        return 0;
    }
    let days_passed = (today - sown_on).num_days();
    if days_passed <= 0 {
        return 0;
    }
    let percent = days_passed.saturating_mul(100) / i64::from(cycle_days);
    percent.min(100) as u8
}

/// Severity classification used for colour-coding percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

impl SeverityBand {
    /// Classify a 0-100 percentage. 50 and 75 both fall in `Medium`.
    ///
    /// NaN classifies as `Low`.
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_nan() || percent < 50.0 {
            SeverityBand::Low
        } else if percent <= 75.0 {
            SeverityBand::Medium
        } else {
            SeverityBand::High
        }
    }

    pub fn gradient(self) -> Gradient {
        progress_bar_gradient(self)
    }

    /// Colour name for text rendered next to a bar or inside a pill
    pub fn label_color(self) -> &'static str {
        match self {
            SeverityBand::Low => "red",
            SeverityBand::Medium => "yellow",
            SeverityBand::High => "green",
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityBand::Low => write!(f, "low"),
            SeverityBand::Medium => write!(f, "medium"),
            SeverityBand::High => write!(f, "high"),
        }
    }
}

/// Two-stop colour gradient for a progress bar fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub from: &'static str,
    pub to: &'static str,
}

pub fn progress_bar_gradient(band: SeverityBand) -> Gradient {
    match band {
        SeverityBand::Low => Gradient {
            from: "#ef4444",
            to: "#f87171",
        },
        SeverityBand::Medium => Gradient {
            from: "#facc15",
            to: "#fde047",
        },
        SeverityBand::High => Gradient {
            from: "#22c55e",
            to: "#4ade80",
        },
    }
}

/// A 0-100 health score with its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthScore {
    pub category: HealthCategory,
    pub value: f64,
    pub band: SeverityBand,
}

/// Derived per-render view of a crop's progress. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProgressSnapshot {
    pub current_stage_index: i64,
    pub total_stages: i64,
    pub overall_percent: u8,
    pub salud_riego: f64,
    pub salud_fertilizacion: f64,
    pub salud_mantenimiento: f64,
}

impl CropProgressSnapshot {
    /// Build a snapshot. Health inputs are backend-supplied and clamped to `[0, 100]`.
    pub fn new(
        current_stage_index: i64,
        total_stages: i64,
        salud_riego: f64,
        salud_fertilizacion: f64,
        salud_mantenimiento: f64,
    ) -> Self {
        Self {
            current_stage_index,
            total_stages,
            overall_percent: overall_percent(current_stage_index, total_stages),
            salud_riego: clamp_percent(salud_riego),
            salud_fertilizacion: clamp_percent(salud_fertilizacion),
            salud_mantenimiento: clamp_percent(salud_mantenimiento),
        }
    }

    pub fn overall_band(&self) -> SeverityBand {
        SeverityBand::from_percent(f64::from(self.overall_percent))
    }

    pub fn health(&self, category: HealthCategory) -> HealthScore {
        let value = match category {
            HealthCategory::Riego => self.salud_riego,
            HealthCategory::Fertilizacion => self.salud_fertilizacion,
            HealthCategory::Mantenimiento => self.salud_mantenimiento,
        };
        HealthScore {
            category,
            value,
            band: SeverityBand::from_percent(value),
        }
    }

    /// Health scores in display order (riego, fertilización, mantenimiento)
    pub fn health_scores(&self) -> [HealthScore; 3] {
        HealthCategory::ALL.map(|category| self.health(category))
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overall_percent_rounds() {
        assert_eq!(overall_percent(0, 8), 0);
        assert_eq!(overall_percent(1, 3), 33);
        assert_eq!(overall_percent(2, 3), 67);
        assert_eq!(overall_percent(1, 8), 13);
        assert_eq!(overall_percent(8, 8), 100);
    }

    #[test]
    fn test_overall_percent_zero_total() {
        assert_eq!(overall_percent(0, 0), 0);
        assert_eq!(overall_percent(5, 0), 0);
        assert_eq!(overall_percent(5, -3), 0);
    }

    #[test]
    fn test_overall_percent_clamps_out_of_range_index() {
        assert_eq!(overall_percent(12, 8), 100);
        assert_eq!(overall_percent(-2, 8), 0);
    }

    #[test]
    fn test_severity_band_boundaries() {
        assert_eq!(SeverityBand::from_percent(49.0), SeverityBand::Low);
        assert_eq!(SeverityBand::from_percent(49.9), SeverityBand::Low);
        assert_eq!(SeverityBand::from_percent(50.0), SeverityBand::Medium);
        assert_eq!(SeverityBand::from_percent(75.0), SeverityBand::Medium);
        assert_eq!(SeverityBand::from_percent(75.5), SeverityBand::High);
        assert_eq!(SeverityBand::from_percent(76.0), SeverityBand::High);
        assert_eq!(SeverityBand::from_percent(f64::NAN), SeverityBand::Low);
    }

    #[test]
    fn test_gradient_per_band() {
        assert_eq!(progress_bar_gradient(SeverityBand::Low).from, "#ef4444");
        assert_eq!(progress_bar_gradient(SeverityBand::Medium).from, "#facc15");
        assert_eq!(progress_bar_gradient(SeverityBand::High).to, "#4ade80");
        assert_eq!(SeverityBand::High.label_color(), "green");
    }

    #[test]
    fn test_cycle_percent() {
        let sown = date(2024, 1, 1);
        assert_eq!(cycle_percent(Some(sown), Some(100), date(2024, 1, 1)), 0);
        assert_eq!(cycle_percent(Some(sown), Some(100), date(2024, 2, 20)), 50);
        assert_eq!(cycle_percent(Some(sown), Some(30), date(2024, 6, 1)), 100);
        assert_eq!(cycle_percent(Some(sown), Some(3), date(2024, 1, 2)), 33);
    }

    #[test]
    fn test_cycle_percent_missing_inputs() {
        let today = date(2024, 3, 1);
        assert_eq!(cycle_percent(None, Some(90), today), 0);
        assert_eq!(cycle_percent(Some(date(2024, 1, 1)), None, today), 0);
        assert_eq!(cycle_percent(Some(date(2024, 1, 1)), Some(0), today), 0);
        assert_eq!(cycle_percent(Some(date(2024, 5, 1)), Some(90), today), 0);
    }

    #[test]
    fn test_snapshot_classifies_health() {
        let snapshot = CropProgressSnapshot::new(2, 4, 80.0, 50.0, 120.0);

        assert_eq!(snapshot.overall_percent, 50);
        assert_eq!(snapshot.overall_band(), SeverityBand::Medium);
        assert_eq!(snapshot.health(HealthCategory::Riego).band, SeverityBand::High);
        assert_eq!(
            snapshot.health(HealthCategory::Fertilizacion).band,
            SeverityBand::Medium
        );

        let mantenimiento = snapshot.health(HealthCategory::Mantenimiento);
        assert_eq!(mantenimiento.value, 100.0);
        assert_eq!(mantenimiento.band, SeverityBand::High);
    }

    #[test]
    fn test_snapshot_health_scores_order() {
        let snapshot = CropProgressSnapshot::new(0, 0, 10.0, 60.0, 90.0);
        let categories: Vec<_> = snapshot.health_scores().iter().map(|h| h.category).collect();
        assert_eq!(categories, HealthCategory::ALL.to_vec());
        assert_eq!(snapshot.overall_percent, 0);
    }

    proptest! {
        #[test]
        fn prop_overall_percent_matches_rounded_ratio(
            total in 1i64..10_000,
            numerator in 0u32..=1000,
        ) {
            let current = total * i64::from(numerator) / 1000;
            let percent = overall_percent(current, total);
            let expected = (current as f64 * 100.0 / total as f64).round() as u8;
            prop_assert!(percent <= 100);
            prop_assert_eq!(percent, expected);
        }

        #[test]
        fn prop_overall_percent_zero_total_is_zero(current in any::<i64>()) {
            prop_assert_eq!(overall_percent(current, 0), 0);
        }
    }
}
