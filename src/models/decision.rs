use super::observation::Observation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Why a row was not flagged for irrigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    SoilMoistureAdequate,
    RainForecast,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::SoilMoistureAdequate => "Soil moisture adequate",
            SkipReason::RainForecast => "Rain expected",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub irrigate: bool,
    /// Crop evapotranspiration (ET0 x Kc), mm; zero when not irrigating
    pub etc: f64,
    /// Recommended depth, mm; never negative
    pub irrigation_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

impl Decision {
    pub fn skip(reason: SkipReason) -> Self {
        Self {
            irrigate: false,
            etc: 0.0,
            irrigation_mm: 0.0,
            skip_reason: Some(reason),
        }
    }

    pub fn irrigate(etc: f64, irrigation_mm: f64) -> Self {
        Self {
            irrigate: true,
            etc,
            irrigation_mm,
            skip_reason: None,
        }
    }

    /// Flagged for irrigation even though forecast rain offsets the whole demand.
    pub fn is_zero_depth_irrigation(&self) -> bool {
        self.irrigate && self.irrigation_mm == 0.0
    }
}

/// An observation decorated with its decision, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub observation: Observation,
    pub decision: Decision,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub rows: usize,
    pub irrigation_days: usize,
    pub skipped_wet: usize,
    pub skipped_rain: usize,
    pub total_irrigation_mm: f64,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

impl ScheduleSummary {
    pub fn from_rows(rows: &[ScheduleRow]) -> Self {
        let mut summary = ScheduleSummary {
            rows: rows.len(),
            ..Default::default()
        };

        for row in rows {
            match row.decision.skip_reason {
                None => summary.irrigation_days += 1,
                Some(SkipReason::SoilMoistureAdequate) => summary.skipped_wet += 1,
                Some(SkipReason::RainForecast) => summary.skipped_rain += 1,
            }
            summary.total_irrigation_mm += row.decision.irrigation_mm;
        }

        // Rows are not required to be ordered, so take the extremes
        summary.first_timestamp = rows.iter().map(|r| r.observation.timestamp).min();
        summary.last_timestamp = rows.iter().map(|r| r.observation.timestamp).max();

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn row(day: u32, decision: Decision) -> ScheduleRow {
        ScheduleRow {
            observation: Observation::new(ts(day), 25.0, 4.0, 0.0),
            decision,
        }
    }

    #[test]
    fn skip_decision_is_all_zero() {
        let d = Decision::skip(SkipReason::RainForecast);
        assert!(!d.irrigate);
        assert_eq!(d.etc, 0.0);
        assert_eq!(d.irrigation_mm, 0.0);
        assert_eq!(d.skip_reason, Some(SkipReason::RainForecast));
    }

    #[test]
    fn zero_depth_irrigation_detected() {
        assert!(Decision::irrigate(1.15, 0.0).is_zero_depth_irrigation());
        assert!(!Decision::irrigate(4.83, 4.33).is_zero_depth_irrigation());
        assert!(!Decision::skip(SkipReason::SoilMoistureAdequate).is_zero_depth_irrigation());
    }

    #[test]
    fn summary_counts_and_totals() {
        let rows = vec![
            row(3, Decision::irrigate(4.6, 3.1)),
            row(1, Decision::irrigate(4.83, 4.33)),
            row(2, Decision::skip(SkipReason::SoilMoistureAdequate)),
            row(4, Decision::skip(SkipReason::RainForecast)),
        ];

        let summary = ScheduleSummary::from_rows(&rows);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.irrigation_days, 2);
        assert_eq!(summary.skipped_wet, 1);
        assert_eq!(summary.skipped_rain, 1);
        assert!((summary.total_irrigation_mm - 7.43).abs() < 1e-9);
        assert_eq!(summary.first_timestamp, Some(ts(1)));
        assert_eq!(summary.last_timestamp, Some(ts(4)));
    }

    #[test]
    fn summary_of_empty_schedule() {
        let summary = ScheduleSummary::from_rows(&[]);
        assert_eq!(summary, ScheduleSummary::default());
    }

    #[test]
    fn skip_reason_display() {
        assert!(SkipReason::SoilMoistureAdequate.as_str().contains("adequate"));
        assert!(SkipReason::RainForecast.as_str().contains("Rain"));
    }
}
