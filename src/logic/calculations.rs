use crate::models::ScheduleRow;
use chrono::NaiveDateTime;

/// The four time series drawn on the schedule chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    SoilMoisture,
    Et0,
    ForecastRain,
    IrrigationMm,
}

impl Series {
    pub fn all() -> &'static [Series] {
        &[
            Series::SoilMoisture,
            Series::Et0,
            Series::ForecastRain,
            Series::IrrigationMm,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Series::SoilMoisture => "Soil Moisture",
            Series::Et0 => "ET0",
            Series::ForecastRain => "Rain Forecast",
            Series::IrrigationMm => "Irrigation (mm)",
        }
    }

    fn value(&self, row: &ScheduleRow) -> f64 {
        match self {
            Series::SoilMoisture => row.observation.soil_moisture,
            Series::Et0 => row.observation.et0,
            Series::ForecastRain => row.observation.forecast_rain,
            Series::IrrigationMm => row.decision.irrigation_mm,
        }
    }
}

/// Chart x coordinate for a timestamp (seconds since the epoch).
pub fn timestamp_to_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

/// (x, y) points for one series, in row order.
pub fn series_points(rows: &[ScheduleRow], series: Series) -> Vec<(f64, f64)> {
    rows.iter()
        .map(|r| (timestamp_to_x(r.observation.timestamp), series.value(r)))
        .collect()
}

/// Horizontal extent of the chart. A single row gets a one-day window around it.
pub fn x_bounds(rows: &[ScheduleRow]) -> Option<[f64; 2]> {
    let xs = rows.iter().map(|r| timestamp_to_x(r.observation.timestamp));
    let min = xs.clone().fold(f64::INFINITY, f64::min);
    let max = xs.fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    if (max - min).abs() < f64::EPSILON {
        Some([min - 43_200.0, max + 43_200.0])
    } else {
        Some([min, max])
    }
}

/// Vertical extent covering all four series plus any extra reference value,
/// padded by 10% above the maximum.
pub fn y_bounds(rows: &[ScheduleRow], reference: Option<f64>) -> [f64; 2] {
    let values = rows
        .iter()
        .flat_map(|r| Series::all().iter().map(move |s| s.value(r)))
        .chain(reference);

    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max <= min {
        [min, min + 1.0]
    } else {
        [min, max * 1.1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, Observation, SkipReason};
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn rows() -> Vec<ScheduleRow> {
        vec![
            ScheduleRow {
                observation: Observation::new(start(), 25.0, 4.2, 0.5),
                decision: Decision::irrigate(4.83, 4.33),
            },
            ScheduleRow {
                observation: Observation::new(start() + Duration::days(1), 27.0, 3.9, 3.0),
                decision: Decision::skip(SkipReason::SoilMoistureAdequate),
            },
        ]
    }

    #[test]
    fn series_points_follow_rows() {
        let rows = rows();
        let moisture = series_points(&rows, Series::SoilMoisture);
        assert_eq!(moisture.len(), 2);
        assert_eq!(moisture[0].1, 25.0);
        assert_eq!(moisture[1].1, 27.0);
        assert_eq!(moisture[1].0 - moisture[0].0, 86_400.0);

        let irrigation = series_points(&rows, Series::IrrigationMm);
        assert_eq!(irrigation[0].1, 4.33);
        assert_eq!(irrigation[1].1, 0.0);
    }

    #[test]
    fn x_bounds_span_timestamps() {
        let rows = rows();
        let [lo, hi] = x_bounds(&rows).unwrap();
        assert_eq!(hi - lo, 86_400.0);
        assert!(x_bounds(&[]).is_none());
    }

    #[test]
    fn x_bounds_single_row_is_widened() {
        let rows = &rows()[..1];
        let [lo, hi] = x_bounds(rows).unwrap();
        assert!(hi > lo);
    }

    #[test]
    fn y_bounds_include_reference_and_padding() {
        let rows = rows();
        let [lo, hi] = y_bounds(&rows, Some(26.6));
        assert_eq!(lo, 0.0);
        assert!((hi - 27.0 * 1.1).abs() < 1e-9);

        let [lo, hi] = y_bounds(&rows, Some(40.0));
        assert_eq!(lo, 0.0);
        assert!((hi - 44.0).abs() < 1e-9);
    }

    #[test]
    fn y_bounds_empty_is_unit_range() {
        assert_eq!(y_bounds(&[], None), [0.0, 1.0]);
    }

    #[test]
    fn series_labels() {
        assert_eq!(Series::all().len(), 4);
        assert_eq!(Series::IrrigationMm.label(), "Irrigation (mm)");
    }
}
