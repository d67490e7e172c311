use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One timestamped sensor/forecast reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    /// Volumetric soil moisture, percent
    pub soil_moisture: f64,
    /// Reference evapotranspiration, mm/day
    pub et0: f64,
    /// Rain expected in the upcoming window, mm
    pub forecast_rain: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, soil_moisture: f64, et0: f64, forecast_rain: f64) -> Self {
        Self {
            timestamp,
            soil_moisture,
            et0,
            forecast_rain,
        }
    }
}
