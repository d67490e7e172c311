use crate::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};

/// Share of field capacity below which irrigation is considered.
pub const TRIGGER_FRACTION: f64 = 0.70;

pub const DEFAULT_FIELD_CAPACITY_PERCENT: f64 = 38.0;
pub const DEFAULT_CROP_COEFFICIENT: f64 = 1.15;
pub const DEFAULT_RAIN_THRESHOLD_MM: f64 = 2.0;

/// Agronomic inputs shared by every row of one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationParameters {
    pub field_capacity_percent: f64,
    pub crop_coefficient: f64,
    pub rain_threshold_mm: f64,
}

impl IrrigationParameters {
    pub fn new(field_capacity_percent: f64, crop_coefficient: f64, rain_threshold_mm: f64) -> Self {
        Self {
            field_capacity_percent,
            crop_coefficient,
            rain_threshold_mm,
        }
    }

    /// Soil moisture (%) below which the soil counts as dry.
    pub fn trigger_threshold(&self) -> f64 {
        TRIGGER_FRACTION * self.field_capacity_percent
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("field_capacity_percent", self.field_capacity_percent)?;
        check_finite("crop_coefficient", self.crop_coefficient)?;
        check_finite("rain_threshold_mm", self.rain_threshold_mm)?;

        if self.field_capacity_percent <= 0.0 || self.field_capacity_percent > 100.0 {
            return Err(SchedulerError::ParameterRange {
                name: "field_capacity_percent",
                value: self.field_capacity_percent,
                reason: "must be within (0, 100]",
            });
        }

        if self.crop_coefficient <= 0.0 {
            return Err(SchedulerError::ParameterRange {
                name: "crop_coefficient",
                value: self.crop_coefficient,
                reason: "must be greater than zero",
            });
        }

        if self.rain_threshold_mm < 0.0 {
            return Err(SchedulerError::ParameterRange {
                name: "rain_threshold_mm",
                value: self.rain_threshold_mm,
                reason: "must not be negative",
            });
        }

        Ok(())
    }

    /// Apply optional overrides on top of these values (e.g. from the command line).
    pub fn with_overrides(
        mut self,
        field_capacity_percent: Option<f64>,
        crop_coefficient: Option<f64>,
        rain_threshold_mm: Option<f64>,
    ) -> Self {
        if let Some(fc) = field_capacity_percent {
            self.field_capacity_percent = fc;
        }
        if let Some(kc) = crop_coefficient {
            self.crop_coefficient = kc;
        }
        if let Some(rain) = rain_threshold_mm {
            self.rain_threshold_mm = rain;
        }
        self
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SchedulerError::ParameterRange {
            name,
            value,
            reason: "must be a finite number",
        })
    }
}

impl Default for IrrigationParameters {
    fn default() -> Self {
        Self {
            field_capacity_percent: DEFAULT_FIELD_CAPACITY_PERCENT,
            crop_coefficient: DEFAULT_CROP_COEFFICIENT,
            rain_threshold_mm: DEFAULT_RAIN_THRESHOLD_MM,
        }
    }
}
