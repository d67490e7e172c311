use crate::models::{Decision, IrrigationParameters, Observation, SkipReason};

/// Irrigation decision for a single observation.
///
/// Conditions:
/// - Soil moisture below the trigger threshold (70% of field capacity)
/// - Forecast rain below the rain threshold
///
/// When both hold, the recommended depth is crop evapotranspiration
/// (ET0 x Kc) net of forecast rain, clamped at zero. A value exactly on a
/// threshold does not irrigate.
///
/// The row stays flagged for irrigation when the clamp brings the depth to
/// zero.
pub fn decide(observation: &Observation, params: &IrrigationParameters) -> Decision {
    // Soil is wet enough; rain and ET0 are not consulted
    if observation.soil_moisture >= params.trigger_threshold() {
        return Decision::skip(SkipReason::SoilMoistureAdequate);
    }

    if observation.forecast_rain >= params.rain_threshold_mm {
        return Decision::skip(SkipReason::RainForecast);
    }

    let etc = observation.et0 * params.crop_coefficient;
    let irrigation_mm = (etc - observation.forecast_rain).max(0.0);

    Decision::irrigate(etc, irrigation_mm)
}
