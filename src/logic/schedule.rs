use super::decision::decide;
use crate::models::{IrrigationParameters, Observation, ScheduleRow, ScheduleSummary};
use serde::Serialize;

/// Below this many rows thread start-up costs more than it saves.
pub const PARALLEL_MIN_ROWS: usize = 50_000;

/// Decisions for a whole observation series, evaluated under one parameter set.
#[derive(Debug, Clone, Serialize)]
pub struct IrrigationSchedule {
    pub parameters: IrrigationParameters,
    pub rows: Vec<ScheduleRow>,
}

impl IrrigationSchedule {
    /// Evaluate every observation in order. Each row depends only on its own
    /// observation and the shared parameters.
    pub fn evaluate(observations: &[Observation], parameters: &IrrigationParameters) -> Self {
        let rows = observations
            .iter()
            .map(|obs| ScheduleRow {
                observation: *obs,
                decision: decide(obs, parameters),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            rows = rows.len(),
            trigger = parameters.trigger_threshold(),
            "Evaluated irrigation schedule"
        );

        Self {
            parameters: *parameters,
            rows,
        }
    }

    /// Same result as [`IrrigationSchedule::evaluate`], split across worker threads.
    pub fn evaluate_parallel(
        observations: &[Observation],
        parameters: &IrrigationParameters,
        workers: usize,
    ) -> Self {
        let workers = workers.max(1);
        if workers == 1 || observations.len() < workers * 2 {
            return Self::evaluate(observations, parameters);
        }

        let chunk_size = observations.len().div_ceil(workers);
        let rows = std::thread::scope(|scope| {
            let handles: Vec<_> = observations
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|obs| ScheduleRow {
                                observation: *obs,
                                decision: decide(obs, parameters),
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            // Joining in spawn order keeps rows in input order
            let mut rows = Vec::with_capacity(observations.len());
            for handle in handles {
                match handle.join() {
                    Ok(chunk_rows) => rows.extend(chunk_rows),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            rows
        });

        tracing::debug!(rows = rows.len(), workers, "Evaluated irrigation schedule in parallel");

        Self {
            parameters: *parameters,
            rows,
        }
    }

    /// Sequential for typical series, parallel across available cores for large ones.
    pub fn evaluate_auto(observations: &[Observation], parameters: &IrrigationParameters) -> Self {
        if observations.len() < PARALLEL_MIN_ROWS {
            return Self::evaluate(observations, parameters);
        }
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::evaluate_parallel(observations, parameters, workers)
    }

    /// Re-run the evaluation with new parameters over the same observations.
    pub fn reevaluate(&self, parameters: &IrrigationParameters) -> Self {
        let observations: Vec<Observation> = self.rows.iter().map(|r| r.observation).collect();
        Self::evaluate(&observations, parameters)
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_rows(&self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkipReason;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn sample_observations() -> Vec<Observation> {
        vec![
            Observation::new(start(), 25.0, 4.2, 0.5),
            Observation::new(start() + Duration::days(1), 27.0, 3.9, 3.0),
            Observation::new(start() + Duration::days(2), 24.0, 4.0, 1.5),
        ]
    }

    /// Deterministic pseudo-random series covering all three branches.
    fn synthetic_observations(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| {
                let moisture = 15.0 + ((i * 7) % 20) as f64;
                let et0 = 1.0 + ((i * 3) % 6) as f64 * 0.8;
                let rain = ((i * 5) % 9) as f64 * 0.4;
                Observation::new(start() + Duration::hours(i as i64 * 6), moisture, et0, rain)
            })
            .collect()
    }

    #[test]
    fn sample_series_matches_dashboard_output() {
        let schedule =
            IrrigationSchedule::evaluate(&sample_observations(), &IrrigationParameters::default());

        assert_eq!(schedule.len(), 3);
        let r = &schedule.rows;
        assert!(r[0].decision.irrigate);
        assert!((r[0].decision.etc - 4.83).abs() < 1e-9);
        assert!((r[0].decision.irrigation_mm - 4.33).abs() < 1e-9);
        assert!(!r[1].decision.irrigate);
        assert_eq!(r[1].decision.skip_reason, Some(SkipReason::SoilMoistureAdequate));
        assert!(r[2].decision.irrigate);
        assert!((r[2].decision.etc - 4.6).abs() < 1e-9);
        assert!((r[2].decision.irrigation_mm - 3.1).abs() < 1e-9);
    }

    #[test]
    fn output_preserves_input_order_and_length() {
        let observations = synthetic_observations(50);
        let schedule = IrrigationSchedule::evaluate(&observations, &IrrigationParameters::default());

        assert_eq!(schedule.len(), observations.len());
        for (row, obs) in schedule.rows.iter().zip(&observations) {
            assert_eq!(row.observation, *obs);
        }
    }

    #[test]
    fn permuted_input_yields_same_per_row_decisions() {
        let params = IrrigationParameters::default();
        let observations = synthetic_observations(40);
        let forward = IrrigationSchedule::evaluate(&observations, &params);

        let mut reversed_obs = observations.clone();
        reversed_obs.reverse();
        let reversed = IrrigationSchedule::evaluate(&reversed_obs, &params);

        for (i, row) in forward.rows.iter().enumerate() {
            let mirror = &reversed.rows[observations.len() - 1 - i];
            assert_eq!(row.observation, mirror.observation);
            assert_eq!(row.decision, mirror.decision);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let params = IrrigationParameters::default();
        let observations = synthetic_observations(1001);

        let sequential = IrrigationSchedule::evaluate(&observations, &params);
        for workers in [1, 2, 3, 8] {
            let parallel = IrrigationSchedule::evaluate_parallel(&observations, &params, workers);
            assert_eq!(parallel.rows, sequential.rows, "workers = {}", workers);
        }
    }

    #[test]
    fn auto_matches_sequential_above_parallel_cutoff() {
        let params = IrrigationParameters::default();
        let observations = synthetic_observations(PARALLEL_MIN_ROWS + 17);
        let auto = IrrigationSchedule::evaluate_auto(&observations, &params);
        let sequential = IrrigationSchedule::evaluate(&observations, &params);
        assert_eq!(auto.rows, sequential.rows);
    }

    #[test]
    fn parallel_with_tiny_input_falls_back() {
        let params = IrrigationParameters::default();
        let schedule = IrrigationSchedule::evaluate_parallel(&sample_observations(), &params, 16);
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn empty_series_produces_empty_schedule() {
        let schedule = IrrigationSchedule::evaluate(&[], &IrrigationParameters::default());
        assert!(schedule.is_empty());
        assert_eq!(schedule.summary().rows, 0);
    }

    #[test]
    fn reevaluate_applies_new_parameters() {
        let schedule =
            IrrigationSchedule::evaluate(&sample_observations(), &IrrigationParameters::default());

        // Raising field capacity to 40% moves the trigger to 28%, so day 2 irrigates
        // unless its 3.0 mm rain forecast blocks it, which it does.
        let wetter = IrrigationParameters::new(40.0, 1.15, 2.0);
        let updated = schedule.reevaluate(&wetter);
        assert_eq!(updated.parameters, wetter);
        assert_eq!(updated.rows[1].decision.skip_reason, Some(SkipReason::RainForecast));

        let lenient_rain = IrrigationParameters::new(40.0, 1.15, 5.0);
        let updated = schedule.reevaluate(&lenient_rain);
        assert!(updated.rows[1].decision.irrigate);
        // 3.9 * 1.15 - 3.0
        assert!((updated.rows[1].decision.irrigation_mm - 1.485).abs() < 1e-9);
    }

    #[test]
    fn summary_reflects_rows() {
        let schedule =
            IrrigationSchedule::evaluate(&sample_observations(), &IrrigationParameters::default());
        let summary = schedule.summary();
        assert_eq!(summary.irrigation_days, 2);
        assert_eq!(summary.skipped_wet, 1);
        assert!((summary.total_irrigation_mm - 7.43).abs() < 1e-9);
    }
}
