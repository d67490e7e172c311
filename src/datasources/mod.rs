pub mod csv_file;

pub use csv_file::{load_observations, sort_by_timestamp};

use crate::error::{Result, SchedulerError};
use crate::models::Observation;
use std::path::Path;

/// Load the series for one run. No path is a `MissingInput` error, which the
/// caller surfaces as a prompt rather than a failure.
pub fn load_input(path: Option<&Path>, sort: bool) -> Result<Vec<Observation>> {
    let path = path.ok_or(SchedulerError::MissingInput)?;
    let mut observations = load_observations(path)?;
    if sort {
        sort_by_timestamp(&mut observations);
    }
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_is_missing_input() {
        assert!(matches!(
            load_input(None, false),
            Err(SchedulerError::MissingInput)
        ));
    }
}
