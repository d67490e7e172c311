use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("No sensor and weather data file supplied")]
    MissingInput,

    #[error("Malformed row at line {line}: field '{field}' has invalid value '{value}'")]
    MalformedRow {
        line: u64,
        field: String,
        value: String,
    },

    #[error("Parameter '{name}' out of range ({value}): {reason}")]
    ParameterRange {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    /// Errors the user can fix by supplying different input or parameters.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SchedulerError::MissingInput
                | SchedulerError::MalformedRow { .. }
                | SchedulerError::ParameterRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_row_names_line_and_field() {
        let err = SchedulerError::MalformedRow {
            line: 4,
            field: "ET0".to_string(),
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("'ET0'"));
        assert!(msg.contains("'n/a'"));
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(SchedulerError::MissingInput.is_recoverable());
        assert!(SchedulerError::ParameterRange {
            name: "crop_coefficient",
            value: -1.0,
            reason: "must be greater than zero",
        }
        .is_recoverable());
        assert!(!SchedulerError::Config("bad".into()).is_recoverable());
    }
}
