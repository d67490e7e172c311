use crate::error::{Result, SchedulerError};
use crate::models::Observation;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_SOIL_MOISTURE: &str = "soil_moisture";
pub const COL_ET0: &str = "ET0";
pub const COL_FORECAST_RAIN: &str = "forecast_rain";

const REQUIRED_COLUMNS: [&str; 4] = [COL_TIMESTAMP, COL_SOIL_MOISTURE, COL_ET0, COL_FORECAST_RAIN];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Column positions of the required fields within a header row.
struct ColumnIndex {
    timestamp: usize,
    soil_moisture: usize,
    et0: usize,
    forecast_rain: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SchedulerError::MalformedRow {
                    line: 1,
                    field: name.to_string(),
                    value: "<missing column>".to_string(),
                })
        };

        Ok(Self {
            timestamp: find(COL_TIMESTAMP)?,
            soil_moisture: find(COL_SOIL_MOISTURE)?,
            et0: find(COL_ET0)?,
            forecast_rain: find(COL_FORECAST_RAIN)?,
        })
    }
}

/// Load observations from a CSV file on disk, in file order.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path)?;
    let observations = read_observations(file)?;
    tracing::info!(
        path = %path.display(),
        rows = observations.len(),
        "Loaded sensor and weather data"
    );
    Ok(observations)
}

/// Parse observations from any CSV source. Stops at the first malformed row.
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(rdr.headers().map_err(record_error)?)?;

    let mut observations = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(record_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        observations.push(parse_record(&record, &columns, line)?);
    }

    Ok(observations)
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnIndex, line: u64) -> Result<Observation> {
    let raw_ts = field(record, columns.timestamp, COL_TIMESTAMP, line)?;
    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| malformed(line, COL_TIMESTAMP, raw_ts))?;

    Ok(Observation::new(
        timestamp,
        number(record, columns.soil_moisture, COL_SOIL_MOISTURE, line)?,
        number(record, columns.et0, COL_ET0, line)?,
        number(record, columns.forecast_rain, COL_FORECAST_RAIN, line)?,
    ))
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(value) => Err(malformed(line, name, value)),
        None => Err(malformed(line, name, "")),
    }
}

// Blank and non-finite values are errors; never coerce them to zero
fn number(record: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<f64> {
    let raw = field(record, index, name, line)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(malformed(line, name, raw)),
    }
}

// Reader errors tied to a position in the file (bad UTF-8, etc.) are row errors
fn record_error(err: csv::Error) -> SchedulerError {
    match err.position() {
        Some(pos) if !err.is_io_error() => SchedulerError::MalformedRow {
            line: pos.line(),
            field: "<record>".to_string(),
            value: err.to_string(),
        },
        _ => err.into(),
    }
}

fn malformed(line: u64, field: &str, value: &str) -> SchedulerError {
    SchedulerError::MalformedRow {
        line,
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Parse the timestamp formats seen in sensor exports. RFC 3339 values keep
/// their wall-clock time; date-only values map to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Stable sort, so rows sharing a timestamp keep their file order.
pub fn sort_by_timestamp(observations: &mut [Observation]) {
    observations.sort_by_key(|o| o.timestamp);
}

pub fn required_columns() -> &'static [&'static str] {
    &REQUIRED_COLUMNS
}
