use crate::error::Result;
use crate::logic::IrrigationSchedule;
use crate::models::ScheduleRow;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_EXPORT_FILENAME: &str = "T2_irrigation_schedule.csv";

const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the downloadable schedule: the input columns followed by the
/// decision columns.
#[derive(Debug, Serialize)]
struct ExportRecord {
    timestamp: String,
    soil_moisture: f64,
    #[serde(rename = "ET0")]
    et0: f64,
    forecast_rain: f64,
    irrigate: bool,
    #[serde(rename = "ETc")]
    etc: f64,
    irrigation_mm: f64,
}

impl From<&ScheduleRow> for ExportRecord {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            timestamp: row
                .observation
                .timestamp
                .format(EXPORT_TIMESTAMP_FORMAT)
                .to_string(),
            soil_moisture: row.observation.soil_moisture,
            et0: row.observation.et0,
            forecast_rain: row.observation.forecast_rain,
            irrigate: row.decision.irrigate,
            etc: row.decision.etc,
            irrigation_mm: row.decision.irrigation_mm,
        }
    }
}

pub fn write_csv<W: Write>(rows: &[ScheduleRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // serialize() only emits the header alongside the first record
        wtr.write_record([
            "timestamp",
            "soil_moisture",
            "ET0",
            "forecast_rain",
            "irrigate",
            "ETc",
            "irrigation_mm",
        ])?;
    }
    for row in rows {
        wtr.serialize(ExportRecord::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_to_string(rows: &[ScheduleRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

pub fn export_to_path(rows: &[ScheduleRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Exported irrigation schedule");
    Ok(())
}

pub fn export_to_json(schedule: &IrrigationSchedule) -> Result<String> {
    Ok(serde_json::to_string_pretty(schedule)?)
}

/// Fixed-width text table for terminal output.
pub fn format_table(rows: &[ScheduleRow]) -> String {
    let mut out = format!(
        "{:<19}  {:>13}  {:>6}  {:>13}  {:>8}  {:>6}  {:>13}\n",
        "timestamp", "soil_moisture", "ET0", "forecast_rain", "irrigate", "ETc", "irrigation_mm"
    );
    for row in rows {
        let obs = &row.observation;
        let d = &row.decision;
        out.push_str(&format!(
            "{:<19}  {:>13.1}  {:>6.2}  {:>13.2}  {:>8}  {:>6.2}  {:>13.2}\n",
            obs.timestamp.format("%Y-%m-%d %H:%M"),
            obs.soil_moisture,
            obs.et0,
            obs.forecast_rain,
            d.irrigate,
            d.etc,
            d.irrigation_mm
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::csv_file::read_observations;
    use crate::models::IrrigationParameters;

    const SAMPLE: &str = "timestamp,soil_moisture,ET0,forecast_rain
2025-06-01 06:00,25,4.2,0.5
2025-06-02 06:00,27,3.9,3.0
2025-06-03 06:00,24,4.0,1.5
";

    fn schedule() -> IrrigationSchedule {
        let obs = read_observations(SAMPLE.as_bytes()).unwrap();
        IrrigationSchedule::evaluate(&obs, &IrrigationParameters::default())
    }

    #[test]
    fn csv_has_decorated_header_and_rows_in_order() {
        let csv = export_to_string(&schedule().rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "timestamp,soil_moisture,ET0,forecast_rain,irrigate,ETc,irrigation_mm"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2025-06-01 06:00:00,25.0,4.2,0.5,true,"));
        assert_eq!(lines[2], "2025-06-02 06:00:00,27.0,3.9,3.0,false,0.0,0.0");
        assert!(lines[3].starts_with("2025-06-03 06:00:00,24.0,4.0,1.5,true,"));
    }

    #[test]
    fn exported_csv_reads_back_as_input() {
        let csv = export_to_string(&schedule().rows).unwrap();
        let obs = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[1].et0, 3.9);
    }

    #[test]
    fn empty_schedule_still_has_header() {
        let csv = export_to_string(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "timestamp,soil_moisture,ET0,forecast_rain,irrigate,ETc,irrigation_mm"
        );
    }

    #[test]
    fn export_to_path_writes_file() {
        let dir = std::env::temp_dir().join(format!("irrigation-export-{}", std::process::id()));
        let path = dir.join(DEFAULT_EXPORT_FILENAME);
        export_to_path(&schedule().rows, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn json_includes_parameters_and_rows() {
        let json = export_to_json(&schedule()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parameters"]["crop_coefficient"], 1.15);
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["rows"][0]["decision"]["irrigate"], true);
    }

    #[test]
    fn table_lists_every_row() {
        let table = format_table(&schedule().rows);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("2025-06-02 06:00"));
        assert!(table.contains("false"));
    }
}
