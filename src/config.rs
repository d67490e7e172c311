use crate::error::{Result, SchedulerError};
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::models::IrrigationParameters;
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub parameters: IrrigationParameters,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_filename")]
    pub filename: PathBuf,
}

fn default_export_filename() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_FILENAME)
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: default_export_filename(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InputConfig {
    /// Data file opened when none is given on the command line
    #[serde(default)]
    pub default_file: Option<PathBuf>,
    #[serde(default)]
    pub sort_by_timestamp: bool,
}

impl Config {
    /// Load from an explicit path, or from the first standard location that
    /// exists. Without any config file the built-in defaults apply.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(SchedulerError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SchedulerError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml(&config_str)?;
        tracing::debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        serde_yaml::from_str(&content)
            .map_err(|e| SchedulerError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in the working directory, then the XDG config directory.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("irrigation-scheduler").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/irrigation-scheduler/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SchedulerError::Config("Cannot determine config directory".into()))?
            .join("irrigation-scheduler");
        Ok(config_dir.join("config.yaml"))
    }

    /// Prompt for the irrigation parameters and write the config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive(current: &Config, target: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Irrigation Parameters");

        let field_capacity_percent: f64 = Input::new()
            .with_prompt("  Field Capacity (FC) [%]")
            .default(current.parameters.field_capacity_percent)
            .interact_text()
            .map_err(|e| SchedulerError::Config(format!("Input error: {}", e)))?;

        let crop_coefficient: f64 = Input::new()
            .with_prompt("  Crop Coefficient (Kc)")
            .default(current.parameters.crop_coefficient)
            .interact_text()
            .map_err(|e| SchedulerError::Config(format!("Input error: {}", e)))?;

        let rain_threshold_mm: f64 = Input::new()
            .with_prompt("  Rain Threshold (mm)")
            .default(current.parameters.rain_threshold_mm)
            .interact_text()
            .map_err(|e| SchedulerError::Config(format!("Input error: {}", e)))?;

        let parameters =
            IrrigationParameters::new(field_capacity_percent, crop_coefficient, rain_threshold_mm);
        parameters.validate()?;

        println!();
        println!("Export");
        let filename: String = Input::new()
            .with_prompt("  Schedule filename")
            .default(current.export.filename.display().to_string())
            .interact_text()
            .map_err(|e| SchedulerError::Config(format!("Input error: {}", e)))?;

        println!();
        println!("Input (leave blank to choose a file each run)");
        let default_file: String = Input::new()
            .with_prompt("  Default data file")
            .default(
                current
                    .input
                    .default_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            )
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SchedulerError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            parameters,
            export: ExportConfig {
                filename: PathBuf::from(filename),
            },
            input: InputConfig {
                default_file: if default_file.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(default_file))
                },
                sort_by_timestamp: current.input.sort_by_timestamp,
            },
        };

        let config_path = match target {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        config.save(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SchedulerError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# Irrigation Scheduler Configuration\n# Generated by `irrigation-scheduler init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_yaml_parses() {
        let yaml = r#"
parameters:
  field_capacity_percent: 40.0
  crop_coefficient: 0.95
  rain_threshold_mm: 3.5
export:
  filename: out/schedule.csv
input:
  default_file: data/t2.csv
  sort_by_timestamp: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.parameters, IrrigationParameters::new(40.0, 0.95, 3.5));
        assert_eq!(config.export.filename, PathBuf::from("out/schedule.csv"));
        assert_eq!(config.input.default_file, Some(PathBuf::from("data/t2.csv")));
        assert!(config.input.sort_by_timestamp);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::from_yaml("input:\n  sort_by_timestamp: true\n").unwrap();
        assert_eq!(config.parameters, IrrigationParameters::default());
        assert_eq!(
            config.export.filename,
            PathBuf::from("T2_irrigation_schedule.csv")
        );
        assert!(config.input.default_file.is_none());
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let result = Config::from_yaml("parameters: [not, a, map]");
        assert!(matches!(result, Err(SchedulerError::Config(_))));
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("IRRIGATION_TEST_DATA_FILE", "/srv/t2/sensors.csv");
        let config =
            Config::from_yaml("input:\n  default_file: ${IRRIGATION_TEST_DATA_FILE}\n").unwrap();
        assert_eq!(
            config.input.default_file,
            Some(PathBuf::from("/srv/t2/sensors.csv"))
        );
    }

    #[test]
    fn unknown_env_vars_are_left_alone() {
        let out = Config::substitute_env_vars("path: ${IRRIGATION_TEST_UNSET_VAR_XYZ}");
        assert_eq!(out, "path: ${IRRIGATION_TEST_UNSET_VAR_XYZ}");
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let path = PathBuf::from("/nonexistent/irrigation/config.yaml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(SchedulerError::Config(_))
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("irrigation-config-{}", std::process::id()));
        let path = dir.join("config.yaml");
        let mut config = Config::default();
        config.parameters.crop_coefficient = 0.85;
        config.input.default_file = Some(PathBuf::from("data.csv"));

        config.save(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, config);
    }
}
