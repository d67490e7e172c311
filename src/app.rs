use crate::config::Config;
use crate::datasources;
use crate::error::{Result, SchedulerError};
use crate::export;
use crate::logic::IrrigationSchedule;
use crate::models::IrrigationParameters;
use crate::ui::screens::ParameterField;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Schedule,
    Chart,
    Parameters,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Schedule),
            '2' => Some(Screen::Chart),
            '3' | 's' | 'S' => Some(Screen::Parameters),
            _ => None,
        }
    }
}

pub struct ScheduleState {
    pub selected_index: usize,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

pub struct ParametersState {
    pub focused_field: ParameterField,
    pub editing: bool,
    pub edit_buffer: String,
}

impl ParametersState {
    pub fn new() -> Self {
        Self {
            focused_field: ParameterField::FieldCapacity,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn start_editing(&mut self, current_value: &str) {
        self.editing = true;
        self.edit_buffer = current_value.to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) -> String {
        self.editing = false;
        std::mem::take(&mut self.edit_buffer)
    }
}

/// Prompt for a data file path, opened with `o`.
pub struct OpenFileState {
    pub active: bool,
    pub buffer: String,
}

impl OpenFileState {
    pub fn new() -> Self {
        Self {
            active: false,
            buffer: String::new(),
        }
    }

    pub fn start(&mut self, current: Option<&PathBuf>) {
        self.active = true;
        self.buffer = current.map(|p| p.display().to_string()).unwrap_or_default();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.buffer.clear();
    }

    pub fn finish(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.buffer)
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,

    // Data
    pub parameters: IrrigationParameters,
    pub input_path: Option<PathBuf>,
    pub schedule: Option<IrrigationSchedule>,

    // Screen states
    pub schedule_state: ScheduleState,
    pub parameters_state: ParametersState,
    pub open_file_state: OpenFileState,

    // UI state
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl App {
    pub fn new(config: Config, parameters: IrrigationParameters) -> Self {
        Self {
            screen: Screen::Schedule,
            should_quit: false,
            config,
            parameters,
            input_path: None,
            schedule: None,
            schedule_state: ScheduleState::new(),
            parameters_state: ParametersState::new(),
            open_file_state: OpenFileState::new(),
            status_message: None,
            status_is_error: false,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, err: &SchedulerError) {
        tracing::warn!("{}", err);
        self.status_message = Some(err.to_string());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Whether a text field currently captures key presses.
    pub fn is_typing(&self) -> bool {
        self.parameters_state.editing || self.open_file_state.active
    }

    /// Load and evaluate a data file. On failure the previous schedule stays
    /// in place so the user can retry.
    pub fn load_file(&mut self, path: PathBuf) -> Result<()> {
        self.parameters.validate()?;
        let observations =
            datasources::load_input(Some(&path), self.config.input.sort_by_timestamp)?;
        let schedule = IrrigationSchedule::evaluate(&observations, &self.parameters);

        self.set_status(&format!(
            "Irrigation schedule generated successfully! ({} rows)",
            schedule.len()
        ));
        self.schedule = Some(schedule);
        self.input_path = Some(path);
        self.schedule_state = ScheduleState::new();
        Ok(())
    }

    /// Try to load a file, reporting the outcome in the status line.
    pub fn open(&mut self, path: PathBuf) {
        if let Err(e) = self.load_file(path) {
            self.set_error(&e);
        }
    }

    /// Apply an edited parameter value. Invalid input leaves the current
    /// parameters untouched.
    pub fn apply_parameter(&mut self, field: ParameterField, value: &str) -> Result<()> {
        let parsed: f64 = value.trim().parse().map_err(|_| SchedulerError::ParameterRange {
            name: field.key(),
            value: f64::NAN,
            reason: "must be a number",
        })?;

        let mut updated = self.parameters;
        match field {
            ParameterField::FieldCapacity => updated.field_capacity_percent = parsed,
            ParameterField::CropCoefficient => updated.crop_coefficient = parsed,
            ParameterField::RainThreshold => updated.rain_threshold_mm = parsed,
        }
        updated.validate()?;

        self.parameters = updated;
        self.recompute();
        self.set_status(&format!("{} set to {}", field.label(), parsed));
        Ok(())
    }

    pub fn recompute(&mut self) {
        let parameters = self.parameters;
        if let Some(schedule) = self.schedule.as_mut() {
            *schedule = schedule.reevaluate(&parameters);
        }
    }

    /// Write the current schedule to the configured export file.
    pub fn export(&mut self) -> Result<PathBuf> {
        let schedule = self.schedule.as_ref().ok_or(SchedulerError::MissingInput)?;
        let path = self.config.export.filename.clone();
        export::export_to_path(&schedule.rows, &path)?;
        self.set_status(&format!("Schedule exported to {}", path.display()));
        Ok(path)
    }

    /// Persist the current parameters into the config file at `path`.
    pub fn save_parameters(&mut self, path: &PathBuf) -> Result<()> {
        self.config.parameters = self.parameters;
        self.config.save(path)?;
        self.set_status(&format!("Parameters saved to {}", path.display()));
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.schedule.as_ref().map(|s| s.len()).unwrap_or(0)
    }
}
