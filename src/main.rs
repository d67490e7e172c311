mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod export;
mod logic;
mod models;
mod ui;

use app::{App, Screen};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::{Result, SchedulerError};
use logic::IrrigationSchedule;
use models::IrrigationParameters;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{ChartScreen, ParametersScreen, ScheduleScreen};

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Load configuration
    let config = match Config::load(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run `irrigation-scheduler init` to create a configuration.");
            std::process::exit(1);
        }
    };

    let parameters = config.parameters.with_overrides(
        cli.field_capacity,
        cli.crop_coefficient,
        cli.rain_threshold,
    );

    let result = match cli.command {
        None => run_dashboard(config, parameters, None, cli.config),
        Some(Commands::Dashboard { input }) => {
            run_dashboard(config, parameters, input, cli.config)
        }
        Some(Commands::Schedule {
            input,
            format,
            sort,
        }) => run_schedule(&config, &parameters, input, format, sort),
        Some(Commands::Export {
            input,
            output,
            sort,
        }) => run_export(&config, &parameters, input, output, sort),
        Some(Commands::Check { input }) => run_check(&config, &parameters, input),
        Some(Commands::Init) => {
            Config::setup_interactive(&config, cli.config.as_ref()).map(|_| ())
        }
    };

    if let Err(e) = result {
        match e {
            SchedulerError::MissingInput => {
                eprintln!("Please upload your sensor and weather data file to proceed.");
                eprintln!("Pass a .csv path or set input.default_file in config.yaml.");
            }
            other if other.is_recoverable() => {
                eprintln!("Error: {}", other);
                eprintln!("Correct the input or parameters and run again.");
            }
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(1);
    }
}

/// Observations for a non-interactive command: CLI path first, then the configured default.
fn load_for_command(
    config: &Config,
    parameters: &IrrigationParameters,
    input: Option<PathBuf>,
    sort: bool,
) -> Result<IrrigationSchedule> {
    parameters.validate()?;
    let path = input.or_else(|| config.input.default_file.clone());
    let observations = datasources::load_input(
        path.as_deref(),
        sort || config.input.sort_by_timestamp,
    )?;
    Ok(IrrigationSchedule::evaluate_auto(&observations, parameters))
}

fn run_schedule(
    config: &Config,
    parameters: &IrrigationParameters,
    input: Option<PathBuf>,
    format: OutputFormat,
    sort: bool,
) -> Result<()> {
    let schedule = load_for_command(config, parameters, input, sort)?;

    match format {
        OutputFormat::Table => {
            print!("{}", export::format_table(&schedule.rows));
            let summary = schedule.summary();
            println!();
            println!(
                "Trigger threshold {:.2}% | {} of {} rows irrigate | total {:.2} mm",
                parameters.trigger_threshold(),
                summary.irrigation_days,
                summary.rows,
                summary.total_irrigation_mm
            );
        }
        OutputFormat::Csv => print!("{}", export::export_to_string(&schedule.rows)?),
        OutputFormat::Json => println!("{}", export::export_to_json(&schedule)?),
    }

    Ok(())
}

fn run_export(
    config: &Config,
    parameters: &IrrigationParameters,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    sort: bool,
) -> Result<()> {
    let schedule = load_for_command(config, parameters, input, sort)?;
    let output = output.unwrap_or_else(|| config.export.filename.clone());
    export::export_to_path(&schedule.rows, &output)?;
    println!(
        "Irrigation schedule ({} rows) written to {}",
        schedule.len(),
        output.display()
    );
    Ok(())
}

fn run_check(
    config: &Config,
    parameters: &IrrigationParameters,
    input: Option<PathBuf>,
) -> Result<()> {
    parameters.validate()?;
    println!("Parameters: OK");
    println!(
        "  Field capacity      {:.2} %",
        parameters.field_capacity_percent
    );
    println!(
        "  Trigger threshold   {:.2} %",
        parameters.trigger_threshold()
    );
    println!("  Crop coefficient    {:.2}", parameters.crop_coefficient);
    println!("  Rain threshold      {:.2} mm", parameters.rain_threshold_mm);
    println!("Export file: {}", config.export.filename.display());

    let path = input.or_else(|| config.input.default_file.clone());
    match path {
        Some(path) => {
            let observations = datasources::load_observations(&path)?;
            let schedule = IrrigationSchedule::evaluate(&observations, parameters);
            let summary = schedule.summary();
            println!("Data file: OK ({})", path.display());
            println!("  Rows                {}", summary.rows);
            if let (Some(first), Some(last)) = (summary.first_timestamp, summary.last_timestamp) {
                println!("  Range               {} .. {}", first, last);
            }
            println!("  Irrigation rows     {}", summary.irrigation_days);
        }
        None => println!(
            "Data file: not given (expected columns: {})",
            datasources::csv_file::required_columns().join(", ")
        ),
    }

    Ok(())
}

fn run_dashboard(
    config: Config,
    parameters: IrrigationParameters,
    input: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let initial_input = input.or_else(|| config.input.default_file.clone());
    let mut app = App::new(config, parameters);

    if let Err(e) = app.parameters.validate() {
        app.set_error(&e);
        app.switch_screen(Screen::Parameters);
    } else {
        match initial_input {
            Some(path) => app.open(path),
            None => app.set_status("No data loaded - press [o] to open a .csv file"),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, config_path.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config_path: Option<&PathBuf>,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| {
            let area = f.area();
            let status = app.status_message.as_deref();

            match app.screen {
                Screen::Schedule => {
                    let open_prompt = app
                        .open_file_state
                        .active
                        .then_some(app.open_file_state.buffer.as_str());
                    let screen = ScheduleScreen::new(app.schedule.as_ref())
                        .with_input(app.input_path.as_deref())
                        .with_selection(app.schedule_state.selected_index)
                        .with_status(status, app.status_is_error)
                        .with_open_prompt(open_prompt);
                    f.render_widget(screen, area);
                }
                Screen::Chart => {
                    f.render_widget(ChartScreen::new(app.schedule.as_ref()), area);
                }
                Screen::Parameters => {
                    let screen = ParametersScreen::new(&app.parameters)
                        .with_focus(app.parameters_state.focused_field)
                        .editing(
                            app.parameters_state.editing,
                            &app.parameters_state.edit_buffer,
                        )
                        .with_status(status, app.status_is_error);
                    f.render_widget(screen, area);
                }
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.quit();
                } else if app.is_typing() {
                    // Text fields capture every key until Enter or Esc
                    if app.open_file_state.active {
                        handle_open_file_input(app, key.code);
                    } else {
                        handle_parameters_input(app, key.code, key.modifiers, config_path);
                    }
                } else {
                    // Global key handling
                    match key.code {
                        _ if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            handle_screen_input(app, key.code, key.modifiers, config_path)
                        }
                        KeyCode::Char('q') => app.quit(),
                        KeyCode::Esc => app.switch_screen(Screen::Schedule),
                        KeyCode::Char('o') => {
                            app.switch_screen(Screen::Schedule);
                            app.clear_status();
                            app.open_file_state.start(app.input_path.as_ref());
                        }
                        KeyCode::Char('e') => {
                            if let Err(e) = app.export() {
                                app.set_error(&e);
                            }
                        }
                        KeyCode::Char(c) if Screen::from_key(c).is_some() => {
                            if let Some(screen) = Screen::from_key(c) {
                                app.switch_screen(screen);
                            }
                        }
                        _ => handle_screen_input(app, key.code, key.modifiers, config_path),
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config_path: Option<&PathBuf>,
) {
    match app.screen {
        Screen::Schedule => handle_schedule_input(app, code),
        Screen::Chart => {}
        Screen::Parameters => handle_parameters_input(app, code, modifiers, config_path),
    }
}

fn handle_schedule_input(app: &mut App, code: KeyCode) {
    let count = app.row_count();
    match code {
        KeyCode::Up => app.schedule_state.prev(),
        KeyCode::Down => app.schedule_state.next(count),
        KeyCode::Home => app.schedule_state.selected_index = 0,
        KeyCode::End => app.schedule_state.selected_index = count.saturating_sub(1),
        _ => {}
    }
}

fn handle_open_file_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.open_file_state.cancel(),
        KeyCode::Enter => {
            let value = app.open_file_state.finish();
            let value = value.trim();
            if value.is_empty() {
                app.set_error(&SchedulerError::MissingInput);
            } else {
                app.open(PathBuf::from(value));
            }
        }
        KeyCode::Backspace => {
            app.open_file_state.buffer.pop();
        }
        KeyCode::Char(c) => app.open_file_state.buffer.push(c),
        _ => {}
    }
}

fn handle_parameters_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config_path: Option<&PathBuf>,
) {
    if app.parameters_state.editing {
        // Editing mode
        match code {
            KeyCode::Esc => app.parameters_state.cancel_editing(),
            KeyCode::Enter => {
                let value = app.parameters_state.finish_editing();
                let field = app.parameters_state.focused_field;
                if let Err(e) = app.apply_parameter(field, &value) {
                    app.set_error(&e);
                }
            }
            KeyCode::Backspace => {
                app.parameters_state.edit_buffer.pop();
            }
            KeyCode::Char(c) => app.parameters_state.edit_buffer.push(c),
            _ => {}
        }
    } else {
        // Navigation mode
        match code {
            KeyCode::Up => app.parameters_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => app.parameters_state.next_field(),
            KeyCode::Enter => {
                let current = app.parameters_state.focused_field.value(&app.parameters);
                app.parameters_state.start_editing(&current.to_string());
            }
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                let path = match config_path {
                    Some(p) => Ok(p.clone()),
                    None => Config::default_config_path(),
                };
                if let Err(e) = path.and_then(|p| app.save_parameters(&p)) {
                    app.set_error(&e);
                }
            }
            _ => {}
        }
    }
}
