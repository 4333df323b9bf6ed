// LogViewer - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Filter history loading
// 4. Optional startup file and filter
// 5. Console printing (--print) or eframe GUI launch

// Release builds on Windows have no console window. `--print` output there
// reaches only a redirected stdout (`logviewer --print app.log > out.txt`).
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can
// use `crate::app::...`, `crate::core::...` etc.
pub use logviewer::app;
pub use logviewer::core;
pub use logviewer::platform;
pub use logviewer::ui;
pub use logviewer::util;

use clap::Parser;
use std::path::PathBuf;

/// LogViewer - viewer for `DD.MM.YYYY HH:MM:SS [name:L:file:lineno] text` logs.
///
/// Opens a log file, colours rows by level, and narrows the view with
/// filter expressions such as `level <= 'W' and text contains 'timeout'`.
#[derive(Parser, Debug)]
#[command(name = "logviewer", version, about)]
struct Cli {
    /// Log file to open, or directory to start the open dialog in.
    path: Option<PathBuf>,

    /// Initial filter expression.
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Print the filtered records to stdout instead of opening the GUI.
    ///
    /// Windows release builds have no console; redirect stdout to a file or pipe.
    #[arg(long = "print")]
    print: bool,

    /// Filter history file (overrides config and platform default).
    #[arg(long = "history-file")]
    history_file: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its level can take part in the filter.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) =
        platform::config::load_config(&platform_paths.config_file());

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogViewer starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // History file: CLI override > config > platform default
    let history_path = cli
        .history_file
        .clone()
        .or_else(|| config.history_file.clone())
        .unwrap_or_else(|| platform_paths.history_file());
    let history = app::history::HistoryStore::load(Some(history_path));

    let mut state = app::state::AppState::new(history);

    let (open_path, start_dir) = match cli.path {
        Some(ref p) if p.is_dir() => (None, Some(p.clone())),
        Some(ref p) => (Some(p.clone()), p.parent().map(|d| d.to_path_buf())),
        None => (None, None),
    };

    if cli.print {
        std::process::exit(run_console(&mut state, open_path, cli.filter.as_deref()));
    }

    if let Some(ref path) = open_path {
        if let Err(e) = state.open_file(path) {
            tracing::error!(error = %e, "Cannot open startup file");
            state.status_message = e.to_string();
        }
    }
    if let Some(ref expression) = cli.filter {
        if let Err(e) = state.apply_filter(expression) {
            tracing::warn!(error = %e, "Startup filter rejected");
            state.status_message = format!("Filter error: {e}");
        }
    }

    // Opening a file resets warnings, so config warnings are added last.
    state.warnings.extend(config_warnings);

    let palette = ui::theme::LevelPalette::with_overrides(&config.colours);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(gui::window_title(state.store.source()))
            .with_inner_size(util::constants::DEFAULT_WINDOW_SIZE)
            .with_min_inner_size(util::constants::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let font_size = config.font_size;
    let dark_mode = config.dark_mode;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(gui::LogViewerApp::new(
                state, palette, font_size, dark_mode, start_dir,
            )))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogViewer GUI: {e}");
        std::process::exit(1);
    }
}

/// Print the filtered records of `path` to stdout. Returns the exit code.
fn run_console(
    state: &mut app::state::AppState,
    path: Option<PathBuf>,
    filter: Option<&str>,
) -> i32 {
    let Some(path) = path else {
        eprintln!("Error: --print needs a log file path");
        return 1;
    };

    if let Err(e) = state.open_file(&path) {
        eprintln!("Error: {e}");
        return 1;
    }
    if let Some(expression) = filter {
        if let Err(e) = state.apply_filter(expression) {
            eprintln!("Error: invalid filter: {e}");
            return 1;
        }
    }
    for warning in &state.warnings {
        tracing::warn!(warning = %warning, "Load warning");
    }

    let mut view = ui::console::ConsoleView::new(std::io::stdout().lock());
    state.refresh(&mut view);
    match view.finish() {
        Ok(_) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Cannot write to stdout");
            1
        }
    }
}
