// LogViewer - gui.rs
//
// Top-level eframe::App implementation.
// Wires the toolbar, record list and detail pane to `AppState` through
// `ViewEvent`s.

use crate::app::state::AppState;
use crate::app::view::ViewEvent;
use crate::core::export;
use crate::core::model::LogRecord;
use crate::ui;
use crate::ui::panels::record_list::RecordList;
use crate::ui::theme::LevelPalette;
use crate::util::constants::{APP_NAME, APP_VERSION};
use crate::util::error::{ExportError, LogViewerError};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

/// The LogViewer application.
pub struct LogViewerApp {
    pub state: AppState,
    list: RecordList,
    palette: LevelPalette,
    font_size: f32,
    dark_mode: bool,
    /// Text in the filter input box.
    filter_input: String,
    /// Directory the open dialog starts in.
    start_dir: Option<PathBuf>,
}

impl LogViewerApp {
    /// Create the application. `state` may already hold a loaded file and an
    /// applied filter; the list is populated from it immediately.
    pub fn new(
        state: AppState,
        palette: LevelPalette,
        font_size: f32,
        dark_mode: bool,
        start_dir: Option<PathBuf>,
    ) -> Self {
        let mut list = RecordList::default();
        state.refresh(&mut list);
        list.set_has_source(state.store.source().is_some());
        let filter_input = state.filter().source().to_string();
        Self {
            state,
            list,
            palette,
            font_size,
            dark_mode,
            filter_input,
            start_dir,
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, event: ViewEvent) {
        let opening = matches!(event, ViewEvent::OpenRequested(_));
        if let ViewEvent::OpenRequested(ref path) = event {
            self.start_dir = path.parent().map(Path::to_path_buf);
        }
        match self.state.handle(event, &mut self.list) {
            Ok(()) if opening => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(window_title(
                    self.state.store.source(),
                )));
            }
            Ok(()) => {}
            Err(e) => tracing::warn!(error = %e, "Action failed"),
        }
        self.list.set_has_source(self.state.store.source().is_some());
    }

    fn export(&mut self, format: ExportFormat) {
        let (name, ext, default_name) = match format {
            ExportFormat::Csv => ("CSV", "csv", "export.csv"),
            ExportFormat::Json => ("JSON", "json", "export.json"),
        };
        let Some(dest) = rfd::FileDialog::new()
            .add_filter(name, &[ext])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };

        let records = self.state.visible_records();
        self.state.status_message = match write_export(&records, &dest, format) {
            Ok(n) => format!("Exported {n} records to {}.", dest.display()),
            Err(e) => {
                tracing::warn!(error = %e, format = name, "Export failed");
                e.to_string()
            }
        };
    }
}

/// `LogViewer v1.0.0`, followed by ` - <path>` once a file is open.
pub fn window_title(source: Option<&Path>) -> String {
    match source {
        Some(path) => format!("{APP_NAME} v{APP_VERSION} - {}", path.display()),
        None => format!("{APP_NAME} v{APP_VERSION}"),
    }
}

fn write_export(
    records: &[&LogRecord],
    dest: &Path,
    format: ExportFormat,
) -> Result<usize, LogViewerError> {
    let file = std::fs::File::create(dest).map_err(|e| ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let writer = BufWriter::new(file);
    let written = match format {
        ExportFormat::Csv => export::export_csv(records, writer, dest)?,
        ExportFormat::Json => export::export_json(records, writer, dest)?,
    };
    Ok(written)
}

impl eframe::App for LogViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut pending: Option<ViewEvent> = None;
        let mut export_request: Option<ExportFormat> = None;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open\u{2026}").clicked() {
                        pending = ui::panels::toolbar::pick_log_file(self.start_dir.as_deref())
                            .map(ViewEvent::OpenRequested);
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_rows = !self.list.is_empty();
                    ui.add_enabled_ui(has_rows, |ui| {
                        if ui.button("Export CSV\u{2026}").clicked() {
                            export_request = Some(ExportFormat::Csv);
                            ui.close_menu();
                        }
                        if ui.button("Export JSON\u{2026}").clicked() {
                            export_request = Some(ExportFormat::Json);
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.dark_mode, "Dark mode").changed() {
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(2.0);
            if let Some(event) = ui::panels::toolbar::render(
                ui,
                &mut self.filter_input,
                self.state.history.entries(),
                self.state.filter_error.as_deref(),
                self.start_dir.as_deref(),
            ) {
                pending = Some(event);
            }
            ui.add_space(2.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let total = self.state.store.len();
                    if total > 0 {
                        ui.label(format!("{}/{total} records", self.list.len()));
                    }
                    if !self.state.warnings.is_empty() {
                        ui.label(format!("{} warnings", self.state.warnings.len()))
                            .on_hover_ui(|ui| {
                                for w in self.state.warnings.iter().take(20) {
                                    ui.label(w);
                                }
                            });
                    }
                });
            });
        });

        // Detail pane (bottom)
        egui::TopBottomPanel::bottom("detail_pane")
            .resizable(true)
            .default_height(ui::theme::DETAIL_PANE_HEIGHT)
            .show(ctx, |ui| {
                ui::panels::detail::render(ui, self.state.selected_record());
            });

        // Central panel (record list)
        egui::CentralPanel::default().show(ctx, |ui| {
            self.list.show(
                ui,
                &self.palette,
                self.font_size,
                &mut self.state.selected_index,
            );
        });

        if let Some(event) = pending {
            self.dispatch(ctx, event);
        }
        if let Some(format) = export_request {
            self.export(format);
        }
    }
}
