// LogViewer - ui/panels/toolbar.rs
//
// Open button, filter expression input, and filter history drop-down.
// Reports user actions as `ViewEvent`s; never mutates application state.

use crate::app::view::ViewEvent;
use crate::ui::theme;
use crate::util::constants::LOG_FILE_EXTENSIONS;
use std::path::Path;

/// Draw the toolbar and return the action the user took this frame, if any.
///
/// `filter_input` is the editable expression text; `history` is shown
/// newest first in the drop-down.
pub fn render(
    ui: &mut egui::Ui,
    filter_input: &mut String,
    history: &[String],
    filter_error: Option<&str>,
    start_dir: Option<&Path>,
) -> Option<ViewEvent> {
    let mut event = None;

    ui.horizontal(|ui| {
        if ui.button("Open\u{2026}").clicked() {
            event = pick_log_file(start_dir).map(ViewEvent::OpenRequested);
        }

        ui.separator();
        ui.label("Filter:");

        let response = ui.add(
            egui::TextEdit::singleline(filter_input)
                .desired_width(theme::FILTER_INPUT_WIDTH)
                .font(egui::TextStyle::Monospace)
                .hint_text("e.g. level == 'E' and text contains 'timeout'"),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Apply").clicked() || entered {
            event = Some(ViewEvent::FilterSubmitted(filter_input.clone()));
        }
        if ui
            .add_enabled(!filter_input.is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            filter_input.clear();
            event = Some(ViewEvent::FilterSubmitted(String::new()));
        }

        ui.add_enabled_ui(!history.is_empty(), |ui| {
            egui::ComboBox::from_id_salt("filter_history")
                .selected_text("History")
                .width(theme::FILTER_INPUT_WIDTH / 2.0)
                .show_ui(ui, |ui| {
                    for expression in history.iter().rev() {
                        if ui.selectable_label(false, expression).clicked() {
                            *filter_input = expression.clone();
                            event = Some(ViewEvent::FilterSubmitted(expression.clone()));
                        }
                    }
                });
        });
    });

    if let Some(err) = filter_error {
        ui.label(egui::RichText::new(err).color(theme::ERROR_TEXT).small());
    }

    event
}

/// Show the native open dialog.
pub fn pick_log_file(start_dir: Option<&Path>) -> Option<std::path::PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Log files", LOG_FILE_EXTENSIONS)
        .add_filter("All files", &["*"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}
