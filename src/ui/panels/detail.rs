// LogViewer - ui/panels/detail.rs
//
// Detail pane showing every field of the selected record.

use crate::core::model::LogRecord;
use crate::util::constants::TIMESTAMP_FORMAT;

/// Render the detail pane (bottom panel).
pub fn render(ui: &mut egui::Ui, record: Option<&LogRecord>) {
    let Some(record) = record else {
        ui.centered_and_justified(|ui| {
            ui.label("Select a record to view details.");
        });
        return;
    };

    egui::Grid::new("detail_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Date:");
            ui.label(record.timestamp.format(TIMESTAMP_FORMAT).to_string());
            ui.end_row();

            ui.label("Level:");
            ui.label(format!("{} ({})", record.level.label(), record.level.code()));
            ui.end_row();

            ui.label("Name:");
            ui.label(&record.name);
            ui.end_row();

            ui.label("Source:");
            ui.label(format!("{}:{}", record.file, record.line_number));
            ui.end_row();
        });

    ui.separator();
    egui::ScrollArea::vertical()
        .max_height(ui.available_height())
        .show(ui, |ui| {
            ui.add(egui::Label::new(egui::RichText::new(&record.message).monospace()).selectable(true));
        });
}
