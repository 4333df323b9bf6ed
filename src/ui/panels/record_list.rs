// LogViewer - ui/panels/record_list.rs
//
// Virtual-scrolling list of the visible records.
//
// `RecordList` is the egui rendering backend: `AppState` pushes rows into it
// through `RecordView::render_list`, and `show` draws them each frame with
// `ScrollArea::show_rows`, so only rows in the viewport are laid out.
// Row `i` corresponds to `AppState::filtered_indices[i]`.

use crate::app::view::RecordView;
use crate::core::model::{Level, LogRecord};
use crate::ui::theme::{self, LevelPalette};

#[derive(Debug, Clone)]
struct Row {
    text: String,
    level: Level,
}

/// Cached rows of the record list.
#[derive(Debug, Default)]
pub struct RecordList {
    rows: Vec<Row>,
    has_source: bool,
}

impl RecordView for RecordList {
    fn render_list(&mut self, records: &[&LogRecord]) {
        self.rows = records
            .iter()
            .map(|r| Row {
                text: r.display_text(),
                level: r.level.clone(),
            })
            .collect();
    }
}

impl RecordList {
    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record whether a file has been loaded, for the empty-list hint.
    pub fn set_has_source(&mut self, has_source: bool) {
        self.has_source = has_source;
    }

    /// Draw the rows. Clicking a row updates `selected`.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        palette: &LevelPalette,
        font_size: f32,
        selected: &mut Option<usize>,
    ) {
        if self.rows.is_empty() {
            ui.centered_and_justified(|ui| {
                if self.has_source {
                    ui.label("No records match the current filter.");
                } else {
                    ui.label("No log file loaded.\nOpen one via File \u{2192} Open\u{2026}");
                }
            });
            return;
        }

        let font = egui::FontId::monospace(font_size);
        let row_height = font_size + theme::ROW_PADDING;

        egui::ScrollArea::both()
            .auto_shrink([false; 2])
            .show_rows(ui, row_height, self.rows.len(), |ui, row_range| {
                for idx in row_range {
                    let Some(row) = self.rows.get(idx) else {
                        continue;
                    };
                    let is_selected = *selected == Some(idx);

                    let mut text = egui::RichText::new(&row.text).font(font.clone());
                    if let Some(bg) = palette.level_colour(&row.level) {
                        let rect = egui::Rect::from_min_size(
                            ui.cursor().min,
                            egui::vec2(ui.available_width(), row_height),
                        );
                        ui.painter().rect_filled(rect, 0.0, bg);
                        text = text.color(theme::ROW_TEXT);
                    }

                    let response = ui
                        .add_sized(
                            [ui.available_width(), row_height],
                            egui::SelectableLabel::new(is_selected, text),
                        )
                        .on_hover_text(row.level.label());
                    if response.clicked() {
                        *selected = Some(idx);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_line;

    #[test]
    fn test_render_list_caches_display_rows() {
        let a = parse_line("01.02.2023 10:00:00 [A:E:a.cpp:1] boom")
            .unwrap()
            .unwrap();
        let b = parse_line("01.02.2023 10:00:05 [A:X:a.cpp:2] odd level")
            .unwrap()
            .unwrap();
        let mut list = RecordList::default();
        list.render_list(&[&a, &b]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.rows[0].text, "10:00:00 boom");
        assert_eq!(list.rows[1].level, Level::Other("X".into()));

        list.render_list(&[]);
        assert!(list.is_empty());
    }
}
