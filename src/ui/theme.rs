// LogViewer - ui/theme.rs
//
// Level colour palette and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::Level;
use egui::Color32;
use std::collections::BTreeMap;

/// Row background colour per level code.
///
/// Levels without an entry are drawn untinted.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPalette {
    colours: BTreeMap<String, Color32>,
}

impl Default for LevelPalette {
    fn default() -> Self {
        let colours = [
            (Level::Error, Color32::from_rgb(0xFF, 0x00, 0x00)),
            (Level::Warning, Color32::from_rgb(0xFF, 0xFF, 0x00)),
            (Level::Info, Color32::from_rgb(0xFF, 0xFF, 0xFF)),
            (Level::Notice, Color32::from_rgb(0xDD, 0xDD, 0xDD)),
            (Level::Debug, Color32::from_rgb(0xF0, 0xDD, 0xB6)),
        ]
        .into_iter()
        .map(|(level, colour)| (level.code().to_string(), colour))
        .collect();
        Self { colours }
    }
}

impl LevelPalette {
    /// Default palette with `[colours]` overrides from config applied.
    /// Override keys may also name levels outside the five known codes.
    pub fn with_overrides(overrides: &BTreeMap<String, [u8; 3]>) -> Self {
        let mut palette = Self::default();
        for (code, [r, g, b]) in overrides {
            palette
                .colours
                .insert(code.clone(), Color32::from_rgb(*r, *g, *b));
        }
        palette
    }

    /// Background colour for rows of `level`, if any.
    pub fn level_colour(&self, level: &Level) -> Option<Color32> {
        self.colours.get(level.code()).copied()
    }
}

/// Text colour on tinted rows.
pub const ROW_TEXT: Color32 = Color32::BLACK;

/// Colour for filter error text.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(220, 38, 38); // Red 600

/// Layout constants.
pub const DETAIL_PANE_HEIGHT: f32 = 140.0;
pub const ROW_PADDING: f32 = 6.0;
pub const FILTER_INPUT_WIDTH: f32 = 420.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = LevelPalette::default();
        assert_eq!(
            palette.level_colour(&Level::Error),
            Some(Color32::from_rgb(255, 0, 0))
        );
        assert_eq!(
            palette.level_colour(&Level::Debug),
            Some(Color32::from_rgb(0xF0, 0xDD, 0xB6))
        );
        assert_eq!(palette.level_colour(&Level::Other("T".into())), None);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let mut overrides = BTreeMap::new();
        overrides.insert("E".to_string(), [1, 2, 3]);
        overrides.insert("T".to_string(), [4, 5, 6]);
        let palette = LevelPalette::with_overrides(&overrides);
        assert_eq!(
            palette.level_colour(&Level::Error),
            Some(Color32::from_rgb(1, 2, 3))
        );
        assert_eq!(
            palette.level_colour(&Level::Other("T".into())),
            Some(Color32::from_rgb(4, 5, 6))
        );
        assert_eq!(
            palette.level_colour(&Level::Info),
            Some(Color32::from_rgb(255, 255, 255))
        );
    }
}
