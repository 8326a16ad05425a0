//! Reading preferences stored in the `app_settings` table

use crate::error::ScriptureError;
use crate::store::UserStore;
use serde::{Deserialize, Serialize};

pub const FONT_SIZE_RANGE: (f32, f32) = (12.0, 42.0);
pub const LINE_HEIGHT_RANGE: (f32, f32) = (1.0, 2.0);

mod keys {
    pub const FONT_SIZE_SP: &str = "font_size_sp";
    pub const LINE_HEIGHT_MULTIPLIER: &str = "line_height_multiplier";
    pub const FONT_STYLE: &str = "font_style";
    pub const THEME_MODE: &str = "theme_mode";
    pub const TEXT_ALIGNMENT: &str = "text_alignment";
}

/// Unknown strings fall back to the default variant.
macro_rules! setting_enum {
    ($name:ident, default = $default:ident, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $(
                #[doc = $text]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn parse_or_default(value: &str) -> Self {
                match value {
                    $($text => $name::$variant,)+
                    other => {
                        tracing::warn!(value = other, "unknown {}, using default", stringify!($name));
                        $name::$default
                    }
                }
            }
        }
    };
}

setting_enum!(FontStyle, default = Serif, { Serif => "serif", Sans => "sans" });
setting_enum!(ThemeMode, default = System, { Light => "light", Dark => "dark", System => "system" });
setting_enum!(TextAlignment, default = Start, {
    Start => "start",
    Center => "center",
    Justify => "justify",
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingPreferences {
    pub font_size_sp: f32,
    pub line_height_multiplier: f32,
    pub font_style: FontStyle,
    pub theme_mode: ThemeMode,
    pub text_alignment: TextAlignment,
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self {
            font_size_sp: 18.0,
            line_height_multiplier: 1.3,
            font_style: FontStyle::Serif,
            theme_mode: ThemeMode::System,
            text_alignment: TextAlignment::Start,
        }
    }
}

fn clamp(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

impl UserStore {
    /// Stored preferences, with defaults for anything missing or unreadable.
    pub fn reading_preferences(&self) -> Result<ReadingPreferences, ScriptureError> {
        let defaults = ReadingPreferences::default();
        let float = |key: &str, default: f32| -> Result<f32, ScriptureError> {
            Ok(self
                .get_setting(key)?
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(default))
        };

        Ok(ReadingPreferences {
            font_size_sp: float(keys::FONT_SIZE_SP, defaults.font_size_sp)?,
            line_height_multiplier: float(
                keys::LINE_HEIGHT_MULTIPLIER,
                defaults.line_height_multiplier,
            )?,
            font_style: self
                .get_setting(keys::FONT_STYLE)?
                .map(|v| FontStyle::parse_or_default(&v))
                .unwrap_or(defaults.font_style),
            theme_mode: self
                .get_setting(keys::THEME_MODE)?
                .map(|v| ThemeMode::parse_or_default(&v))
                .unwrap_or(defaults.theme_mode),
            text_alignment: self
                .get_setting(keys::TEXT_ALIGNMENT)?
                .map(|v| TextAlignment::parse_or_default(&v))
                .unwrap_or(defaults.text_alignment),
        })
    }

    /// Stores the font size clamped to 12..=42 sp.
    pub fn update_font_size_sp(&self, value: f32) -> Result<(), ScriptureError> {
        self.set_setting(keys::FONT_SIZE_SP, &clamp(value, FONT_SIZE_RANGE).to_string())
    }

    /// Stores the line height clamped to 1.0..=2.0.
    pub fn update_line_height_multiplier(&self, value: f32) -> Result<(), ScriptureError> {
        self.set_setting(
            keys::LINE_HEIGHT_MULTIPLIER,
            &clamp(value, LINE_HEIGHT_RANGE).to_string(),
        )
    }

    pub fn update_font_style(&self, value: FontStyle) -> Result<(), ScriptureError> {
        self.set_setting(keys::FONT_STYLE, value.as_str())
    }

    pub fn update_theme_mode(&self, value: ThemeMode) -> Result<(), ScriptureError> {
        self.set_setting(keys::THEME_MODE, value.as_str())
    }

    pub fn update_text_alignment(&self, value: TextAlignment) -> Result<(), ScriptureError> {
        self.set_setting(keys::TEXT_ALIGNMENT, value.as_str())
    }

    pub fn reset_reading_preferences(&self) -> Result<(), ScriptureError> {
        let defaults = ReadingPreferences::default();
        self.update_font_size_sp(defaults.font_size_sp)?;
        self.update_line_height_multiplier(defaults.line_height_multiplier)?;
        self.update_font_style(defaults.font_style)?;
        self.update_theme_mode(defaults.theme_mode)?;
        self.update_text_alignment(defaults.text_alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let store = UserStore::open_in_memory().unwrap();
        assert_eq!(store.reading_preferences().unwrap(), ReadingPreferences::default());
    }

    #[test]
    fn test_updates_round_trip() {
        let store = UserStore::open_in_memory().unwrap();
        store.update_font_size_sp(24.0).unwrap();
        store.update_line_height_multiplier(1.5).unwrap();
        store.update_font_style(FontStyle::Sans).unwrap();
        store.update_theme_mode(ThemeMode::Dark).unwrap();
        store.update_text_alignment(TextAlignment::Justify).unwrap();

        let prefs = store.reading_preferences().unwrap();
        assert_eq!(prefs.font_size_sp, 24.0);
        assert_eq!(prefs.line_height_multiplier, 1.5);
        assert_eq!(prefs.font_style, FontStyle::Sans);
        assert_eq!(prefs.theme_mode, ThemeMode::Dark);
        assert_eq!(prefs.text_alignment, TextAlignment::Justify);
    }

    #[test]
    fn test_values_are_clamped() {
        let store = UserStore::open_in_memory().unwrap();
        store.update_font_size_sp(100.0).unwrap();
        store.update_line_height_multiplier(0.2).unwrap();

        let prefs = store.reading_preferences().unwrap();
        assert_eq!(prefs.font_size_sp, 42.0);
        assert_eq!(prefs.line_height_multiplier, 1.0);

        store.update_font_size_sp(f32::NAN).unwrap();
        assert_eq!(store.reading_preferences().unwrap().font_size_sp, 12.0);
    }

    #[test]
    fn test_unknown_stored_values_sanitized() {
        let store = UserStore::open_in_memory().unwrap();
        store.set_setting("theme_mode", "sepia").unwrap();
        store.set_setting("font_style", "mono").unwrap();
        store.set_setting("font_size_sp", "large").unwrap();

        let prefs = store.reading_preferences().unwrap();
        assert_eq!(prefs.theme_mode, ThemeMode::System);
        assert_eq!(prefs.font_style, FontStyle::Serif);
        assert_eq!(prefs.font_size_sp, 18.0);
    }

    #[test]
    fn test_reset() {
        let store = UserStore::open_in_memory().unwrap();
        store.update_theme_mode(ThemeMode::Light).unwrap();
        store.update_font_size_sp(30.0).unwrap();
        store.reset_reading_preferences().unwrap();

        assert_eq!(store.reading_preferences().unwrap(), ReadingPreferences::default());
    }

    #[test]
    fn test_enum_strings() {
        assert_eq!(TextAlignment::parse_or_default("center"), TextAlignment::Center);
        assert_eq!(TextAlignment::parse_or_default("left"), TextAlignment::Start);
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
        assert_eq!(serde_json::to_string(&FontStyle::Sans).unwrap(), "\"sans\"");
    }
}
