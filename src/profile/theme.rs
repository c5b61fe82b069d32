use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Reads a stored theme; anything unrecognised falls back to dark.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Colors the client applies for a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub theme: Theme,
    pub background: &'static str,
    pub surface: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub accent: &'static str,
    pub error: &'static str,
}

impl Palette {
    /// Single place where theme-dependent styling is resolved.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                theme,
                background: "#121212",
                surface: "#1E1E1E",
                border: "#333333",
                text: "#FFFFFF",
                muted_text: "#A1A1A1",
                accent: "#BB86FC",
                error: "#FF0000",
            },
            Theme::Light => Self {
                theme,
                background: "#F5F5F5",
                surface: "#FFFFFF",
                border: "#BBBBBB",
                text: "#000000",
                muted_text: "#555555",
                accent: "#A020F0",
                error: "#FF0000",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_to_dark() {
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse(" LIGHT "), Theme::Light);
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("sepia"), Theme::Dark);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for t in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(t.as_str()), t);
        }
    }

    #[test]
    fn palettes_differ_where_it_matters() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_eq!(dark.background, "#121212");
        assert_eq!(light.background, "#F5F5F5");
        assert_ne!(dark.text, light.text);
        assert_eq!(dark.theme, Theme::Dark);
    }

    #[test]
    fn theme_deserializes_lowercase() {
        let t: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(t, Theme::Light);
        assert!(serde_json::from_str::<Theme>("\"blue\"").is_err());
    }
}
