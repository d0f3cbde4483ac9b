use std::{fmt::Display, str::FromStr};

use smart_default::SmartDefault;

pub const AVAILABLE_FONTS: &[&str] = &["Arial", "Verdana", "Times New Roman", "Calibri", "Helvetica"];
const FALLBACK_FONT: &str = "Arial";

/// When a book name or chapter number gets drawn over the verses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum DisplayPolicy {
    /// On every slide
    Always,
    /// On a new slide, and whenever the chapter changes
    #[default]
    FirstOfChapter,
    /// On a new slide, and whenever the book changes
    FirstOfBook,
}

impl DisplayPolicy {
    /// Whether this policy asks for a header, given what changed since the last one
    pub fn fires(self, new_slide: bool, book_changed: bool, chapter_changed: bool) -> bool {
        match self {
            DisplayPolicy::Always => true,
            DisplayPolicy::FirstOfBook => new_slide || book_changed,
            DisplayPolicy::FirstOfChapter => new_slide || book_changed || chapter_changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleSlide {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtitle: Option<String>,
}

impl TitleSlide {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, SmartDefault)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LayoutOptions {
    /// Line budget of a content slide, `0` meaning unlimited
    pub max_lines_per_slide: usize,
    pub show_book_name_on_slide: DisplayPolicy,
    pub show_chapter_number_on_slide: DisplayPolicy,
    pub split_chapters_into_files: bool,
    #[default = "defaultLight"]
    pub theme_name: String,
    #[default = "Arial"]
    pub body_font: String,
    #[default = "Arial"]
    pub title_font: String,
    #[default = "Arial"]
    pub slide_number_font: String,
    #[default = 10]
    pub slide_number_font_size: u32,
    pub title_slide: Option<TitleSlide>,
}

impl LayoutOptions {
    /// Theme to render with, falling back to the default one for unknown names
    pub fn theme(&self) -> Theme {
        self.theme_name.parse().unwrap_or_else(|_| {
            log::warn!(
                "unknown theme '{}', using '{}'",
                self.theme_name,
                Theme::default()
            );
            Theme::default()
        })
    }

    pub fn body_font(&self) -> &str {
        resolve_font(&self.body_font)
    }

    pub fn title_font(&self) -> &str {
        resolve_font(&self.title_font)
    }

    pub fn slide_number_font(&self) -> &str {
        resolve_font(&self.slide_number_font)
    }
}

fn resolve_font(font: &str) -> &str {
    if AVAILABLE_FONTS.contains(&font) {
        font
    } else {
        log::warn!("font '{font}' is not available, using '{FALLBACK_FONT}'");
        FALLBACK_FONT
    }
}

/// Color scheme of a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    DefaultLight,
    DefaultDark,
    ThemeBlue,
}

/// Colors as `RRGGBB` hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::DefaultLight, Theme::DefaultDark, Theme::ThemeBlue];

    pub fn name(self) -> &'static str {
        match self {
            Theme::DefaultLight => "defaultLight",
            Theme::DefaultDark => "defaultDark",
            Theme::ThemeBlue => "themeBlue",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::DefaultLight => Palette {
                background: "FFFFFF",
                text: "000000",
                muted: "666666",
            },
            Theme::DefaultDark => Palette {
                background: "1E1E1E",
                text: "F2F2F2",
                muted: "A6A6A6",
            },
            Theme::ThemeBlue => Palette {
                background: "1F3864",
                text: "FFFFFF",
                muted: "B4C7E7",
            },
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("Unknown theme '{}'", .0)]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == s)
            .ok_or_else(|| UnknownTheme(s.to_owned()))
    }
}
