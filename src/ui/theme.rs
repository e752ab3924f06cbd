//! Theme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::models::Level;
pub use crate::state::ThemeName;

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Brand Colors
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,

    // Semantic Colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Background Colors
    pub bg_dark: Color,
    pub bg_card: Color,
    pub bg_highlight: Color,

    // Text Colors
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Level Colors
    pub level_beginner: Color,
    pub level_intermediate: Color,
    pub level_advanced: Color,
}

/// Theme struct that holds colors and provides style methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Pastel => Self::pastel_colors(),
            ThemeName::Cupcake => Self::cupcake_colors(),
            ThemeName::Lofi => Self::lofi_colors(),
        };
        Self { name, colors }
    }

    fn pastel_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(209, 193, 215),     // Lavender
            secondary: Color::Rgb(246, 203, 209),   // Blush
            accent: Color::Rgb(180, 233, 214),      // Mint

            success: Color::Rgb(134, 239, 172),     // Green 300
            warning: Color::Rgb(253, 224, 71),      // Yellow 300
            error: Color::Rgb(252, 165, 165),       // Red 300
            info: Color::Rgb(147, 197, 253),        // Blue 300

            bg_dark: Color::Rgb(30, 27, 38),
            bg_card: Color::Rgb(43, 39, 54),
            bg_highlight: Color::Rgb(70, 63, 88),

            text: Color::Rgb(245, 243, 255),
            text_muted: Color::Rgb(196, 188, 214),
            text_dim: Color::Rgb(128, 120, 148),

            level_beginner: Color::Rgb(134, 239, 172),
            level_intermediate: Color::Rgb(253, 224, 71),
            level_advanced: Color::Rgb(252, 165, 165),
        }
    }

    fn cupcake_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(101, 195, 200),     // Teal
            secondary: Color::Rgb(239, 159, 188),   // Pink
            accent: Color::Rgb(238, 175, 58),       // Amber

            success: Color::Rgb(54, 211, 153),
            warning: Color::Rgb(251, 189, 35),
            error: Color::Rgb(248, 114, 114),
            info: Color::Rgb(58, 191, 248),

            bg_dark: Color::Rgb(41, 31, 38),
            bg_card: Color::Rgb(58, 45, 54),
            bg_highlight: Color::Rgb(88, 68, 82),

            text: Color::Rgb(250, 247, 245),
            text_muted: Color::Rgb(214, 200, 206),
            text_dim: Color::Rgb(150, 130, 140),

            level_beginner: Color::Rgb(54, 211, 153),
            level_intermediate: Color::Rgb(251, 189, 35),
            level_advanced: Color::Rgb(248, 114, 114),
        }
    }

    /// Lo-Fi - near monochrome
    fn lofi_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(230, 230, 230),
            secondary: Color::Rgb(180, 180, 180),
            accent: Color::Rgb(255, 255, 255),

            success: Color::Rgb(160, 220, 170),
            warning: Color::Rgb(220, 210, 150),
            error: Color::Rgb(230, 150, 150),
            info: Color::Rgb(170, 190, 220),

            bg_dark: Color::Rgb(12, 12, 12),
            bg_card: Color::Rgb(24, 24, 24),
            bg_highlight: Color::Rgb(52, 52, 52),

            text: Color::Rgb(240, 240, 240),
            text_muted: Color::Rgb(170, 170, 170),
            text_dim: Color::Rgb(100, 100, 100),

            level_beginner: Color::Rgb(200, 200, 200),
            level_intermediate: Color::Rgb(225, 225, 225),
            level_advanced: Color::Rgb(255, 255, 255),
        }
    }

    pub fn level_color(&self, level: Level) -> Color {
        match level {
            Level::Beginner => self.colors.level_beginner,
            Level::Intermediate => self.colors.level_intermediate,
            Level::Advanced => self.colors.level_advanced,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Styles
    // ══════════════════════════════════════════════════════════════════════

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle(&self) -> Style {
        Style::default()
            .fg(self.colors.text_muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.colors.bg_highlight)
            .fg(self.colors.text)
    }

    pub fn badge(&self) -> Style {
        Style::default()
            .fg(self.colors.bg_dark)
            .bg(self.colors.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn favorite(&self) -> Style {
        Style::default()
            .fg(self.colors.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bookmark(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn chat_user(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
    }

    pub fn chat_partner(&self) -> Style {
        Style::default()
            .fg(self.colors.secondary)
    }

    pub fn input(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.colors.accent)
        } else {
            Style::default().fg(self.colors.text_muted)
        }
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Icons
// ══════════════════════════════════════════════════════════════════════════

pub mod icons {
    pub const CHECK: &str = "✓";
    pub const CIRCLE: &str = "○";
    pub const STAR: &str = "★";
    pub const HEART: &str = "♥";
    pub const BOOKMARK: &str = "⚑";
    pub const CLOCK: &str = "⏱";
    pub const BOOK: &str = "📚";
    pub const MIC: &str = "🎤";
    pub const FIRE: &str = "🔥";
    pub const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];
}
