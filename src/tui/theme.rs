//! Color palettes for the dashboard

use ratatui::prelude::*;

use crate::config::ThemeMode;
use crate::leads::Status;
use crate::scoring::Priority;

/// Terminal backgrounds brighter than this are treated as light
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Priority tiers
    pub hot: Color,
    pub warm: Color,
    pub cold: Color,

    // Pipeline stages
    pub status_new: Color,
    pub status_qualified: Color,
    pub status_contacted: Color,
    pub status_proposal: Color,
    pub status_won: Color,
    pub status_lost: Color,

    // Score and count bars
    pub bar_empty: Color,
    pub bar_filled: Color,

    // Table
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    pub muted: Color,
    pub title_color: Color,
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            hot: Color::Red,
            warm: Color::Yellow,
            cold: Color::Blue,
            status_new: Color::Magenta,
            status_qualified: Color::LightBlue,
            status_contacted: Color::Yellow,
            status_proposal: Color::Indexed(208),
            status_won: Color::Green,
            status_lost: Color::Red,
            bar_empty: Color::DarkGray,
            bar_filled: Color::Cyan,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            hot: Color::Rgb(185, 28, 28),
            warm: Color::Rgb(161, 98, 7),
            cold: Color::Rgb(29, 78, 216),
            status_new: Color::Rgb(126, 34, 206),
            status_qualified: Color::Rgb(29, 78, 216),
            status_contacted: Color::Rgb(161, 98, 7),
            status_proposal: Color::Rgb(194, 65, 12),
            status_won: Color::Rgb(21, 128, 61),
            status_lost: Color::Rgb(185, 28, 28),
            bar_empty: Color::Indexed(252),
            bar_filled: Color::Rgb(37, 99, 235),
            row_alt_bg: Color::Indexed(255),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(242),
            title_color: Color::Rgb(37, 99, 235),
            tab_active_style: Style::new().fg(Color::Rgb(37, 99, 235)).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(244)),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Rgb(37, 99, 235),
            flash_success: Color::Rgb(21, 128, 61),
            flash_error: Color::Rgb(185, 28, 28),
            popup_border: Color::Rgb(37, 99, 235),
            popup_title: Style::new().fg(Color::Rgb(37, 99, 235)).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Hot => self.hot,
            Priority::Warm => self.warm,
            Priority::Cold => self.cold,
        }
    }

    pub fn status_color(&self, status: &Status) -> Color {
        match status {
            Status::New => self.status_new,
            Status::Qualified => self.status_qualified,
            Status::Contacted => self.status_contacted,
            Status::Proposal => self.status_proposal,
            Status::Won => self.status_won,
            Status::Lost => self.status_lost,
            Status::Unknown(_) => self.muted,
        }
    }
}

/// Pick a palette. `Auto` queries the terminal background, so call this
/// before the terminal enters raw mode.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > LIGHT_LUMA_THRESHOLD => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!("Could not detect terminal background: {:?}", e);
                ThemeColors::dark()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_colors_follow_tiers() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.priority_color(Priority::Hot), Color::Red);
        assert_eq!(theme.priority_color(Priority::Warm), Color::Yellow);
        assert_eq!(theme.priority_color(Priority::Cold), Color::Blue);
    }

    #[test]
    fn test_unknown_status_is_muted() {
        let theme = ThemeColors::light();
        assert_eq!(
            theme.status_color(&Status::Unknown("paused".to_string())),
            theme.muted
        );
        assert_eq!(theme.status_color(&Status::Won), theme.status_won);
    }

    #[test]
    fn test_explicit_modes_skip_detection() {
        assert_eq!(resolve_theme(ThemeMode::Dark).hot, Color::Red);
        assert_eq!(
            resolve_theme(ThemeMode::Light).hot,
            ThemeColors::light().hot
        );
    }
}
