use egui::{Color32, FontFamily, FontId, Margin, Stroke, TextStyle};

use crate::notify::NoticeLevel;

pub const PANEL_FILL: Color32 = Color32::from_rgb(22, 22, 28);
pub const WINDOW_FILL: Color32 = Color32::from_rgb(15, 15, 20);
pub const CARD_BG: Color32 = Color32::from_rgb(24, 24, 24);
pub const CARD_BORDER: Color32 = Color32::from_rgb(55, 65, 81);
pub const TITLE_BG: Color32 = Color32::from_rgb(34, 34, 34);
pub const STATUS_ACCENT: Color32 = Color32::from_rgb(99, 102, 241);
pub const ACCENT_OPEN: Color32 = Color32::from_rgb(59, 130, 246); // blue
pub const ACCENT_WARN: Color32 = Color32::from_rgb(250, 204, 21); // yellow
pub const ACCENT_ERROR: Color32 = Color32::from_rgb(239, 68, 68); // red
pub const NOTE_ICON_FG: Color32 = Color32::from_rgb(34, 34, 34);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = WINDOW_FILL;
    visuals.panel_fill = PANEL_FILL;
    visuals.faint_bg_color = Color32::from_rgb(32, 32, 40);
    visuals.extreme_bg_color = Color32::from_rgb(42, 42, 50);
    visuals.selection.bg_fill = STATUS_ACCENT;
    visuals.hyperlink_color = STATUS_ACCENT;
    visuals.window_stroke = Stroke::new(1.0, CARD_BORDER);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(12.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = Margin::same(16);
    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.visuals = visuals;
    ctx.set_style(style);
}

pub fn status_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => STATUS_ACCENT,
        NoticeLevel::Warning => ACCENT_WARN,
        NoticeLevel::Error => ACCENT_ERROR,
    }
}

/// Translucent white behind the note icon.
pub fn note_button_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, 217)
}
