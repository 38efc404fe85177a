use egui::{Align, Color32, Context, Frame, Layout, Margin, RichText, TextEdit};

use crate::ui::theme::{ACCENT_OPEN, PANEL_FILL, status_color};

use super::AppState;

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    let mut open_requested = false;
    let mut reload_requested = false;
    let mut key_changed = false;

    egui::TopBottomPanel::top("top")
        .resizable(false)
        .show(ctx, |ui| {
            Frame::default()
                .fill(PANEL_FILL)
                .inner_margin(Margin::symmetric(16, 12))
                .show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.heading(
                                RichText::new("ytgrid").color(Color32::from_rgb(229, 231, 235)),
                            );
                            ui.add_space(12.0);
                            ui.colored_label(
                                status_color(state.status_level),
                                RichText::new(&state.status).strong(),
                            );
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                let can_reload = state.document.is_some() && !state.is_loading;
                                if ui
                                    .add_enabled(can_reload, egui::Button::new("Reload"))
                                    .on_hover_text("Read the document again and refresh titles")
                                    .clicked()
                                {
                                    reload_requested = true;
                                }
                                ui.add_space(6.0);
                                let open_button = egui::Button::new(
                                    RichText::new("Open document...").strong().color(Color32::WHITE),
                                )
                                .fill(ACCENT_OPEN)
                                .min_size(egui::vec2(160.0, 32.0));
                                if ui
                                    .add(open_button)
                                    .on_hover_text("Pick a markdown file with youtubeGrid blocks")
                                    .clicked()
                                {
                                    open_requested = true;
                                }
                            });
                        });
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            ui.label("YouTube Data API key");
                            let response = ui.add(
                                TextEdit::singleline(&mut state.api_key_input)
                                    .password(true)
                                    .hint_text("API key")
                                    .desired_width(320.0),
                            );
                            if response.changed() {
                                key_changed = true;
                            }
                            ui.label(
                                RichText::new("Optional: needed for video titles and notes.")
                                    .weak(),
                            );
                        });
                        if let Some(document) = &state.document {
                            ui.label(
                                RichText::new(format!(
                                    "{}  (vault: {})",
                                    document.location.source_path,
                                    document.location.root.display()
                                ))
                                .weak(),
                            );
                        }
                    });
                });
        });

    if key_changed {
        state.update_api_key();
    }
    if open_requested {
        state.pick_document(ctx);
    }
    if reload_requested {
        state.launch_load(ctx);
    }
}
