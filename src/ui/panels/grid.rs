use egui::{
    Align2, Color32, Context, CornerRadius, FontId, Frame, Image, Margin, Rect, RichText, Sense,
    Stroke,
};

use crate::grid::{Card, GridView};
use crate::html::NOTE_BUTTON_HINT;
use crate::layout::GridStyle;
use crate::ui::theme::{CARD_BG, CARD_BORDER, NOTE_ICON_FG, TITLE_BG, note_button_fill};
use crate::ui::thumbnails::ThumbnailRef;

use super::{AppState, CardAction};

const REM: f32 = 16.0;
const NOTE_BUTTON_SIZE: f32 = 32.0;

pub(super) fn render(state: &mut AppState, ctx: &Context) -> Vec<CardAction> {
    let mut actions = Vec::new();
    egui::CentralPanel::default().show(ctx, |ui| {
        if state.document.is_none() {
            ui.label("Open a markdown document to render its youtubeGrid blocks.");
            return;
        }
        if state.blocks.is_empty() {
            if state.is_loading {
                ui.label("Loading...");
            } else {
                ui.label("This document has no youtubeGrid blocks.");
            }
            return;
        }

        let blocks = state.blocks.clone();
        let style = GridStyle::default();
        egui::ScrollArea::both().show(ui, |ui| {
            for block in &blocks {
                ui.label(
                    RichText::new(format!("Grid {} (line {})", block.index + 1, block.start_line))
                        .strong(),
                );
                ui.add_space(style.margin_em * REM / 2.0);
                render_grid(state, ui, &block.grid, &style, &mut actions);
                ui.add_space(style.margin_em * REM);
            }
        });
    });
    actions
}

fn render_grid(
    state: &mut AppState,
    ui: &mut egui::Ui,
    grid: &GridView,
    style: &GridStyle,
    actions: &mut Vec<CardAction>,
) {
    if grid.cards.is_empty() {
        ui.label(RichText::new("(no videos)").weak());
        return;
    }
    let ctx = ui.ctx().clone();
    let columns = grid.columns.max(1);
    let gap = style.gap_rem * REM;
    let width = style.column_width(ui.available_width(), columns, gap);

    for row in grid.cards.chunks(columns) {
        let thumbs: Vec<(Option<ThumbnailRef>, bool)> = row
            .iter()
            .map(|card| {
                state.thumbnail_cache.request(card, &ctx, &state.runtime);
                (
                    state.thumbnail_cache.thumbnail(&card.video_id),
                    state.thumbnail_cache.is_failed(&card.video_id),
                )
            })
            .collect();

        ui.horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = gap;
            for (card, (thumb, failed)) in row.iter().zip(thumbs.iter()) {
                ui.allocate_ui(egui::vec2(width, 0.0), |ui| {
                    render_card(ui, card, thumb.as_ref(), *failed, width, style, actions);
                });
            }
        });
        ui.add_space(gap);
    }
}

fn render_card(
    ui: &mut egui::Ui,
    card: &Card,
    thumb: Option<&ThumbnailRef>,
    failed: bool,
    width: f32,
    style: &GridStyle,
    actions: &mut Vec<CardAction>,
) {
    let radius = style.corner_radius_px;
    Frame::default()
        .fill(CARD_BG)
        .stroke(Stroke::new(1.0, CARD_BORDER))
        .corner_radius(CornerRadius::same(radius))
        .inner_margin(Margin::ZERO)
        .show(ui, |ui| {
            ui.set_width(width);
            ui.spacing_mut().item_spacing.y = 0.0;
            let top_corners = CornerRadius {
                nw: radius,
                ne: radius,
                sw: 0,
                se: 0,
            };

            let response = match thumb {
                Some(thumb) => {
                    let size = egui::vec2(width, width * thumb.size.y / thumb.size.x.max(1.0));
                    ui.add(
                        Image::new((thumb.texture.id(), size))
                            .corner_radius(top_corners)
                            .sense(Sense::click()),
                    )
                }
                None => {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(width, width * 0.75), Sense::click());
                    ui.painter()
                        .rect_filled(rect, top_corners, Color32::from_rgb(30, 34, 42));
                    let message = if failed {
                        "Thumbnail unavailable"
                    } else {
                        "Loading..."
                    };
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        message,
                        FontId::proportional(12.0),
                        Color32::from_gray(180),
                    );
                    response
                }
            };
            let thumb_rect = response.rect;
            if response
                .on_hover_text("Open video in your browser")
                .clicked()
            {
                actions.push(CardAction::OpenVideo(card.watch_url.clone()));
            }

            let button_rect = Rect::from_min_size(
                thumb_rect.min + egui::vec2(8.0, 8.0),
                egui::vec2(NOTE_BUTTON_SIZE, NOTE_BUTTON_SIZE),
            );
            let note_button =
                egui::Button::new(RichText::new("📝").size(18.0).color(NOTE_ICON_FG))
                    .fill(note_button_fill())
                    .corner_radius(CornerRadius::same(radius));
            if ui
                .put(button_rect, note_button)
                .on_hover_text(NOTE_BUTTON_HINT)
                .clicked()
            {
                actions.push(CardAction::Note(card.action.clone()));
            }

            if let Some(title) = &card.title {
                Frame::default()
                    .fill(TITLE_BG)
                    .inner_margin(Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.set_width(width - 16.0);
                        ui.add(
                            egui::Label::new(RichText::new(title).strong().color(Color32::WHITE))
                                .wrap(),
                        );
                    });
            }
        });
}
