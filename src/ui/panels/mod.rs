use egui::Context;

use super::app_state::{AppState, CardAction};

mod grid;
mod top;

impl AppState {
    pub fn render_top_panel(&mut self, ctx: &Context) {
        top::render(self, ctx);
    }

    pub fn render_central_panel(&mut self, ctx: &Context) -> Vec<CardAction> {
        grid::render(self, ctx)
    }
}
