mod app_state;
mod panels;
mod theme;
mod thumbnails;

pub use app_state::AppState;

use egui::Context;
use std::time::Duration;

impl eframe::App for AppState {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_background();
        self.thumbnail_cache.update(ctx);

        self.render_top_panel(ctx);
        let actions = self.render_central_panel(ctx);
        for action in actions {
            self.handle_card_action(ctx, action);
        }

        if self.is_loading {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
