//! Static HTML rendering of grid view-models.

use std::fmt::Write;

use crate::grid::{Card, GridView, RenderedBlock};
use crate::layout::GridStyle;

const NOTE_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="#222" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M12 3H5a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2v-7"></path><path d="M18.375 2.625a1 1 0 0 1 3 3l-9.013 9.014a2 2 0 0 1-.853.505l-2.873.84a.5.5 0 0 1-.62-.62l.84-2.873a2 2 0 0 1 .506-.852z"></path></svg>"##;

pub const NOTE_BUTTON_HINT: &str = "Create/open note for this video";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn render_card(out: &mut String, card: &Card, style: &GridStyle) {
    let radius = style.corner_radius_px;
    let _ = write!(
        out,
        r#"<div class="ytgrid-card" style="background:#181818;border-radius:{radius}px;overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,0.15);">"#
    );
    let _ = write!(
        out,
        r#"<a href="{}" target="_blank" style="display:block;text-decoration:none;color:#fff;">"#,
        escape(&card.watch_url)
    );
    out.push_str(r#"<div style="position:relative;">"#);
    let _ = write!(
        out,
        r#"<button class="ytgrid-note" data-video-id="{}"{} title="{}" style="position:absolute;top:8px;left:8px;z-index:2;width:32px;height:32px;padding:2px;border:none;border-radius:{radius}px;background:rgba(255,255,255,0.85);cursor:pointer;">{}</button>"#,
        escape(&card.video_id),
        card.title
            .as_deref()
            .map(|t| format!(r#" data-title="{}""#, escape(t)))
            .unwrap_or_default(),
        NOTE_BUTTON_HINT,
        NOTE_ICON
    );
    let _ = write!(
        out,
        r#"<img src="{}" alt="YouTube Thumbnail" style="width:100%;display:block;margin:0;padding:0;border:none;">"#,
        escape(&card.thumbnail_url)
    );
    out.push_str("</div>");
    if let Some(title) = &card.title {
        let _ = write!(
            out,
            r#"<div class="ytgrid-title" style="padding:0.2em 0.5em;font-weight:bold;background:#222;line-height:1.2;">{}</div>"#,
            escape(title)
        );
    }
    out.push_str("</a></div>");
}

/// One grid as an HTML fragment.
pub fn render_grid(grid: &GridView, style: &GridStyle) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="ytgrid" style="display:grid;grid-template-columns:{};gap:{}rem;margin:{}em 0;">"#,
        style.template_columns(grid.columns),
        style.gap_rem,
        style.margin_em
    );
    for card in &grid.cards {
        render_card(&mut out, card, style);
    }
    out.push_str("</div>");
    out
}

/// Standalone page with one section per rendered block.
pub fn render_page(title: &str, blocks: &[RenderedBlock], style: &GridStyle) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body style=\"background:#101014;color:#e5e7eb;font-family:sans-serif;\">\n",
        escape(title)
    );
    for block in blocks {
        let _ = writeln!(
            out,
            "<section data-block=\"{}\" data-line=\"{}\">{}</section>",
            block.index,
            block.start_line,
            render_grid(&block.grid, style)
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}
