//! Declarative grid view-model built from a block body.

use serde::Serialize;

use crate::block::{self, GridBlock};
use crate::layout::columns_for;
use crate::video_id::{extract_video_id, thumbnail_url, watch_url};
use crate::yt::TitleLookup;

/// What the note button of a card acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteAction {
    pub video_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub video_id: String,
    pub watch_url: String,
    pub thumbnail_url: String,
    pub title: Option<String>,
    pub action: NoteAction,
}

impl Card {
    pub fn new(video_id: &str, title: Option<String>) -> Self {
        Self {
            video_id: video_id.to_string(),
            watch_url: watch_url(video_id),
            thumbnail_url: thumbnail_url(video_id),
            action: NoteAction {
                video_id: video_id.to_string(),
                title: title.clone(),
            },
            title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub columns: usize,
    pub cards: Vec<Card>,
}

/// A grid together with the block it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub index: usize,
    pub start_line: usize,
    pub grid: GridView,
}

/// Trimmed, non-empty lines of a block body in order.
pub fn source_urls(source: &str) -> Vec<&str> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Builds the grid for one block body.
///
/// The column count follows the number of non-empty lines, including lines
/// that carry no recognisable video. Titles are looked up one video at a
/// time, in order.
pub async fn build_grid(source: &str, titles: Option<&dyn TitleLookup>) -> GridView {
    let urls = source_urls(source);
    let columns = columns_for(urls.len());
    let mut cards = Vec::new();

    for url in urls {
        let Some(video_id) = extract_video_id(url) else {
            tracing::debug!(url, "skipping line without a video id");
            continue;
        };
        let title = match titles {
            Some(lookup) => lookup.title(&video_id).await.filter(|t| !t.is_empty()),
            None => None,
        };
        cards.push(Card::new(&video_id, title));
    }

    GridView { columns, cards }
}

/// Renders every grid block found in `markdown`.
pub async fn render_document(
    markdown: &str,
    titles: Option<&dyn TitleLookup>,
) -> Vec<RenderedBlock> {
    let mut rendered = Vec::new();
    for GridBlock {
        index,
        start_line,
        source,
    } in block::find_blocks(markdown)
    {
        let grid = build_grid(&source, titles).await;
        rendered.push(RenderedBlock {
            index,
            start_line,
            grid,
        });
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTitles {
        known: HashMap<String, String>,
        asked: Mutex<Vec<String>>,
    }

    impl FakeTitles {
        fn with(pairs: &[(&str, &str)]) -> Self {
            Self {
                known: pairs
                    .iter()
                    .map(|(id, title)| (id.to_string(), title.to_string()))
                    .collect(),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TitleLookup for FakeTitles {
        async fn title(&self, video_id: &str) -> Option<String> {
            self.asked.lock().unwrap().push(video_id.to_string());
            self.known.get(video_id).cloned()
        }
    }

    #[tokio::test]
    async fn empty_block_renders_empty_grid_without_lookups() {
        let titles = FakeTitles::default();
        let grid = build_grid("\n   \n\t\n", Some(&titles)).await;
        assert_eq!(grid.columns, 1);
        assert!(grid.cards.is_empty());
        assert!(titles.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cards_follow_line_order_and_skip_unknown_urls() {
        let source = "https://youtu.be/aaaaaaaaaaa\n\n  not a video  \nhttps://www.youtube.com/watch?v=bbbbbbbbbbb\n";
        let titles = FakeTitles::with(&[("bbbbbbbbbbb", "Second")]);
        let grid = build_grid(source, Some(&titles)).await;

        assert_eq!(grid.columns, 3);
        let ids: Vec<&str> = grid.cards.iter().map(|c| c.video_id.as_str()).collect();
        assert_eq!(ids, ["aaaaaaaaaaa", "bbbbbbbbbbb"]);
        assert_eq!(grid.cards[0].title, None);
        assert_eq!(grid.cards[1].title.as_deref(), Some("Second"));
        assert_eq!(grid.cards[1].action.title.as_deref(), Some("Second"));
        assert_eq!(
            titles.asked.lock().unwrap().as_slice(),
            ["aaaaaaaaaaa".to_string(), "bbbbbbbbbbb".to_string()]
        );
    }

    #[tokio::test]
    async fn without_lookup_cards_have_no_titles() {
        let grid = build_grid("https://youtu.be/aaaaaaaaaaa", None).await;
        assert_eq!(grid.columns, 1);
        assert_eq!(
            grid.cards,
            vec![Card {
                video_id: "aaaaaaaaaaa".into(),
                watch_url: "https://www.youtube.com/watch?v=aaaaaaaaaaa".into(),
                thumbnail_url: "https://img.youtube.com/vi/aaaaaaaaaaa/hqdefault.jpg".into(),
                title: None,
                action: NoteAction {
                    video_id: "aaaaaaaaaaa".into(),
                    title: None,
                },
            }]
        );
    }

    #[tokio::test]
    async fn empty_titles_are_dropped() {
        let titles = FakeTitles::with(&[("aaaaaaaaaaa", "")]);
        let grid = build_grid("https://youtu.be/aaaaaaaaaaa", Some(&titles)).await;
        assert_eq!(grid.cards[0].title, None);
    }

    #[tokio::test]
    async fn seven_lines_use_four_columns() {
        let source: String = (0..7)
            .map(|i| format!("https://youtu.be/{i}{}\n", "x".repeat(10)))
            .collect();
        let grid = build_grid(&source, None).await;
        assert_eq!(grid.columns, 4);
        assert_eq!(grid.cards.len(), 7);
    }

    #[tokio::test]
    async fn renders_each_block_of_a_document() {
        let doc = "# A\n```youtubeGrid\nhttps://youtu.be/aaaaaaaaaaa\n```\n\n```youtubeGrid\n```\n";
        let rendered = render_document(doc, None).await;
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].start_line, 2);
        assert_eq!(rendered[0].grid.cards.len(), 1);
        assert_eq!(rendered[1].index, 1);
        assert!(rendered[1].grid.cards.is_empty());
    }
}
