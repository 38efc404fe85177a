//! Discovery of `youtubeGrid` fenced blocks inside a markdown document.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// Info-string tag that marks a grid block.
pub const BLOCK_TAG: &str = "youtubeGrid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBlock {
    /// Zero-based position among the grid blocks of the document.
    pub index: usize,
    /// One-based line of the opening fence.
    pub start_line: usize,
    /// Raw block body, without the fences.
    pub source: String,
}

struct OpenGrid {
    start_line: usize,
    body: String,
}

fn line_of(markdown: &str, offset: usize) -> usize {
    markdown.as_bytes()[..offset.min(markdown.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Returns every grid block in document order, including blocks nested in
/// blockquotes, callouts and list items. Fences of other languages are
/// skipped as a whole. An unclosed grid block extends to the end of the
/// document.
pub fn find_blocks(markdown: &str) -> Vec<GridBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<OpenGrid> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or("");
                if lang == BLOCK_TAG {
                    current = Some(OpenGrid {
                        start_line: line_of(markdown, range.start),
                        body: String::new(),
                    });
                }
            }
            Event::Text(text) => {
                if let Some(open) = current.as_mut() {
                    open.body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(open) = current.take() {
                    let source = open.body.strip_suffix('\n').unwrap_or(&open.body);
                    blocks.push(GridBlock {
                        index: blocks.len(),
                        start_line: open.start_line,
                        source: source.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    blocks
}
