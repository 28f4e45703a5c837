//! # PDF Writer
//!
//! Lowers a Markdown document to PDF pages. The Markdown is parsed to
//! mdast, flattened into styled text blocks, wrapped to the page
//! width, and written with `lopdf` using the built-in Type1 fonts.
//! The writer emits no timestamps or random ids, so the same input
//! always produces the same bytes.

use anyhow::{anyhow, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use markdown::mdast::Node;
use markdown::ParseOptions;

use super::style::{
    BODY_PT, CODE_PT, HEADING_PT, LINE_SPACING, MARGIN_PT, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
};

/// A block of renderable text extracted from the Markdown tree
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Code(String),
    Bullet(String),
    Rule,
}

/// Font used for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontKind {
    Body,
    Bold,
    Mono,
}

impl FontKind {
    fn resource_name(&self) -> &'static str {
        match self {
            Self::Body => "F1",
            Self::Bold => "F2",
            Self::Mono => "F3",
        }
    }

    /// Rough average glyph width as a fraction of the font size
    fn glyph_factor(&self) -> f32 {
        match self {
            Self::Mono => 0.6,
            _ => 0.5,
        }
    }
}

/// One laid-out line of text
#[derive(Debug, Clone)]
struct Line {
    text: String,
    font: FontKind,
    size: f32,
    /// Vertical advance before drawing this line
    leading: f32,
}

/// Parse a Markdown document into renderable blocks
pub fn blocks_from_markdown(source: &str) -> Result<Vec<Block>> {
    let tree = markdown::to_mdast(source, &ParseOptions::gfm())
        .map_err(|e| anyhow!("markdown parse failed: {}", e))?;

    let mut blocks = Vec::new();
    if let Some(children) = tree.children() {
        for child in children {
            collect_blocks(child, &mut blocks);
        }
    }
    Ok(blocks)
}

fn collect_blocks(node: &Node, blocks: &mut Vec<Block>) {
    match node {
        Node::Heading(heading) => {
            blocks.push(Block::Heading {
                level: heading.depth,
                text: inline_text(&heading.children),
            });
        }
        Node::Paragraph(paragraph) => {
            let text = inline_text(&paragraph.children);
            if !text.is_empty() {
                blocks.push(Block::Paragraph(text));
            }
        }
        Node::Code(code) => {
            blocks.push(Block::Code(code.value.clone()));
        }
        Node::List(list) => {
            for (i, item) in list.children.iter().enumerate() {
                let text = item
                    .children()
                    .map(|children| {
                        children
                            .iter()
                            .map(block_text)
                            .filter(|t| !t.is_empty())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default();
                if text.is_empty() {
                    continue;
                }
                let marker = if list.ordered {
                    format!("{}.", i as u32 + list.start.unwrap_or(1))
                } else {
                    "-".to_string()
                };
                blocks.push(Block::Bullet(format!("{} {}", marker, text)));
            }
        }
        Node::ThematicBreak(_) => blocks.push(Block::Rule),
        // Blockquotes, tables, and anything else with children flatten
        // into plain blocks.
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    collect_blocks(child, blocks);
                }
            }
        }
    }
}

/// Flatten inline children to plain text
fn inline_text(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        push_inline(child, &mut out);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_inline(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        Node::InlineCode(code) => out.push_str(&code.value),
        Node::Image(image) => {
            out.push_str(&format!("[image: {}]", image.alt));
        }
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    push_inline(child, out);
                }
            }
        }
    }
}

fn block_text(node: &Node) -> String {
    match node {
        Node::Paragraph(p) => inline_text(&p.children),
        Node::Text(t) => t.value.split_whitespace().collect::<Vec<_>>().join(" "),
        other => other
            .children()
            .map(|c| inline_text(c))
            .unwrap_or_default(),
    }
}

/// Wrap text to a character limit on word boundaries
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Replace characters the built-in Type1 fonts cannot show
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

fn max_chars_for(font: FontKind, size: f32) -> usize {
    let usable = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
    (usable / (size * font.glyph_factor())).max(8.0) as usize
}

fn layout(blocks: &[Block]) -> Vec<Line> {
    let mut lines = Vec::new();

    for block in blocks {
        let (font, size, text, gap) = match block {
            Block::Heading { level, text } => {
                let idx = (level.saturating_sub(1) as usize).min(HEADING_PT.len() - 1);
                (FontKind::Bold, HEADING_PT[idx], text.clone(), true)
            }
            Block::Paragraph(text) => (FontKind::Body, BODY_PT, text.clone(), true),
            Block::Bullet(text) => (FontKind::Body, BODY_PT, text.clone(), false),
            Block::Code(code) => {
                // Code keeps its own line breaks; everything else wraps.
                let mut first = true;
                for raw_line in code.lines() {
                    let wrapped = if raw_line.is_empty() {
                        vec![String::new()]
                    } else {
                        wrap_text(raw_line, max_chars_for(FontKind::Mono, CODE_PT))
                    };
                    for piece in wrapped {
                        lines.push(Line {
                            text: sanitize(&piece),
                            font: FontKind::Mono,
                            size: CODE_PT,
                            leading: if first {
                                CODE_PT * LINE_SPACING + CODE_PT
                            } else {
                                CODE_PT * LINE_SPACING
                            },
                        });
                        first = false;
                    }
                }
                continue;
            }
            Block::Rule => {
                lines.push(Line {
                    text: "-".repeat(40),
                    font: FontKind::Body,
                    size: BODY_PT,
                    leading: BODY_PT * LINE_SPACING * 2.0,
                });
                continue;
            }
        };

        let mut first = true;
        for piece in wrap_text(&text, max_chars_for(font, size)) {
            lines.push(Line {
                text: sanitize(&piece),
                font,
                size,
                leading: if first {
                    size * LINE_SPACING + if gap { size * 0.8 } else { 0.0 }
                } else {
                    size * LINE_SPACING
                },
            });
            first = false;
        }
    }

    lines
}

/// Write blocks to PDF bytes
pub fn write_pdf(blocks: &[Block]) -> Result<Vec<u8>> {
    let lines = layout(blocks);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_body = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let font_mono = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_body,
            "F2" => font_bold,
            "F3" => font_mono,
        },
    });

    let mut page_ids: Vec<Object> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT_PT - MARGIN_PT;

    let flush_page = |doc: &mut Document, ops: &mut Vec<Operation>, page_ids: &mut Vec<Object>| -> Result<()> {
        let content = Content {
            operations: std::mem::take(ops),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content
                .encode()
                .map_err(|e| anyhow!("PDF content encoding failed: {}", e))?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id.into());
        Ok(())
    };

    for line in &lines {
        if y - line.leading < MARGIN_PT {
            flush_page(&mut doc, &mut ops, &mut page_ids)?;
            y = PAGE_HEIGHT_PT - MARGIN_PT;
        }
        y -= line.leading;

        if line.text.is_empty() {
            continue;
        }

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        ops.push(Operation::new(
            "Td",
            vec![MARGIN_PT.into(), y.into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    flush_page(&mut doc, &mut ops, &mut page_ids)?;

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                PAGE_WIDTH_PT.into(),
                PAGE_HEIGHT_PT.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| anyhow!("PDF serialization failed: {}", e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Title\n\nA paragraph with **bold** text.\n\n\
        ## Section\n\n- first\n- second\n\n```rust\nfn main() {}\n```\n";

    #[test]
    fn test_blocks_from_markdown() {
        let blocks = blocks_from_markdown(SAMPLE).unwrap();
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                text: "Title".to_string()
            }
        );
        assert!(blocks.contains(&Block::Paragraph("A paragraph with bold text.".to_string())));
        assert!(blocks.contains(&Block::Bullet("- first".to_string())));
        assert!(blocks.contains(&Block::Code("fn main() {}".to_string())));
    }

    #[test]
    fn test_ordered_list_markers() {
        let blocks = blocks_from_markdown("1. one\n2. two\n").unwrap();
        assert!(blocks.contains(&Block::Bullet("1. one".to_string())));
        assert!(blocks.contains(&Block::Bullet("2. two".to_string())));
    }

    #[test]
    fn test_image_alt_text_is_kept() {
        let blocks = blocks_from_markdown("![a sunset](https://example.com/s.jpg)\n").unwrap();
        assert!(blocks
            .iter()
            .any(|b| matches!(b, Block::Paragraph(t) if t.contains("[image: a sunset]"))));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn test_wrap_text_long_word() {
        let lines = wrap_text("supercalifragilistic", 5);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_sanitize_typography() {
        assert_eq!(sanitize("\u{201c}hi\u{201d} \u{2014} ok\u{2019}s"), "\"hi\" - ok's");
    }

    #[test]
    fn test_write_pdf_emits_pdf_bytes() {
        let blocks = blocks_from_markdown(SAMPLE).unwrap();
        let bytes = write_pdf(&blocks).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_pdf_is_deterministic() {
        let blocks = blocks_from_markdown(SAMPLE).unwrap();
        assert_eq!(write_pdf(&blocks).unwrap(), write_pdf(&blocks).unwrap());
    }

    #[test]
    fn test_long_document_paginates() {
        let body = "A paragraph of filler text that occupies a line.\n\n".repeat(120);
        let blocks = blocks_from_markdown(&body).unwrap();
        let bytes = write_pdf(&blocks).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert!(reloaded.get_pages().len() > 1, "expected multiple pages");
    }
}
