//! # Document Rendering
//!
//! Converts the pipeline's final Markdown into the two delivery
//! surfaces: styled HTML and PDF bytes. Both use the same fixed style
//! table; rendering is content-independent and deterministic.

pub mod pdf;
pub mod style;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use markdown::Options;

/// A rendered post: base64 PDF bytes plus the full styled HTML
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pdf_base64: String,
    pub html: String,
}

/// Renderer for final blog Markdown
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Convert Markdown to styled HTML
    pub fn markdown_to_html(markdown_text: &str) -> Result<String> {
        let body = markdown::to_html_with_options(markdown_text, &Options::gfm())
            .map_err(|e| anyhow!("markdown conversion failed: {}", e))?;
        Ok(style::styled_html(&body))
    }

    /// Convert Markdown to a PDF and the styled HTML it parallels
    pub fn render(markdown_text: &str) -> Result<RenderedDocument> {
        let html = Self::markdown_to_html(markdown_text)?;

        let blocks = pdf::blocks_from_markdown(markdown_text)?;
        let pdf_bytes = pdf::write_pdf(&blocks)?;

        Ok(RenderedDocument {
            pdf_base64: BASE64.encode(&pdf_bytes),
            html,
        })
    }

    /// Decode a rendered document's PDF back to raw bytes
    pub fn decode_pdf(pdf_base64: &str) -> Result<Vec<u8>> {
        BASE64
            .decode(pdf_base64)
            .map_err(|e| anyhow!("invalid PDF base64: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Hello\n\nSome *text*.\n\n\
        | a | b |\n| - | - |\n| 1 | 2 |\n\n## Image Credits\n";

    #[test]
    fn test_markdown_to_html_gfm_tables() {
        let html = DocumentRenderer::markdown_to_html(SAMPLE).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn test_render_produces_pdf() {
        let doc = DocumentRenderer::render(SAMPLE).unwrap();
        let bytes = DocumentRenderer::decode_pdf(&doc.pdf_base64).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_is_byte_identical_for_same_input() {
        let a = DocumentRenderer::render(SAMPLE).unwrap();
        let b = DocumentRenderer::render(SAMPLE).unwrap();
        assert_eq!(a.pdf_base64, b.pdf_base64);
        assert_eq!(a.html, b.html);
    }
}
