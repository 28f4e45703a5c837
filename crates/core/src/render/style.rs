//! # Document Style
//!
//! The fixed style applied to every rendered post. One CSS sheet for
//! the HTML surface and matching point sizes for the PDF surface;
//! neither varies with content.

/// A4 page width in points
pub const PAGE_WIDTH_PT: f32 = 595.0;
/// A4 page height in points
pub const PAGE_HEIGHT_PT: f32 = 842.0;
/// Page margin in points (2.5cm)
pub const MARGIN_PT: f32 = 71.0;

/// Body text size
pub const BODY_PT: f32 = 11.0;
/// Heading sizes by level (h1, h2, h3; deeper headings reuse h3)
pub const HEADING_PT: [f32; 3] = [24.0, 18.0, 14.0];
/// Code block text size
pub const CODE_PT: f32 = 9.5;
/// Line height multiplier
pub const LINE_SPACING: f32 = 1.5;

/// The static style sheet wrapped around every rendered post
pub const STYLE_SHEET: &str = r#"
@page {
    margin: 2.5cm;
    @top-center {
        content: "Blog Post";
    }
    @bottom-center {
        content: counter(page);
    }
}
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    line-height: 1.6;
    font-size: 11pt;
}
h1, h2, h3 {
    color: #1a1a1a;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
}
h1 { font-size: 24pt; }
h2 { font-size: 18pt; }
h3 { font-size: 14pt; }
code {
    font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    background-color: #f6f8fa;
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-size: 85%;
}
pre {
    background-color: #f6f8fa;
    padding: 16px;
    border-radius: 6px;
    overflow-x: auto;
    line-height: 1.45;
}
blockquote {
    border-left: 4px solid #dfe2e5;
    color: #6a737d;
    margin: 0;
    padding-left: 1em;
}
img {
    max-width: 100%;
    height: auto;
    margin: 1em 0;
    display: block;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin: 1em 0;
}
th, td {
    border: 1px solid #dfe2e5;
    padding: 6px 13px;
}
th {
    background-color: #f6f8fa;
}
a {
    color: #0366d6;
    text-decoration: none;
}
ul, ol {
    padding-left: 2em;
}
li {
    margin: 0.25em 0;
}
.mermaid {
    text-align: center;
}
.image-credits {
    border-top: 1px solid #ddd;
    margin-top: 2em;
    padding-top: 1em;
}
"#;

/// Wrap converted HTML in the full styled document
pub fn styled_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="UTF-8">
        <style>{}</style>
    </head>
    <body>
{}
    </body>
</html>
"#,
        STYLE_SHEET, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_html_wraps_body() {
        let html = styled_html("<h1>Title</h1>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("font-size: 11pt"));
    }

    #[test]
    fn test_heading_sizes_match_sheet() {
        for (level, size) in HEADING_PT.iter().enumerate() {
            let rule = format!("h{} {{ font-size: {}pt; }}", level + 1, size);
            assert!(STYLE_SHEET.contains(&rule), "missing rule: {}", rule);
        }
    }
}
