//! Standalone HTML documents
//!
//! Wraps the preview fragment into a complete, self-styled HTML page that
//! can be opened in any browser, optionally with a table of contents.

use super::preview::PreviewRenderer;
use std::path::{Path, PathBuf};

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlExportOptions {
    /// Include CSS styles inline
    pub include_styles: bool,
    /// Document title
    pub title: Option<String>,
    /// Include table of contents
    pub include_toc: bool,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            include_styles: true,
            title: None,
            include_toc: false,
        }
    }
}

/// Builds standalone HTML pages from Markdown
pub struct HtmlDocumentExporter<'r> {
    renderer: &'r PreviewRenderer,
}

impl<'r> HtmlDocumentExporter<'r> {
    pub fn new(renderer: &'r PreviewRenderer) -> Self {
        Self { renderer }
    }

    /// Export markdown to an HTML document string
    pub fn export_html(&self, markdown: &str, options: &HtmlExportOptions) -> String {
        let body = self.renderer.render_html(markdown);
        let title = options.title.as_deref().unwrap_or("Document");
        let styles = if options.include_styles {
            Self::get_styles()
        } else {
            ""
        };
        let toc = if options.include_toc {
            Self::generate_toc(markdown)
        } else {
            String::new()
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Markdown Desk">
    <title>{}</title>
    {}
</head>
<body>
    <article class="markdown-preview">
        {}
        {}
    </article>
</body>
</html>"#,
            Self::escape_html(title),
            styles,
            toc,
            body
        )
    }

    /// Generate suggested output path from input path
    pub fn suggest_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut output = input_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();

        output.push(format!("{}.html", stem));
        output
    }

    /// Generate a table of contents from markdown headings
    fn generate_toc(markdown: &str) -> String {
        let mut toc = String::from("<nav class=\"toc\">\n<h2>Table of Contents</h2>\n<ul>\n");
        let mut current_level = 0;
        let mut in_fence = false;

        for line in markdown.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence || !trimmed.starts_with('#') {
                continue;
            }

            let level = trimmed.chars().take_while(|c| *c == '#').count();
            if level > 6 {
                continue;
            }

            let title = trimmed[level..].trim();
            if title.is_empty() {
                continue;
            }

            while current_level < level {
                toc.push_str("<ul>\n");
                current_level += 1;
            }
            while current_level > level {
                toc.push_str("</ul>\n");
                current_level -= 1;
            }

            toc.push_str(&format!(
                "<li><a href=\"#{}\">{}</a></li>\n",
                Self::generate_anchor(title),
                Self::escape_html(title)
            ));
        }

        while current_level > 0 {
            toc.push_str("</ul>\n");
            current_level -= 1;
        }

        toc.push_str("</ul>\n</nav>\n");
        toc
    }

    /// Generate URL-safe anchor from heading text
    fn generate_anchor(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c
                } else if c.is_whitespace() {
                    '-'
                } else {
                    '_'
                }
            })
            .collect::<String>()
            .trim_matches(|c| c == '-' || c == '_')
            .to_string()
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Light print-friendly theme
    fn get_styles() -> &'static str {
        r#"<style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: black;
            background-color: white;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
        }
        .markdown-preview h1, .markdown-preview h2,
        .markdown-preview h3, .markdown-preview h4 {
            color: black;
            font-weight: bold;
        }
        .markdown-preview code {
            background-color: #f5f5f5;
            color: #e83e8c;
            padding: .2em .4em;
            border-radius: 4px;
        }
        .markdown-preview pre {
            background-color: #f5f5f5;
            border: 1px solid #ddd;
            padding: 16px;
            overflow: auto;
        }
        .markdown-preview pre code {
            color: #333;
            background: transparent;
            padding: 0;
        }
        .markdown-preview a {
            color: #2563eb;
        }
        .markdown-preview blockquote {
            color: #4b5563;
            border-left: .25em solid #d1d5db;
            margin: 16px 0;
            padding: 0 1em;
        }
        .markdown-preview table {
            border-collapse: collapse;
        }
        .markdown-preview th, .markdown-preview td {
            border: 1px solid #ddd;
            padding: 6px 13px;
        }
        .toc {
            background-color: #f5f5f5;
            padding: 16px 24px;
            margin-bottom: 24px;
        }
        .toc ul {
            list-style-type: none;
            padding-left: 1.5em;
        }
        @media print {
            pre, blockquote { page-break-inside: avoid; }
            h1, h2, h3, h4 { page-break-after: avoid; }
        }
    </style>"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_export() {
        let renderer = PreviewRenderer::new();
        let exporter = HtmlDocumentExporter::new(&renderer);
        let options = HtmlExportOptions {
            title: Some("Test <1>".to_string()),
            ..Default::default()
        };

        let html = exporter.export_html("# Hello\n\nWorld", &options);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test &lt;1&gt;</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn test_toc_generation_skips_code_fences() {
        let toc = HtmlDocumentExporter::generate_toc("# One\n## Two\n```\n# not a heading\n```\n# Four");

        assert!(toc.contains("href=\"#one\""));
        assert!(toc.contains("Two"));
        assert!(toc.contains("Four"));
        assert!(!toc.contains("not a heading"));
    }

    #[test]
    fn test_anchor_generation() {
        assert_eq!(HtmlDocumentExporter::generate_anchor("Hello World"), "hello-world");
        assert_eq!(HtmlDocumentExporter::generate_anchor("Test 123!"), "test-123");
    }

    #[test]
    fn test_suggest_output_path() {
        let input = PathBuf::from("/docs/readme.md");
        let output = HtmlDocumentExporter::suggest_output_path(&input);
        assert_eq!(output, PathBuf::from("/docs/readme.html"));
    }
}
