//! Markdown Preview Rendering
//!
//! Renders the document the way the preview pane shows it: GitHub-flavoured
//! Markdown to HTML with raw HTML passed through and fenced code highlighted,
//! plus the plain-text reading of the same content for clipboard use.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use regex::Regex;
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::config::PreviewConfig;

/// Theme used when the configured one is not bundled with syntect
pub const FALLBACK_THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
static LANGUAGE: OnceLock<Regex> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Language named by a fence info string (`rust,no_run` or `js title=x` → first word)
pub fn fence_language(info: &str) -> Option<&str> {
    let re = LANGUAGE.get_or_init(|| Regex::new(r"^(\w+)").expect("static regex"));
    re.captures(info.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A fenced block held back until its end tag decides how it renders
struct PendingBlock<'a> {
    language: String,
    code: String,
    raw: Vec<Event<'a>>,
}

/// Both renderings of the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPreview {
    pub html: String,
    pub text: String,
}

/// Renders Markdown for the preview pane
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    options: Options,
    highlight_code: bool,
    theme_name: String,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::with_config(&PreviewConfig::default())
    }

    pub fn with_config(config: &PreviewConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            options,
            highlight_code: config.highlight_code,
            theme_name: config.code_theme.clone(),
        }
    }

    fn theme(&self) -> Option<&'static Theme> {
        let themes = &theme_set().themes;
        themes.get(&self.theme_name).or_else(|| {
            log::warn!(
                "Unknown code theme {:?}, falling back to {}",
                self.theme_name,
                FALLBACK_THEME
            );
            themes.get(FALLBACK_THEME)
        })
    }

    /// Highlight a fenced block, or `None` to let it render as plain code
    fn highlight(&self, language: &str, code: &str) -> Option<String> {
        let syntaxes = syntax_set();
        let syntax = syntaxes.find_syntax_by_token(language)?;
        let theme = self.theme()?;
        match syntect::html::highlighted_html_for_string(code, syntaxes, syntax, theme) {
            Ok(highlighted) => Some(highlighted),
            Err(e) => {
                log::warn!("Highlighting {} block failed: {}", language, e);
                None
            }
        }
    }

    /// Replace highlightable fenced code blocks with pre-rendered HTML
    fn highlight_events<'a>(&self, parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut pending: Option<PendingBlock<'a>> = None;

        for event in parser {
            match pending.take() {
                Some(mut block) => match event {
                    Event::End(Tag::CodeBlock(kind)) => {
                        match self.highlight(&block.language, &block.code) {
                            Some(highlighted) => events.push(Event::Html(CowStr::from(highlighted))),
                            None => {
                                events.append(&mut block.raw);
                                events.push(Event::End(Tag::CodeBlock(kind)));
                            }
                        }
                    }
                    other => {
                        if let Event::Text(text) = &other {
                            block.code.push_str(text);
                        }
                        block.raw.push(other);
                        pending = Some(block);
                    }
                },
                None => match event {
                    Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if self.highlight_code => {
                        let language = fence_language(&info).map(str::to_string);
                        let start = Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)));
                        match language {
                            Some(language) => {
                                pending = Some(PendingBlock {
                                    language,
                                    code: String::new(),
                                    raw: vec![start],
                                })
                            }
                            None => events.push(start),
                        }
                    }
                    other => events.push(other),
                },
            }
        }

        if let Some(mut block) = pending {
            events.append(&mut block.raw);
        }
        events
    }

    /// Render Markdown to an HTML fragment
    pub fn render_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let events = self.highlight_events(parser);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    /// Render Markdown to the text a reader sees in the preview
    pub fn render_plain_text(&self, markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak => text.push(' '),
                Event::HardBreak => text.push('\n'),
                Event::Rule => end_block(&mut text, true),
                Event::FootnoteReference(label) => {
                    text.push('[');
                    text.push_str(&label);
                    text.push(']');
                }
                Event::End(tag) => match tag {
                    Tag::Paragraph | Tag::Heading(..) | Tag::CodeBlock(_) | Tag::Table(_) => {
                        end_block(&mut text, true)
                    }
                    Tag::Item | Tag::TableHead | Tag::TableRow => end_block(&mut text, false),
                    Tag::TableCell => text.push('\t'),
                    _ => {}
                },
                _ => {}
            }
        }

        text.trim_end().to_string()
    }

    /// Render both representations
    pub fn render(&self, markdown: &str) -> RenderedPreview {
        RenderedPreview {
            html: self.render_html(markdown),
            text: self.render_plain_text(markdown),
        }
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminate a block: one newline, or a blank line for paragraph-like blocks
fn end_block(text: &mut String, blank_line: bool) {
    if text.is_empty() {
        return;
    }
    while text.ends_with('\t') {
        text.pop();
    }
    let wanted = if blank_line { "\n\n" } else { "\n" };
    while !text.ends_with(wanted) {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_CONTENT;

    #[test]
    fn test_renders_basic_markdown() {
        let html = PreviewRenderer::new().render_html("# Hello\n\nWorld");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_gfm_extensions() {
        let renderer = PreviewRenderer::new();
        let html = renderer.render_html("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = PreviewRenderer::new().render_html("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_fenced_code_with_language_is_highlighted() {
        let html = PreviewRenderer::new().render_html(DEFAULT_CONTENT);
        assert!(html.contains("<pre style="));
        assert!(!html.contains("<code class=\"language-js\">"));
        assert!(html.contains("console"));
    }

    #[test]
    fn test_fenced_code_without_language_is_plain() {
        let html = PreviewRenderer::new().render_html("```\nlet x = 1;\n```");
        assert!(html.contains("<pre><code>let x = 1;\n</code></pre>"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let html = PreviewRenderer::new().render_html("```nosuchlang\nabc\n```");
        assert!(html.contains("<code class=\"language-nosuchlang\">abc\n</code>"));
    }

    #[test]
    fn test_highlighting_can_be_disabled() {
        let config = PreviewConfig {
            highlight_code: false,
            ..PreviewConfig::default()
        };
        let html = PreviewRenderer::with_config(&config).render_html("```rust\nfn main() {}\n```");
        assert!(html.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), Some("rust"));
        assert_eq!(fence_language("js title=x"), Some("js"));
        assert_eq!(fence_language("c++"), Some("c"));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_plain_text() {
        let text = PreviewRenderer::new()
            .render_plain_text("# Title\n\nSome *em* text\nwrapped\n\n- one\n- two");
        assert_eq!(text, "Title\n\nSome em text wrapped\n\none\ntwo");
    }

    #[test]
    fn test_plain_text_of_default_document() {
        let text = PreviewRenderer::new().render_plain_text(DEFAULT_CONTENT);
        assert!(text.starts_with("Hello, Markdown!\n\n"));
        assert!(text.contains("Real-time preview\nExport to PDF\nCopy to clipboard"));
        assert!(text.ends_with("console.log(\"This is a code block\");"));
    }
}
