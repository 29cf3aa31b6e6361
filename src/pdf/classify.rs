//! Line classification for the PDF layout engine
//!
//! Pure prefix matching, no Markdown parsing. The first matching rule wins.

/// What a single source line renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `# `, `## ` or `### ` heading with the marker stripped
    Heading { level: u8, text: &'a str },
    /// `- ` list item with the marker stripped
    Bullet(&'a str),
    /// A line starting with three backticks. Only the delimiter is skipped;
    /// lines between fences are classified like any other line.
    Fence,
    /// Empty or whitespace-only
    Blank,
    /// Anything else
    Paragraph(&'a str),
}

/// Classify one line (without its line terminator)
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(text) = line.strip_prefix("# ") {
        LineKind::Heading { level: 1, text }
    } else if let Some(text) = line.strip_prefix("## ") {
        LineKind::Heading { level: 2, text }
    } else if let Some(text) = line.strip_prefix("### ") {
        LineKind::Heading { level: 3, text }
    } else if let Some(text) = line.strip_prefix("- ") {
        LineKind::Bullet(text)
    } else if line.starts_with("```") {
        LineKind::Fence
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph(line)
    }
}

/// Split a document into lines the way the layout engine reads them:
/// on `\n`, keeping empty trailing lines, with a trailing `\r` removed.
pub fn source_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        assert_eq!(classify("# Title"), LineKind::Heading { level: 1, text: "Title" });
        assert_eq!(classify("## Title"), LineKind::Heading { level: 2, text: "Title" });
        assert_eq!(classify("### Title"), LineKind::Heading { level: 3, text: "Title" });
    }

    #[test]
    fn test_deeper_or_unspaced_headings_are_paragraphs() {
        assert_eq!(classify("#### Deep"), LineKind::Paragraph("#### Deep"));
        assert_eq!(classify("#Title"), LineKind::Paragraph("#Title"));
    }

    #[test]
    fn test_bullet() {
        assert_eq!(classify("- item"), LineKind::Bullet("item"));
        assert_eq!(classify("-item"), LineKind::Paragraph("-item"));
        assert_eq!(classify("  - nested"), LineKind::Paragraph("  - nested"));
    }

    #[test]
    fn test_fence() {
        assert_eq!(classify("```"), LineKind::Fence);
        assert_eq!(classify("```rust"), LineKind::Fence);
        assert_eq!(classify("``not"), LineKind::Paragraph("``not"));
    }

    #[test]
    fn test_blank() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("  \t "), LineKind::Blank);
    }

    #[test]
    fn test_heading_marker_alone_is_heading_with_empty_text() {
        assert_eq!(classify("# "), LineKind::Heading { level: 1, text: "" });
    }

    #[test]
    fn test_source_lines_strips_carriage_returns() {
        let lines: Vec<&str> = source_lines("a\r\nb\n\nc\n").collect();
        assert_eq!(lines, vec!["a", "b", "", "c", ""]);
    }
}
