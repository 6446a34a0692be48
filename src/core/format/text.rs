use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Reduces an HTML fragment to a single line of text.
///
/// Script and style blocks go away with their content, every other tag
/// becomes a space, and whitespace runs collapse to one space.
pub fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Cuts `text` to `max_length` characters and appends `...` when it was longer.
/// The suffix is not counted against the limit.
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let head: String = text.chars().take(max_length).collect();
    format!("{}...", head.trim_end())
}

/// Renders an article body as wrapped plain text, keeping paragraphs and lists.
pub fn html_to_text(html: &str, width: usize) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match html2text::config::plain().string_from_read(html.as_bytes(), width.max(20)) {
        Ok(text) => text.trim_end().to_string(),
        Err(error) => {
            tracing::debug!(error = %error, "html render failed, falling back to stripped text");
            strip_html(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_tags() {
        assert_eq!(strip_html("<p>Hi <b>there</b></p>"), "Hi there");
    }

    #[test]
    fn drops_script_and_style_content() {
        let html = r#"<style>p { color: red; }</style><p>Salaam</p><SCRIPT type="text/javascript">
            alert("x");
        </SCRIPT><p>all</p>"#;
        assert_eq!(strip_html(html), "Salaam all");
    }

    #[test]
    fn collapses_whitespace_and_handles_empty_input() {
        assert_eq!(strip_html("  line one\n\n\tline two  "), "line one line two");
        assert_eq!(strip_html(""), "");
        assert_eq!(strip_html("<br/><hr>"), "");
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_appends_ellipsis_past_limit() {
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("hello world", 6), "hello...");
        assert_eq!(truncate("hello world", 7), "hello w...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("السلام عليكم", 6), "السلام...");
    }

    #[test]
    fn html_to_text_keeps_paragraph_breaks() {
        let text = html_to_text("<p>First paragraph.</p><p>Second paragraph.</p>", 80);
        assert!(text.contains("First paragraph."));
        assert!(text.contains("Second paragraph."));
        assert!(text.contains('\n'));
        assert_eq!(html_to_text("   ", 80), "");
    }
}
