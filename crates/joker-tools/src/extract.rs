//! HTML to plain text.
//!
//! Page furniture (scripts, styles, navigation, headers, footers) is dropped
//! with everything inside it, the remaining text is collapsed onto a single
//! line, and the result is capped at a character budget.

use scraper::{Html, Node};

/// Default character budget for extracted text.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 8000;

/// Appended when extracted text was cut to the character budget.
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Extract cleaned text from `html`, keeping at most `max_length` characters.
///
/// Text longer than `max_length` is cut to exactly `max_length` characters
/// and [`TRUNCATION_MARKER`] is appended, so the result never exceeds
/// `max_length + TRUNCATION_MARKER.chars().count()` characters.
pub fn extract_text(html: &str, max_length: usize) -> String {
    let document = Html::parse_document(html);
    let text = normalize_whitespace(&document_text(&document));
    truncate_chars(text, max_length)
}

/// Concatenate every text node outside the excluded elements, in document order.
fn document_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(t) = node.value() else {
            continue;
        };
        let excluded = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| EXCLUDED_TAGS.contains(&el.name()))
        });
        if !excluded {
            text.push_str(t);
        }
    }
    text
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Whitespace as far as stripping goes; the information separators
/// U+001C..=U+001F count as well.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn strip(s: &str) -> &str {
    s.trim_matches(is_strippable)
}

/// Collapse text onto one line.
///
/// Lines are trimmed and split on every double space; the trimmed, non-empty
/// fragments are joined with single spaces. Single spaces inside a fragment
/// are left alone.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .map(strip)
        .flat_map(|line| line.split("  "))
        .map(strip)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(mut text: String, max_length: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_length) {
        text.truncate(cut);
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn marker_len() -> usize {
        TRUNCATION_MARKER.chars().count()
    }

    #[test]
    fn test_excluded_elements_are_dropped() {
        let text = extract_text("<header>X</header><p>Y</p>", 100);
        assert_eq!(text, "Y");
    }

    #[test]
    fn test_all_furniture_tags_dropped_with_descendants() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script>var secret = 1;</script></head>
            <body>
              <nav><ul><li><a href="/">Home link</a></li></ul></nav>
              <header><h1>Site <em>banner</em></h1></header>
              <main><p>Real content here.</p></main>
              <footer><p>Copyright <span>footer text</span></p></footer>
            </body></html>"#;
        let text = extract_text(html, 1000);

        assert_eq!(text, "Real content here.");
    }

    #[test]
    fn test_title_and_body_text_kept() {
        let html = "<html><head><title>Example Domain</title></head>\n<body>\n<h1>Example</h1>\n<p>Body text.</p></body></html>";
        let text = extract_text(html, 1000);
        assert_eq!(text, "Example Domain Example Body text.");
    }

    #[test]
    fn test_comments_carry_no_text() {
        let text = extract_text("<p>visible<!-- hidden comment --></p>", 100);
        assert_eq!(text, "visible");
    }

    #[test]
    fn test_adjacent_inline_text_is_not_separated() {
        // Text nodes are concatenated without a separator.
        let text = extract_text("<p>Hello<b>World</b></p>", 100);
        assert_eq!(text, "HelloWorld");
    }

    #[test]
    fn test_normalize_lines_and_double_spaces() {
        assert_eq!(normalize_whitespace("  Hello   world  \n\n\n\n  Test  "), "Hello world Test");
        assert_eq!(normalize_whitespace("a b\r\nc\u{2028}d"), "a b c d");
        assert_eq!(normalize_whitespace("one two  three"), "one two three");
        assert_eq!(normalize_whitespace("\n \n\t\n"), "");
    }

    #[test]
    fn test_unit_separator_is_stripped() {
        assert_eq!(normalize_whitespace("\u{1f}abc\u{1f}"), "abc");
        assert_eq!(normalize_whitespace("a  \u{1f}\u{a0}b"), "a b");
    }

    #[test]
    fn test_long_run_passes_through_unsplit() {
        let run = "x".repeat(500);
        assert_eq!(normalize_whitespace(&run), run);
    }

    #[test]
    fn test_short_text_unchanged() {
        let text = extract_text("<p>Paris is the capital of France.</p>", 8000);
        assert_eq!(text, "Paris is the capital of France.");
        assert!(!text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_boundary() {
        let limit = 10;

        let exact = format!("<p>{}</p>", "a".repeat(limit));
        let text = extract_text(&exact, limit);
        assert_eq!(text, "a".repeat(limit));

        let over = format!("<p>{}</p>", "a".repeat(limit + 1));
        let text = extract_text(&over, limit);
        assert_eq!(text, format!("{}{}", "a".repeat(limit), TRUNCATION_MARKER));
        assert_eq!(text.chars().count(), limit + marker_len());
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let html = format!("<p>{}</p>", "é".repeat(20));
        let text = extract_text(&html, 5);
        assert_eq!(text, format!("ééééé{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_zero_budget() {
        assert_eq!(extract_text("<p>abc</p>", 0), TRUNCATION_MARKER);
        assert_eq!(extract_text("<p></p>", 0), "");
    }

    #[test]
    fn test_default_budget() {
        let html = format!("<p>{}</p>", "word ".repeat(4000));
        let text = extract_text(&html, DEFAULT_MAX_CONTENT_LENGTH);
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert_eq!(text.chars().count(), DEFAULT_MAX_CONTENT_LENGTH + marker_len());
    }

    proptest! {
        #[test]
        fn prop_length_is_bounded(body in ".{0,400}", limit in 0usize..200) {
            let html = format!("<html><body><p>{}</p></body></html>", body);
            let text = extract_text(&html, limit);
            prop_assert!(text.chars().count() <= limit + marker_len());
        }

        #[test]
        fn prop_header_text_never_leaks(secret in "[A-Z]{12}", visible in "[a-z]{1,40}") {
            let html = format!("<header>{}</header><p>{}</p>", secret, visible);
            let text = extract_text(&html, 8000);
            prop_assert!(!text.contains(&secret));
            prop_assert_eq!(text, visible);
        }
    }
}
