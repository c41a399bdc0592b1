//! Plain-text helpers: tag stripping, field fallback, HTML escaping.

use scraper::{Html, Node};

/// Elements whose text never reaches a description.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Elements that separate words when their tags are removed.
const BREAKING_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th",
    "blockquote", "section", "article", "figcaption",
];

// ---------------------------------------------------------------------------
// strip_html
// ---------------------------------------------------------------------------

/// Reduce CMS markup to a single line of plain text.
///
/// Removes tags, decodes entities, and collapses whitespace. Script, style,
/// and similar content is dropped from the original markup only; anything
/// that appears after decoding is escaped text, so later passes remove its
/// tags but keep its words. Repeats until the output is stable, so
/// `strip_html(strip_html(x)) == strip_html(x)`.
pub fn strip_html(input: &str) -> String {
    let mut current = extract_text(input, SKIPPED_ELEMENTS);

    // A pass that changes the text also shortens it, so this terminates.
    loop {
        let next = extract_text(&current, &[]);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Text content of `input` parsed as an HTML fragment, leaving out text
/// inside any of the `skipped` elements.
fn extract_text(input: &str, skipped: &[&str]) -> String {
    if !input.contains(['<', '&']) {
        return collapse_whitespace(input);
    }

    let fragment = Html::parse_fragment(input);
    let mut text = String::with_capacity(input.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(t) => {
                let hidden = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|el| skipped.contains(&el.name()))
                });
                if !hidden {
                    text.push_str(t);
                }
            }
            Node::Element(el) if BREAKING_ELEMENTS.contains(&el.name()) => text.push(' '),
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Fallback chain
// ---------------------------------------------------------------------------

/// `Some(trimmed)` for a value with visible content, `None` otherwise.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the first present value: explicit override, then remote content,
/// then the static fallback. Blank strings count as missing.
pub fn coalesce(explicit: Option<&str>, remote: Option<&str>, fallback: &str) -> String {
    present(explicit)
        .or_else(|| present(remote))
        .unwrap_or(fallback.trim())
        .to_string()
}

/// [`coalesce`] for fields with no static default.
pub fn coalesce_opt(explicit: Option<&str>, remote: Option<&str>) -> Option<String> {
    present(explicit).or_else(|| present(remote)).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
