extern crate html_escape;
extern crate regex;

use regex::{Match, Regex};

pub fn search_text(text: &str, regex: &Regex) -> Option<String> {
    regex
        .captures(text)
        .and_then(|v| v.iter().skip(1).flatten().next())
        .map(|v| v.as_str().to_owned())
}

fn tag_name(open: &str) -> &str {
    let rest = open.trim_start_matches('<');
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or_else(|| rest.len());
    &rest[..end]
}
fn starts_with_tag(rest: &str, tag: &str) -> bool {
    match rest.get(..tag.len()) {
        Some(head) if head.eq_ignore_ascii_case(tag) => rest[tag.len()..]
            .chars()
            .next()
            .map_or(true, |c| c == '>' || c == '/' || c.is_whitespace()),
        _ => false,
    }
}

/// Markup between `open` (an opening tag found in `html`) and its matching
/// closing tag. An unclosed element runs to the end of `html`.
pub fn element_inner<'a>(html: &'a str, open: Match<'a>) -> &'a str {
    let tag = tag_name(open.as_str());
    if tag.is_empty() || open.as_str().ends_with("/>") {
        return "";
    }
    let body = &html[open.end()..];
    let mut depth = 1usize;
    let mut pos = 0;
    while let Some(offset) = body[pos..].find('<') {
        let at = pos + offset;
        let rest = &body[at + 1..];
        if let Some(closing) = rest.strip_prefix('/') {
            if starts_with_tag(closing, tag) {
                depth -= 1;
                if depth == 0 {
                    return &body[..at];
                }
            }
        } else if starts_with_tag(rest, tag) {
            depth += 1;
        }
        pos = at + 1;
    }
    body
}

/// Inner markup of the first element whose opening tag matches `regex`.
pub fn find_element<'a>(html: &'a str, regex: &Regex) -> Option<&'a str> {
    regex.find(html).map(|m| element_inner(html, m))
}

/// What `textContent` would give for a markup fragment.
pub fn text_content(fragment: &str) -> String {
    thread_local! {
        static TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    }
    let stripped = TAG.with(|re| re.replace_all(fragment, "").into_owned());
    html_escape::decode_html_entities(&stripped).replace('\u{a0}', " ")
}
