extern crate regex;

use super::{
    search::{element_inner, find_element, search_text, text_content},
    site::Site,
};
use crate::submission::{Difficulty, SubmissionRecord};
use regex::Regex;

pub(super) struct RegexSet {
    title: Regex,
    description_block: Regex,
    description: Regex,
    constraints: Regex,
    list_item: Regex,
    meta_description: Regex,
    canonical_url: Regex,
    editor: Regex,
    code_editor: Regex,
    textarea: Regex,
    view_line: Regex,
    submission_result: Regex,
    pre: Regex,
    language: Regex,
    difficulty: Regex,
    topic: Regex,
}
impl RegexSet {
    pub(super) fn new() -> Self {
        RegexSet {
            title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap(),
            description_block: Regex::new(
                r#"(?i)<div\b[^>]*data-track-load="description_content"[^>]*>"#,
            )
            .unwrap(),
            description: Regex::new(r#"(?i)<div\b[^>]*class="[^"]*description[^"]*"[^>]*>"#)
                .unwrap(),
            constraints: Regex::new(r#"(?i)<div\b[^>]*class="[^"]*constraints[^"]*"[^>]*>"#)
                .unwrap(),
            list_item: Regex::new(r"(?i)<li\b[^>]*>").unwrap(),
            meta_description: Regex::new(
                r#"(?i)<meta\b[^>]*(?:name="description"[^>]*content="([^"]*)"|content="([^"]*)"[^>]*name="description")"#,
            )
            .unwrap(),
            canonical_url: Regex::new(
                r#"(?i)<meta\b[^>]*(?:property="og:url"[^>]*content="([^"]*)"|content="([^"]*)"[^>]*property="og:url")"#,
            )
            .unwrap(),
            editor: Regex::new(r#"(?i)<div\b[^>]*class="[^"]*\bmonaco-editor\b[^"]*"[^>]*>"#)
                .unwrap(),
            code_editor: Regex::new(r#"(?i)<div\b[^>]*class="[^"]*\bcode-editor\b[^"]*"[^>]*>"#)
                .unwrap(),
            textarea: Regex::new(r"(?is)<textarea\b[^>]*>(.*?)</textarea>").unwrap(),
            view_line: Regex::new(r#"(?i)<div\b[^>]*class="view-line"[^>]*>"#).unwrap(),
            submission_result: Regex::new(
                r#"(?i)<[a-z][a-z0-9]*\b[^>]*data-e2e-locator="submission-result"[^>]*>"#,
            )
            .unwrap(),
            pre: Regex::new(r"(?i)<pre\b[^>]*>").unwrap(),
            language: Regex::new(r#"(?i)data-mode-id="([^"]*)""#).unwrap(),
            difficulty: Regex::new(r#"(?i)class="[^"]*\btext-difficulty-(easy|medium|hard)\b"#)
                .unwrap(),
            topic: Regex::new(r#"(?i)href="/tag/([a-z0-9-]+)/?""#).unwrap(),
        }
    }

    fn lines(&self, container: &str) -> Option<String> {
        let lines: Vec<String> = self
            .view_line
            .find_iter(container)
            .map(|m| text_content(element_inner(container, m)))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn title(&self, document: &str, site: Site) -> String {
        search_text(document, &self.title)
            .map(|t| {
                let t = text_content(&t);
                t.trim().trim_end_matches(site.title_suffix()).trim().to_string()
            })
            .unwrap_or_default()
    }

    fn description(&self, document: &str) -> (String, Vec<String>) {
        let mut description = String::new();
        let mut constraints = Vec::new();
        if let Some(block) = find_element(document, &self.description_block) {
            if let Some(d) = find_element(block, &self.description) {
                description = text_content(d).trim().to_string();
            }
            if let Some(c) = find_element(block, &self.constraints) {
                constraints = self
                    .list_item
                    .find_iter(c)
                    .map(|m| text_content(element_inner(c, m)).trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
        }
        if description.is_empty() {
            let meta = search_text(document, &self.meta_description)
                .map(|m| text_content(&m))
                .unwrap_or_default();
            let mut parts = meta.splitn(2, "Constraints:");
            description = parts.next().unwrap_or_default().trim().to_string();
            if let Some(rest) = parts.next() {
                constraints = rest.split(',').map(|c| c.trim().to_string()).collect();
            }
        }
        (description, constraints)
    }

    fn source_code(&self, document: &str) -> String {
        let editor = find_element(document, &self.editor);
        editor
            .and_then(|e| search_text(e, &self.textarea))
            .map(|t| text_content(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| editor.and_then(|e| self.lines(e)))
            .or_else(|| {
                find_element(document, &self.submission_result)
                    .and_then(|r| find_element(r, &self.pre))
                    .map(text_content)
            })
            .or_else(|| find_element(document, &self.code_editor).and_then(|e| self.lines(e)))
            .unwrap_or_default()
    }

    fn topics(&self, document: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for c in self.topic.captures_iter(document) {
            let tag = c[1].to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Read a whole document snapshot. Missing parts are left empty.
    pub(super) fn parse(&self, document: &str, site: Site) -> SubmissionRecord {
        let (description, constraints) = self.description(document);
        SubmissionRecord {
            title: self.title(document, site),
            description,
            constraints,
            source_code: self.source_code(document),
            language: search_text(document, &self.language).unwrap_or_default(),
            problem_url: search_text(document, &self.canonical_url)
                .map(|u| text_content(&u))
                .unwrap_or_default(),
            difficulty: search_text(document, &self.difficulty).and_then(|d| Difficulty::parse(&d)),
            tags: self.topics(document),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PAGE: &str = r#"<html><head>
<title>Two Sum II - LeetCode</title>
<meta name="description" content="Given an array. Constraints: 2 &lt;= n, n &lt;= 10">
<meta property="og:url" content="https://leetcode.com/problems/two-sum-ii/">
</head><body>
<div data-track-load="description_content">
  <div class="elfjS description__x"><p>Find two numbers &amp; return them.</p></div>
  <div class="constraints__y"><ul><li>2 &lt;= n</li><li> </li><li>n &lt;= 10</li></ul></div>
</div>
<div class="text-difficulty-medium">Medium</div>
<a href="/tag/array/">Array</a><a href="/tag/two-pointers/">Two Pointers</a><a href="/tag/array/">Array</a>
<div class="monaco-editor" data-mode-id="python">
  <textarea class="inputarea"></textarea>
  <div class="view-lines">
    <div style="top:0px" class="view-line"><span>class&nbsp;Solution:</span></div>
    <div style="top:19px" class="view-line"><span>&nbsp;&nbsp;&nbsp;&nbsp;pass</span></div>
  </div>
</div>
</body></html>"#;

    #[test]
    fn structured_page() {
        let record = RegexSet::new().parse(PAGE, Site::LeetCode);
        assert_eq!(record.title, "Two Sum II");
        assert_eq!(record.description, "Find two numbers & return them.");
        assert_eq!(record.constraints, vec!["2 <= n", "n <= 10"]);
        assert_eq!(record.source_code, "class Solution:\n    pass");
        assert_eq!(record.language, "python");
        assert_eq!(record.problem_url, "https://leetcode.com/problems/two-sum-ii/");
        assert_eq!(record.difficulty, Some(Difficulty::Medium));
        assert_eq!(record.tags, vec!["array", "two-pointers"]);
        assert!(record.is_not_empty());
    }

    #[test]
    fn meta_description_fallback() {
        let page = r#"<title>Two Sum - LeetCode</title>
<meta content="Given nums. Constraints: 2 &lt;= n, -10 &lt;= x" name="description">"#;
        let record = RegexSet::new().parse(page, Site::LeetCode);
        assert_eq!(record.description, "Given nums.");
        assert_eq!(record.constraints, vec!["2 <= n", "-10 <= x"]);
    }

    #[test]
    fn textarea_value_wins() {
        let page = r#"<div class="monaco-editor"><textarea>int main() { return a &lt; b; }</textarea>
<div class="view-line">ignored</div></div>"#;
        assert_eq!(
            RegexSet::new().parse(page, Site::LeetCode).source_code,
            "int main() { return a < b; }"
        );
    }

    #[test]
    fn submission_result_fallback() {
        let page = r#"<div data-e2e-locator="submission-result">Accepted<pre><code>print(1)</code></pre></div>
<div class="code-editor"><div class="view-line">later</div></div>"#;
        assert_eq!(RegexSet::new().parse(page, Site::LeetCode).source_code, "print(1)");
    }

    #[test]
    fn generic_editor_fallback() {
        let page = r#"<div class="code-editor"><div class="view-line">a</div><div class="view-line">b</div></div>"#;
        assert_eq!(RegexSet::new().parse(page, Site::LeetCode).source_code, "a\nb");
    }

    #[test]
    fn empty_page() {
        let record = RegexSet::new().parse("<html></html>", Site::Programmers);
        assert_eq!(record, SubmissionRecord::default());
        assert!(!record.is_not_empty());
    }
}
