extern crate regex;

use super::search::{element_inner, text_content};
use crate::config::watcher::SUCCESS_MARKERS;
use regex::Regex;

pub(super) struct RegexSet {
    result: Regex,
}
impl RegexSet {
    pub(super) fn new() -> Self {
        RegexSet {
            result: Regex::new(
                r#"(?i)<[a-z][a-z0-9]*\b[^>]*(?:class="[^"]*\b(?:text-success|success__3Ai7|success__1x4n|modal-title)\b[^"]*"|data-e2e-locator="submission-result")[^>]*>"#,
            )
            .unwrap(),
        }
    }

    /// Whether an added node (or anything inside it) is a result element
    /// announcing an accepted submission.
    pub(super) fn is_accepted(&self, fragment: &str) -> bool {
        self.result.find_iter(fragment).any(|m| {
            let text = text_content(element_inner(fragment, m));
            SUCCESS_MARKERS.iter().any(|marker| text.contains(marker))
        })
    }
}

#[cfg(test)]
mod test {
    use super::RegexSet;

    #[test]
    fn accepted_results() {
        let set = RegexSet::new();
        assert!(set.is_accepted(
            r#"<div data-e2e-locator="submission-result"><span>Accepted</span></div>"#
        ));
        assert!(set.is_accepted(r#"<section><span class="text-success">Success</span></section>"#));
        assert!(set.is_accepted(r#"<h4 class="modal-title">정답입니다!</h4>"#));
    }

    #[test]
    fn other_states() {
        let set = RegexSet::new();
        assert!(!set.is_accepted(
            r#"<div data-e2e-locator="submission-result">Wrong Answer</div>"#
        ));
        assert!(!set.is_accepted(r#"<div class="note">Accepted</div>"#));
        assert!(!set.is_accepted(r#"<span class="text-success"></span><p>Accepted</p>"#));
    }
}
