use crate::submission::SubmissionRecord;

mod parse;
pub mod search;
pub mod site;
mod verdict;

pub use site::Site;

/// Page knowledge of the supported judges: the accepted-result predicate and
/// the extraction of a [`SubmissionRecord`] from a document snapshot.
pub struct Judge {
    parse: parse::RegexSet,
    verdict: verdict::RegexSet,
}
impl Judge {
    pub fn new() -> Self {
        Judge {
            parse: parse::RegexSet::new(),
            verdict: verdict::RegexSet::new(),
        }
    }
    pub fn is_accepted(&self, added: &str) -> bool {
        self.verdict.is_accepted(added)
    }
    pub fn parse(&self, document: &str, site: Site) -> SubmissionRecord {
        self.parse.parse(document, site)
    }
}
impl Default for Judge {
    fn default() -> Self {
        Self::new()
    }
}
