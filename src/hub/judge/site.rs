extern crate reqwest;

use reqwest::Url;
use std::fmt;

/// Judge sites whose pages are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    LeetCode,
    Programmers,
}
impl Site {
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        let matches = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));
        if matches("leetcode.com") {
            Some(Self::LeetCode)
        } else if matches("programmers.co.kr") {
            Some(Self::Programmers)
        } else {
            None
        }
    }
    /// Top-level directory of uploaded solutions.
    pub fn platform(&self) -> &'static str {
        match self {
            Self::LeetCode => "LeetCode",
            Self::Programmers => "Programmers",
        }
    }
    pub(super) fn title_suffix(&self) -> &'static str {
        match self {
            Self::LeetCode => " - LeetCode",
            Self::Programmers => " | 프로그래머스 스쿨",
        }
    }
}
impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform())
    }
}

#[cfg(test)]
mod test {
    use super::Site;

    #[test]
    fn hosts() {
        assert_eq!(
            Site::from_url("https://leetcode.com/problems/two-sum/"),
            Some(Site::LeetCode)
        );
        assert_eq!(
            Site::from_url("https://school.programmers.co.kr/learn/courses/30/lessons/1"),
            Some(Site::Programmers)
        );
        assert_eq!(Site::from_url("https://notleetcode.com/"), None);
        assert_eq!(Site::from_url("not a url"), None);
    }
}
