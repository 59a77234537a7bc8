extern crate regex;
extern crate serde;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
impl Difficulty {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}
impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        })
    }
}

/// Everything read from the page at the moment a submission was accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRecord {
    pub title: String,
    pub description: String,
    pub constraints: Vec<String>,
    pub source_code: String,
    pub language: String,
    pub problem_url: String,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
}
impl SubmissionRecord {
    pub fn is_not_empty(&self) -> bool {
        !self.title.trim().is_empty() && !self.source_code.trim().is_empty()
    }
}

const EXTENSIONS: [(&str, &str); 20] = [
    ("javascript", "js"),
    ("typescript", "ts"),
    ("python", "py"),
    ("python3", "py"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("csharp", "cs"),
    ("ruby", "rb"),
    ("swift", "swift"),
    ("kotlin", "kt"),
    ("rust", "rs"),
    ("go", "go"),
    ("golang", "go"),
    ("scala", "scala"),
    ("php", "php"),
    ("r", "r"),
    ("sql", "sql"),
    ("mysql", "sql"),
    ("bash", "sh"),
];
pub const FALLBACK_EXTENSION: &str = "txt";

pub fn language_extension(language: &str) -> &'static str {
    let language = language.trim().to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(name, _)| *name == language)
        .map_or(FALLBACK_EXTENSION, |&(_, ext)| ext)
}

pub fn sanitize_title(title: &str) -> String {
    thread_local! {
        static WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    }
    WHITESPACE.with(|re| re.replace_all(title.trim(), "-").into_owned())
}

/// Where a record lands inside the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub directory: String,
    pub source: String,
    pub readme: String,
}
impl Layout {
    pub fn new(record: &SubmissionRecord, platform: &str, by_language: bool) -> Self {
        let title = sanitize_title(&record.title);
        let mut directory = format!("{}/{}", platform, title);
        if by_language && !record.language.trim().is_empty() {
            directory = format!("{}/{}", record.language.trim(), directory);
        }
        Layout {
            source: format!(
                "{}/{}.{}",
                directory,
                title,
                language_extension(&record.language)
            ),
            readme: format!("{}/README.md", directory),
            directory,
        }
    }
}
