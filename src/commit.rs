use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

use crate::git::RawCommit;

static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]*)\))?(?P<bang>!)?:\s*(?P<desc>.+)$")
        .expect("invalid conventional commit regex")
});

const BREAKING_MARKER: &str = "BREAKING CHANGE";

/// The changelog section a commit is listed under
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Category {
    #[strum(serialize = "Breaking Changes")]
    Breaking,
    Added,
    Fixed,
    Changed,
    Deprecated,
    Removed,
    Performance,
    Security,
    Documentation,
    Tests,
    Maintenance,
    Other,
}

impl Category {
    /// The order sections appear in a rendered changelog
    pub const DISPLAY_ORDER: [Category; 12] = [
        Category::Breaking,
        Category::Added,
        Category::Fixed,
        Category::Changed,
        Category::Deprecated,
        Category::Removed,
        Category::Performance,
        Category::Security,
        Category::Documentation,
        Category::Tests,
        Category::Maintenance,
        Category::Other,
    ];

    /// Looks up the category for a conventional commit type. Matching is case
    /// sensitive and unknown types fall back to `Category::Other`.
    pub fn for_type(commit_type: &str) -> Category {
        TYPE_TABLE
            .iter()
            .find(|&&(t, _)| t == commit_type)
            .map(|&(_, cat)| cat)
            .unwrap_or(Category::Other)
    }
}

/// Conventional commit types and the category each one maps to
pub const TYPE_TABLE: [(&str, Category); 12] = [
    ("feat", Category::Added),
    ("fix", Category::Fixed),
    ("docs", Category::Documentation),
    ("refactor", Category::Changed),
    ("style", Category::Changed),
    ("perf", Category::Performance),
    ("test", Category::Tests),
    ("chore", Category::Maintenance),
    ("ci", Category::Maintenance),
    ("build", Category::Maintenance),
    ("revert", Category::Removed),
    ("deprecate", Category::Deprecated),
];

/// A `RawCommit` together with what its subject says about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub commit: RawCommit,
    pub category: Category,
    /// The conventional type token, `None` if the subject isn't conventional
    pub commit_type: Option<String>,
    /// The scope, empty when the subject has none
    pub scope: String,
    pub description: String,
}

impl ClassifiedCommit {
    pub fn short_hash(&self) -> &str {
        self.commit.short_hash()
    }
}

/// Classifies a commit by its subject line. Never fails: subjects that are
/// not conventional commits land in `Category::Other` with the whole subject
/// as description.
///
/// # Example
///
/// ```
/// # use git_changelog::{classify, Category, RawCommit};
/// let raw = RawCommit {
///     hash: "0123456789abcdef".into(),
///     subject: "fix(api)!: crash on null".into(),
///     author: "Jane".into(),
///     date: "2024-01-02".into(),
///     body: String::new(),
/// };
/// let commit = classify(&raw);
///
/// assert_eq!(commit.category, Category::Breaking);
/// assert_eq!(commit.scope, "api");
/// assert_eq!(commit.description, "crash on null");
/// ```
pub fn classify(raw: &RawCommit) -> ClassifiedCommit {
    let Some(caps) = CONVENTIONAL_REGEX.captures(&raw.subject) else {
        return ClassifiedCommit {
            commit: raw.clone(),
            category: Category::Other,
            commit_type: None,
            scope: String::new(),
            description: raw.subject.clone(),
        };
    };

    let commit_type = &caps["type"];
    let breaking = caps.name("bang").is_some()
        || raw.subject.contains(BREAKING_MARKER)
        || raw.body.contains(BREAKING_MARKER);
    let category = if breaking {
        Category::Breaking
    } else {
        Category::for_type(commit_type)
    };

    ClassifiedCommit {
        commit: raw.clone(),
        category,
        commit_type: Some(commit_type.to_owned()),
        scope: caps
            .name("scope")
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default(),
        description: caps["desc"].to_owned(),
    }
}

/// The conventional type token of `subject`, if it has one
pub fn conventional_type(subject: &str) -> Option<&str> {
    CONVENTIONAL_REGEX
        .captures(subject)
        .and_then(|caps| caps.name("type"))
        .map(|m| m.as_str())
}
