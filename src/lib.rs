//! Generates changelogs from git history.
//!
//! Commit subjects are classified by their conventional-commit type into a
//! fixed set of categories, grouped, and rendered in one of three layouts
//! (`keepachangelog`, `conventional` or `grouped`). The result is printed,
//! written to a file, or merged below the title of an existing changelog.

#[macro_use]
mod macros;
mod changelog;
mod commit;
pub mod config;
pub mod error;
pub mod fmt;
pub mod git;
mod sectionmap;
pub mod writer;

pub use changelog::{Changelog, Collected, Outcome};
pub use commit::{classify, conventional_type, Category, ClassifiedCommit, TYPE_TABLE};
pub use fmt::{ChangelogFormat, ReleaseLabels};
pub use git::{GitCli, RawCommit, RecordSource};
pub use sectionmap::SectionMap;
pub use writer::OutputTarget;

// The default config file
pub const DEFAULT_CONFIG_FILE: &str = ".changelog.toml";
