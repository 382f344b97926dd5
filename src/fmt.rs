mod conventional;
mod grouped;
mod keepachangelog;

use std::{io, result::Result as StdResult, str::FromStr};

use strum::{Display, EnumString};
use time::{macros::format_description, OffsetDateTime};

pub use self::{
    conventional::ConventionalWriter, grouped::GroupedWriter,
    keepachangelog::KeepAChangelogWriter,
};
use crate::{commit::ClassifiedCommit, error::Result, sectionmap::SectionMap};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ChangelogFormat {
    #[default]
    #[strum(serialize = "keepachangelog")]
    KeepAChangelog,
    #[strum(serialize = "conventional")]
    Conventional,
    #[strum(serialize = "grouped")]
    Grouped,
}

impl<'de> serde::de::Deserialize<'de> for ChangelogFormat {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl ChangelogFormat {
    /// Renders `sm` in this format to a string
    pub fn render(self, labels: &ReleaseLabels, sm: &SectionMap) -> Result<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        match self {
            ChangelogFormat::KeepAChangelog => {
                KeepAChangelogWriter::new(&mut buf).write_changelog(labels, sm)?
            }
            ChangelogFormat::Conventional => {
                ConventionalWriter::new(&mut buf).write_changelog(labels, sm)?
            }
            ChangelogFormat::Grouped => GroupedWriter::new(&mut buf).write_changelog(labels, sm)?,
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// The names a release is rendered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLabels {
    /// Where the range starts
    pub from: String,
    /// The version label, or the ref the range ends at
    pub to: String,
    /// The release date, `YYYY-MM-DD`
    pub date: String,
}

impl ReleaseLabels {
    pub fn new<S: Into<String>>(from: S, to: S, date: S) -> Self {
        ReleaseLabels {
            from: from.into(),
            to: to.into(),
            date: date.into(),
        }
    }
}

/// Today's date as `YYYY-MM-DD`, in local time when the offset is known
pub fn today() -> Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[year]-[month]-[day]"))
        .map_err(Into::into)
}

/// A trait that allows writing a changelog in one of the supported layouts.
/// The single required function `write_changelog()` accepts a `SectionMap`
/// which can be thought of as a changelog "AST" of sorts.
pub trait FormatWriter {
    /// Writes a changelog for the release named by `labels`
    fn write_changelog(&mut self, labels: &ReleaseLabels, section_map: &SectionMap) -> Result<()>;
}

/// Writes one `### {category}` section per non-empty category, each entry
/// formatted by `entry`
pub(crate) fn write_categories<W, F>(out: &mut W, sm: &SectionMap, entry: F) -> Result<()>
where
    W: io::Write + ?Sized,
    F: Fn(&ClassifiedCommit) -> String,
{
    for (category, commits) in sm.categories() {
        write!(out, "\n### {category}\n\n")?;
        for commit in commits {
            writeln!(out, "{}", entry(commit))?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{commit::classify, git::RawCommit};

    pub(crate) fn section_map(commits: &[(&str, &str, &str)]) -> SectionMap {
        SectionMap::from_commits(
            commits
                .iter()
                .enumerate()
                .map(|(i, &(subject, date, author))| {
                    classify(&RawCommit {
                        hash: format!("{i:02}abcdef0123456789"),
                        subject: subject.into(),
                        author: author.into(),
                        date: date.into(),
                        body: String::new(),
                    })
                })
                .collect(),
        )
    }

    pub(crate) fn labels() -> ReleaseLabels {
        ReleaseLabels::new("v1.0.0", "v1.1.0", "2024-05-01")
    }

    #[test]
    fn parse_format() {
        assert_eq!(
            "keepachangelog".parse::<ChangelogFormat>().unwrap(),
            ChangelogFormat::KeepAChangelog
        );
        assert_eq!(
            "Conventional".parse::<ChangelogFormat>().unwrap(),
            ChangelogFormat::Conventional
        );
        assert_eq!(
            "GROUPED".parse::<ChangelogFormat>().unwrap(),
            ChangelogFormat::Grouped
        );
        assert!("json".parse::<ChangelogFormat>().is_err());
        assert_eq!(ChangelogFormat::default(), ChangelogFormat::KeepAChangelog);
        assert_eq!(ChangelogFormat::KeepAChangelog.to_string(), "keepachangelog");
    }

    #[test]
    fn render_dispatches_on_format() {
        let sm = section_map(&[("feat: add login", "2024-05-01", "Jane")]);
        let labels = labels();

        let kac = ChangelogFormat::KeepAChangelog.render(&labels, &sm).unwrap();
        assert!(kac.starts_with("## [v1.1.0] - 2024-05-01\n"));
        let conv = ChangelogFormat::Conventional.render(&labels, &sm).unwrap();
        assert!(conv.starts_with("# v1.1.0 (2024-05-01)\n"));
        let grouped = ChangelogFormat::Grouped.render(&labels, &sm).unwrap();
        assert!(grouped.starts_with("# Changes: v1.0.0 -> v1.1.0\n"));
    }

    #[test]
    fn today_is_iso_date() {
        let d = today().unwrap();
        assert_eq!(d.len(), 10);
        assert_eq!(&d[4..5], "-");
        assert_eq!(&d[7..8], "-");
    }
}
