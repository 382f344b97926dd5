use std::io;

use crate::{
    error::Result,
    fmt::{write_categories, FormatWriter, ReleaseLabels},
    sectionmap::SectionMap,
};

/// Wraps a `std::io::Write` object to write a release in the
/// [Keep a Changelog](https://keepachangelog.com) layout
///
/// # Example
///
/// ```no_run
/// # use git_changelog::{ReleaseLabels, SectionMap};
/// # use git_changelog::fmt::{FormatWriter, KeepAChangelogWriter};
/// let sm = SectionMap::from_commits(vec![]);
/// let labels = ReleaseLabels::new("v1.0.0", "v1.1.0", "2024-05-01");
///
/// let out = std::io::stdout();
/// let mut out = out.lock();
/// let mut writer = KeepAChangelogWriter::new(&mut out);
/// writer.write_changelog(&labels, &sm).unwrap();
/// ```
pub struct KeepAChangelogWriter<'a>(&'a mut dyn io::Write);

impl<'a> KeepAChangelogWriter<'a> {
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> KeepAChangelogWriter<'a> {
        KeepAChangelogWriter(writer)
    }

    fn write_header(&mut self, labels: &ReleaseLabels) -> Result<()> {
        writeln!(self.0, "## [{}] - {}", labels.to, labels.date).map_err(Into::into)
    }
}

impl<'a> FormatWriter for KeepAChangelogWriter<'a> {
    fn write_changelog(&mut self, labels: &ReleaseLabels, sm: &SectionMap) -> Result<()> {
        self.write_header(labels)?;

        write_categories(self.0, sm, |c| {
            if c.scope.is_empty() {
                format!("- {} ({})", c.description, c.short_hash())
            } else {
                format!("- **{}**: {} ({})", c.scope, c.description, c.short_hash())
            }
        })?;

        self.0.flush().map_err(Into::into)
    }
}
