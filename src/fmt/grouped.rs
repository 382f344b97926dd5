use std::io;

use crate::{
    error::Result,
    fmt::{FormatWriter, ReleaseLabels},
    sectionmap::SectionMap,
};

/// Wraps a `std::io::Write` object to write commits grouped by date, most
/// recent first. Categories are ignored and each entry shows the raw subject.
pub struct GroupedWriter<'a>(&'a mut dyn io::Write);

impl<'a> GroupedWriter<'a> {
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> GroupedWriter<'a> {
        GroupedWriter(writer)
    }

    fn write_header(&mut self, labels: &ReleaseLabels) -> Result<()> {
        writeln!(self.0, "# Changes: {} -> {}", labels.from, labels.to).map_err(Into::into)
    }
}

impl<'a> FormatWriter for GroupedWriter<'a> {
    fn write_changelog(&mut self, labels: &ReleaseLabels, sm: &SectionMap) -> Result<()> {
        self.write_header(labels)?;

        for (date, commits) in sm.dates_desc() {
            write!(self.0, "\n## {date}\n\n")?;
            for c in commits {
                writeln!(
                    self.0,
                    "- {} ({}, {})",
                    c.commit.subject,
                    c.short_hash(),
                    c.commit.author
                )?;
            }
        }

        self.0.flush().map_err(Into::into)
    }
}
