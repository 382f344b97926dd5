use std::io;

use crate::{
    error::Result,
    fmt::{write_categories, FormatWriter, ReleaseLabels},
    sectionmap::SectionMap,
};

/// Wraps a `std::io::Write` object to write a release in the
/// conventional-changelog layout
pub struct ConventionalWriter<'a>(&'a mut dyn io::Write);

impl<'a> ConventionalWriter<'a> {
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> ConventionalWriter<'a> {
        ConventionalWriter(writer)
    }

    fn write_header(&mut self, labels: &ReleaseLabels) -> Result<()> {
        writeln!(self.0, "# {} ({})", labels.to, labels.date).map_err(Into::into)
    }
}

impl<'a> FormatWriter for ConventionalWriter<'a> {
    fn write_changelog(&mut self, labels: &ReleaseLabels, sm: &SectionMap) -> Result<()> {
        self.write_header(labels)?;

        write_categories(self.0, sm, |c| {
            let scope = if c.scope.is_empty() {
                String::new()
            } else {
                format!("**{}:** ", c.scope)
            };
            format!("* {scope}{} ([{}])", c.description, c.short_hash())
        })?;

        self.0.flush().map_err(Into::into)
    }
}
