use std::{
    fs,
    io::{stdout, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::Result;

/// The heading written when merging into a file that doesn't exist yet
pub const DEFAULT_HEADING: &str = "# Changelog";

/// Where a rendered changelog ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// Create or overwrite the file
    File(PathBuf),
    /// Merge beneath the first top-level heading of the file
    Prepend(PathBuf),
}

/// Writes `text` to `target`. Filesystem errors are returned as they are.
pub fn write(target: &OutputTarget, text: &str) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            debug!("Writing changelog to stdout");
            let out = stdout();
            let mut out_buf = BufWriter::new(out.lock());
            writeln!(out_buf, "{text}")?;
            out_buf.flush()?;
        }
        OutputTarget::File(path) => {
            debug!("Writing changelog to file: {:?}", path);
            fs::write(path, text)?;
        }
        OutputTarget::Prepend(path) => prepend_to_file(path, text)?,
    }
    Ok(())
}

/// Merges `new` into the file at `path`, creating the file with
/// `DEFAULT_HEADING` when it doesn't exist.
pub fn prepend_to_file<P: AsRef<Path>>(path: P, new: &str) -> Result<()> {
    let path = path.as_ref();
    let new = new.trim_end_matches('\n');

    let updated = match fs::read_to_string(path) {
        Ok(existing) => {
            debug!("Merging changelog into existing file: {:?}", path);
            merge(&existing, new)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{:?} doesn't exist, creating it", path);
            format!("{DEFAULT_HEADING}\n\n{new}\n")
        }
        Err(e) => return Err(e.into()),
    };

    fs::write(path, updated).map_err(Into::into)
}

/// Inserts `new` right below the first top-level heading of `existing`,
/// after any blank lines that follow the heading. Without such a heading
/// `new` goes in front of everything. All existing text is kept as is.
pub fn merge(existing: &str, new: &str) -> String {
    let new = new.trim_end_matches('\n');

    let Some(heading_end) = heading_end(existing) else {
        return format!("{new}\n\n{existing}");
    };

    let (head, rest) = existing.split_at(heading_end);
    let rest = rest.trim_start_matches(['\n', '\r']);

    let mut merged = String::with_capacity(existing.len() + new.len() + 4);
    merged.push_str(head);
    if !head.ends_with('\n') {
        merged.push('\n');
    }
    merged.push('\n');
    merged.push_str(new);
    merged.push_str("\n\n");
    merged.push_str(rest);
    merged
}

/// Byte offset just past the first `# ` heading line, newline included
fn heading_end(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let end = offset + line.len();
        if is_top_level_heading(line.trim_end_matches(['\n', '\r'])) {
            return Some(end);
        }
        offset = end;
    }
    None
}

fn is_top_level_heading(line: &str) -> bool {
    line.strip_prefix("# ").is_some_and(|title| !title.is_empty())
}
