use std::{
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, warn};

const FIELD_SEP: char = '\x00';
const RECORD_SEP: char = '\x01';

// `%x00`/`%x01` let git emit the separators, since argv cannot carry NUL
const LOG_FORMAT: &str = "--pretty=format:%H%x00%s%x00%an%x00%ai%x00%b%x01";

/// The struct representation of a commit as returned by `git log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// The 40 char hash
    pub hash: String,
    /// The commit subject
    pub subject: String,
    /// The author name
    pub author: String,
    /// The author date as `YYYY-MM-DD`
    pub date: String,
    /// The commit body, trimmed
    pub body: String,
}

impl RawCommit {
    /// The first 8 characters of the hash, used for display only
    pub fn short_hash(&self) -> &str {
        short(&self.hash)
    }
}

pub(crate) fn short(hash: &str) -> &str {
    match hash.char_indices().nth(8) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// A provider of commit history.
///
/// Failures of the underlying tool are never raised: they are reported as
/// `None` or as an empty list of commits so the caller's emptiness handling
/// applies.
pub trait RecordSource {
    /// Commits in `from..to`, most recent first
    fn commits(&self, from: &str, to: &str, no_merges: bool) -> Vec<RawCommit>;

    /// The most recent tag reachable from `HEAD`
    fn latest_tag(&self) -> Option<String>;

    /// The root commit of the history
    fn first_commit(&self) -> Option<String>;
}

/// A `RecordSource` that shells out to the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    /// The git dir with all the meta-data (Typically the `.git` sub-directory
    /// of the project)
    pub git_dir: Option<PathBuf>,
    /// The working directory of the git project
    pub work_tree: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        GitCli::default()
    }

    pub fn git_dir<P: AsRef<Path>>(mut self, d: P) -> Self {
        self.git_dir = Some(d.as_ref().to_path_buf());
        self
    }

    pub fn work_tree<P: AsRef<Path>>(mut self, d: P) -> Self {
        self.work_tree = Some(d.as_ref().to_path_buf());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(ref dir) = self.git_dir {
            cmd.arg(format!("--git-dir={}", dir.display()));
        }
        if let Some(ref tree) = self.work_tree {
            cmd.arg(format!("--work-tree={}", tree.display()));
        }
        cmd
    }

    /// Runs git with `args`, returning trimmed stdout on success
    fn run(&self, args: &[&str]) -> Option<String> {
        debug!("Running git {:?}", args);
        let output = match self.command().args(args).output() {
            Ok(o) => o,
            Err(e) => {
                warn!("failed to run git: {e}");
                return None;
            }
        };
        if !output.status.success() {
            debug!(
                "git {:?} exited with {}: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let out = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

impl RecordSource for GitCli {
    fn commits(&self, from: &str, to: &str, no_merges: bool) -> Vec<RawCommit> {
        let range = format!("{from}..{to}");
        let mut args = vec!["log", range.as_str(), LOG_FORMAT];
        if no_merges {
            args.push("--no-merges");
        }

        self.run(&args)
            .map(|out| parse_log(&out))
            .unwrap_or_default()
    }

    fn latest_tag(&self) -> Option<String> {
        self.run(&["describe", "--tags", "--abbrev=0"])
    }

    fn first_commit(&self) -> Option<String> {
        // rev-list lists newest first, so with several roots the oldest is last
        self.run(&["rev-list", "--max-parents=0", "HEAD"])
            .and_then(|out| out.lines().last().map(|l| l.trim().to_owned()))
    }
}

/// Parses the output of `git log` run with the record format used by
/// `GitCli`. Records with missing fields are dropped.
pub fn parse_log(output: &str) -> Vec<RawCommit> {
    output
        .split(RECORD_SEP)
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(5, FIELD_SEP);
            let hash = fields.next()?;
            let subject = fields.next()?;
            let author = fields.next()?;
            let date = fields.next()?;
            let body = fields.next()?;
            Some(RawCommit {
                hash: hash.to_owned(),
                subject: subject.to_owned(),
                author: author.to_owned(),
                date: date.chars().take(10).collect(),
                body: body.trim().to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> String {
        let mut r = fields.join("\x00");
        r.push(RECORD_SEP);
        r
    }

    #[test]
    fn parses_records() {
        let out = [
            record(&[
                "0123456789abcdef0123456789abcdef01234567",
                "feat(api): add login",
                "Jane Doe",
                "2024-03-05 10:11:12 +0100",
                "Some body\n\nBREAKING CHANGE: tokens moved\n",
            ]),
            "\n".into(),
            record(&[
                "fedcba9876543210fedcba9876543210fedcba98",
                "initial",
                "John Roe",
                "2024-03-01 08:00:00 +0000",
                "",
            ]),
        ]
        .concat();

        let commits = parse_log(&out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "feat(api): add login");
        assert_eq!(commits[0].author, "Jane Doe");
        assert_eq!(commits[0].date, "2024-03-05");
        assert_eq!(commits[0].body, "Some body\n\nBREAKING CHANGE: tokens moved");
        assert_eq!(commits[0].short_hash(), "01234567");
        assert_eq!(commits[1].hash, "fedcba9876543210fedcba9876543210fedcba98");
        assert_eq!(commits[1].body, "");
    }

    #[test]
    fn drops_incomplete_records() {
        let out = format!("abc\x00subject only{RECORD_SEP}\n{RECORD_SEP}");
        assert!(parse_log(&out).is_empty());
    }

    #[test]
    fn body_may_contain_field_separator() {
        let out = record(&["abc", "s", "a", "2024-01-01 00:00:00 +0000", "x\x00y"]);
        let commits = parse_log(&out);
        assert_eq!(commits[0].body, "x\x00y");
    }

    #[test]
    fn short_hash_of_short_id() {
        assert_eq!(short("abc"), "abc");
        assert_eq!(short("0123456789"), "01234567");
    }
}
