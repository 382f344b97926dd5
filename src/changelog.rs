use std::{collections::BTreeSet, path::PathBuf};

use log::debug;

use crate::{
    commit::{classify, conventional_type, ClassifiedCommit},
    config::RawChangelogCfg,
    error::{Error, Result},
    fmt::{today, ChangelogFormat, ReleaseLabels},
    git::{short, RecordSource},
    sectionmap::SectionMap,
    writer::{self, OutputTarget},
};

/// The base struct used to set options and drive a changelog run.
#[derive(Debug, Clone)]
pub struct Changelog {
    /// Where to start looking for commits (Defaults to the latest tag, or the
    /// first commit when there are no tags)
    pub from: Option<String>,
    /// Where to stop looking for commits (Defaults to `HEAD`)
    pub to: String,
    /// The label used in headers instead of `to`
    pub version: Option<String>,
    /// The layout to render (Defaults to keepachangelog)
    pub format: ChangelogFormat,
    /// The file to write to (Defaults to `stdout`)
    pub outfile: Option<PathBuf>,
    /// Merge into `outfile` instead of overwriting it
    pub prepend: bool,
    /// Leave merge commits out of the range
    pub no_merges: bool,
    /// Conventional commit types to drop
    pub exclude_types: BTreeSet<String>,
}

impl Default for Changelog {
    fn default() -> Self {
        Changelog {
            from: None,
            to: "HEAD".to_owned(),
            version: None,
            format: ChangelogFormat::default(),
            outfile: None,
            prepend: false,
            no_merges: false,
            exclude_types: BTreeSet::new(),
        }
    }
}

/// The commits a run found, after exclusions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    /// The range holds no commits
    NoCommits,
    /// Every commit in the range was excluded by type
    AllFiltered,
    Commits(Vec<ClassifiedCommit>),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(OutputTarget),
    NoCommits,
    AllFiltered,
}

impl Changelog {
    pub fn new() -> Self {
        Changelog::default()
    }

    /// Creates a `Changelog` from the values of a config file
    pub fn from_config(cfg: &RawChangelogCfg) -> Self {
        Changelog {
            format: cfg.format.unwrap_or_default(),
            outfile: cfg.output.clone(),
            prepend: cfg.prepend,
            no_merges: cfg.no_merges,
            exclude_types: cfg.exclude_types.iter().cloned().collect(),
            ..Changelog::default()
        }
    }

    pub fn from<S: Into<String>>(mut self, f: S) -> Changelog {
        self.from = Some(f.into());
        self
    }

    pub fn to<S: Into<String>>(mut self, t: S) -> Changelog {
        self.to = t.into();
        self
    }

    pub fn version<S: Into<String>>(mut self, v: S) -> Changelog {
        self.version = Some(v.into());
        self
    }

    pub fn format(mut self, f: ChangelogFormat) -> Changelog {
        self.format = f;
        self
    }

    pub fn outfile<P: Into<PathBuf>>(mut self, p: P) -> Changelog {
        self.outfile = Some(p.into());
        self
    }

    pub fn prepend(mut self, p: bool) -> Changelog {
        self.prepend = p;
        self
    }

    pub fn no_merges(mut self, n: bool) -> Changelog {
        self.no_merges = n;
        self
    }

    /// Adds types to exclude. Entries are trimmed and empty ones ignored, so
    /// the split pieces of `"chore, ci"` can be passed straight in.
    pub fn exclude_types<I, S>(mut self, types: I) -> Changelog
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_types.extend(
            types
                .into_iter()
                .map(|t| t.as_ref().trim().to_owned())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Checks the options make sense together
    pub fn validate(&self) -> Result<()> {
        if self.prepend && self.outfile.is_none() {
            return Err(Error::PrependWithoutOutput);
        }
        Ok(())
    }

    /// The start of the range: `from` if set, else the latest tag, else the
    /// first commit of the history
    pub fn resolve_from<S: RecordSource + ?Sized>(&self, source: &S) -> Result<String> {
        if let Some(ref from) = self.from {
            return Ok(from.clone());
        }
        if let Some(tag) = source.latest_tag() {
            debug!("Using latest tag {tag}");
            return Ok(tag);
        }
        match source.first_commit() {
            Some(first) => {
                wlnerr!("No tags found, using first commit: {}", short(&first));
                Ok(first)
            }
            None => Err(Error::NoHistory),
        }
    }

    /// Fetches and classifies the commits in `from..to`, dropping excluded
    /// types. Commits that aren't conventional are never excluded.
    pub fn collect<S: RecordSource + ?Sized>(&self, source: &S, from: &str) -> Collected {
        let raw = source.commits(from, &self.to, self.no_merges);
        debug!("Found {} commits in {from}..{}", raw.len(), self.to);
        if raw.is_empty() {
            return Collected::NoCommits;
        }

        let commits: Vec<_> = raw
            .iter()
            .filter(|c| {
                conventional_type(&c.subject).map_or(true, |t| !self.exclude_types.contains(t))
            })
            .map(classify)
            .collect();

        if commits.is_empty() {
            Collected::AllFiltered
        } else {
            Collected::Commits(commits)
        }
    }

    /// The label used for the end of the range in headers
    pub fn to_label(&self) -> &str {
        self.version.as_deref().unwrap_or(&self.to)
    }

    /// Renders `commits` for the release `from..to` dated `date`
    pub fn render(&self, commits: Vec<ClassifiedCommit>, from: &str, date: &str) -> Result<String> {
        let labels = ReleaseLabels::new(from, self.to_label(), date);
        let sm = SectionMap::from_commits(commits);
        self.format.render(&labels, &sm)
    }

    pub fn target(&self) -> OutputTarget {
        match self.outfile {
            Some(ref path) if self.prepend => OutputTarget::Prepend(path.clone()),
            Some(ref path) => OutputTarget::File(path.clone()),
            None => OutputTarget::Stdout,
        }
    }

    /// Runs the whole pipeline against `source`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use git_changelog::{Changelog, ChangelogFormat, GitCli};
    /// let changelog = Changelog::new()
    ///     .format(ChangelogFormat::Conventional)
    ///     .version("v1.2.0")
    ///     .exclude_types(["chore", "ci"]);
    ///
    /// changelog.run(&GitCli::new()).unwrap();
    /// ```
    pub fn run<S: RecordSource + ?Sized>(&self, source: &S) -> Result<Outcome> {
        self.validate()?;
        let from = self.resolve_from(source)?;

        let commits = match self.collect(source, &from) {
            Collected::NoCommits => {
                wlnerr!("No commits found in range.");
                return Ok(Outcome::NoCommits);
            }
            Collected::AllFiltered => {
                wlnerr!("No commits remaining after filtering.");
                return Ok(Outcome::AllFiltered);
            }
            Collected::Commits(commits) => commits,
        };

        wlnerr!(
            "Processing {} commits ({from}..{})",
            commits.len(),
            self.to
        );

        let text = self.render(commits, &from, &today()?)?;
        let target = self.target();
        writer::write(&target, &text)?;

        match target {
            OutputTarget::File(ref path) => {
                wlnerr!("Changelog written to {}", path.display())
            }
            OutputTarget::Prepend(ref path) => {
                wlnerr!("Changelog prepended to {}", path.display())
            }
            OutputTarget::Stdout => {}
        }

        Ok(Outcome::Written(target))
    }
}
