//! git-changelog - generate a changelog from git history

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use git_changelog::{
    config::RawCfg, error::Result, Changelog, ChangelogFormat, GitCli, Outcome,
    DEFAULT_CONFIG_FILE,
};

/// Generate a changelog from git history
#[derive(Debug, Parser)]
#[command(name = "git-changelog", disable_version_flag = true)]
struct Cli {
    /// Start ref (default: latest tag, or the first commit)
    #[arg(long, value_name = "REF")]
    from: Option<String>,

    /// End ref
    #[arg(long, value_name = "REF", default_value = "HEAD")]
    to: String,

    /// Output layout: keepachangelog, conventional or grouped
    #[arg(long, value_name = "FORMAT")]
    format: Option<ChangelogFormat>,

    /// Output file path (default: stdout)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Version label for the changelog header (e.g. v1.3.0)
    #[arg(long = "version", value_name = "LABEL")]
    version_label: Option<String>,

    /// Merge into the existing file instead of overwriting (requires --output)
    #[arg(long)]
    prepend: bool,

    /// Exclude merge commits
    #[arg(long)]
    no_merges: bool,

    /// Comma-separated commit types to exclude (e.g. chore,ci,test)
    #[arg(long, value_name = "TYPES", value_delimiter = ',')]
    exclude_types: Vec<String>,

    /// Config file (default: .changelog.toml, if present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the repository's git dir
    #[arg(long, value_name = "PATH")]
    git_dir: Option<PathBuf>,

    /// Path to the repository's working tree
    #[arg(long, value_name = "PATH")]
    work_tree: Option<PathBuf>,
}

impl Cli {
    fn execute(self) -> Result<Outcome> {
        let cfg = match self.config {
            Some(ref path) => RawCfg::from_file(path)?,
            None => RawCfg::from_file_if_exists(DEFAULT_CONFIG_FILE)?,
        }
        .changelog;

        let mut changelog = Changelog::from_config(&cfg)
            .to(self.to)
            .exclude_types(&self.exclude_types);
        changelog.prepend |= self.prepend;
        changelog.no_merges |= self.no_merges;
        if let Some(from) = self.from {
            changelog = changelog.from(from);
        }
        if let Some(format) = self.format {
            changelog = changelog.format(format);
        }
        if let Some(output) = self.output {
            changelog = changelog.outfile(output);
        }
        if let Some(label) = self.version_label {
            changelog = changelog.version(label);
        }

        let mut git = GitCli::new();
        if let Some(dir) = self.git_dir.or(cfg.git_dir) {
            git = git.git_dir(dir);
        }
        if let Some(tree) = self.work_tree.or(cfg.work_tree) {
            git = git.work_tree(tree);
        }

        changelog.run(&git)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().execute() {
        Ok(outcome) => {
            log::debug!("Finished with {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
