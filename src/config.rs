use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    fmt::ChangelogFormat,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCfg {
    #[serde(default)]
    pub changelog: RawChangelogCfg,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawChangelogCfg {
    pub format: Option<ChangelogFormat>,
    pub output: Option<PathBuf>,
    pub prepend: bool,
    pub no_merges: bool,
    pub exclude_types: Vec<String>,
    pub git_dir: Option<PathBuf>,
    pub work_tree: Option<PathBuf>,
}

impl RawCfg {
    /// Reads the config file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Trying to use config file: {:?}", path);
        let toml_s =
            fs::read_to_string(path).map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;
        toml::from_str(&toml_s).map_err(|e| Error::ConfigParse(path.to_path_buf(), e))
    }

    /// Like `from_file`, but a missing file yields the default config
    pub fn from_file_if_exists<P: AsRef<Path>>(path: P) -> Result<Self> {
        match RawCfg::from_file(path.as_ref()) {
            Err(Error::ConfigRead(_, e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {:?}, using defaults", path.as_ref());
                Ok(RawCfg::default())
            }
            res => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config() {
        let cfg = r#"
            [changelog]
            format = "Conventional"
            output = "CHANGELOG.md"
            prepend = true
            no-merges = true
            exclude-types = ["chore", "ci"]
            git-dir = "/myproject/.git"
            work-tree = "/myproject"
        "#;
        let res = toml::from_str(cfg);
        assert!(res.is_ok(), "{res:?}");
        let cfg: RawCfg = res.unwrap();

        assert_eq!(cfg.changelog.format, Some(ChangelogFormat::Conventional));
        assert_eq!(cfg.changelog.output, Some("CHANGELOG.md".into()));
        assert!(cfg.changelog.prepend);
        assert!(cfg.changelog.no_merges);
        assert_eq!(cfg.changelog.exclude_types, ["chore", "ci"]);
        assert_eq!(cfg.changelog.git_dir, Some("/myproject/.git".into()));
        assert_eq!(cfg.changelog.work_tree, Some("/myproject".into()));
    }

    #[test]
    fn empty_config() {
        let cfg: RawCfg = toml::from_str("").unwrap();
        assert_eq!(cfg.changelog.format, None);
        assert!(!cfg.changelog.prepend);
        assert!(cfg.changelog.exclude_types.is_empty());
    }

    #[test]
    fn bad_format() {
        let res = toml::from_str::<RawCfg>("[changelog]\nformat = \"json\"\n");
        assert!(res.is_err());
    }

    #[test]
    fn dogfood_config() {
        let cfg = include_str!("../.changelog.toml");
        let res = toml::from_str(cfg);
        assert!(res.is_ok(), "{res:?}");
        let cfg: RawCfg = res.unwrap();

        assert_eq!(cfg.changelog.format, Some(ChangelogFormat::KeepAChangelog));
        assert_eq!(cfg.changelog.output, Some("CHANGELOG.md".into()));
        assert!(cfg.changelog.no_merges);
    }

    #[test]
    fn files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            RawCfg::from_file(&missing),
            Err(Error::ConfigRead(..))
        ));
        assert!(RawCfg::from_file_if_exists(&missing).is_ok());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[changelog\n").unwrap();
        assert!(matches!(
            RawCfg::from_file_if_exists(&broken),
            Err(Error::ConfigParse(..))
        ));
    }
}
