use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Settings for the `jsonkv` tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Flat store file used when `--file` is not given.
    pub data_file: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Write the flat store file with indentation.
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("jsonkv.json"),
            log_filter: "info".into(),
            pretty: true,
        }
    }
}

impl CliConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.data_file, PathBuf::from("jsonkv.json"));
        assert_eq!(c.log_filter, "info");
        assert!(c.pretty);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_file = \"records/user.json\"").unwrap();
        let c = CliConfig::load(file.path()).unwrap();
        assert_eq!(c.data_file, PathBuf::from("records/user.json"));
        assert_eq!(c.log_filter, "info");
        assert!(c.pretty);
    }

    #[test]
    fn full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_file = \"a.json\"\nlog_filter = \"debug\"\npretty = false").unwrap();
        let c = CliConfig::load(file.path()).unwrap();
        assert_eq!(
            c,
            CliConfig {
                data_file: "a.json".into(),
                log_filter: "debug".into(),
                pretty: false,
            }
        );
    }

    #[test]
    fn resolve_without_path_is_default() {
        assert_eq!(CliConfig::resolve(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CliConfig::load(Path::new("/nonexistent/jsonkv.toml")).is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pretty = \"maybe\"").unwrap();
        assert!(CliConfig::load(file.path()).is_err());
    }
}
