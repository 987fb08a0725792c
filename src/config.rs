use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::html::Mode;
use crate::links::ProductLink;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub search: SearchConfig,
    pub product_links: Vec<ProductLink>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: Mode,
    pub escape_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Html,
            escape_html: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub count: usize,
    pub location: String,
    pub language: String,
    pub country: String,
    pub exclude_domains: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            count: 10,
            location: "United States".to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            exclude_domains: Vec::new(),
        }
    }
}

impl Config {
    /// The config bundled with the crate, checked by the build script.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the bundled defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_code_defaults() {
        let config = Config::compiled_default();
        assert_eq!(config.render.mode, Mode::Html);
        assert!(config.render.escape_html);
        assert_eq!(config.search.count, 10);
        assert_eq!(config.search.location, "United States");
        assert!(config.product_links.is_empty());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.search.language, "en");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("serpmark.toml");
        fs::write(
            &path,
            indoc! {r#"
                [render]
                mode = "plain-document"

                [search]
                exclude_domains = ["gcore.com"]

                [[product_links]]
                url = "/cdn"
                keywords = ["cdn"]
                anchor_variants = ["CDN solution"]
            "#},
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.render.mode, Mode::PlainDocument);
        assert!(config.render.escape_html);
        assert_eq!(config.search.count, 10);
        assert_eq!(config.search.exclude_domains, vec!["gcore.com"]);
        assert_eq!(config.product_links.len(), 1);
        assert_eq!(config.product_links[0].url, "/cdn");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[render\nmode = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mode.toml");
        fs::write(&path, "[render]\nmode = \"pdf\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
