use crate::assessment::DEFAULT_PAGE_SIZE;
use crate::catalog::Catalog;
use crate::error::{ReadinessError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Idle sessions older than this are dropped.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_session_ttl() -> u64 {
    12 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

// ---------------------------------------------------------------------------
// AssessmentConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
    /// Custom catalog file, relative to the project root. The built-in
    /// questionnaire is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            assessment: AssessmentConfig::default(),
            catalog: None,
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(ReadinessError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Write `config.yaml` through a tempfile in `.readiness/` that is then
    /// renamed over the target, so readers never see half a file.
    pub fn save(&self, root: &Path) -> Result<()> {
        let dir = paths::readiness_dir(root);
        std::fs::create_dir_all(&dir)?;
        let data = serde_yaml::to_string(self)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(paths::config_path(root)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Absolute location of the custom catalog, if one is configured.
    pub fn catalog_path(&self, root: &Path) -> Option<PathBuf> {
        self.catalog.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        })
    }

    /// Build the catalog this project scores against.
    pub fn load_catalog(&self, root: &Path) -> Result<Catalog> {
        match self.catalog_path(root) {
            Some(path) => Catalog::load(&path),
            None => Catalog::builtin(),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.assessment.page_size == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "assessment.page_size must be at least 1".to_string(),
            });
        }

        if self.server.session_ttl_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.session_ttl_minutes is 0: sessions expire immediately"
                    .to_string(),
            });
        }

        if let Some(path) = self.catalog_path(root) {
            if !path.exists() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("catalog file not found: {}", path.display()),
                });
            } else if let Err(e) = Catalog::load(&path) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("catalog {} is invalid: {e}", path.display()),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.server.port, 5000);
        assert_eq!(parsed.assessment.page_size, 4);
        assert!(parsed.catalog.is_none());
        assert!(!yaml.contains("catalog"));
    }

    #[test]
    fn sparse_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("server:\n  port: 8080\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.session_ttl_minutes, 720);
        assert_eq!(cfg.assessment.page_size, 4);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, ReadinessError::NotInitialized));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.assessment.page_size = 6;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.assessment.page_size, 6);
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        Config::default().save(dir.path()).unwrap();
        let mut cfg = Config::default();
        cfg.server.port = 9000;
        cfg.save(dir.path()).unwrap();

        assert_eq!(Config::load(dir.path()).unwrap().server.port, 9000);
        let entries: Vec<_> = std::fs::read_dir(paths::readiness_dir(dir.path()))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.yaml")]);
    }

    #[test]
    fn validate_default_has_no_warnings() {
        let dir = TempDir::new().unwrap();
        assert!(Config::default().validate(dir.path()).is_empty());
    }

    #[test]
    fn validate_zero_page_size_is_error() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.assessment.page_size = 0;
        let warnings = cfg.validate(dir.path());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("page_size")));
    }

    #[test]
    fn validate_missing_catalog_is_error() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            catalog: Some(PathBuf::from("questions.yaml")),
            ..Config::default()
        };
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("catalog file not found"));
    }

    #[test]
    fn load_catalog_defaults_to_builtin() {
        let dir = TempDir::new().unwrap();
        let catalog = Config::default().load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 33);
    }
}
