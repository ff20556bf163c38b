//! Configuration management.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ttl_changer::{PrivilegeMode, PROC_TTL_PATH, SYSCTL_CONF_PATH};

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Kernel control file for the live TTL.
    pub proc_path: Option<PathBuf>,

    /// Persisted sysctl configuration file.
    pub sysctl_conf_path: Option<PathBuf>,

    /// How to obtain root for writes.
    #[serde(default)]
    pub privilege: PrivilegeMode,

    /// Run `sysctl -p` after persisting.
    #[serde(default)]
    pub reload_on_persist: bool,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Where migrated plugin settings live.
    pub settings_dir: Option<PathBuf>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "ttl-changer", "ttlctl")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default directory for plugin settings.
    pub fn default_settings_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().to_path_buf())
    }

    /// Load configuration from file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Live control file, falling back to `/proc`.
    pub fn proc_path(&self) -> PathBuf {
        self.proc_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(PROC_TTL_PATH))
    }

    /// Sysctl configuration file, falling back to `/etc/sysctl.conf`.
    pub fn sysctl_conf_path(&self) -> PathBuf {
        self.sysctl_conf_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SYSCTL_CONF_PATH))
    }

    /// Apply `key = value`, as given to `ttlctl config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "proc_path" => self.proc_path = Some(PathBuf::from(value)),
            "sysctl_conf_path" | "sysctl_conf" => self.sysctl_conf_path = Some(PathBuf::from(value)),
            "privilege" => self.privilege = value.parse()?,
            "reload_on_persist" | "reload" => self.reload_on_persist = value.parse()?,
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "settings_dir" => self.settings_dir = Some(PathBuf::from(value)),
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     proc_path          - Live TTL control file\n  \
                     sysctl_conf_path   - Persisted sysctl configuration\n  \
                     privilege          - How to get root (direct/sudo)\n  \
                     reload_on_persist  - Run sysctl -p after persist (true/false)\n  \
                     output_format      - Default output format (pretty/json/yaml)\n  \
                     settings_dir       - Plugin settings directory",
                    key
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.privilege, PrivilegeMode::Sudo);
        assert!(!config.reload_on_persist);
        assert_eq!(config.proc_path(), PathBuf::from(PROC_TTL_PATH));
        assert_eq!(config.sysctl_conf_path(), PathBuf::from(SYSCTL_CONF_PATH));
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("privilege", "direct").unwrap();
        config.set("reload", "true").unwrap();
        config.set("output", "json").unwrap();
        config.set("sysctl_conf", "/tmp/sysctl.conf").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.privilege, PrivilegeMode::Direct);
        assert_eq!(loaded.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reload_on_persist = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.reload_on_persist);
        assert_eq!(config.privilege, PrivilegeMode::Sudo);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("privilege", "doas").is_err());
        assert!(config.set("reload_on_persist", "maybe").is_err());
        assert!(config.set("api_key", "x").is_err());
    }
}
