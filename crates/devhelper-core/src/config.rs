//! User preferences: a flat YAML (or JSON) file of per-command defaults.
//!
//! A missing file is not an error: [`ConfigManager::load`] hands back the
//! built-in defaults and leaves the filesystem untouched. Only
//! [`ConfigManager::save`] and [`ConfigManager::reset`] write.

use crate::error::{Error, Result};
use crate::http::{parse_header, HttpSettings};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the default config location.
pub const CONFIG_ENV: &str = "DEVHELPER_CONFIG";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub http: HttpConfig,
    pub formatter: FormatterConfig,
    pub generator: GeneratorConfig,
    pub monitor: MonitorConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub color_enabled: bool,
    pub default_indent: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color_enabled: true,
            default_indent: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub insecure_ssl: bool,
    pub default_user_agent: String,
    /// `Name: value` strings sent with every request.
    pub default_headers: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let settings = HttpSettings::default();
        Self {
            timeout_secs: settings.timeout.as_secs(),
            follow_redirects: settings.follow_redirects,
            max_redirects: settings.max_redirects,
            insecure_ssl: settings.insecure,
            default_user_agent: settings.user_agent,
            default_headers: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn settings(&self) -> Result<HttpSettings> {
        let default_headers = self
            .default_headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            follow_redirects: self.follow_redirects,
            max_redirects: self.max_redirects,
            insecure: self.insecure_ssl,
            user_agent: self.default_user_agent.clone(),
            default_headers,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FormatterConfig {
    pub sort_keys: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub default_charset: String,
    pub default_date_format: String,
    pub default_output: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_charset: "alphanumeric".to_string(),
            default_date_format: "%Y-%m-%d".to_string(),
            default_output: "string".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub default_interval_secs: u64,
    pub default_display: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: 1,
            default_display: "dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Yaml,
    Json,
}

fn file_kind(path: &Path) -> Result<FileKind> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml") | Some("yml") => Ok(FileKind::Yaml),
        Some("json") => Ok(FileKind::Json),
        _ => Err(config_error(
            path,
            "unsupported config file extension (expected .yaml, .yml or .json)",
        )),
    }
}

fn config_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Config {
        path: path.display().to_string(),
        message: message.into(),
    }
}

/// The loaded configuration together with where it lives.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// `<platform config dir>/devhelper/config.yaml`, falling back to the
    /// working directory when no home directory can be determined.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "devhelper").map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dirs| dirs.config_dir().join(CONFIG_FILE),
        )
    }

    /// Defaults bound to `path`, without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Config::default(),
        }
    }

    /// Load the file at `path`, or the defaults when it does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let kind = file_kind(&path)?;
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::new(path));
        }

        let text = fs::read_to_string(&path).map_err(|err| config_error(&path, err.to_string()))?;
        let config = if text.trim().is_empty() {
            Config::default()
        } else {
            match kind {
                FileKind::Yaml => serde_yaml::from_str(&text)
                    .map_err(|err| config_error(&path, err.to_string()))?,
                FileKind::Json => serde_json::from_str(&text)
                    .map_err(|err| config_error(&path, err.to_string()))?,
            }
        };
        debug!("loaded config from {}", path.display());
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The configuration serialized in the file's notation.
    pub fn render(&self) -> Result<String> {
        match file_kind(&self.path)? {
            FileKind::Yaml => serde_yaml::to_string(&self.config)
                .map_err(|err| config_error(&self.path, err.to_string())),
            FileKind::Json => serde_json::to_string_pretty(&self.config)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|err| config_error(&self.path, err.to_string())),
        }
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let text = self.render()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| config_error(parent, err.to_string()))?;
        }
        fs::write(&self.path, text).map_err(|err| config_error(&self.path, err.to_string()))?;
        info!("wrote config to {}", self.path.display());
        Ok(())
    }

    /// Restore the defaults and persist them.
    pub fn reset(&mut self) -> Result<()> {
        self.config = Config::default();
        self.save()
    }
}
