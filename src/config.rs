use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_GROUP_ID: &str = "LAHELLA_GROUP_ID";
pub const ENV_COURSES_FILE: &str = "LAHELLA_COURSES_FILE";

/// Where a configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration value tagged with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn from_default(value: T) -> Self {
        Self::new(value, ConfigSource::Default)
    }

    /// Replaces the value when `value` is set.
    fn layer(&mut self, value: Option<T>, source: ConfigSource) {
        if let Some(value) = value {
            *self = Self::new(value, source);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Organisation id sent as the payload `group`
    pub group_id: ConfigValue<Option<String>>,
    /// Catalog of local activities
    pub courses_file: ConfigValue<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// On-disk layout of the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    group_id: Option<String>,
    courses_file: Option<PathBuf>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Environment overrides the config file, which overrides defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut group_id = ConfigValue::from_default(None);
        let mut courses_file = ConfigValue::from_default(PathBuf::from("courses.yaml"));

        let path = config_path.unwrap_or_else(Self::default_config_path);
        let config_file = if path.exists() {
            let file = ConfigFile::read(&path)?;
            let base = path.parent().unwrap_or(Path::new("."));
            group_id.layer(file.group_id.map(Some), ConfigSource::File);
            courses_file.layer(
                file.courses_file.map(|p| base.join(p)),
                ConfigSource::File,
            );
            Some(path)
        } else {
            None
        };

        group_id.layer(env_var(ENV_GROUP_ID).map(Some), ConfigSource::Environment);
        courses_file.layer(
            env_var(ENV_COURSES_FILE).map(PathBuf::from),
            ConfigSource::Environment,
        );

        tracing::debug!(
            "group_id from {}, courses_file from {}",
            group_id.source,
            courses_file.source
        );

        Ok(Self {
            group_id,
            courses_file,
            config_file,
        })
    }

    /// `<config dir>/lahella/config.yaml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lahella")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
