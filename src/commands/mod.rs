mod config_cmd;
mod convert;
mod diff_cmd;
mod update;

pub use config_cmd::ConfigCommand;
pub use convert::ConvertCommand;
pub use diff_cmd::DiffCommand;
pub use update::UpdateCommand;

use clap::ValueEnum;
use lahella_core::MappingError;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogError;
use crate::config::{Config, ENV_GROUP_ID};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Catalog file from `--file`, else from configuration.
fn courses_path<'a>(file: &'a Option<PathBuf>, config: &'a Config) -> &'a Path {
    file.as_deref()
        .unwrap_or(config.courses_file.value.as_path())
}

/// Group id from `--group`, else from configuration.
fn group_id<'a>(group: &'a Option<String>, config: &'a Config) -> Result<&'a str, CommandError> {
    group
        .as_deref()
        .or(config.group_id.value.as_deref())
        .ok_or(CommandError::MissingGroup)
}

#[derive(Debug)]
pub enum CommandError {
    MissingGroup,
    IndexOutOfRange { index: usize, len: usize },
    CourseNotFound(String),
    ServerRecordNotFound(String),
    Catalog(CatalogError),
    Mapping(MappingError),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::MissingGroup => write!(
                f,
                "No group id configured (use --group, {} or group_id in the config file)",
                ENV_GROUP_ID
            ),
            CommandError::IndexOutOfRange { index, len } => {
                write!(f, "Course index {} out of range ({} courses)", index, len)
            }
            CommandError::CourseNotFound(key) => {
                write!(f, "No local course with _key '{}'", key)
            }
            CommandError::ServerRecordNotFound(key) => {
                write!(f, "No server activity with _key '{}'", key)
            }
            CommandError::Catalog(e) => write!(f, "{}", e),
            CommandError::Mapping(e) => write!(f, "{}", e),
            CommandError::Json(e) => write!(f, "JSON error: {}", e),
            CommandError::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CatalogError> for CommandError {
    fn from(e: CatalogError) -> Self {
        CommandError::Catalog(e)
    }
}

impl From<MappingError> for CommandError {
    fn from(e: MappingError) -> Self {
        CommandError::Mapping(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Json(e)
    }
}

impl From<serde_yaml::Error> for CommandError {
    fn from(e: serde_yaml::Error) -> Self {
        CommandError::Yaml(e)
    }
}
