use clap::Args;
use lahella_core::{build_update, Transformer};
use serde_json::Value;
use std::path::PathBuf;

use super::{courses_path, group_id, CommandError};
use crate::catalog::{load_server_records, record_key, Catalog};
use crate::config::Config;

#[derive(Args)]
pub struct UpdateCommand {
    /// `_key` of the activity to update
    pub key: String,

    /// JSON file with the server's current activities
    pub server_file: PathBuf,

    /// Catalog file (defaults to courses_file from config)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Organisation id (defaults to group_id from config)
    #[arg(long, short)]
    pub group: Option<String>,

    /// Photo id of a freshly uploaded image
    #[arg(long)]
    pub photo_id: Option<String>,
}

impl UpdateCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let group = group_id(&self.group, config)?;
        let catalog = Catalog::load(courses_path(&self.file, config))?;
        let remote = load_server_records(&self.server_file)?;

        let payload = self.payload(&Transformer::new(), &catalog.courses, &remote, group)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }

    fn payload(
        &self,
        transformer: &Transformer,
        courses: &[Value],
        remote: &[Value],
        group: &str,
    ) -> Result<Value, CommandError> {
        let local = courses
            .iter()
            .find(|c| record_key(c) == Some(self.key.as_str()))
            .ok_or_else(|| CommandError::CourseNotFound(self.key.clone()))?;
        let server = remote
            .iter()
            .find(|r| record_key(r) == Some(self.key.as_str()))
            .ok_or_else(|| CommandError::ServerRecordNotFound(self.key.clone()))?;

        tracing::info!("Building update for {}", self.key);
        Ok(build_update(
            transformer,
            local,
            server,
            group,
            self.photo_id.as_deref(),
        )?)
    }
}
