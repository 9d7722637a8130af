use clap::{Args, Subcommand};
use lahella_core::Transformer;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::{courses_path, group_id, CommandError};
use crate::catalog::{load_server_records, Catalog};
use crate::config::Config;

#[derive(Args)]
pub struct ConvertCommand {
    #[command(subcommand)]
    pub command: ConvertSubcommand,
}

#[derive(Subcommand)]
pub enum ConvertSubcommand {
    /// Print API payloads for local courses
    ToRemote {
        /// Catalog file (defaults to courses_file from config)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Organisation id (defaults to group_id from config)
        #[arg(long, short)]
        group: Option<String>,

        /// Convert only the course at this position
        #[arg(long, short)]
        index: Option<usize>,
    },

    /// Print saved server activities as a YAML catalog
    ToLocal {
        /// JSON file with one activity, a list, or an `items` page
        server_file: PathBuf,
    },
}

impl ConvertCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let transformer = Transformer::new();

        match &self.command {
            ConvertSubcommand::ToRemote { file, group, index } => {
                let group = group_id(group, config)?;
                let catalog = Catalog::load(courses_path(file, config))?;
                let output = to_remote(&transformer, &catalog.courses, group, *index)?;
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }

            ConvertSubcommand::ToLocal { server_file } => {
                let records = load_server_records(server_file)?;
                let courses = to_local(&transformer, &records);
                print!("{}", serde_yaml::to_string(&json!({ "courses": courses }))?);
                Ok(())
            }
        }
    }
}

/// One payload when `index` is given, otherwise a list of payloads.
fn to_remote(
    transformer: &Transformer,
    courses: &[Value],
    group: &str,
    index: Option<usize>,
) -> Result<Value, CommandError> {
    match index {
        Some(i) => {
            let course = courses.get(i).ok_or(CommandError::IndexOutOfRange {
                index: i,
                len: courses.len(),
            })?;
            Ok(transformer.local_to_remote(course, group)?)
        }
        None => {
            let payloads = courses
                .iter()
                .map(|course| transformer.local_to_remote(course, group))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(payloads))
        }
    }
}

fn to_local(transformer: &Transformer, records: &[Value]) -> Vec<Value> {
    records
        .iter()
        .map(|record| transformer.remote_to_local(record))
        .collect()
}
