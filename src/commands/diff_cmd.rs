use clap::Args;
use lahella_core::{diff, format_diffs, FieldDiff, Transformer};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use super::{courses_path, CommandError, OutputFormat};
use crate::catalog::{load_server_records, record_key, record_title, Catalog};
use crate::config::Config;

#[derive(Args)]
pub struct DiffCommand {
    /// JSON file with the server's activities
    pub server_file: PathBuf,

    /// Catalog file (defaults to courses_file from config)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Also compare _key and _status
    #[arg(long)]
    pub include_metadata: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    /// Local course the server does not have
    New,
    /// Server activity missing from the catalog
    RemoteOnly,
    Unchanged,
    Changed,
}

#[derive(Debug, Serialize)]
pub struct CourseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub title: String,
    pub state: CourseState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diffs: Vec<FieldDiff>,
}

impl DiffCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let catalog = Catalog::load(courses_path(&self.file, config))?;
        let remote = load_server_records(&self.server_file)?;

        let reports = compare(
            &Transformer::new(),
            &catalog.courses,
            &remote,
            !self.include_metadata,
        );

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
            OutputFormat::Text => {
                println!("{}", render(&reports));
            }
        }
        Ok(())
    }
}

/// Pairs local courses with server activities by `_key` and diffs each pair.
pub fn compare(
    transformer: &Transformer,
    courses: &[Value],
    remote: &[Value],
    ignore_metadata: bool,
) -> Vec<CourseReport> {
    let server: Vec<(Option<&str>, Value)> = remote
        .iter()
        .map(|r| (record_key(r), transformer.remote_to_local(r)))
        .collect();

    let mut reports = Vec::new();
    for course in courses {
        let key = record_key(course);
        let matched = key.and_then(|k| server.iter().find(|(sk, _)| *sk == Some(k)));
        let (state, diffs) = match matched {
            Some((_, server_course)) => {
                let diffs = diff(course, server_course, ignore_metadata);
                let state = if diffs.is_empty() {
                    CourseState::Unchanged
                } else {
                    CourseState::Changed
                };
                (state, diffs)
            }
            None => (CourseState::New, Vec::new()),
        };
        reports.push(CourseReport {
            key: key.map(str::to_string),
            title: record_title(course).to_string(),
            state,
            diffs,
        });
    }

    for (key, server_course) in &server {
        let known = key.is_some_and(|k| courses.iter().any(|c| record_key(c) == Some(k)));
        if !known {
            reports.push(CourseReport {
                key: key.map(str::to_string),
                title: record_title(server_course).to_string(),
                state: CourseState::RemoteOnly,
                diffs: Vec::new(),
            });
        }
    }

    tracing::info!(
        "{} course(s) changed",
        reports
            .iter()
            .filter(|r| r.state == CourseState::Changed)
            .count()
    );
    reports
}

fn render(reports: &[CourseReport]) -> String {
    let mut out = Vec::new();
    for report in reports {
        let key = report.key.as_deref().unwrap_or("no key");
        out.push(format!("{} [{}]", report.title, key));
        match report.state {
            CourseState::New => out.push("  new (not on server)".to_string()),
            CourseState::RemoteOnly => out.push("  only on server".to_string()),
            CourseState::Unchanged | CourseState::Changed => out.push(format_diffs(&report.diffs)),
        }
    }
    out.join("\n")
}
