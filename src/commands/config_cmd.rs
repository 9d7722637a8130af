use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a starter config file
    Init,
}

const STARTER_CONFIG: &str = r#"# lahella configuration

# Organisation id sent as `group` in activity payloads
# group_id: "12345"

# Catalog of local activities (relative to this file)
courses_file: courses.yaml
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
                    OutputFormat::Text => println!("{}", render_text(config)),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let path = cli_config_path.unwrap_or_else(Config::default_config_path);
                if write_starter(&path)? {
                    println!("Created config file: {}", path.display());
                } else {
                    println!("Config file already exists: {}", path.display());
                    println!("Use 'lahella config show' to view current configuration.");
                }
                Ok(())
            }
        }
    }
}

fn render_text(config: &Config) -> String {
    let file = match &config.config_file {
        Some(path) => path.display().to_string(),
        None => format!("{} (not found)", Config::default_config_path().display()),
    };
    let group = config.group_id.value.as_deref().unwrap_or("(not set)");

    [
        format!("Config file: {}", file),
        format!("group_id: {} ({})", group, config.group_id.source),
        format!(
            "courses_file: {} ({})",
            config.courses_file.value.display(),
            config.courses_file.source
        ),
    ]
    .join("\n")
}

/// Writes the starter file unless one exists; returns whether it wrote.
fn write_starter(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, STARTER_CONFIG)?;
    Ok(true)
}
