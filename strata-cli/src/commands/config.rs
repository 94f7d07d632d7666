//! `strata config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use strata_core::config::StrataConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Known configuration sections.
const SECTIONS: [&str; 3] = ["general", "catalog", "file"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => {
            let report = validate(config_path).await;
            writer.render(&report)?;
            if !report.valid {
                return Err(CliError::Config("configuration is invalid".to_owned()));
            }
            Ok(())
        }
        ConfigAction::Show { section } => {
            let report = show(config_path, section.as_deref()).await?;
            writer.render(&report)
        }
    }
}

/// Load and validate the configuration file, collecting the error instead of returning it.
///
/// Unlike the other commands a missing file is an error here.
pub async fn validate(config_path: &Path) -> ConfigValidationReport {
    info!(path = %config_path.display(), "validating configuration");

    let errors = match StrataConfig::load(config_path).await {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Build the effective configuration report (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the section
/// name is unknown.
pub async fn show(config_path: &Path, section: Option<&str>) -> Result<ConfigReport, CliError> {
    info!(path = %config_path.display(), "loading configuration");
    let config = StrataConfig::load_or_default(config_path).await?;

    let (config_toml, values) = match section {
        None => (to_toml(&config), serde_json::to_value(&config)?),
        Some("general") => (to_toml(&config.general), serde_json::to_value(&config.general)?),
        Some("catalog") => (to_toml(&config.catalog), serde_json::to_value(&config.catalog)?),
        Some("file") => (to_toml(&config.file), serde_json::to_value(&config.file)?),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section: section.map(str::to_owned),
        config_toml,
        config: values,
    })
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {e})"))
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering; JSON output carries `config`.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
    /// Effective configuration values
    pub config: serde_json::Value,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(section) = &self.section {
            let section_label = format!("[{section}]");
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;
        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_render_invalid() {
        let report = ConfigValidationReport {
            source: "strata.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'catalog.parallelism'".to_owned()],
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("INVALID"));
        assert!(output.contains("catalog.parallelism"));
    }

    #[test]
    fn test_config_report_json_skips_toml_text() {
        let report = ConfigReport {
            source: "strata.toml".to_owned(),
            section: Some("general".to_owned()),
            config_toml: "log_level = \"info\"\n".to_owned(),
            config: serde_json::json!({ "log_level": "info" }),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("config_toml").is_none());
        assert_eq!(json["config"]["log_level"], "info");
        assert_eq!(json["section"], "general");
    }

    #[tokio::test]
    async fn test_show_unknown_section_is_command_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = show(&dir.path().join("strata.toml"), Some("ebpf"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("unknown section"));
    }
}
