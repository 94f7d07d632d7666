//! `strata scan` command handler

use std::io::Write;
use std::path::Path;

use serde::{Serialize, Serializer};
use tracing::info;

use strata_catalog::format::model::Document;
use strata_catalog::{CatalogerConfig, CatalogerFailure, Scanner, to_format_model};
use strata_core::config::StrataConfig;
use strata_source::{Layer, Source};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// The document is always printed. Failed catalogers turn the exit status into
/// `CliError::PartialFailure` afterwards.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = run(&args, config_path).await?;
    writer.render(&report)?;

    if !report.failures.is_empty() {
        let names: Vec<&str> = report
            .failures
            .iter()
            .map(|f| f.cataloger.as_str())
            .collect();
        return Err(CliError::PartialFailure {
            failed: names.len(),
            names: names.join(", "),
        });
    }
    Ok(())
}

/// Scan the target and build the report without printing it.
pub async fn run(args: &ScanArgs, config_path: &Path) -> Result<ScanReport, CliError> {
    let config = StrataConfig::load_or_default(config_path).await?;
    let catalog_config = catalog_config(&config, args);

    let source = build_source(args)?;
    let scanner = Scanner::builder().config(catalog_config).build()?;

    info!(
        target = %args.target.display(),
        scheme = %source.scheme(),
        layers = args.layer.len(),
        "starting scan"
    );
    let output = scanner.scan(source).await?;

    Ok(ScanReport {
        document: to_format_model(&output.sbom),
        failures: output.failures,
    })
}

/// Merge CLI flags over the file/env configuration.
fn catalog_config(config: &StrataConfig, args: &ScanArgs) -> CatalogerConfig {
    let mut catalog = CatalogerConfig::from_core(config);
    if !args.catalogers.is_empty() {
        catalog.catalogers = args.catalogers.clone();
    }
    catalog.exclude.extend(args.exclude.iter().cloned());
    catalog
}

fn build_source(args: &ScanArgs) -> Result<Source, CliError> {
    if args.layer.is_empty() {
        return Ok(Source::detect(&args.target)?);
    }
    let layers = args
        .layer
        .iter()
        .map(|dir| Layer::from_dir(dir.clone()))
        .collect();
    Ok(Source::image(args.target.display().to_string(), layers)?)
}

/// Result of one scan.
///
/// JSON output is exactly the SBOM document; failures only show up in text output
/// and the exit status.
#[derive(Debug)]
pub struct ScanReport {
    /// The SBOM document.
    pub document: Document,
    /// Catalogers that failed (sorted by name).
    pub failures: Vec<CatalogerFailure>,
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let target = match &self.document.source.target {
            serde_json::Value::String(path) => path.clone(),
            other => other
                .get("userInput")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned(),
        };
        writeln!(
            w,
            "Source: {} ({})",
            target.bold(),
            self.document.source.kind
        )?;
        writeln!(w, "Packages: {}", self.document.artifacts.len())?;
        writeln!(
            w,
            "Relationships: {}",
            self.document.artifact_relationships.len()
        )?;
        writeln!(w, "Files: {}", self.document.files.len())?;
        writeln!(w)?;

        if self.document.artifacts.is_empty() {
            writeln!(w, "{}", "No packages found.".yellow())?;
        } else {
            writeln!(
                w,
                "{:<40} {:<24} {:<12} Found by",
                "Name", "Version", "Type"
            )?;
            writeln!(w, "{}", "-".repeat(100))?;
            for pkg in &self.document.artifacts {
                writeln!(
                    w,
                    "{:<40} {:<24} {:<12} {}",
                    pkg.name,
                    pkg.version,
                    pkg.package_type,
                    pkg.found_by.join(", ")
                )?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Failed catalogers:".red().bold())?;
            for failure in &self.failures {
                writeln!(w, "  {}: {}", failure.cataloger, failure.reason.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(target: &str) -> ScanArgs {
        ScanArgs {
            target: PathBuf::from(target),
            catalogers: Vec::new(),
            exclude: Vec::new(),
            layer: Vec::new(),
        }
    }

    #[test]
    fn test_cli_flags_override_config() {
        let mut config = StrataConfig::default();
        config.catalog.catalogers = vec!["javascript".to_owned()];
        config.catalog.exclude = vec!["**/vendor/**".to_owned()];

        let mut scan_args = args(".");
        scan_args.catalogers = vec!["go".to_owned()];
        scan_args.exclude = vec!["**/testdata/**".to_owned()];

        let merged = catalog_config(&config, &scan_args);
        assert_eq!(merged.catalogers, vec!["go"]);
        assert_eq!(merged.exclude, vec!["**/vendor/**", "**/testdata/**"]);
    }

    #[test]
    fn test_empty_flags_keep_config_selection() {
        let mut config = StrataConfig::default();
        config.catalog.catalogers = vec!["rust".to_owned()];
        let merged = catalog_config(&config, &args("."));
        assert_eq!(merged.catalogers, vec!["rust"]);
    }

    #[test]
    fn test_layers_make_image_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut scan_args = args("alpine:3.19");
        scan_args.layer = vec![dir.path().to_path_buf()];

        let source = build_source(&scan_args).unwrap();
        let description = source.describe();
        assert_eq!(description.scheme.as_str(), "image");
        assert_eq!(description.image.unwrap().user_input, "alpine:3.19");
    }

    #[test]
    fn test_missing_target_is_source_error() {
        let err = build_source(&args("/nonexistent/strata/target")).unwrap_err();
        assert!(matches!(err, CliError::Source(_)));
    }
}
