//! `strata schema` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use strata_catalog::JSON_SCHEMA_VERSION;
use strata_catalog::schema;

use crate::cli::{SchemaAction, SchemaArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `schema` command.
pub fn execute(args: SchemaArgs, writer: &OutputWriter) -> Result<(), CliError> {
    match args.action {
        SchemaAction::Write { dir } => {
            info!(dir = %dir.display(), version = JSON_SCHEMA_VERSION, "writing schema");
            let path = schema::write(&dir)?;
            writer.render(&SchemaReport {
                version: JSON_SCHEMA_VERSION.to_owned(),
                path: path.display().to_string(),
            })
        }
    }
}

/// Written schema file.
#[derive(Serialize)]
pub struct SchemaReport {
    pub version: String,
    pub path: String,
}

impl Render for SchemaReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Schema {} written to {}",
            self.version.bold(),
            self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_schema_write_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let args = || SchemaArgs {
            action: SchemaAction::Write {
                dir: dir.path().to_path_buf(),
            },
        };
        let writer = OutputWriter::new(OutputFormat::Json);

        execute(args(), &writer).unwrap();
        execute(args(), &writer).unwrap();
        assert!(
            dir.path()
                .join(format!("schema-{JSON_SCHEMA_VERSION}.json"))
                .exists()
        );
    }

    #[test]
    fn test_schema_write_conflict_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(format!("schema-{JSON_SCHEMA_VERSION}.json")),
            "{}\n",
        )
        .unwrap();

        let err = execute(
            SchemaArgs {
                action: SchemaAction::Write {
                    dir: dir.path().to_path_buf(),
                },
            },
            &OutputWriter::new(OutputFormat::Json),
        )
        .unwrap_err();
        assert!(err.to_string().contains("schema conflict"));
    }
}
