//! `strata catalogers` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use strata_catalog::{CatalogerConfig, CatalogerRegistry, Scope};
use strata_core::config::StrataConfig;

use crate::cli::{CatalogersAction, CatalogersArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `catalogers` command.
pub async fn execute(
    args: CatalogersArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        CatalogersAction::List { scope } => {
            let config = StrataConfig::load_or_default(config_path).await?;
            let catalog_config = CatalogerConfig::from_core(&config);
            let registry = CatalogerRegistry::new(&catalog_config);
            let report = build_list_report(&registry, &catalog_config, scope);
            writer.render(&report)
        }
    }
}

/// Build the listing for `scope`, marking which catalogers the configured patterns select.
pub fn build_list_report(
    registry: &CatalogerRegistry,
    config: &CatalogerConfig,
    scope: Scope,
) -> CatalogerListReport {
    let names = |s: Scope| -> Vec<String> {
        registry
            .catalogers(s)
            .iter()
            .map(|c| c.name().to_owned())
            .collect()
    };
    let image = names(Scope::Image);
    let directory = names(Scope::Directory);
    let selected = names_of_selected(registry, config, scope);

    let catalogers = registry
        .catalogers(scope)
        .iter()
        .map(|c| {
            let name = c.name().to_owned();
            let mut scopes = Vec::new();
            if image.contains(&name) {
                scopes.push(Scope::Image.as_str().to_owned());
            }
            if directory.contains(&name) {
                scopes.push(Scope::Directory.as_str().to_owned());
            }
            CatalogerEntry {
                selected: selected.contains(&name),
                name,
                scopes,
            }
        })
        .collect();

    CatalogerListReport {
        scope: scope.as_str().to_owned(),
        patterns: config.catalogers.clone(),
        catalogers,
    }
}

fn names_of_selected(
    registry: &CatalogerRegistry,
    config: &CatalogerConfig,
    scope: Scope,
) -> Vec<String> {
    registry
        .select(scope, &config.catalogers)
        .iter()
        .map(|c| c.name().to_owned())
        .collect()
}

/// Cataloger listing.
#[derive(Serialize)]
pub struct CatalogerListReport {
    /// Listed scope.
    pub scope: String,
    /// Configured selection patterns.
    pub patterns: Vec<String>,
    /// Catalogers in registration order.
    pub catalogers: Vec<CatalogerEntry>,
}

/// One listed cataloger.
#[derive(Serialize)]
pub struct CatalogerEntry {
    pub name: String,
    pub scopes: Vec<String>,
    pub selected: bool,
}

impl Render for CatalogerListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let patterns = if self.patterns.is_empty() {
            "(all)".to_owned()
        } else {
            self.patterns.join(", ")
        };
        writeln!(
            w,
            "Catalogers for scope {} (selection: {})",
            self.scope.bold(),
            patterns
        )?;
        writeln!(w)?;
        writeln!(w, "{:<32} {:<20} Selected", "Name", "Scopes")?;
        writeln!(w, "{}", "-".repeat(62))?;
        for entry in &self.catalogers {
            let selected = if entry.selected {
                "yes".green()
            } else {
                "no".dimmed()
            };
            writeln!(
                w,
                "{:<32} {:<20} {}",
                entry.name,
                entry.scopes.join(","),
                selected
            )?;
        }
        Ok(())
    }
}
