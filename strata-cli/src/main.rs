use std::process::ExitCode;

use clap::Parser;

use strata_cli::cli::{Cli, Commands};
use strata_cli::commands;
use strata_cli::error::CliError;
use strata_cli::logging;
use strata_cli::output::OutputWriter;
use strata_core::config::{GeneralConfig, StrataConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(&log_settings(&cli).await) {
        eprintln!("error: {e}");
        return exit_code(&e);
    }

    tracing::debug!(config = %cli.config.display(), "strata starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}

/// 로깅 설정: 설정 파일을 읽을 수 없으면 기본값 (`config validate`가 에러를 보고함)
async fn log_settings(cli: &Cli) -> GeneralConfig {
    let mut general = StrataConfig::load_or_default(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    general
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output_format());
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Catalogers(args) => {
            commands::catalogers::execute(args, &cli.config, &writer).await
        }
        Commands::Schema(args) => commands::schema::execute(args, &writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

fn exit_code(e: &CliError) -> ExitCode {
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}
