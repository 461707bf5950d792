//! CNPJ ETL - Main entry point

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use cnpj_common::logging::{init_logging, LogConfig, LogLevel};
use sqlx::postgres::PgPoolOptions;
use tracing::error;

use cnpj_etl::config::Config;
use cnpj_etl::pipeline::{
    CsvPipeline, EmpresasPipeline, EstabelecimentosPipeline, ReferencePipeline, Runner,
    SimplesPipeline,
};

/// Bulk-load the public CNPJ extracts into Postgres
#[derive(Debug, Parser)]
#[command(name = "cnpj-etl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// One subcommand per source file; all share the same flags
#[derive(Debug, Args)]
struct ImportArgs {
    /// Source extract, absolute or relative to CNPJ_PROJECT_ROOT
    file: String,

    /// Validate the file layout and transform the first row without writing
    #[arg(long)]
    dry_run: bool,

    /// Suppress the progress bar and informational logs
    #[arg(short, long)]
    quiet: bool,

    /// Trace every row outcome (verbose)
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the countries reference table (PAISCSV)
    Paises(ImportArgs),
    /// Load the municipalities reference table (MUNICCSV)
    Municipios(ImportArgs),
    /// Load the legal-nature reference table (NATJUCSV)
    Naturezas(ImportArgs),
    /// Load the qualifications reference table (QUALSCSV)
    Qualificacoes(ImportArgs),
    /// Load the status-reason reference table (MOTICSV)
    Motivos(ImportArgs),
    /// Load the economic-activity reference table (CNAECSV)
    Cnaes(ImportArgs),
    /// Load the companies bulk table (EMPRECSV)
    Empresas(ImportArgs),
    /// Load the establishments bulk table (ESTABELE)
    Estabelecimentos(ImportArgs),
    /// Load the simplified-tax-regime bulk table (SIMPLES)
    Simples(ImportArgs),
}

impl Commands {
    fn import_args(&self) -> &ImportArgs {
        match self {
            Commands::Paises(args)
            | Commands::Municipios(args)
            | Commands::Naturezas(args)
            | Commands::Qualificacoes(args)
            | Commands::Motivos(args)
            | Commands::Cnaes(args)
            | Commands::Empresas(args)
            | Commands::Estabelecimentos(args)
            | Commands::Simples(args) => args,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let args = cli.command.import_args();

    let level = if args.debug {
        LogLevel::Debug
    } else if args.quiet {
        LogLevel::Warn
    } else {
        LogLevel::Info
    };
    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_level(level);
    // The loader must still work if a subscriber is already installed
    let _ = init_logging(&log_config);

    if let Err(e) = execute(&cli.command).await {
        error!(error = %e, "import failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn execute(command: &Commands) -> anyhow::Result<()> {
    let args = command.import_args();
    let config = Config::from_env()?;
    let path: PathBuf = config.resolve_path(&args.file);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let runner = Runner::new()
        .with_progress(!args.quiet && !args.dry_run)
        .with_debug(args.debug);

    match command {
        Commands::Paises(_) => {
            run_pipeline(&runner, &ReferencePipeline::paises(pool), &path, args).await
        }
        Commands::Municipios(_) => {
            run_pipeline(&runner, &ReferencePipeline::municipios(pool), &path, args).await
        }
        Commands::Naturezas(_) => {
            run_pipeline(&runner, &ReferencePipeline::naturezas(pool), &path, args).await
        }
        Commands::Qualificacoes(_) => {
            run_pipeline(&runner, &ReferencePipeline::qualificacoes(pool), &path, args).await
        }
        Commands::Motivos(_) => {
            run_pipeline(&runner, &ReferencePipeline::motivos(pool), &path, args).await
        }
        Commands::Cnaes(_) => {
            run_pipeline(&runner, &ReferencePipeline::cnaes(pool), &path, args).await
        }
        Commands::Empresas(_) => {
            run_pipeline(&runner, &EmpresasPipeline::new(pool), &path, args).await
        }
        Commands::Estabelecimentos(_) => {
            run_pipeline(&runner, &EstabelecimentosPipeline::new(pool), &path, args).await
        }
        Commands::Simples(_) => {
            run_pipeline(&runner, &SimplesPipeline::new(pool), &path, args).await
        }
    }
}

async fn run_pipeline<P: CsvPipeline>(
    runner: &Runner,
    pipeline: &P,
    path: &std::path::Path,
    args: &ImportArgs,
) -> anyhow::Result<()> {
    if args.dry_run {
        runner.dry_run(pipeline, path).await?;
        println!(
            "dry-run ok: {} layout validated against {}",
            pipeline.layout().entity,
            path.display()
        );
        return Ok(());
    }

    let stats = runner.run(pipeline, path).await?;
    println!("{}: {stats}", pipeline.layout().entity);
    Ok(())
}
