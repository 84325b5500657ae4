use anyhow::Result;
use clap::{Parser, Subcommand};
use resource_graph::app::engine::DiagnosticsEngine;
use resource_graph::cli::{self, FailOn, NamerKind, OutputFormat};
use resource_graph::server;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rgtool")]
#[command(about = "Detect misconfigured routes and services in a set of cluster objects", long_about = None)]
struct Cli {
    /// How related nodes are named in the output
    #[arg(long, value_enum, global = true, default_value_t = NamerKind::Default)]
    namer: NamerKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph for an object file and report diagnostic markers
    Diagnose {
        /// JSON or YAML file with the objects to check
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Exit with a failure status when a marker at or above this severity is found
        #[arg(long, value_enum, default_value_t = FailOn::Error)]
        fail_on: FailOn,
    },
    /// Print the resource graph for an object file as JSON
    Graph {
        file: PathBuf,
    },
    /// Serve the diagnostics engine over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let engine = DiagnosticsEngine::default_pipeline().with_namer(cli.namer.namer());

    match cli.command {
        Commands::Diagnose {
            file,
            format,
            fail_on,
        } => {
            let failed = cli::diagnose_file(&engine, &file, format, fail_on)?;
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Graph { file } => {
            cli::dump_graph(&engine, &file)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { addr } => {
            server::http::serve(engine, addr).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
