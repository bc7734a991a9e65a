use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mathgen::config::ConfigStore;
use mathgen_cli::commands::{ConfigCommand, GenerateCommand, ProvidersCommand};
use mathgen_cli::error::CliResult;
use mathgen_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mathgen")]
#[command(about = "Generate worked math problems as LaTeX documents with an LLM")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Generate a LaTeX problem set for a topic")]
    Generate(GenerateCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),

    #[clap(about = "List supported providers")]
    Providers(ProvidersCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let store = ConfigStore::discover(cli.config.as_deref());

    match &cli.command {
        Command::Generate(cmd) => {
            let config = store.load()?;
            init_logging(&config.logging.level, cli.verbose);
            tracing::debug!("Config loaded from {}", store.path().display());
            cmd.execute(&config, format).await
        }
        Command::Config(cmd) => {
            init_logging("warn", cli.verbose);
            cmd.execute(&store, format).await
        }
        Command::Providers(cmd) => cmd.execute(format).await,
    }
}

fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,mathgen=debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
