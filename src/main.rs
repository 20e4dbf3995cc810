//! sitemap-architect CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sitemap_architect::{
    commands::{cmd_analyze, cmd_discover, cmd_init, print_report, print_sitemaps},
    config::Config,
    error::Result,
    server,
};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sitemap-architect")]
#[command(version, about = "Sitemap discovery and site structure analysis", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Analyze a sitemap: URL list, site tree and themes
    Analyze {
        /// Sitemap URL, or a site URL to discover the sitemap from
        url: String,

        /// Only print this many levels of the site tree
        #[arg(long)]
        tree_depth: Option<usize>,
    },

    /// List every sitemap a site exposes
    Discover {
        /// Base URL of the site
        base_url: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, log_json: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sitemap-architect", &mut std::io::stdout());
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            let config = cmd_init(path, force).await?;
            println!("✓ sitemap-architect initialized");
            println!("  Config: {}", config.config_file.display());
        }

        Commands::Serve { bind, port } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(&config).await?;
        }

        Commands::Analyze { url, tree_depth } => {
            let config = load_config(cli.config.as_deref())?;
            let report = cmd_analyze(&config, &url).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, tree_depth);
            }
        }

        Commands::Discover { base_url } => {
            let config = load_config(cli.config.as_deref())?;
            let sitemaps = cmd_discover(&config, &base_url).await?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "sitemaps": sitemaps }))?
                );
            } else {
                print_sitemaps(&base_url, &sitemaps);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}
