use std::process::ExitCode;

use clap::Parser;
use fructcheck::cli::{commands, Cli, Commands};
use fructcheck::types::config::Config;
use fructcheck::FructResult;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials may live in a .env file next to the config.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let (config, load_error) = if cli.config.exists() {
        match Config::load(&cli.config) {
            Ok(config) => (config, None),
            Err(e) => (Config::default_config(), Some(e)),
        }
    } else {
        (Config::default_config(), None)
    };

    init_logging(&cli, &config);

    match load_error {
        Some(e) => tracing::warn!(
            path = %cli.config.display(),
            error = %e,
            "invalid configuration, using defaults"
        ),
        None => tracing::debug!("configuration loaded from {}", cli.config.display()),
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        // Already explained to the user by the command.
        Err(e) if e.is_not_found() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// CLI flags take precedence over the configured level.
fn init_logging(cli: &Cli, config: &Config) {
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let directive = format!("fructcheck={}", log_level)
        .parse::<Directive>()
        .or_else(|_| "fructcheck=info".parse::<Directive>());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }

    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> FructResult<()> {
    match cli.command {
        Commands::Search {
            query,
            json,
            no_cache_write,
        } => commands::search(&query, json, no_cache_write, &config).await,
        Commands::History { limit } => commands::history(limit, &config).await,
        Commands::Init { path } => commands::init(path).await,
        Commands::Config => commands::config_cmd(&cli.config).await,
        Commands::Doctor => commands::doctor(&config).await,
        Commands::Serve => commands::serve(&config).await,
        Commands::Version => {
            commands::version();
            Ok(())
        }
    }
}
