use clap::Parser;
use popcache::cli::{Cli, Commands};
use popcache::types::config::{Config, LogFormat};
use popcache::PopcacheResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> PopcacheResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = Config::load_or_default(&cli.config)?;

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("popcache={}", log_level)
            .parse()
            .unwrap_or_else(|_| "popcache=info".parse().expect("fallback directive is valid")),
    );

    match config.general.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => popcache::cli::commands::init(path)?,
        Commands::Config => popcache::cli::commands::config_cmd(&config)?,
        Commands::Replay {
            file,
            capacity,
            json,
        } => popcache::cli::commands::replay_trace(&file, capacity, json, &config)?,
        Commands::Version => popcache::cli::commands::version(),
    }

    Ok(())
}
