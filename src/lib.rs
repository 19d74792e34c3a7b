pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
pub use config::Config;

/// Installs the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine readable.
pub fn init_tracing(config: &config::GeneralConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let json = config.log_format == "json";
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let fmt_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => {
            let path = std::path::Path::new(config::CONFIG_FILE);
            if Config::create_default_at(path)? {
                println!("✓ Config file created. Edit {} and run again.", path.display());
            } else {
                println!("{} already exists, leaving it untouched.", path.display());
            }
            Ok(())
        }

        Commands::Reconcile { file, show_id } => cli::cmd_reconcile(&file, show_id).await,

        Commands::Artwork { file, owner } => cli::cmd_artwork(&file, owner.mediable()?).await,

        Commands::SyncEpisodes { show_id, tvmaze_id } => {
            cli::cmd_sync_episodes(&config, show_id, tvmaze_id).await
        }

        Commands::SyncArtwork { owner, fanart_id } => {
            cli::cmd_sync_artwork(&config, owner.mediable()?, &fanart_id).await
        }

        Commands::Episodes { show_id } => cli::cmd_episodes(&config, show_id).await,
    }
}
