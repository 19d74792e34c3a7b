//! CLI module - Command-line interface for lundflix
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Mediable, MovieId, ShowId};

/// lundflix - catalog sync for TVMaze episodes and FanArt artwork
#[derive(Parser)]
#[command(name = "lundflix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    Init,

    /// Reconcile a saved TVMaze episode list and print the resulting rows
    Reconcile {
        /// JSON file holding the TVMaze episode array
        file: PathBuf,
        /// Catalog show id to assign
        #[arg(long)]
        show_id: i64,
    },

    /// Select best artwork from a saved FanArt response and print the rows
    Artwork {
        /// JSON file holding the FanArt response
        file: PathBuf,
        #[command(flatten)]
        owner: OwnerArgs,
    },

    /// Fetch a show's episodes from TVMaze and upsert them into the store
    #[command(alias = "se")]
    SyncEpisodes {
        /// Catalog show id
        #[arg(long)]
        show_id: i64,
        /// TVMaze show id
        #[arg(long)]
        tvmaze_id: i64,
    },

    /// Fetch FanArt images and upsert them into the store
    #[command(alias = "sa")]
    SyncArtwork {
        #[command(flatten)]
        owner: OwnerArgs,
        /// FanArt lookup id (TMDB/IMDb id for movies, TVDB id for shows)
        #[arg(long)]
        fanart_id: String,
    },

    /// List stored episodes of a show
    #[command(alias = "ls")]
    Episodes {
        /// Catalog show id
        #[arg(long)]
        show_id: i64,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct OwnerArgs {
    /// Catalog movie id
    #[arg(long)]
    pub movie: Option<i64>,

    /// Catalog show id
    #[arg(long)]
    pub show: Option<i64>,
}

impl OwnerArgs {
    pub fn mediable(&self) -> Result<Mediable> {
        match (self.movie, self.show) {
            (Some(id), None) => Ok(Mediable::Movie(MovieId::new(id))),
            (None, Some(id)) => Ok(Mediable::Show(ShowId::new(id))),
            _ => anyhow::bail!("Pass exactly one of --movie or --show"),
        }
    }
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sync_episodes() {
        let cli = Cli::parse_from(["lundflix", "sync-episodes", "--show-id", "5", "--tvmaze-id", "82"]);
        assert!(matches!(
            cli.command,
            Commands::SyncEpisodes { show_id: 5, tvmaze_id: 82 }
        ));
    }

    #[test]
    fn artwork_owner_is_exclusive() {
        let cli = Cli::parse_from(["lundflix", "artwork", "fanart.json", "--show", "3"]);
        let Commands::Artwork { owner, .. } = cli.command else {
            panic!("expected artwork command");
        };
        assert_eq!(owner.mediable().unwrap(), Mediable::Show(ShowId::new(3)));

        assert!(
            Cli::try_parse_from(["lundflix", "artwork", "f.json", "--show", "3", "--movie", "4"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["lundflix", "artwork", "f.json"]).is_err());
    }
}
