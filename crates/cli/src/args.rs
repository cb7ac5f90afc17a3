//! Command-line surface for `stellate-purge`.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stellate-purge", version, about = "Manually purge a Stellate edge cache", long_about = None)]
pub struct Cli {
    /// Verbose logging of generated mutations and admin API responses
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Purge one or more cached queries by name
    Queries {
        /// Query names, sent in the given order
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Purge an entity type, optionally a single instance
    Type {
        /// Type name, e.g. `post`
        name: String,
        /// Id of the instance to purge; omit to purge every instance
        #[arg(long)]
        id: Option<String>,
    },
    /// Validate configuration and report whether purging is enabled
    Check,
}
