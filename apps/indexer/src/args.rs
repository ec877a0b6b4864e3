//! Command-line interface of the indexer.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pdl-indexer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Maintains the Elasticsearch index behind /api/v1/search")]
pub struct Cli {
    /// Configuration file, without extension
    #[arg(long, default_value = "server")]
    pub config: String,

    #[command(subcommand)]
    pub command: IndexCommand,
}

#[derive(Debug, Subcommand)]
pub enum IndexCommand {
    /// Create the index with its analyzer and mappings, unless it exists
    CreateIndex {},
    /// Delete the index if present
    DeleteIndex {},
    /// Load every linked data resource into the index
    Reindex {
        /// Only this resource type, e.g. `research_briefing`
        #[arg(long)]
        resource: Option<String>,
    },
}
