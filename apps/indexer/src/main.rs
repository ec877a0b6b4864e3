#![allow(clippy::print_stdout)]

mod args;

use anyhow::{Context, bail};
use args::{Cli, IndexCommand};
use clap::Parser;
use pdl::domain::config::ApiConfig;
use pdl::features::resources::linked_data::LinkedDataService;
use pdl::features::search::SearchIndexer;
use pdl::features::search::indexer::INDEXED_RESOURCES;
use pdl::kernel::config::load_config;
use pdl::kernel::upstream::Upstreams;
use pdl_logger::Logger;
use tracing::info;

#[pdl_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg: ApiConfig =
        load_config(Some(cli.config.as_str())).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_settings(
        env!("CARGO_PKG_NAME"),
        &cfg.logging.level,
        cfg.logging.directory.as_deref(),
        cfg.logging.json,
    )?;

    let upstreams = Upstreams::from_config(&cfg).context("Failed to set up upstream clients")?;
    let indexer = SearchIndexer::new(
        upstreams.elastic.clone(),
        LinkedDataService::new(upstreams.sparql.clone()),
        cfg.search.index.as_str(),
    );

    match cli.command {
        IndexCommand::CreateIndex {} => {
            if indexer.create_index().await? {
                println!("Created index {}", indexer.index());
            } else {
                println!("Index {} already exists", indexer.index());
            }
        },
        IndexCommand::DeleteIndex {} => {
            if indexer.delete_index().await? {
                println!("Deleted index {}", indexer.index());
            } else {
                println!("Index {} does not exist", indexer.index());
            }
        },
        IndexCommand::Reindex { resource: None } => {
            for (resource, count) in indexer.reindex_all().await? {
                println!("{resource}: {count} documents");
            }
        },
        IndexCommand::Reindex { resource: Some(resource) } => {
            let Some(definition) = INDEXED_RESOURCES.iter().copied().find(|d| d.type_key == resource) else {
                let known: Vec<&str> = INDEXED_RESOURCES.iter().map(|d| d.type_key).collect();
                bail!("Unknown resource '{resource}'. Indexed resources: {}", known.join(", "));
            };
            let count = indexer.reindex(definition).await?;
            println!("{resource}: {count} documents");
        },
    }

    info!(index = %indexer.index(), "Indexer finished");
    Ok(())
}
