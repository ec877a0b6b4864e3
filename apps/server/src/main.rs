use anyhow::Context;
use pdl::domain::config::ApiConfig;
use pdl::kernel::config::load_config;
use pdl_logger::Logger;
use pdl_server::Server;

#[pdl_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let logging = &cfg.logging;
    let _log = Logger::from_settings(
        env!("CARGO_PKG_NAME"),
        &logging.level,
        logging.directory.as_deref(),
        logging.json,
    )?;
    pdl::kernel::server::mark_started();

    Server::builder().config(cfg).build()?.run().await
}
