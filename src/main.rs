use anyhow::Context;
use astra::Server;
use listing_price::config::ServiceConfig;
use listing_price::router::handle;
use listing_price::state::AppState;
use listing_price::templates;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env();
    let addr: SocketAddr = config
        .addr
        .parse()
        .with_context(|| format!("invalid bind address `{}`", config.addr))?;
    let max_workers = config.max_workers;

    // Opens the database and loads the latest model, if any.
    let state = Arc::new(AppState::new(config).context("database initialization failed")?);

    info!(%addr, max_workers, "starting server");
    let server = Server::bind(&addr).max_workers(max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => templates::html_error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        return Err(e.into());
    }

    info!("server shut down cleanly");
    Ok(())
}
