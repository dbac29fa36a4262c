use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::resolver::PathResolver;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, cfg).await
}

/// Accepts connections from an already bound listener and serves each one on
/// its own task. Only returns on a configuration error.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let resolver = Arc::new(PathResolver::new(&cfg.static_files.document_root)?);
    info!(root = %resolver.root().display(), "Serving files");

    let limit = (cfg.server.max_connections > 0)
        .then(|| Arc::new(Semaphore::new(cfg.server.max_connections)));

    loop {
        let permit = match &limit {
            Some(limit) => Some(limit.clone().acquire_owned().await?),
            None => None,
        };

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let resolver = resolver.clone();
        let static_config = cfg.static_files.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let mut conn = Connection::new(socket, peer, resolver, &static_config);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
