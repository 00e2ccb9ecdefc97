use std::sync::Arc;

use carona::config::{Config, StoreKind};
use carona::engine::Engine;
use carona::error::Error;
use carona::server::serve;
use carona::store::{DynStore, MemoryStore, RestStore};

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let store: DynStore = match config.store {
        StoreKind::Rest => {
            tracing::info!(url = %config.api_url, "using REST backend");
            Arc::new(RestStore::new(config.api_url.clone()))
        }
        StoreKind::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let engine = Engine::new(store, config.criteria)?;

    serve(engine, config.listen_addr).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
