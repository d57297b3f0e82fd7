use std::{env, sync::Arc};

use log::{error, info};
use streamtube_catalog::{Catalog, DatabaseError, HttpMediaStorage, PgDatabase, StorageError};
use streamtube_server::{logging, run_server, ServerContext};
use thiserror::Error;

#[derive(Debug, Error)]
enum StartError {
    #[error("{0} must be set")]
    MissingVariable(&'static str),

    #[error("Could not connect to database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Could not set up media storage: {0}")]
    Storage(#[from] StorageError),
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    if let Err(error) = start().await {
        error!("streamtube failed to start!");
        error!("{error}");
    }
}

async fn start() -> Result<(), StartError> {
    let database_url = env::var("STREAMTUBE_DATABASE_URL")
        .map_err(|_| StartError::MissingVariable("STREAMTUBE_DATABASE_URL"))?;

    let media_url = env::var("STREAMTUBE_MEDIA_URL")
        .map_err(|_| StartError::MissingVariable("STREAMTUBE_MEDIA_URL"))?;

    info!("Connecting to database...");
    let database = PgDatabase::new(&database_url).await?;
    let storage = HttpMediaStorage::new(&media_url)?;

    let catalog = Catalog::new(database, storage);

    run_server(ServerContext {
        catalog: Arc::new(catalog),
    })
    .await;

    Ok(())
}
