use std::sync::Arc;

use axum::extract::FromRef;
use streamtube_catalog::{Catalog, HttpMediaStorage, PgDatabase};

/// The catalog instance a running server operates on
pub type ServerCatalog = Catalog<PgDatabase, HttpMediaStorage>;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub catalog: Arc<ServerCatalog>,
}
