use std::{
    env,
    net::{Ipv6Addr, SocketAddr},
};

use axum::routing::get;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod context;
mod dashboard;
mod docs;
mod envelope;
mod errors;
mod likes;
pub mod logging;
mod playlists;
mod schemas;
mod serialized;
mod subscriptions;
mod videos;

pub use context::{ServerCatalog, ServerContext};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 9060;

pub type Router = axum::Router<ServerContext>;

/// Starts the streamtube server
pub async fn run_server(context: ServerContext) {
    let port = env::var("STREAMTUBE_SERVER_PORT")
        .map(|x| x.parse::<u16>().expect("Port must be a number"))
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let version_one_router = Router::new()
        .nest("/videos", videos::router())
        .nest("/playlists", playlists::router())
        .nest("/likes", likes::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/dashboard", dashboard::router());

    let root_router = Router::new()
        .nest("/v1", version_one_router)
        .route("/docs.json", get(docs::docs))
        .layer(cors)
        .with_state(context);

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Listening on port {port}");

    axum::serve(listener, root_router.into_make_service())
        .await
        .expect("server runs");
}
