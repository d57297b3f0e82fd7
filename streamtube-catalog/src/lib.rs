mod access;
mod dashboard;
mod db;
mod likes;
mod playlists;
mod storage;
mod subscriptions;
mod videos;

use std::sync::Arc;

pub use access::*;
pub use dashboard::*;
pub use db::*;
pub use likes::*;
pub use playlists::*;
pub use storage::*;
pub use subscriptions::*;
pub use videos::*;

/// The streamtube catalog system, facilitating videos, playlists, likes,
/// subscriptions, and channel dashboards.
pub struct Catalog<Db, S> {
    database: Arc<Db>,

    pub videos: VideoManager<Db, S>,
    pub playlists: PlaylistManager<Db>,
    pub likes: LikeManager<Db>,
    pub subscriptions: SubscriptionManager<Db>,
    pub dashboard: DashboardManager<Db>,
}

impl<Db, S> Catalog<Db, S>
where
    Db: Database,
    S: MediaStorage,
{
    pub fn new(database: Db, storage: S) -> Self {
        let database = Arc::new(database);
        let storage = Arc::new(storage);

        Self {
            videos: VideoManager::new(&database, &storage),
            playlists: PlaylistManager::new(&database),
            likes: LikeManager::new(&database),
            subscriptions: SubscriptionManager::new(&database),
            dashboard: DashboardManager::new(&database),
            database,
        }
    }

    /// Resolves the session behind a bearer token, if it exists
    pub async fn session(&self, token: &str) -> Result<SessionData> {
        self.database.session_by_token(token).await
    }
}
