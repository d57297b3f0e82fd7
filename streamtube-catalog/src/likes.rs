use std::sync::Arc;

use thiserror::Error;

use crate::{Database, DatabaseError, LikeTarget, LikedVideoData, PrimaryKey};

/// Manages likes on videos and comments
pub struct LikeManager<Db> {
    database: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum LikeError {
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl<Db> LikeManager<Db>
where
    Db: Database,
{
    pub fn new(database: &Arc<Db>) -> Self {
        Self {
            database: database.clone(),
        }
    }

    /// Likes the video if it isn't liked by the user yet, otherwise removes
    /// the like. Returns whether the like exists afterwards.
    pub async fn toggle_video_like(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<bool, LikeError> {
        self.database
            .toggle_like(user_id, LikeTarget::Video(video_id))
            .await
            .map_err(Into::into)
    }

    /// Same as [LikeManager::toggle_video_like], for comments
    pub async fn toggle_comment_like(
        &self,
        comment_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<bool, LikeError> {
        self.database
            .toggle_like(user_id, LikeTarget::Comment(comment_id))
            .await
            .map_err(Into::into)
    }

    /// All videos liked by the user. Comment likes are excluded.
    pub async fn liked_videos(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<LikedVideoData>, LikeError> {
        self.database.liked_videos(user_id).await.map_err(Into::into)
    }
}
