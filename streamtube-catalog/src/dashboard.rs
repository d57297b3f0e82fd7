use std::sync::Arc;

use thiserror::Error;

use crate::{ChannelStatsData, Database, DatabaseError, PrimaryKey, VideoData};

/// Aggregated statistics and listings for a channel's own dashboard
pub struct DashboardManager<Db> {
    database: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl<Db> DashboardManager<Db>
where
    Db: Database,
{
    pub fn new(database: &Arc<Db>) -> Self {
        Self {
            database: database.clone(),
        }
    }

    /// Subscriber count and video totals for the channel. The subscriber
    /// count is computed independently of the video aggregation.
    pub async fn channel_stats(
        &self,
        channel_id: PrimaryKey,
    ) -> Result<ChannelStatsData, DashboardError> {
        let total_subscribers = self.database.count_subscribers(channel_id).await?;
        let video_stats = self.database.channel_video_stats(channel_id).await?;

        Ok(ChannelStatsData {
            total_subscribers,
            total_videos: video_stats.total_videos,
            total_views: video_stats.total_views,
            total_likes: video_stats.total_likes,
        })
    }

    /// All videos owned by the channel, regardless of publish state
    pub async fn channel_videos(
        &self,
        channel_id: PrimaryKey,
    ) -> Result<Vec<VideoData>, DashboardError> {
        self.database
            .videos_by_owner(channel_id)
            .await
            .map_err(Into::into)
    }
}
