use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    query, query_as, query_scalar, Error as SqlxError, FromRow, PgPool, Postgres, QueryBuilder,
    Row,
};

use crate::{
    ChannelSubscriberData, Database, DatabaseError, IntoDatabaseError, LikeTarget, LikedVideoData,
    NewPlaylist, NewVideo, Page, Pagination, PlaylistData, PrimaryKey, Result, SessionData,
    SortDirection, SubscribedChannelData, UpdatedPlaylist, UpdatedVideo, UserData, VideoData,
    VideoFilter, VideoSort, VideoStatsData, VideoWithOwner,
};

/// A postgres database implementation for streamtube
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }

    async fn playlist_video_ids(&self, playlist_id: PrimaryKey) -> Result<Vec<PrimaryKey>> {
        query_scalar(
            "SELECT video_id FROM playlist_videos WHERE playlist_id = $1 ORDER BY position",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }
}

/// Builds a [UserData] from a row where the user columns are aliased
/// `user_id`, `username`, `display_name`, and `avatar_url`.
fn joined_user(row: &PgRow) -> std::result::Result<UserData, SqlxError> {
    Ok(UserData {
        id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        avatar_url: row.try_get("avatar_url")?,
    })
}

/// Builds a [PlaylistData] with an empty video list from a `playlists` row
fn playlist_from_row(row: &PgRow) -> std::result::Result<PlaylistData, SqlxError> {
    Ok(PlaylistData {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        owner_id: row.try_get("owner_id")?,
        videos: vec![],
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Database for PgDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        query_as(
            "SELECT id, username, display_name, avatar_url FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("user", "id"))
    }

    async fn session_by_token(&self, token: &str) -> Result<SessionData> {
        let row = query(
            "SELECT
                sessions.id,
                sessions.token,
                users.id AS user_id,
                users.username,
                users.display_name,
                users.avatar_url
            FROM sessions
                INNER JOIN users ON sessions.user_id = users.id
            WHERE token = $1",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("session", "token"))?;

        let result = SessionData {
            id: row.try_get("id").map_err(|e| e.any())?,
            token: row.try_get("token").map_err(|e| e.any())?,
            user: joined_user(&row).map_err(|e| e.any())?,
        };

        Ok(result)
    }

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData> {
        query_as("SELECT * FROM videos WHERE id = $1")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("video", "id"))
    }

    async fn videos_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<VideoData>> {
        query_as("SELECT * FROM videos WHERE owner_id = $1 ORDER BY created_at DESC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn list_videos(
        &self,
        filter: VideoFilter,
        sort: VideoSort,
        pagination: Pagination,
    ) -> Result<Page<VideoWithOwner>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT
                videos.*,
                users.id AS user_id,
                users.username,
                users.display_name,
                users.avatar_url,
                COUNT(*) OVER () AS total_count
            FROM videos
                INNER JOIN users ON users.id = videos.owner_id
            WHERE videos.is_published = TRUE",
        );

        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");

            builder.push(" AND (videos.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR videos.description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(owner_id) = filter.owner_id {
            builder.push(" AND videos.owner_id = ");
            builder.push_bind(owner_id);
        }

        builder.push(" ORDER BY ");
        builder.push(sort.field.column());
        builder.push(match sort.direction {
            SortDirection::Ascending => " ASC",
            SortDirection::Descending => " DESC",
        });

        builder.push(" LIMIT ");
        builder.push_bind(pagination.limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(pagination.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        let total_items = rows
            .first()
            .map(|row| row.try_get::<i64, _>("total_count"))
            .transpose()
            .map_err(|e| e.any())?
            .unwrap_or(0);

        let items = rows
            .iter()
            .map(|row| {
                Ok(VideoWithOwner {
                    video: VideoData::from_row(row)?,
                    owner: joined_user(row)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, SqlxError>>()
            .map_err(|e| e.any())?;

        Ok(Page::new(items, pagination, total_items))
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData> {
        query_as(
            "INSERT INTO videos (title, description, video_url, thumbnail_url, duration, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(new_video.title)
        .bind(new_video.description)
        .bind(new_video.video_url)
        .bind(new_video.thumbnail_url)
        .bind(new_video.duration)
        .bind(new_video.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData> {
        let video = self.video_by_id(updated_video.id).await?;

        query(
            "UPDATE videos SET
                title = $1,
                description = $2,
                thumbnail_url = $3,
                updated_at = timezone('UTC', now())
            WHERE id = $4",
        )
        .bind(updated_video.title.unwrap_or(video.title))
        .bind(updated_video.description.unwrap_or(video.description))
        .bind(updated_video.thumbnail_url.unwrap_or(video.thumbnail_url))
        .bind(updated_video.id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.video_by_id(updated_video.id).await
    }

    async fn set_video_published(
        &self,
        video_id: PrimaryKey,
        published: bool,
    ) -> Result<VideoData> {
        let result = query(
            "UPDATE videos SET
                is_published = $1,
                updated_at = timezone('UTC', now())
            WHERE id = $2",
        )
        .bind(published)
        .bind(video_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "video",
                identifier: "id",
            });
        }

        self.video_by_id(video_id).await
    }

    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()> {
        // Ensure video exists
        let _ = self.video_by_id(video_id).await?;

        query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn playlist_by_id(&self, playlist_id: PrimaryKey) -> Result<PlaylistData> {
        let row = query("SELECT * FROM playlists WHERE id = $1")
            .bind(playlist_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("playlist", "id"))?;

        let mut playlist = playlist_from_row(&row).map_err(|e| e.any())?;
        playlist.videos = self.playlist_video_ids(playlist_id).await?;

        Ok(playlist)
    }

    async fn playlists_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PlaylistData>> {
        let rows = query("SELECT * FROM playlists WHERE owner_id = $1 ORDER BY created_at DESC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        let mut playlists = rows
            .iter()
            .map(playlist_from_row)
            .collect::<std::result::Result<Vec<_>, SqlxError>>()
            .map_err(|e| e.any())?;

        for playlist in playlists.iter_mut() {
            playlist.videos = self.playlist_video_ids(playlist.id).await?;
        }

        Ok(playlists)
    }

    async fn playlist_videos(&self, playlist_id: PrimaryKey) -> Result<Vec<VideoData>> {
        query_as(
            "SELECT videos.* FROM playlist_videos
                INNER JOIN videos ON videos.id = playlist_videos.video_id
            WHERE playlist_videos.playlist_id = $1
            ORDER BY playlist_videos.position",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn create_playlist(&self, new_playlist: NewPlaylist) -> Result<PlaylistData> {
        let row = query(
            "INSERT INTO playlists (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING *",
        )
        .bind(new_playlist.name)
        .bind(new_playlist.description)
        .bind(new_playlist.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        playlist_from_row(&row).map_err(|e| e.any())
    }

    async fn update_playlist(&self, updated_playlist: UpdatedPlaylist) -> Result<PlaylistData> {
        let playlist = self.playlist_by_id(updated_playlist.id).await?;

        query(
            "UPDATE playlists SET
                name = $1,
                description = $2,
                updated_at = timezone('UTC', now())
            WHERE id = $3",
        )
        .bind(updated_playlist.name.unwrap_or(playlist.name))
        .bind(updated_playlist.description.unwrap_or(playlist.description))
        .bind(updated_playlist.id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.playlist_by_id(updated_playlist.id).await
    }

    async fn delete_playlist(&self, playlist_id: PrimaryKey) -> Result<()> {
        // Ensure playlist exists
        let _ = self.playlist_by_id(playlist_id).await?;

        query("DELETE FROM playlists WHERE id = $1")
            .bind(playlist_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn add_playlist_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
    ) -> Result<()> {
        let result = query(
            "INSERT INTO playlist_videos (playlist_id, video_id, position)
            VALUES ($1, $2, (
                SELECT COALESCE(MAX(position) + 1, 0)
                FROM playlist_videos
                WHERE playlist_id = $1
            ))
            ON CONFLICT (playlist_id, video_id) DO NOTHING",
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict {
                resource: "playlist video",
                field: "playlist:video",
                value: format!("{playlist_id}:{video_id}"),
            });
        }

        Ok(())
    }

    async fn remove_playlist_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
    ) -> Result<()> {
        // Removing an id that isn't in the playlist is a no-op
        query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
            .bind(playlist_id)
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn toggle_like(&self, user_id: PrimaryKey, target: LikeTarget) -> Result<bool> {
        // The column name comes from the match below, never from input
        let (column, target_id) = match target {
            LikeTarget::Video(id) => ("video_id", id),
            LikeTarget::Comment(id) => ("comment_id", id),
        };

        let deleted = query(&format!(
            "DELETE FROM likes WHERE user_id = $1 AND {column} = $2 RETURNING id"
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if deleted.is_some() {
            return Ok(false);
        }

        query(&format!(
            "INSERT INTO likes (user_id, {column})
            VALUES ($1, $2)
            ON CONFLICT (user_id, {column}) WHERE {column} IS NOT NULL DO NOTHING"
        ))
        .bind(user_id)
        .bind(target_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(true)
    }

    async fn liked_videos(&self, user_id: PrimaryKey) -> Result<Vec<LikedVideoData>> {
        let rows = query(
            "SELECT likes.id AS like_id, videos.* FROM likes
                INNER JOIN videos ON videos.id = likes.video_id
            WHERE likes.user_id = $1
            ORDER BY likes.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        rows.iter()
            .map(|row| {
                Ok(LikedVideoData {
                    id: row.try_get("like_id")?,
                    video: VideoData::from_row(row)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, SqlxError>>()
            .map_err(|e| e.any())
    }

    async fn toggle_subscription(
        &self,
        subscriber_id: PrimaryKey,
        channel_id: PrimaryKey,
    ) -> Result<bool> {
        let deleted = query(
            "DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND channel_id = $2
            RETURNING id",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| e.any())?;

        if deleted.is_some() {
            return Ok(false);
        }

        query(
            "INSERT INTO subscriptions (subscriber_id, channel_id)
            VALUES ($1, $2)
            ON CONFLICT (subscriber_id, channel_id) DO NOTHING",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(true)
    }

    async fn subscribers_of(&self, channel_id: PrimaryKey) -> Result<Vec<ChannelSubscriberData>> {
        let rows = query(
            "SELECT
                subscriptions.id,
                users.id AS user_id,
                users.username,
                users.display_name,
                users.avatar_url
            FROM subscriptions
                INNER JOIN users ON users.id = subscriptions.subscriber_id
            WHERE subscriptions.channel_id = $1",
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        rows.iter()
            .map(|row| {
                Ok(ChannelSubscriberData {
                    id: row.try_get("id")?,
                    subscriber: joined_user(row)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, SqlxError>>()
            .map_err(|e| e.any())
    }

    async fn subscriptions_of(
        &self,
        subscriber_id: PrimaryKey,
    ) -> Result<Vec<SubscribedChannelData>> {
        let rows = query(
            "SELECT
                subscriptions.id,
                users.id AS user_id,
                users.username,
                users.display_name,
                users.avatar_url
            FROM subscriptions
                INNER JOIN users ON users.id = subscriptions.channel_id
            WHERE subscriptions.subscriber_id = $1",
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        rows.iter()
            .map(|row| {
                Ok(SubscribedChannelData {
                    id: row.try_get("id")?,
                    channel: joined_user(row)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, SqlxError>>()
            .map_err(|e| e.any())
    }

    async fn count_subscribers(&self, channel_id: PrimaryKey) -> Result<i64> {
        query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
            .bind(channel_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn channel_video_stats(&self, owner_id: PrimaryKey) -> Result<VideoStatsData> {
        let row = query(
            "SELECT
                COUNT(videos.id) AS total_videos,
                COALESCE(SUM(videos.views), 0)::BIGINT AS total_views,
                COALESCE(SUM(like_counts.count), 0)::BIGINT AS total_likes
            FROM videos
                LEFT JOIN LATERAL (
                    SELECT COUNT(*) AS count FROM likes WHERE likes.video_id = videos.id
                ) AS like_counts ON TRUE
            WHERE videos.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        let stats = VideoStatsData {
            total_videos: row.try_get("total_videos").map_err(|e| e.any())?,
            total_views: row.try_get("total_views").map_err(|e| e.any())?,
            total_likes: row.try_get("total_likes").map_err(|e| e.any())?,
        };

        Ok(stats)
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}
