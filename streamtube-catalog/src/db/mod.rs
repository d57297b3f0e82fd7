use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod pg;
pub use pg::*;

#[cfg(test)]
pub mod memory;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Filters applied to the public video listing
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    /// Case-insensitive text search over title and description
    pub search: Option<String>,
    pub owner_id: Option<PrimaryKey>,
}

/// A field videos can be ordered by. Client-supplied sort keys map through
/// [VideoSortField::parse], so arbitrary keys never reach the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortField {
    #[default]
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "views" => Some(Self::Views),
            "duration" => Some(Self::Duration),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "videos.created_at",
            Self::Views => "videos.views",
            Self::Duration => "videos.duration",
            Self::Title => "videos.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSort {
    pub field: VideoSortField,
    pub direction: SortDirection,
}

/// A page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results, along with totals computed by the database
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_items: i64) -> Self {
        let limit = pagination.limit as i64;

        Self {
            items,
            page: pagination.page,
            limit: pagination.limit,
            total_items,
            total_pages: (total_items + limit - 1) / limit,
        }
    }
}

/// Represents a type that can fetch and store streamtube data in a database
#[async_trait]
pub trait Database: Send + Sync + 'static {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData>;
    async fn session_by_token(&self, token: &str) -> Result<SessionData>;

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData>;
    async fn videos_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<VideoData>>;
    async fn list_videos(
        &self,
        filter: VideoFilter,
        sort: VideoSort,
        pagination: Pagination,
    ) -> Result<Page<VideoWithOwner>>;
    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData>;
    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData>;
    async fn set_video_published(&self, video_id: PrimaryKey, published: bool)
        -> Result<VideoData>;
    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()>;

    async fn playlist_by_id(&self, playlist_id: PrimaryKey) -> Result<PlaylistData>;
    async fn playlists_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PlaylistData>>;
    async fn playlist_videos(&self, playlist_id: PrimaryKey) -> Result<Vec<VideoData>>;
    async fn create_playlist(&self, new_playlist: NewPlaylist) -> Result<PlaylistData>;
    async fn update_playlist(&self, updated_playlist: UpdatedPlaylist) -> Result<PlaylistData>;
    async fn delete_playlist(&self, playlist_id: PrimaryKey) -> Result<()>;
    async fn add_playlist_video(&self, playlist_id: PrimaryKey, video_id: PrimaryKey)
        -> Result<()>;
    async fn remove_playlist_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
    ) -> Result<()>;

    /// Removes the like if it exists, otherwise creates it. Returns whether
    /// the like exists afterwards. Implementations must back this with a
    /// uniqueness constraint rather than a find-then-branch.
    async fn toggle_like(&self, user_id: PrimaryKey, target: LikeTarget) -> Result<bool>;
    async fn liked_videos(&self, user_id: PrimaryKey) -> Result<Vec<LikedVideoData>>;

    /// Same contract as [Database::toggle_like], for subscriber → channel edges
    async fn toggle_subscription(
        &self,
        subscriber_id: PrimaryKey,
        channel_id: PrimaryKey,
    ) -> Result<bool>;
    async fn subscribers_of(&self, channel_id: PrimaryKey) -> Result<Vec<ChannelSubscriberData>>;
    async fn subscriptions_of(
        &self,
        subscriber_id: PrimaryKey,
    ) -> Result<Vec<SubscribedChannelData>>;

    async fn count_subscribers(&self, channel_id: PrimaryKey) -> Result<i64>;
    async fn channel_video_stats(&self, owner_id: PrimaryKey) -> Result<VideoStatsData>;
}

#[derive(Debug)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    /// The owner of the new video
    pub owner_id: PrimaryKey,
}

#[derive(Debug)]
pub struct UpdatedVideo {
    pub id: PrimaryKey,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    /// The owner of the new playlist
    pub owner_id: PrimaryKey,
}

#[derive(Debug)]
pub struct UpdatedPlaylist {
    pub id: PrimaryKey,
    pub name: Option<String>,
    pub description: Option<String>,
}
