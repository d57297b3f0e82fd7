use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A streamtube account. Accounts are managed elsewhere, this crate only
/// reads their public profile fields.
#[derive(Debug, Clone, FromRow)]
pub struct UserData {
    pub id: PrimaryKey,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Login session data for authentication
#[derive(Debug, Clone)]
pub struct SessionData {
    pub id: PrimaryKey,
    /// The session token, or key if you will
    pub token: String,
    /// The user that is logged in
    pub user: UserData,
}

/// An uploaded video and its hosted media
#[derive(Debug, Clone, FromRow)]
pub struct VideoData {
    pub id: PrimaryKey,
    pub title: String,
    pub description: String,
    /// Hosted URL of the video file
    pub video_url: String,
    /// Hosted URL of the thumbnail image
    pub thumbnail_url: String,
    /// Duration in seconds, derived by the media service on upload
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner_id: PrimaryKey,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A video enriched with its owner's public profile
#[derive(Debug, Clone)]
pub struct VideoWithOwner {
    pub video: VideoData,
    pub owner: UserData,
}

/// A named, ordered collection of videos
#[derive(Debug, Clone)]
pub struct PlaylistData {
    pub id: PrimaryKey,
    pub name: String,
    pub description: String,
    pub owner_id: PrimaryKey,
    /// Ids of the videos in the playlist, in insertion order.
    /// A video can appear at most once.
    pub videos: Vec<PrimaryKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The target of a like. A like points at exactly one of these, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(PrimaryKey),
    Comment(PrimaryKey),
}

/// A like on a video, resolved to the full video record
#[derive(Debug, Clone)]
pub struct LikedVideoData {
    pub id: PrimaryKey,
    pub video: VideoData,
}

/// A subscription to a channel, resolved to the subscriber's profile
#[derive(Debug, Clone)]
pub struct ChannelSubscriberData {
    pub id: PrimaryKey,
    pub subscriber: UserData,
}

/// A subscription made by a user, resolved to the channel's profile
#[derive(Debug, Clone)]
pub struct SubscribedChannelData {
    pub id: PrimaryKey,
    pub channel: UserData,
}

/// Aggregated totals over a channel's videos. All fields are zero when the
/// channel has no videos.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoStatsData {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

/// Everything shown on a channel's dashboard
#[derive(Debug, Clone, Copy)]
pub struct ChannelStatsData {
    pub total_subscribers: i64,
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
}
