//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from catalog data

use chrono::{DateTime, Utc};
use serde::Serialize;
use streamtube_catalog::{
    ChannelStatsData, ChannelSubscriberData, LikedVideoData, Page, PlaylistContents, PlaylistData,
    SubscribedChannelData, UserData, VideoData, VideoWithOwner,
};
use utoipa::ToSchema;

/// The public profile fields of a user
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    id: i32,
    username: String,
    avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    id: i32,
    title: String,
    description: String,
    video_file: String,
    thumbnail: String,
    duration: f64,
    views: i64,
    is_published: bool,
    owner: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A listed video along with its owner's profile
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListedVideo {
    #[serde(flatten)]
    video: Video,
    owner_details: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    videos: Vec<ListedVideo>,
    page: u32,
    limit: u32,
    total_videos: i64,
    total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    id: i32,
    name: String,
    description: String,
    owner: i32,
    videos: Vec<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A playlist with its videos resolved to full records
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithVideos {
    id: i32,
    name: String,
    description: String,
    owner: i32,
    videos: Vec<Video>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub is_liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    id: i32,
    video: Video,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggle {
    pub subscribed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    id: i32,
    subscriber: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    id: i32,
    channel: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    total_subscribers: i64,
    total_videos: i64,
    total_views: i64,
    total_likes: i64,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Profile> for UserData {
    fn to_serialized(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar_url.clone(),
        }
    }
}

impl ToSerialized<Video> for VideoData {
    fn to_serialized(&self) -> Video {
        Video {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            video_file: self.video_url.clone(),
            thumbnail: self.thumbnail_url.clone(),
            duration: self.duration,
            views: self.views,
            is_published: self.is_published,
            owner: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<ListedVideo> for VideoWithOwner {
    fn to_serialized(&self) -> ListedVideo {
        ListedVideo {
            video: self.video.to_serialized(),
            owner_details: self.owner.to_serialized(),
        }
    }
}

impl ToSerialized<VideoPage> for Page<VideoWithOwner> {
    fn to_serialized(&self) -> VideoPage {
        VideoPage {
            videos: self.items.to_serialized(),
            page: self.page,
            limit: self.limit,
            total_videos: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

impl ToSerialized<Playlist> for PlaylistData {
    fn to_serialized(&self) -> Playlist {
        Playlist {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            owner: self.owner_id,
            videos: self.videos.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<PlaylistWithVideos> for PlaylistContents {
    fn to_serialized(&self) -> PlaylistWithVideos {
        PlaylistWithVideos {
            id: self.playlist.id,
            name: self.playlist.name.clone(),
            description: self.playlist.description.clone(),
            owner: self.playlist.owner_id,
            videos: self.videos.to_serialized(),
            created_at: self.playlist.created_at,
            updated_at: self.playlist.updated_at,
        }
    }
}

impl ToSerialized<LikedVideo> for LikedVideoData {
    fn to_serialized(&self) -> LikedVideo {
        LikedVideo {
            id: self.id,
            video: self.video.to_serialized(),
        }
    }
}

impl ToSerialized<Subscriber> for ChannelSubscriberData {
    fn to_serialized(&self) -> Subscriber {
        Subscriber {
            id: self.id,
            subscriber: self.subscriber.to_serialized(),
        }
    }
}

impl ToSerialized<SubscribedChannel> for SubscribedChannelData {
    fn to_serialized(&self) -> SubscribedChannel {
        SubscribedChannel {
            id: self.id,
            channel: self.channel.to_serialized(),
        }
    }
}

impl ToSerialized<ChannelStats> for ChannelStatsData {
    fn to_serialized(&self) -> ChannelStats {
        ChannelStats {
            total_subscribers: self.total_subscribers,
            total_videos: self.total_videos,
            total_views: self.total_views,
            total_likes: self.total_likes,
        }
    }
}
