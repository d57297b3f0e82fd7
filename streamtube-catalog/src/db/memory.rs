//! An in-memory [Database] used to exercise manager behavior in tests
//! without a running postgres instance. Semantics mirror [super::PgDatabase],
//! including uniqueness guarantees, cascades, and aggregation defaults.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use crate::{
    ChannelSubscriberData, Database, DatabaseError, LikeTarget, LikedVideoData, NewPlaylist,
    NewVideo, Page, Pagination, PlaylistData, PrimaryKey, Result, SessionData, SortDirection,
    SubscribedChannelData, UpdatedPlaylist, UpdatedVideo, UserData, VideoData, VideoFilter,
    VideoSort, VideoSortField, VideoStatsData, VideoWithOwner,
};

#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: PrimaryKey,
    users: Vec<UserData>,
    sessions: Vec<SessionRow>,
    videos: Vec<VideoData>,
    playlists: Vec<PlaylistRow>,
    memberships: Vec<MembershipRow>,
    likes: Vec<LikeRow>,
    subscriptions: Vec<SubscriptionRow>,
}

struct SessionRow {
    id: PrimaryKey,
    token: String,
    user_id: PrimaryKey,
}

#[derive(Clone)]
struct PlaylistRow {
    id: PrimaryKey,
    name: String,
    description: String,
    owner_id: PrimaryKey,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

struct MembershipRow {
    playlist_id: PrimaryKey,
    video_id: PrimaryKey,
    position: i32,
}

struct LikeRow {
    id: PrimaryKey,
    user_id: PrimaryKey,
    target: LikeTarget,
}

struct SubscriptionRow {
    id: PrimaryKey,
    subscriber_id: PrimaryKey,
    channel_id: PrimaryKey,
}

impl State {
    fn next_id(&mut self) -> PrimaryKey {
        self.last_id += 1;
        self.last_id
    }

    fn video_index(&self, video_id: PrimaryKey) -> Result<usize> {
        self.videos
            .iter()
            .position(|v| v.id == video_id)
            .ok_or(DatabaseError::NotFound {
                resource: "video",
                identifier: "id",
            })
    }

    fn playlist_index(&self, playlist_id: PrimaryKey) -> Result<usize> {
        self.playlists
            .iter()
            .position(|p| p.id == playlist_id)
            .ok_or(DatabaseError::NotFound {
                resource: "playlist",
                identifier: "id",
            })
    }

    fn playlist_data(&self, row: &PlaylistRow) -> PlaylistData {
        let mut memberships: Vec<_> = self
            .memberships
            .iter()
            .filter(|m| m.playlist_id == row.id)
            .collect();

        memberships.sort_by_key(|m| m.position);

        PlaylistData {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            owner_id: row.owner_id,
            videos: memberships.into_iter().map(|m| m.video_id).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn user(&self, user_id: PrimaryKey) -> Result<UserData> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "id",
            })
    }
}

/// Deterministic creation times so recency ordering is stable in tests
fn timestamp(id: PrimaryKey) -> DateTime<Utc> {
    Utc.timestamp_opt(1_600_000_000 + id as i64, 0).unwrap()
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> UserData {
        let mut state = self.state.lock();
        let id = state.next_id();

        let user = UserData {
            id,
            username: username.to_string(),
            display_name: username.to_string(),
            avatar_url: Some(format!("https://media.test/avatars/{username}.png")),
        };

        state.users.push(user.clone());
        user
    }

    pub fn add_session(&self, user_id: PrimaryKey, token: &str) {
        let mut state = self.state.lock();
        let id = state.next_id();

        state.sessions.push(SessionRow {
            id,
            token: token.to_string(),
            user_id,
        });
    }

    pub fn add_video(&self, owner_id: PrimaryKey, title: &str) -> VideoData {
        let mut state = self.state.lock();
        let id = state.next_id();

        let video = VideoData {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            video_url: format!("https://media.test/videos/{id}.mp4"),
            thumbnail_url: format!("https://media.test/thumbnails/{id}.png"),
            duration: 120.0,
            views: 0,
            is_published: true,
            owner_id,
            created_at: timestamp(id),
            updated_at: timestamp(id),
        };

        state.videos.push(video.clone());
        video
    }

    pub fn set_video_views(&self, video_id: PrimaryKey, views: i64) {
        let mut state = self.state.lock();
        let index = state.video_index(video_id).expect("video exists");
        state.videos[index].views = views;
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        self.state.lock().user(user_id)
    }

    async fn session_by_token(&self, token: &str) -> Result<SessionData> {
        let state = self.state.lock();

        let session = state
            .sessions
            .iter()
            .find(|s| s.token == token)
            .ok_or(DatabaseError::NotFound {
                resource: "session",
                identifier: "token",
            })?;

        Ok(SessionData {
            id: session.id,
            token: session.token.clone(),
            user: state.user(session.user_id)?,
        })
    }

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData> {
        let state = self.state.lock();
        let index = state.video_index(video_id)?;

        Ok(state.videos[index].clone())
    }

    async fn videos_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<VideoData>> {
        let mut videos: Vec<_> = self
            .state
            .lock()
            .videos
            .iter()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();

        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(videos)
    }

    async fn list_videos(
        &self,
        filter: VideoFilter,
        sort: VideoSort,
        pagination: Pagination,
    ) -> Result<Page<VideoWithOwner>> {
        let state = self.state.lock();

        let search = filter.search.map(|s| s.to_lowercase());

        let mut matches: Vec<_> = state
            .videos
            .iter()
            .filter(|v| v.is_published)
            .filter(|v| filter.owner_id.map(|owner| v.owner_id == owner).unwrap_or(true))
            .filter(|v| {
                search
                    .as_ref()
                    .map(|s| {
                        v.title.to_lowercase().contains(s)
                            || v.description.to_lowercase().contains(s)
                    })
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match sort.field {
                VideoSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                VideoSortField::Views => a.views.cmp(&b.views),
                VideoSortField::Duration => a
                    .duration
                    .partial_cmp(&b.duration)
                    .unwrap_or(std::cmp::Ordering::Equal),
                VideoSortField::Title => a.title.cmp(&b.title),
            };

            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let total_items = matches.len() as i64;

        let items = matches
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .map(|video| {
                Ok(VideoWithOwner {
                    owner: state.user(video.owner_id)?,
                    video,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, pagination, total_items))
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData> {
        let mut state = self.state.lock();
        let id = state.next_id();

        let video = VideoData {
            id,
            title: new_video.title,
            description: new_video.description,
            video_url: new_video.video_url,
            thumbnail_url: new_video.thumbnail_url,
            duration: new_video.duration,
            views: 0,
            is_published: true,
            owner_id: new_video.owner_id,
            created_at: timestamp(id),
            updated_at: timestamp(id),
        };

        state.videos.push(video.clone());
        Ok(video)
    }

    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData> {
        let mut state = self.state.lock();
        let index = state.video_index(updated_video.id)?;

        let video = &mut state.videos[index];

        if let Some(title) = updated_video.title {
            video.title = title;
        }
        if let Some(description) = updated_video.description {
            video.description = description;
        }
        if let Some(thumbnail_url) = updated_video.thumbnail_url {
            video.thumbnail_url = thumbnail_url;
        }

        Ok(video.clone())
    }

    async fn set_video_published(
        &self,
        video_id: PrimaryKey,
        published: bool,
    ) -> Result<VideoData> {
        let mut state = self.state.lock();
        let index = state.video_index(video_id)?;

        state.videos[index].is_published = published;
        Ok(state.videos[index].clone())
    }

    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.lock();
        let index = state.video_index(video_id)?;

        state.videos.remove(index);
        state.memberships.retain(|m| m.video_id != video_id);
        state
            .likes
            .retain(|l| l.target != LikeTarget::Video(video_id));

        Ok(())
    }

    async fn playlist_by_id(&self, playlist_id: PrimaryKey) -> Result<PlaylistData> {
        let state = self.state.lock();
        let index = state.playlist_index(playlist_id)?;

        Ok(state.playlist_data(&state.playlists[index]))
    }

    async fn playlists_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PlaylistData>> {
        let state = self.state.lock();

        Ok(state
            .playlists
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| state.playlist_data(p))
            .collect())
    }

    async fn playlist_videos(&self, playlist_id: PrimaryKey) -> Result<Vec<VideoData>> {
        let state = self.state.lock();
        let index = state.playlist_index(playlist_id)?;

        let playlist = state.playlist_data(&state.playlists[index]);

        Ok(playlist
            .videos
            .iter()
            .filter_map(|id| state.videos.iter().find(|v| v.id == *id))
            .cloned()
            .collect())
    }

    async fn create_playlist(&self, new_playlist: NewPlaylist) -> Result<PlaylistData> {
        let mut state = self.state.lock();
        let id = state.next_id();

        let row = PlaylistRow {
            id,
            name: new_playlist.name,
            description: new_playlist.description,
            owner_id: new_playlist.owner_id,
            created_at: timestamp(id),
            updated_at: timestamp(id),
        };

        state.playlists.push(row.clone());
        Ok(state.playlist_data(&row))
    }

    async fn update_playlist(&self, updated_playlist: UpdatedPlaylist) -> Result<PlaylistData> {
        let mut state = self.state.lock();
        let index = state.playlist_index(updated_playlist.id)?;

        {
            let playlist = &mut state.playlists[index];

            if let Some(name) = updated_playlist.name {
                playlist.name = name;
            }
            if let Some(description) = updated_playlist.description {
                playlist.description = description;
            }
        }

        let row = state.playlists[index].clone();
        Ok(state.playlist_data(&row))
    }

    async fn delete_playlist(&self, playlist_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.lock();
        let index = state.playlist_index(playlist_id)?;

        state.playlists.remove(index);
        state.memberships.retain(|m| m.playlist_id != playlist_id);

        Ok(())
    }

    async fn add_playlist_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
    ) -> Result<()> {
        let mut state = self.state.lock();

        let exists = state
            .memberships
            .iter()
            .any(|m| m.playlist_id == playlist_id && m.video_id == video_id);

        if exists {
            return Err(DatabaseError::Conflict {
                resource: "playlist video",
                field: "playlist:video",
                value: format!("{playlist_id}:{video_id}"),
            });
        }

        let position = state
            .memberships
            .iter()
            .filter(|m| m.playlist_id == playlist_id)
            .map(|m| m.position + 1)
            .max()
            .unwrap_or(0);

        state.memberships.push(MembershipRow {
            playlist_id,
            video_id,
            position,
        });

        Ok(())
    }

    async fn remove_playlist_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
    ) -> Result<()> {
        self.state
            .lock()
            .memberships
            .retain(|m| !(m.playlist_id == playlist_id && m.video_id == video_id));

        Ok(())
    }

    async fn toggle_like(&self, user_id: PrimaryKey, target: LikeTarget) -> Result<bool> {
        let mut state = self.state.lock();

        let existing = state
            .likes
            .iter()
            .position(|l| l.user_id == user_id && l.target == target);

        match existing {
            Some(index) => {
                state.likes.remove(index);
                Ok(false)
            }
            None => {
                let id = state.next_id();
                state.likes.push(LikeRow {
                    id,
                    user_id,
                    target,
                });
                Ok(true)
            }
        }
    }

    async fn liked_videos(&self, user_id: PrimaryKey) -> Result<Vec<LikedVideoData>> {
        let state = self.state.lock();

        let mut likes: Vec<_> = state
            .likes
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| match l.target {
                LikeTarget::Video(video_id) => Some((l.id, video_id)),
                LikeTarget::Comment(_) => None,
            })
            .collect();

        likes.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(likes
            .into_iter()
            .filter_map(|(like_id, video_id)| {
                state
                    .videos
                    .iter()
                    .find(|v| v.id == video_id)
                    .map(|video| LikedVideoData {
                        id: like_id,
                        video: video.clone(),
                    })
            })
            .collect())
    }

    async fn toggle_subscription(
        &self,
        subscriber_id: PrimaryKey,
        channel_id: PrimaryKey,
    ) -> Result<bool> {
        let mut state = self.state.lock();

        let existing = state
            .subscriptions
            .iter()
            .position(|s| s.subscriber_id == subscriber_id && s.channel_id == channel_id);

        match existing {
            Some(index) => {
                state.subscriptions.remove(index);
                Ok(false)
            }
            None => {
                let id = state.next_id();
                state.subscriptions.push(SubscriptionRow {
                    id,
                    subscriber_id,
                    channel_id,
                });
                Ok(true)
            }
        }
    }

    async fn subscribers_of(&self, channel_id: PrimaryKey) -> Result<Vec<ChannelSubscriberData>> {
        let state = self.state.lock();

        state
            .subscriptions
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .map(|s| {
                Ok(ChannelSubscriberData {
                    id: s.id,
                    subscriber: state.user(s.subscriber_id)?,
                })
            })
            .collect()
    }

    async fn subscriptions_of(
        &self,
        subscriber_id: PrimaryKey,
    ) -> Result<Vec<SubscribedChannelData>> {
        let state = self.state.lock();

        state
            .subscriptions
            .iter()
            .filter(|s| s.subscriber_id == subscriber_id)
            .map(|s| {
                Ok(SubscribedChannelData {
                    id: s.id,
                    channel: state.user(s.channel_id)?,
                })
            })
            .collect()
    }

    async fn count_subscribers(&self, channel_id: PrimaryKey) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .subscriptions
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .count() as i64)
    }

    async fn channel_video_stats(&self, owner_id: PrimaryKey) -> Result<VideoStatsData> {
        let state = self.state.lock();

        let videos: Vec<_> = state
            .videos
            .iter()
            .filter(|v| v.owner_id == owner_id)
            .collect();

        let total_likes = videos
            .iter()
            .map(|video| {
                state
                    .likes
                    .iter()
                    .filter(|l| l.target == LikeTarget::Video(video.id))
                    .count() as i64
            })
            .sum();

        Ok(VideoStatsData {
            total_videos: videos.len() as i64,
            total_views: videos.iter().map(|v| v.views).sum(),
            total_likes,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_session_resolution() {
        let database = MemoryDatabase::new();
        let user = database.add_user("viewer");

        database.add_session(user.id, "token-one");

        let session = database.session_by_token("token-one").await.unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(session.user.username, "viewer");

        let missing = database.session_by_token("unknown").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }
}
