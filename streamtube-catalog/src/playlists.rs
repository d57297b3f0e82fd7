use std::sync::Arc;

use thiserror::Error;

use crate::{
    ensure_owner, AccessError, Database, DatabaseError, NewPlaylist, Owned, PlaylistData,
    PrimaryKey, UpdatedPlaylist, VideoData,
};

/// Manages playlists and their memberships
pub struct PlaylistManager<Db> {
    database: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("A name is required for the playlist")]
    NameRequired,

    #[error("A name or description is required to update")]
    NothingToUpdate,

    #[error("Video already exists in the playlist")]
    DuplicateVideo,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// A playlist with its videos resolved to full records
#[derive(Debug, Clone)]
pub struct PlaylistContents {
    pub playlist: PlaylistData,
    pub videos: Vec<VideoData>,
}

impl Owned for PlaylistData {
    fn owner_id(&self) -> PrimaryKey {
        self.owner_id
    }
}

impl<Db> PlaylistManager<Db>
where
    Db: Database,
{
    pub fn new(database: &Arc<Db>) -> Self {
        Self {
            database: database.clone(),
        }
    }

    /// Creates a new, empty playlist
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        owner_id: PrimaryKey,
    ) -> Result<PlaylistData, PlaylistError> {
        if name.trim().is_empty() {
            return Err(PlaylistError::NameRequired);
        }

        self.database
            .create_playlist(NewPlaylist {
                name,
                description: description.unwrap_or_default(),
                owner_id,
            })
            .await
            .map_err(Into::into)
    }

    pub async fn playlists_by_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<PlaylistData>, PlaylistError> {
        self.database
            .playlists_by_owner(user_id)
            .await
            .map_err(Into::into)
    }

    /// Returns a playlist with its videos resolved
    pub async fn contents(&self, playlist_id: PrimaryKey) -> Result<PlaylistContents, PlaylistError> {
        let playlist = self.database.playlist_by_id(playlist_id).await?;
        let videos = self.database.playlist_videos(playlist_id).await?;

        Ok(PlaylistContents { playlist, videos })
    }

    /// Adds a video to the playlist. A video can only appear once.
    pub async fn add_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
        requester_id: PrimaryKey,
    ) -> Result<PlaylistData, PlaylistError> {
        let playlist = self.database.playlist_by_id(playlist_id).await?;
        ensure_owner(&playlist, requester_id)?;

        self.database
            .add_playlist_video(playlist_id, video_id)
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict { .. } => PlaylistError::DuplicateVideo,
                e => e.into(),
            })?;

        self.database
            .playlist_by_id(playlist_id)
            .await
            .map_err(Into::into)
    }

    /// Removes a video from the playlist. Removing an absent video is a
    /// no-op.
    pub async fn remove_video(
        &self,
        playlist_id: PrimaryKey,
        video_id: PrimaryKey,
        requester_id: PrimaryKey,
    ) -> Result<PlaylistData, PlaylistError> {
        let playlist = self.database.playlist_by_id(playlist_id).await?;
        ensure_owner(&playlist, requester_id)?;

        self.database
            .remove_playlist_video(playlist_id, video_id)
            .await?;

        self.database
            .playlist_by_id(playlist_id)
            .await
            .map_err(Into::into)
    }

    pub async fn update(
        &self,
        playlist_id: PrimaryKey,
        requester_id: PrimaryKey,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PlaylistData, PlaylistError> {
        if name.is_none() && description.is_none() {
            return Err(PlaylistError::NothingToUpdate);
        }

        let playlist = self.database.playlist_by_id(playlist_id).await?;
        ensure_owner(&playlist, requester_id)?;

        self.database
            .update_playlist(UpdatedPlaylist {
                id: playlist_id,
                name,
                description,
            })
            .await
            .map_err(Into::into)
    }

    pub async fn delete(
        &self,
        playlist_id: PrimaryKey,
        requester_id: PrimaryKey,
    ) -> Result<(), PlaylistError> {
        let playlist = self.database.playlist_by_id(playlist_id).await?;
        ensure_owner(&playlist, requester_id)?;

        self.database
            .delete_playlist(playlist_id)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryDatabase;

    fn manager() -> (Arc<MemoryDatabase>, PlaylistManager<MemoryDatabase>) {
        let database = Arc::new(MemoryDatabase::new());

        (database.clone(), PlaylistManager::new(&database))
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");

        let result = manager.create("  ".to_string(), None, owner.id).await;
        assert!(matches!(result, Err(PlaylistError::NameRequired)));

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        assert_eq!(playlist.name, "Favorites");
        assert!(playlist.videos.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");
        let video = database.add_video(owner.id, "Clip");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        let updated = manager
            .add_video(playlist.id, video.id, owner.id)
            .await
            .unwrap();
        assert_eq!(updated.videos, vec![video.id]);

        let result = manager.add_video(playlist.id, video.id, owner.id).await;
        assert!(matches!(result, Err(PlaylistError::DuplicateVideo)));

        let unchanged = database.playlist_by_id(playlist.id).await.unwrap();
        assert_eq!(unchanged.videos, vec![video.id]);
    }

    #[tokio::test]
    async fn test_remove_absent_video_is_a_noop() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");
        let video = database.add_video(owner.id, "Clip");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        let unchanged = manager
            .remove_video(playlist.id, video.id, owner.id)
            .await
            .unwrap();

        assert!(unchanged.videos.is_empty());
    }

    #[tokio::test]
    async fn test_membership_keeps_insertion_order() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");
        let first = database.add_video(owner.id, "First");
        let second = database.add_video(owner.id, "Second");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        manager
            .add_video(playlist.id, first.id, owner.id)
            .await
            .unwrap();
        manager
            .add_video(playlist.id, second.id, owner.id)
            .await
            .unwrap();

        let contents = manager.contents(playlist.id).await.unwrap();

        let ids: Vec<_> = contents.videos.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(contents.videos[0].title, "First");
    }

    #[tokio::test]
    async fn test_mutations_require_ownership() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");
        let intruder = database.add_user("intruder");
        let video = database.add_video(owner.id, "Clip");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        let add = manager.add_video(playlist.id, video.id, intruder.id).await;
        assert!(matches!(
            add,
            Err(PlaylistError::Access(AccessError::NotOwner))
        ));

        let update = manager
            .update(
                playlist.id,
                intruder.id,
                Some("Stolen".to_string()),
                None,
            )
            .await;
        assert!(matches!(
            update,
            Err(PlaylistError::Access(AccessError::NotOwner))
        ));

        let delete = manager.delete(playlist.id, intruder.id).await;
        assert!(matches!(
            delete,
            Err(PlaylistError::Access(AccessError::NotOwner))
        ));

        let unchanged = database.playlist_by_id(playlist.id).await.unwrap();
        assert_eq!(unchanged.name, "Favorites");
        assert!(unchanged.videos.is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_changes() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        let result = manager.update(playlist.id, owner.id, None, None).await;
        assert!(matches!(result, Err(PlaylistError::NothingToUpdate)));

        let updated = manager
            .update(
                playlist.id,
                owner.id,
                Some("Renamed".to_string()),
                Some("With a description".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, "With a description");
    }

    #[tokio::test]
    async fn test_delete_removes_playlist() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");

        let playlist = manager
            .create("Favorites".to_string(), None, owner.id)
            .await
            .unwrap();

        manager.delete(playlist.id, owner.id).await.unwrap();

        let result = database.playlist_by_id(playlist.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_playlists_by_user_only_lists_owned() {
        let (database, manager) = manager();
        let owner = database.add_user("owner");
        let other = database.add_user("other");

        manager
            .create("Mine".to_string(), None, owner.id)
            .await
            .unwrap();
        manager
            .create("Theirs".to_string(), None, other.id)
            .await
            .unwrap();

        let playlists = manager.playlists_by_user(owner.id).await.unwrap();

        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name, "Mine");
    }
}
