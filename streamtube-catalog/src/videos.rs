use std::sync::Arc;

use thiserror::Error;

use crate::{
    ensure_owner, AccessError, Database, DatabaseError, MediaFile, MediaStorage, NewVideo, Owned,
    Page, Pagination, PrimaryKey, SortDirection, StorageError, UpdatedVideo, VideoData,
    VideoFilter, VideoSort, VideoSortField, VideoWithOwner,
};

/// Manages the lifecycle of videos and the public listing
pub struct VideoManager<Db, S> {
    database: Arc<Db>,
    storage: Arc<S>,
}

#[derive(Debug, Error)]
pub enum VideoError {
    /// Title or description is missing or blank
    #[error("Title and description are required")]
    MissingMetadata,

    #[error("At least one field to update is required")]
    NothingToUpdate,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// Parameters accepted by the public video listing
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    pub search: Option<String>,
    pub owner_id: Option<PrimaryKey>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A new video and its media, ready to be published
#[derive(Debug)]
pub struct NewVideoUpload {
    pub title: String,
    pub description: String,
    pub video_file: MediaFile,
    pub thumbnail: MediaFile,
    pub owner_id: PrimaryKey,
}

/// Fields that can be changed on an existing video
#[derive(Debug, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<MediaFile>,
}

impl VideoUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.thumbnail.is_none()
    }
}

impl Owned for VideoData {
    fn owner_id(&self) -> PrimaryKey {
        self.owner_id
    }
}

impl<Db, S> VideoManager<Db, S>
where
    Db: Database,
    S: MediaStorage,
{
    pub fn new(database: &Arc<Db>, storage: &Arc<S>) -> Self {
        Self {
            database: database.clone(),
            storage: storage.clone(),
        }
    }

    /// Lists published videos with search, owner filtering, sorting, and
    /// pagination applied by the database
    pub async fn list(&self, query: VideoQuery) -> Result<Page<VideoWithOwner>, VideoError> {
        let filter = VideoFilter {
            search: query.search,
            owner_id: query.owner_id,
        };

        let sort = resolve_sort(query.sort_by.as_deref(), query.sort_type.as_deref());
        let pagination = Pagination::new(query.page, query.limit);

        self.database
            .list_videos(filter, sort, pagination)
            .await
            .map_err(Into::into)
    }

    /// Uploads the media of a new video and persists it. The video file is
    /// uploaded before the thumbnail, either failure aborts the operation.
    pub async fn publish(&self, upload: NewVideoUpload) -> Result<VideoData, VideoError> {
        if upload.title.trim().is_empty() || upload.description.trim().is_empty() {
            return Err(VideoError::MissingMetadata);
        }

        let video_media = self.storage.upload(upload.video_file).await?;
        let thumbnail_media = self.storage.upload(upload.thumbnail).await?;

        self.database
            .create_video(NewVideo {
                title: upload.title,
                description: upload.description,
                video_url: video_media.url,
                thumbnail_url: thumbnail_media.url,
                duration: video_media.duration.unwrap_or_default(),
                owner_id: upload.owner_id,
            })
            .await
            .map_err(Into::into)
    }

    pub async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData, VideoError> {
        self.database.video_by_id(video_id).await.map_err(Into::into)
    }

    /// Updates a video's metadata. A replacement thumbnail is uploaded
    /// before anything is persisted.
    pub async fn update(
        &self,
        video_id: PrimaryKey,
        requester_id: PrimaryKey,
        update: VideoUpdate,
    ) -> Result<VideoData, VideoError> {
        if update.is_empty() {
            return Err(VideoError::NothingToUpdate);
        }

        let video = self.database.video_by_id(video_id).await?;
        ensure_owner(&video, requester_id)?;

        let thumbnail_url = match update.thumbnail {
            Some(file) => Some(self.storage.upload(file).await?.url),
            None => None,
        };

        self.database
            .update_video(UpdatedVideo {
                id: video_id,
                title: update.title,
                description: update.description,
                thumbnail_url,
            })
            .await
            .map_err(Into::into)
    }

    pub async fn delete(
        &self,
        video_id: PrimaryKey,
        requester_id: PrimaryKey,
    ) -> Result<(), VideoError> {
        let video = self.database.video_by_id(video_id).await?;
        ensure_owner(&video, requester_id)?;

        self.database.delete_video(video_id).await.map_err(Into::into)
    }

    /// Flips the publish flag, returning the updated video
    pub async fn toggle_publish(
        &self,
        video_id: PrimaryKey,
        requester_id: PrimaryKey,
    ) -> Result<VideoData, VideoError> {
        let video = self.database.video_by_id(video_id).await?;
        ensure_owner(&video, requester_id)?;

        self.database
            .set_video_published(video_id, !video.is_published)
            .await
            .map_err(Into::into)
    }
}

/// Resolves client-supplied sort parameters. Sorting is only applied when
/// both parameters are present, and unknown sort keys fall back to recency
/// instead of reaching the query layer.
fn resolve_sort(sort_by: Option<&str>, sort_type: Option<&str>) -> VideoSort {
    match (sort_by, sort_type) {
        (Some(field), Some(direction)) => VideoSort {
            field: VideoSortField::parse(field).unwrap_or_default(),
            direction: if direction.eq_ignore_ascii_case("asc") {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        },
        _ => VideoSort::default(),
    }
}
