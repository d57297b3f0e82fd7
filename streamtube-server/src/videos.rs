use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use streamtube_catalog::{MediaFile, NewVideoUpload, PrimaryKey, VideoQuery, VideoUpdate};
use utoipa::IntoParams;

use crate::{
    auth::Session,
    context::ServerContext,
    envelope::Envelope,
    errors::{ServerError, ServerResult},
    serialized::{ToSerialized, Video, VideoPage},
    Router,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Text search over title and description
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    /// Restricts the listing to a single owner
    pub user_id: Option<PrimaryKey>,
}

/// Form fields accepted by the video upload and update endpoints
#[derive(Default)]
struct UploadParts {
    title: Option<String>,
    description: Option<String>,
    video_file: Option<MediaFile>,
    thumbnail: Option<MediaFile>,
}

impl UploadParts {
    async fn collect(mut multipart: Multipart) -> ServerResult<Self> {
        let mut parts = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed_body)? {
            match field.name().unwrap_or_default() {
                "title" => parts.title = Some(read_text(field).await?),
                "description" => parts.description = Some(read_text(field).await?),
                "videoFile" => parts.video_file = Some(read_file(field).await?),
                "thumbnail" => parts.thumbnail = Some(read_file(field).await?),
                _ => {}
            }
        }

        Ok(parts)
    }
}

fn malformed_body<E>(_: E) -> ServerError {
    ServerError::BadRequest("Malformed multipart body".to_string())
}

async fn read_text(field: Field<'_>) -> ServerResult<String> {
    field.text().await.map_err(malformed_body)
}

async fn read_file(field: Field<'_>) -> ServerResult<MediaFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field.bytes().await.map_err(malformed_body)?.to_vec();

    Ok(MediaFile {
        file_name,
        content_type,
        data,
    })
}

#[utoipa::path(
    get,
    path = "/v1/videos",
    tag = "videos",
    params(ListVideosParams),
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = VideoPage)
    )
)]
async fn list_videos(
    _session: Session,
    State(context): State<ServerContext>,
    Query(params): Query<ListVideosParams>,
) -> ServerResult<Envelope<VideoPage>> {
    let page = context
        .catalog
        .videos
        .list(VideoQuery {
            search: params.query,
            owner_id: params.user_id,
            sort_by: params.sort_by,
            sort_type: params.sort_type,
            page: params.page,
            limit: params.limit,
        })
        .await?;

    Ok(Envelope::ok(
        page.to_serialized(),
        "Videos fetched successfully",
    ))
}

#[utoipa::path(
    post,
    path = "/v1/videos",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Video)
    )
)]
async fn publish_video(
    session: Session,
    State(context): State<ServerContext>,
    multipart: Multipart,
) -> ServerResult<Envelope<Video>> {
    let parts = UploadParts::collect(multipart).await?;

    let video_file = parts
        .video_file
        .ok_or_else(|| ServerError::BadRequest("Video file is required".to_string()))?;

    let thumbnail = parts
        .thumbnail
        .ok_or_else(|| ServerError::BadRequest("Thumbnail file is required".to_string()))?;

    let video = context
        .catalog
        .videos
        .publish(NewVideoUpload {
            title: parts.title.unwrap_or_default(),
            description: parts.description.unwrap_or_default(),
            video_file,
            thumbnail,
            owner_id: session.user().id,
        })
        .await?;

    Ok(Envelope::created(
        video.to_serialized(),
        "Video uploaded successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/v1/videos/{videoId}",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Video)
    )
)]
async fn video(
    _session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<Video>> {
    let video = context.catalog.videos.video_by_id(video_id).await?;

    Ok(Envelope::ok(
        video.to_serialized(),
        "Video fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/videos/{videoId}",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Video)
    )
)]
async fn update_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<PrimaryKey>,
    multipart: Multipart,
) -> ServerResult<Envelope<Video>> {
    let parts = UploadParts::collect(multipart).await?;

    let video = context
        .catalog
        .videos
        .update(
            video_id,
            session.user().id,
            VideoUpdate {
                title: parts.title,
                description: parts.description,
                thumbnail: parts.thumbnail,
            },
        )
        .await?;

    Ok(Envelope::ok(
        video.to_serialized(),
        "Video updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/videos/{videoId}",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Video was deleted")
    )
)]
async fn remove_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<()>> {
    context
        .catalog
        .videos
        .delete(video_id, session.user().id)
        .await?;

    Ok(Envelope::ok((), "Video deleted successfully"))
}

#[utoipa::path(
    post,
    path = "/v1/videos/{videoId}/toggle-publish",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Video)
    )
)]
async fn toggle_publish(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<Video>> {
    let video = context
        .catalog
        .videos
        .toggle_publish(video_id, session.user().id)
        .await?;

    Ok(Envelope::ok(
        video.to_serialized(),
        "Publish status toggled successfully",
    ))
}

/// The largest accepted upload. Media files are held in memory until they
/// are handed to the storage service.
const MAX_UPLOAD_SIZE: usize = 512 * 1024 * 1024;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_videos))
        .route("/", post(publish_video))
        .route("/:id", get(video))
        .route("/:id", patch(update_video))
        .route("/:id", delete(remove_video))
        .route("/:id/toggle-publish", post(toggle_publish))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}
