use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use streamtube_catalog::PrimaryKey;

use crate::{
    auth::Session,
    context::ServerContext,
    envelope::Envelope,
    errors::ServerResult,
    schemas::{NewPlaylistSchema, UpdatePlaylistSchema, ValidatedJson},
    serialized::{Playlist, PlaylistWithVideos, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/v1/playlists",
    tag = "playlists",
    request_body = NewPlaylistSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Playlist)
    )
)]
async fn create_playlist(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewPlaylistSchema>,
) -> ServerResult<Envelope<Playlist>> {
    let playlist = context
        .catalog
        .playlists
        .create(body.name, body.description, session.user().id)
        .await?;

    Ok(Envelope::created(
        playlist.to_serialized(),
        "Playlist created successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/v1/playlists/user/{userId}",
    tag = "playlists",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<Playlist>)
    )
)]
async fn user_playlists(
    _session: Session,
    State(context): State<ServerContext>,
    Path(user_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<Vec<Playlist>>> {
    let playlists = context.catalog.playlists.playlists_by_user(user_id).await?;

    Ok(Envelope::ok(
        playlists.to_serialized(),
        "User playlists fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/v1/playlists/{playlistId}",
    tag = "playlists",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = PlaylistWithVideos)
    )
)]
async fn playlist(
    _session: Session,
    State(context): State<ServerContext>,
    Path(playlist_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<PlaylistWithVideos>> {
    let contents = context.catalog.playlists.contents(playlist_id).await?;

    Ok(Envelope::ok(
        contents.to_serialized(),
        "Playlist fetched successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/playlists/{playlistId}",
    tag = "playlists",
    request_body = UpdatePlaylistSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Playlist)
    )
)]
async fn update_playlist(
    session: Session,
    State(context): State<ServerContext>,
    Path(playlist_id): Path<PrimaryKey>,
    ValidatedJson(body): ValidatedJson<UpdatePlaylistSchema>,
) -> ServerResult<Envelope<Playlist>> {
    let playlist = context
        .catalog
        .playlists
        .update(playlist_id, session.user().id, body.name, body.description)
        .await?;

    Ok(Envelope::ok(
        playlist.to_serialized(),
        "Playlist updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/playlists/{playlistId}",
    tag = "playlists",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Playlist was deleted")
    )
)]
async fn remove_playlist(
    session: Session,
    State(context): State<ServerContext>,
    Path(playlist_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<()>> {
    context
        .catalog
        .playlists
        .delete(playlist_id, session.user().id)
        .await?;

    Ok(Envelope::ok((), "Playlist deleted successfully"))
}

#[utoipa::path(
    post,
    path = "/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Playlist)
    )
)]
async fn add_video(
    session: Session,
    State(context): State<ServerContext>,
    Path((playlist_id, video_id)): Path<(PrimaryKey, PrimaryKey)>,
) -> ServerResult<Envelope<Playlist>> {
    let playlist = context
        .catalog
        .playlists
        .add_video(playlist_id, video_id, session.user().id)
        .await?;

    Ok(Envelope::ok(
        playlist.to_serialized(),
        "Video added to playlist successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Playlist)
    )
)]
async fn remove_video(
    session: Session,
    State(context): State<ServerContext>,
    Path((playlist_id, video_id)): Path<(PrimaryKey, PrimaryKey)>,
) -> ServerResult<Envelope<Playlist>> {
    let playlist = context
        .catalog
        .playlists
        .remove_video(playlist_id, video_id, session.user().id)
        .await?;

    Ok(Envelope::ok(
        playlist.to_serialized(),
        "Video removed from playlist successfully",
    ))
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/:id", get(user_playlists))
        .route("/:id", get(playlist))
        .route("/:id", patch(update_playlist))
        .route("/:id", delete(remove_playlist))
        .route("/:id/videos/:video_id", post(add_video))
        .route("/:id/videos/:video_id", delete(remove_video))
}
