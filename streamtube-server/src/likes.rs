use axum::{
    extract::{Path, State},
    routing::{get, post},
};
use streamtube_catalog::PrimaryKey;

use crate::{
    auth::Session,
    context::ServerContext,
    envelope::Envelope,
    errors::ServerResult,
    serialized::{LikeToggle, LikedVideo, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/v1/likes/videos/{videoId}/toggle",
    tag = "likes",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = LikeToggle)
    )
)]
async fn toggle_video_like(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<LikeToggle>> {
    let is_liked = context
        .catalog
        .likes
        .toggle_video_like(video_id, session.user().id)
        .await?;

    let message = if is_liked { "Like added" } else { "Like removed" };

    Ok(Envelope::ok(LikeToggle { is_liked }, message))
}

#[utoipa::path(
    post,
    path = "/v1/likes/comments/{commentId}/toggle",
    tag = "likes",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = LikeToggle)
    )
)]
async fn toggle_comment_like(
    session: Session,
    State(context): State<ServerContext>,
    Path(comment_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<LikeToggle>> {
    let is_liked = context
        .catalog
        .likes
        .toggle_comment_like(comment_id, session.user().id)
        .await?;

    let message = if is_liked { "Like added" } else { "Like removed" };

    Ok(Envelope::ok(LikeToggle { is_liked }, message))
}

#[utoipa::path(
    get,
    path = "/v1/likes/videos",
    tag = "likes",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<LikedVideo>)
    )
)]
async fn liked_videos(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Envelope<Vec<LikedVideo>>> {
    let liked = context
        .catalog
        .likes
        .liked_videos(session.user().id)
        .await?;

    Ok(Envelope::ok(
        liked.to_serialized(),
        "Liked videos fetched successfully",
    ))
}

pub fn router() -> Router {
    Router::new()
        .route("/videos", get(liked_videos))
        .route("/videos/:id/toggle", post(toggle_video_like))
        .route("/comments/:id/toggle", post(toggle_comment_like))
}
