use axum::{extract::State, routing::get};

use crate::{
    auth::Session,
    context::ServerContext,
    envelope::Envelope,
    errors::ServerResult,
    serialized::{ChannelStats, ToSerialized, Video},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/dashboard/stats",
    tag = "dashboard",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = ChannelStats)
    )
)]
async fn channel_stats(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Envelope<ChannelStats>> {
    let stats = context
        .catalog
        .dashboard
        .channel_stats(session.user().id)
        .await?;

    Ok(Envelope::ok(
        stats.to_serialized(),
        "Channel stats fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/v1/dashboard/videos",
    tag = "dashboard",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<Video>)
    )
)]
async fn channel_videos(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Envelope<Vec<Video>>> {
    let videos = context
        .catalog
        .dashboard
        .channel_videos(session.user().id)
        .await?;

    Ok(Envelope::ok(
        videos.to_serialized(),
        "Channel videos fetched successfully",
    ))
}

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}
