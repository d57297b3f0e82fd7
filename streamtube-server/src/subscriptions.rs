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
    serialized::{SubscribedChannel, Subscriber, SubscriptionToggle, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/v1/subscriptions/channels/{channelId}/toggle",
    tag = "subscriptions",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = SubscriptionToggle)
    )
)]
async fn toggle_subscription(
    session: Session,
    State(context): State<ServerContext>,
    Path(channel_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<SubscriptionToggle>> {
    let subscribed = context
        .catalog
        .subscriptions
        .toggle(channel_id, session.user().id)
        .await?;

    let message = if subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };

    Ok(Envelope::ok(SubscriptionToggle { subscribed }, message))
}

#[utoipa::path(
    get,
    path = "/v1/subscriptions/channels/{channelId}/subscribers",
    tag = "subscriptions",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<Subscriber>)
    )
)]
async fn channel_subscribers(
    _session: Session,
    State(context): State<ServerContext>,
    Path(channel_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<Vec<Subscriber>>> {
    let subscribers = context
        .catalog
        .subscriptions
        .subscribers_of(channel_id)
        .await?;

    Ok(Envelope::ok(
        subscribers.to_serialized(),
        "Subscribers fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/v1/subscriptions/users/{subscriberId}/channels",
    tag = "subscriptions",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<SubscribedChannel>)
    )
)]
async fn subscribed_channels(
    _session: Session,
    State(context): State<ServerContext>,
    Path(subscriber_id): Path<PrimaryKey>,
) -> ServerResult<Envelope<Vec<SubscribedChannel>>> {
    let channels = context
        .catalog
        .subscriptions
        .subscriptions_of(subscriber_id)
        .await?;

    Ok(Envelope::ok(
        channels.to_serialized(),
        "Subscribed channels fetched successfully",
    ))
}

pub fn router() -> Router {
    Router::new()
        .route("/channels/:id/toggle", post(toggle_subscription))
        .route("/channels/:id/subscribers", get(channel_subscribers))
        .route("/users/:id/channels", get(subscribed_channels))
}
