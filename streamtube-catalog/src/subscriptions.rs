use std::sync::Arc;

use thiserror::Error;

use crate::{ChannelSubscriberData, Database, DatabaseError, PrimaryKey, SubscribedChannelData};

/// Manages subscriber → channel edges
pub struct SubscriptionManager<Db> {
    database: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl<Db> SubscriptionManager<Db>
where
    Db: Database,
{
    pub fn new(database: &Arc<Db>) -> Self {
        Self {
            database: database.clone(),
        }
    }

    /// Subscribes the user to the channel, or unsubscribes if a subscription
    /// already exists. Returns whether the subscription exists afterwards.
    pub async fn toggle(
        &self,
        channel_id: PrimaryKey,
        subscriber_id: PrimaryKey,
    ) -> Result<bool, SubscriptionError> {
        self.database
            .toggle_subscription(subscriber_id, channel_id)
            .await
            .map_err(Into::into)
    }

    /// All users subscribed to the channel
    pub async fn subscribers_of(
        &self,
        channel_id: PrimaryKey,
    ) -> Result<Vec<ChannelSubscriberData>, SubscriptionError> {
        self.database
            .subscribers_of(channel_id)
            .await
            .map_err(Into::into)
    }

    /// All channels the user is subscribed to
    pub async fn subscriptions_of(
        &self,
        subscriber_id: PrimaryKey,
    ) -> Result<Vec<SubscribedChannelData>, SubscriptionError> {
        self.database
            .subscriptions_of(subscriber_id)
            .await
            .map_err(Into::into)
    }
}
