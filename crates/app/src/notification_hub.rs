//! Notification hub — broadcasts events to every subscribed user.
//!
//! Delivery is synchronous and follows subscription order. A subscriber
//! whose delivery fails does not stop the broadcast: the failure is
//! recorded and reported once every subscriber has been tried.

use indexmap::IndexMap;

use smarthub_domain::error::{DeliveryError, HubError};
use smarthub_domain::event::Event;
use smarthub_domain::id::UserId;
use smarthub_domain::user::User;

use crate::ports::Notifier;

/// Outcome of a single [`NotificationHub::broadcast`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that received the event, in delivery order.
    pub delivered: Vec<UserId>,
    /// Subscribers whose delivery failed.
    pub failures: Vec<DeliveryError>,
}

impl BroadcastReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Set of subscribed users plus the notifier used to reach them.
pub struct NotificationHub<N> {
    notifier: N,
    subscribers: IndexMap<UserId, User>,
}

impl<N: Notifier> NotificationHub<N> {
    /// Create an empty hub delivering through `notifier`.
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            subscribers: IndexMap::new(),
        }
    }

    /// Subscribe a user. Subscribing twice is a no-op.
    ///
    /// Returns `true` when the user was not subscribed before.
    pub fn subscribe(&mut self, user: &User) -> bool {
        if self.subscribers.contains_key(&user.id) {
            return false;
        }
        self.subscribers.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "user subscribed");
        true
    }

    /// Unsubscribe a user. Unsubscribing a non-subscriber is a no-op.
    ///
    /// Returns `true` when the user was subscribed.
    pub fn unsubscribe(&mut self, user_id: UserId) -> bool {
        let removed = self.subscribers.shift_remove(&user_id).is_some();
        if removed {
            tracing::debug!(%user_id, "user unsubscribed");
        }
        removed
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn broadcast(&self, event: &Event) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for (user_id, user) in &self.subscribers {
            match self.notifier.deliver(user, event) {
                Ok(()) => report.delivered.push(*user_id),
                Err(err) => report.failures.push(delivery_error(*user_id, err)),
            }
        }
        if !report.is_complete() {
            tracing::warn!(
                event_type = %event.event_type,
                delivered = report.delivered.len(),
                failed = report.failures.len(),
                errors = ?report.failures,
                "broadcast finished with delivery failures"
            );
        }
        report
    }

    #[must_use]
    pub fn is_subscribed(&self, user_id: UserId) -> bool {
        self.subscribers.contains_key(&user_id)
    }

    /// Subscribed users in subscription order.
    pub fn subscribers(&self) -> impl ExactSizeIterator<Item = &User> + '_ {
        self.subscribers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

fn delivery_error(user_id: UserId, err: HubError) -> DeliveryError {
    match err {
        HubError::Delivery(inner) => inner,
        other => DeliveryError {
            user_id,
            reason: other.to_string(),
        },
    }
}
