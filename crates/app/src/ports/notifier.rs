//! Notifier port — delivers one event to one user.

use smarthub_domain::error::HubError;
use smarthub_domain::event::Event;
use smarthub_domain::user::User;

use super::log_sink::{LogSink, SharedSink};

/// Delivers events to an individual subscriber.
pub trait Notifier {
    /// Deliver `event` to `user`.
    ///
    /// # Errors
    ///
    /// Returns an error when the delivery failed; the hub records it and
    /// moves on to the next subscriber.
    fn deliver(&self, user: &User, event: &Event) -> Result<(), HubError>;
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn deliver(&self, user: &User, event: &Event) -> Result<(), HubError> {
        (**self).deliver(user, event)
    }
}

/// Writes `Notification to <name>: <message>` lines to a log sink.
#[derive(Clone)]
pub struct SinkNotifier {
    sink: SharedSink,
}

impl SinkNotifier {
    #[must_use]
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Notifier for SinkNotifier {
    fn deliver(&self, user: &User, event: &Event) -> Result<(), HubError> {
        self.sink
            .write(&format!("Notification to {}: {}", user.name, event.message))
    }
}
