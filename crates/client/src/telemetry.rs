//! Best-effort usage tracking. Nothing here is ever shown to the user:
//! each event is sent from its own task so operations never wait on it,
//! failures are logged and dropped, and nothing is retried.

use std::collections::HashSet;
use std::sync::Arc;

use encore_actor::Actor;
use encore_model::{EventType, IdentityId, NewUsageEvent};
use encore_query::QueryClient;
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{trace, warn};

/// Records usage events through the current actor connection.
#[derive(Clone, Debug)]
pub struct Telemetry<A>
where
    A: Actor,
{
    pending: Arc<Mutex<JoinSet<()>>>,
    query: QueryClient<A>,
    sessions: Arc<Mutex<HashSet<IdentityId>>>,
}

impl<A> Telemetry<A>
where
    A: Actor,
{
    /// Creates a tracker using `query`'s actor connection.
    #[must_use]
    pub fn new(query: QueryClient<A>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(JoinSet::new())),
            query,
            sessions: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    async fn record(&self, identity: Option<IdentityId>, event: NewUsageEvent) {
        let Some(identity) = identity else {
            return;
        };
        let Some(actor) = self.query.actor().await else {
            return;
        };

        let event_type = event.event_type;
        let mut pending = self.pending.lock();
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            match actor.record_usage_event(event).await {
                Ok(()) => trace!(%identity, ?event_type, "recorded usage event"),
                Err(error) => {
                    warn!(%identity, ?event_type, %error, "failed to record usage event");
                }
            }
        });
    }

    /// Waits for every event sent so far to be recorded or dropped.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.pending.lock());
        while pending.join_next().await.is_some() {}
    }

    /// Records a session start the first time it is called for `identity`
    /// in this session.
    pub async fn session_start(&self, identity: Option<IdentityId>) {
        let Some(id) = identity else {
            return;
        };

        if !self.sessions.lock().insert(id) {
            return;
        }

        self.record(identity, NewUsageEvent::bare(EventType::SessionStart))
            .await;
    }

    /// Records navigation to `page`.
    pub async fn page_view(&self, identity: Option<IdentityId>, page: &str) {
        let event = NewUsageEvent {
            page: Some(page.to_string()),
            ..NewUsageEvent::bare(EventType::PageView)
        };

        self.record(identity, event).await;
    }

    /// Records a user action.
    pub async fn action(
        &self,
        identity: Option<IdentityId>,
        category: &str,
        detail: Option<String>,
    ) {
        let event = NewUsageEvent {
            action_category: Some(category.to_string()),
            action_detail: detail,
            ..NewUsageEvent::bare(EventType::Action)
        };

        self.record(identity, event).await;
    }

    /// Records a successful login.
    pub async fn login(&self, identity: Option<IdentityId>) {
        self.record(identity, NewUsageEvent::bare(EventType::Login))
            .await;
    }

    /// Records a logout and ends the identity's session.
    pub async fn logout(&self, identity: Option<IdentityId>) {
        self.record(identity, NewUsageEvent::bare(EventType::Logout))
            .await;

        if let Some(id) = identity {
            self.sessions.lock().remove(&id);
        }
    }
}
