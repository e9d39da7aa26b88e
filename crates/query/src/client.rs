use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use encore_actor::Actor;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{RwLock, broadcast};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::{
    Error, Mutation, Notification, Query, QueryClientOptions, QueryKey, QueryScope, QueryState,
};

type Value = Arc<dyn Any + Send + Sync>;
type Flight = Shared<BoxFuture<'static, Result<Value, Error>>>;

/// Cache statistics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QueryStats {
    /// Reads served from fresh cached data.
    pub hits: u64,
    /// Reads that had to wait on the backend.
    pub misses: u64,
    /// Remote calls issued.
    pub fetches: u64,
    /// Reads that joined a fetch already in flight.
    pub joined: u64,
    /// Entries staled by invalidation.
    pub invalidated: u64,
}

#[derive(Default)]
struct Entry {
    value: Option<Value>,
    fetched_at: Option<Instant>,
    stale: bool,
    /// Bumped on every invalidation, so a fetch that started before one
    /// stores its result as stale.
    generation: u64,
    flight: Option<(u64, Flight)>,
    error: Option<Error>,
}

impl Entry {
    fn fresh(&self, stale_time: Duration) -> Option<Value> {
        if self.stale {
            return None;
        }

        let fetched_at = self.fetched_at?;
        if fetched_at.elapsed() < stale_time {
            self.value.clone()
        } else {
            None
        }
    }
}

#[derive(Default)]
struct Cache {
    entries: HashMap<QueryKey, Entry>,
    next_flight: u64,
    stats: QueryStats,
}

fn downcast<T: Clone + 'static>(key: &QueryKey, value: &Value) -> QueryState<T> {
    (**value).downcast_ref::<T>().map_or_else(
        || QueryState::Error(Error::TypeMismatch(key.clone())),
        |data| QueryState::Success(data.clone()),
    )
}

/// Mediates every read and write between views and the actor.
#[derive(Clone)]
pub struct QueryClient<A>
where
    A: Actor,
{
    actor: Arc<RwLock<Option<A>>>,
    cache: Arc<RwLock<Cache>>,
    notifications: broadcast::Sender<Notification>,
    options: QueryClientOptions,
}

impl<A> fmt::Debug for QueryClient<A>
where
    A: Actor,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<A> QueryClient<A>
where
    A: Actor,
{
    /// Creates a client with no actor connection.
    #[must_use]
    pub fn new(options: QueryClientOptions) -> Self {
        let (notifications, _) = broadcast::channel(options.notification_capacity.max(1));

        Self {
            actor: Arc::new(RwLock::new(None)),
            cache: Arc::new(RwLock::new(Cache::default())),
            notifications,
            options,
        }
    }

    /// Attaches an actor connection. Cached entries from any previous
    /// connection are dropped.
    pub async fn connect(&self, actor: A) {
        *self.actor.write().await = Some(actor);
        self.clear().await;
    }

    /// Detaches the actor connection; every read becomes disabled.
    pub async fn disconnect(&self) {
        *self.actor.write().await = None;
    }

    /// The current actor connection, if any.
    pub async fn actor(&self) -> Option<A> {
        self.actor.read().await.clone()
    }

    /// Reads through the cache.
    ///
    /// Fresh data is returned immediately. A fetch already in flight for the
    /// same key is joined. Errors are returned but never served from cache,
    /// and nothing is retried.
    pub async fn fetch<Q>(&self, query: &Q) -> QueryState<Q::Output>
    where
        Q: Query<A>,
    {
        let Some(key) = query.key() else {
            return QueryState::Disabled;
        };
        let Some(actor) = self.actor().await else {
            return QueryState::Disabled;
        };

        let flight = {
            let mut cache = self.cache.write().await;
            let Cache {
                entries,
                next_flight,
                stats,
            } = &mut *cache;
            let entry = entries.entry(key.clone()).or_default();

            if let Some(value) = entry.fresh(self.options.stale_time) {
                stats.hits += 1;
                trace!(%key, "cache hit");
                return downcast(&key, &value);
            }

            stats.misses += 1;

            if let Some((_, flight)) = &entry.flight {
                stats.joined += 1;
                trace!(%key, "joining in-flight fetch");
                flight.clone()
            } else {
                stats.fetches += 1;
                *next_flight += 1;

                let flight = self.start_flight(
                    query.clone(),
                    actor,
                    key.clone(),
                    *next_flight,
                    entry.generation,
                );
                entry.flight = Some((*next_flight, flight.clone()));
                entry.error = None;
                debug!(%key, "fetching");
                flight
            }
        };

        match flight.await {
            Ok(value) => downcast(&key, &value),
            Err(error) => QueryState::Error(error),
        }
    }

    fn start_flight<Q>(
        &self,
        query: Q,
        actor: A,
        key: QueryKey,
        id: u64,
        generation: u64,
    ) -> Flight
    where
        Q: Query<A>,
    {
        let cache = Arc::clone(&self.cache);

        // Runs on its own task so the call completes and lands in the cache
        // even when every reader has gone away.
        let task = tokio::spawn(async move {
            let result = query
                .run(&actor)
                .await
                .map(|output| Arc::new(output) as Value)
                .map_err(|error| Error::Remote(error.to_string()));

            let mut cache = cache.write().await;

            // The entry may have been cleared or refetched meanwhile.
            if let Some(entry) = cache.entries.get_mut(&key) {
                if entry.flight.as_ref().is_some_and(|(flight, _)| *flight == id) {
                    entry.flight = None;

                    match &result {
                        Ok(value) => {
                            entry.value = Some(Arc::clone(value));
                            entry.fetched_at = Some(Instant::now());
                            entry.stale = entry.generation != generation;
                        }
                        Err(error) => {
                            debug!(%key, %error, "fetch failed");
                            entry.error = Some(error.clone());
                        }
                    }
                }
            }

            result
        });

        async move {
            task.await.unwrap_or_else(|error| {
                warn!(%error, "fetch task failed");
                Err(Error::Remote(error.to_string()))
            })
        }
        .boxed()
        .shared()
    }

    /// Current state of a read without fetching. Stale data is still
    /// reported as `Success`.
    pub async fn peek<Q>(&self, query: &Q) -> QueryState<Q::Output>
    where
        Q: Query<A>,
    {
        let Some(key) = query.key() else {
            return QueryState::Disabled;
        };

        if self.actor.read().await.is_none() {
            return QueryState::Disabled;
        }

        let cache = self.cache.read().await;

        match cache.entries.get(&key) {
            Some(Entry {
                value: Some(value), ..
            }) => downcast(&key, value),
            Some(Entry {
                error: Some(error), ..
            }) => QueryState::Error(error.clone()),
            _ => QueryState::Pending,
        }
    }

    /// Performs a write. On success the mutation's scopes are staled and a
    /// success notification is sent; on failure an error notification is
    /// sent and the cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` without an actor, or `Remote` if the call failed.
    pub async fn mutate<M>(&self, mutation: &M) -> Result<(), Error>
    where
        M: Mutation<A>,
    {
        let result = match self.actor().await {
            Some(actor) => mutation
                .run(&actor)
                .await
                .map_err(|error| Error::Remote(error.to_string())),
            None => Err(Error::Disconnected),
        };

        match result {
            Ok(()) => {
                self.invalidate(mutation.invalidates()).await;
                debug!(?mutation, "mutation succeeded");
                self.notify(Notification::success(mutation.success_message()));
                Ok(())
            }
            Err(error) => {
                warn!(?mutation, %error, "mutation failed");
                self.notify(Notification::error(format!(
                    "{}: {error}",
                    mutation.failure_prefix()
                )));
                Err(error)
            }
        }
    }

    /// Stales every entry in the given scopes, including ones being fetched.
    pub async fn invalidate(&self, scopes: &[QueryScope]) {
        let mut cache = self.cache.write().await;
        let Cache { entries, stats, .. } = &mut *cache;
        let mut count = 0;

        for (key, entry) in entries
            .iter_mut()
            .filter(|(key, _)| scopes.contains(&key.scope()))
        {
            entry.generation += 1;
            entry.stale = true;
            count += 1;
            trace!(%key, "invalidated");
        }

        stats.invalidated += count;
        debug!(?scopes, count, "invalidated queries");
    }

    /// Drops every cached entry.
    pub async fn clear(&self) {
        self.cache.write().await.entries.clear();
        debug!("cleared query cache");
    }

    /// Sends a notification to every subscriber.
    pub fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            trace!("no notification subscribers");
        }
    }

    /// Subscribes to notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Cache statistics so far.
    pub async fn stats(&self) -> QueryStats {
        self.cache.read().await.stats
    }
}
