//! Request dispatch with outcome notifications.
//!
//! The [`Dispatcher`] is the named-event face of the engine: each [`Request`]
//! resolves to exactly one [`Notification`] (its success event or `error`),
//! which is returned to the caller *and* published on the bus.
//!
//! ```text
//! Request ─▶ InventoryDb (validate → store) ─▶ Notification ─┬─▶ caller
//!                                                           └─▶ EventBus (enveloped)
//! ```
//!
//! Publishing happens after the outcome is decided; a failed publish is logged
//! and does not change the outcome. Listeners must subscribe before issuing the
//! request they wait on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use invdb_core::StartupError;
use invdb_events::{EventBus, Notification, NotificationEnvelope, NotificationError};
use invdb_inventory::{Entry, InventoryDbOptions};

use crate::engine::{Connecting, InventoryDb};
use crate::entry_store::{EntryStore, StoreConnector};

/// Envelope type carried on the dispatcher's bus.
pub type InventoryEnvelope = NotificationEnvelope<Notification>;

/// A request against the engine, named by its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", content = "payload", rename_all = "camelCase")]
pub enum Request {
    Update(Entry),
    Updates(Vec<Entry>),
    GetEntry(u64),
    GetEntries { start: u64, end: u64 },
    GetAvailable { start: u64, end: u64 },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Update(_) => "update",
            Request::Updates(_) => "updates",
            Request::GetEntry(_) => "getEntry",
            Request::GetEntries { .. } => "getEntries",
            Request::GetAvailable { .. } => "getAvailable",
        }
    }
}

/// Runs requests against a shared engine and publishes their outcomes.
pub struct Dispatcher<S, B> {
    db: Arc<InventoryDb<S>>,
    bus: B,
}

impl<S, B> Dispatcher<S, B>
where
    S: EntryStore + 'static,
    B: EventBus<InventoryEnvelope>,
{
    pub fn new(db: Arc<InventoryDb<S>>, bus: B) -> Self {
        Self { db, bus }
    }

    /// Validate `options`, then [`Self::start`].
    ///
    /// Invalid options publish an `error` notification of kind `config` and
    /// return [`StartupError::Config`] without contacting the store.
    pub async fn connect<C>(options: InventoryDbOptions, connector: &C, bus: B) -> Result<Self, StartupError>
    where
        C: StoreConnector<Store = S>,
    {
        let db_name = options.name.clone().unwrap_or_default();

        match Connecting::new(options) {
            Ok(connecting) => Self::start(connecting, connector, bus).await,
            Err(err) => {
                publish_unstarted(&bus, db_name, NotificationError::from(&err));
                Err(StartupError::Config(err))
            }
        }
    }

    /// Connect the engine and announce readiness.
    ///
    /// Publishes `started` once on success, or an `error` notification
    /// (kind `startup`) when the store cannot be reached.
    pub async fn start<C>(connecting: Connecting, connector: &C, bus: B) -> Result<Self, StartupError>
    where
        C: StoreConnector<Store = S>,
    {
        let db_name = connecting.config().name().to_string();

        match connecting.start(connector).await {
            Ok(db) => {
                let dispatcher = Self::new(Arc::new(db), bus);
                dispatcher.publish(None, Notification::Started);
                Ok(dispatcher)
            }
            Err(err) => {
                publish_unstarted(&bus, db_name, NotificationError::from(&err));
                Err(err)
            }
        }
    }

    pub fn db(&self) -> &Arc<InventoryDb<S>> {
        &self.db
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Run a request, publish its outcome, and return it.
    pub async fn dispatch(&self, request: Request) -> Notification {
        self.dispatch_with_id(Uuid::now_v7(), request).await
    }

    /// Like [`Self::dispatch`], with a caller-chosen correlation id.
    #[instrument(skip(self, request), fields(db_name = %self.db.name(), request = request.name()))]
    pub async fn dispatch_with_id(&self, request_id: Uuid, request: Request) -> Notification {
        let notification = self.execute(request).await;
        debug!(event = notification.event_name(), "request resolved");
        self.publish(Some(request_id), notification.clone());
        notification
    }

    /// Run a request without publishing anything.
    pub async fn execute(&self, request: Request) -> Notification {
        match request {
            Request::Update(entry) => match self.db.update(entry).await {
                Ok(()) => Notification::Updated,
                Err(err) => err.into(),
            },
            Request::Updates(entries) => match self.db.updates(entries).await {
                Ok(()) => Notification::Updated,
                Err(err) => err.into(),
            },
            Request::GetEntry(index) => match self.db.get_entry(index).await {
                Ok(entry) => Notification::GotEntry(entry),
                Err(err) => err.into(),
            },
            Request::GetEntries { start, end } => match self.db.get_entries(start, end).await {
                Ok(entries) => Notification::GotEntries(entries),
                Err(err) => err.into(),
            },
            Request::GetAvailable { start, end } => match self.db.get_available(start, end).await {
                Ok(available) => Notification::GotAvailable(available),
                Err(err) => err.into(),
            },
        }
    }

    fn publish(&self, request_id: Option<Uuid>, notification: Notification) {
        let envelope = NotificationEnvelope::now(self.db.name(), request_id, notification);
        if let Err(err) = self.bus.publish(envelope) {
            warn!(error = ?err, "failed to publish notification");
        }
    }
}

/// Publish an error for an engine that never became ready.
fn publish_unstarted<B>(bus: &B, db_name: String, error: NotificationError)
where
    B: EventBus<InventoryEnvelope>,
{
    let envelope = NotificationEnvelope::now(db_name, None, Notification::Error(error));
    if let Err(err) = bus.publish(envelope) {
        warn!(error = ?err, "failed to publish startup error");
    }
}

impl<S, B> Dispatcher<S, B>
where
    S: EntryStore + 'static,
    B: EventBus<InventoryEnvelope> + 'static,
{
    /// Accept a request and run it on the tokio runtime.
    ///
    /// Returns the request id stamped on the published envelope, so listeners
    /// can match outcomes to requests. Requests spawned back to back may
    /// complete in any order.
    pub fn spawn(self: &Arc<Self>, request: Request) -> (Uuid, JoinHandle<Notification>) {
        let request_id = Uuid::now_v7();
        (request_id, self.spawn_with_id(request_id, request))
    }

    /// Like [`Self::spawn`], with a caller-chosen correlation id.
    pub fn spawn_with_id(self: &Arc<Self>, request_id: Uuid, request: Request) -> JoinHandle<Notification> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.dispatch_with_id(request_id, request).await })
    }
}
