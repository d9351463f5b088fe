use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for a published notification.
///
/// Notes:
/// - `db_name` scopes the notification to one engine instance, so one bus can
///   serve several engines.
/// - `request_id` correlates the notification with the request that caused it
///   (`None` for lifecycle notifications such as `started`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope<N> {
    notification_id: Uuid,
    db_name: String,
    request_id: Option<Uuid>,
    occurred_at: DateTime<Utc>,

    payload: N,
}

impl<N> NotificationEnvelope<N> {
    pub fn new(
        notification_id: Uuid,
        db_name: impl Into<String>,
        request_id: Option<Uuid>,
        occurred_at: DateTime<Utc>,
        payload: N,
    ) -> Self {
        Self {
            notification_id,
            db_name: db_name.into(),
            request_id,
            occurred_at,
            payload,
        }
    }

    /// Envelope stamped now with a fresh time-ordered id.
    pub fn now(db_name: impl Into<String>, request_id: Option<Uuid>, payload: N) -> Self {
        Self::new(Uuid::now_v7(), db_name, request_id, Utc::now(), payload)
    }

    pub fn notification_id(&self) -> Uuid {
        self.notification_id
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &N {
        &self.payload
    }

    pub fn into_payload(self) -> N {
        self.payload
    }
}
