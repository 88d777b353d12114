use std::error::Error;

use async_trait::async_trait;

use crate::event::{EventFields, EventId, EventRecord};

/// The error type returned by data sources
pub type SourceError = Box<dyn Error + Send + Sync>;

/// A source of event records (usually a backend table, see [`Client`](crate::client::Client))
///
/// Every function takes `&self`, so that a source can be shared (e.g. in an `Arc`) between several requests that are in flight at the same time.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Returns every event this source contains, in the order decided by this source
    async fn list(&self) -> Result<Vec<EventRecord>, SourceError>;

    /// Create an event. The source picks its ID, and returns it
    async fn create(&self, fields: EventFields) -> Result<EventId, SourceError>;

    /// Replace every field of an existing event (identified by its `id`)
    async fn update(&self, record: EventRecord) -> Result<(), SourceError>;

    /// Delete an event
    async fn delete(&self, id: &EventId) -> Result<(), SourceError>;
}
