//! This crate provides a way to administrate event records stored in a remote table.
//!
//! It provides a REST client in the [`client`] module, that can be used as a stand-alone module, and a local file-backed store in the [`store`] module. \
//! Both are [`EventSource`](traits::EventSource)s.
//!
//! On top of a source, an [`EventsPage`](page::EventsPage) holds a [`ListView`](list_view::ListView): a snapshot of the events, whose rows can be edited one at a time. \
//! Changes are optimistic: they are submitted in the background, and the list is fetched again once they succeed.

pub mod traits;

pub mod event;
pub use event::{EventFields, EventId, EventRecord, FieldChange, VenueId};
pub mod editor;
pub use editor::{EventRowEditor, Mutation, RowEditState};
pub mod list_view;
pub use list_view::ListView;
pub mod page;
pub use page::EventsPage;

pub mod client;
pub mod store;
pub mod resource;
pub mod mock_behaviour;

pub mod config;
pub mod utils;
