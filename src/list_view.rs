//! The list of events, as shown to the user
//!
//! A [`ListView`] holds a read-only snapshot of the events fetched from an event source, the edit state of its rows and the "new event" form.
//! It never talks to the source itself: actions return the [`Mutation`]s that must be submitted (see [`EventsPage`](crate::page::EventsPage)).

use std::error::Error;

use chrono::{DateTime, Utc};

use crate::editor::{EventRowEditor, Mutation, RowEditState};
use crate::event::{EventFields, EventId, EventRecord, FieldChange};


/// Events, as they were returned by the last successful fetch
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    events: Vec<EventRecord>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events, fetched_at: Utc::now() }
    }

    pub fn events(&self) -> &[EventRecord] { &self.events }
    pub fn fetched_at(&self) -> DateTime<Utc> { self.fetched_at }

    pub fn get(&self, id: &EventId) -> Option<&EventRecord> {
        self.events.iter().find(|ev| ev.id() == id)
    }
}


/// Whether events are available
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState {
    /// The first fetch has not completed yet
    Pending,
    /// The first fetch has failed
    Failed(String),
    Ready(Snapshot),
}


/// What should be displayed
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    /// A loading indicator, and nothing else
    Loading,
    /// An error indicator, and nothing else
    Error,
    Table {
        rows: Vec<RowView>,
        /// The current content of the "new event" form
        form: EventFields,
    },
}

/// A row of the table
#[derive(Clone, Debug, PartialEq)]
pub struct RowView {
    pub key: EventId,
    pub editing: bool,
    /// The edit buffer for an editing row, the fetched record otherwise
    pub shown: EventRecord,
}


/// The list of events, with its row editor and its "new event" form
#[derive(Clone, Debug)]
pub struct ListView {
    fetch_state: FetchState,
    /// The error of the last refresh, in case it failed while an older snapshot was available
    refresh_error: Option<String>,
    editor: EventRowEditor,
    new_record: EventFields,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            fetch_state: FetchState::Pending,
            refresh_error: None,
            editor: EventRowEditor::new(),
            new_record: EventFields::default(),
        }
    }

    pub fn fetch_state(&self) -> &FetchState { &self.fetch_state }
    pub fn refresh_error(&self) -> Option<&str> { self.refresh_error.as_deref() }
    pub fn editor(&self) -> &EventRowEditor { &self.editor }
    pub fn new_record(&self) -> &EventFields { &self.new_record }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.fetch_state {
            FetchState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Take the result of a fetch into account.
    ///
    /// A failed fetch replaces the table with an error only if no events have ever been fetched. Otherwise, the former snapshot is kept.
    pub fn apply_fetch<E: Into<Box<dyn Error + Send + Sync>>>(&mut self, result: Result<Vec<EventRecord>, E>) {
        match result {
            Ok(events) => {
                self.editor.sync_rows(events.iter().map(|ev| ev.id()));
                self.fetch_state = FetchState::Ready(Snapshot::new(events));
                self.refresh_error = None;
            },
            Err(err) => {
                let err: Box<dyn Error + Send + Sync> = err.into();
                let err = err.to_string();
                match self.fetch_state {
                    FetchState::Ready(_) => {
                        log::warn!("Unable to refresh the events, keeping the former ones: {}", err);
                        self.refresh_error = Some(err);
                    },
                    _ => {
                        log::warn!("Unable to fetch the events: {}", err);
                        self.fetch_state = FetchState::Failed(err);
                    },
                }
            },
        }
    }

    fn record(&self, id: &EventId) -> Result<&EventRecord, Box<dyn Error + Send + Sync>> {
        match self.snapshot() {
            None => Err("Events are not loaded".into()),
            Some(snapshot) => snapshot.get(id)
                .ok_or_else(|| format!("There is no event {}", id).into()),
        }
    }

    /// Start editing a row (the "Edit" button)
    pub fn edit(&mut self, id: &EventId) -> Result<(), Box<dyn Error + Send + Sync>> {
        let record = self.record(id)?.clone();
        self.editor.edit(&record);
        Ok(())
    }

    /// Change a field of the row being edited. Returns `false` if no row is being edited
    pub fn change(&mut self, change: FieldChange) -> bool {
        self.editor.change(change)
    }

    /// The "Save" button
    pub fn save(&mut self) -> Option<Mutation> {
        self.editor.save()
    }

    pub fn cancel(&mut self) {
        self.editor.cancel()
    }

    /// The "Delete" button of a row
    pub fn delete(&mut self, id: &EventId) -> Result<Mutation, Box<dyn Error + Send + Sync>> {
        self.record(id)?;
        Ok(self.editor.delete(id))
    }

    /// Change a field of the "new event" form
    pub fn change_new(&mut self, change: FieldChange) {
        self.new_record.apply(change)
    }

    /// The "Add event" button. The form is reset, whatever happens to the creation afterwards
    pub fn submit_new(&mut self) -> Mutation {
        let fields = std::mem::take(&mut self.new_record);
        Mutation::Create(fields)
    }

    /// Returns what should be displayed
    pub fn render(&self) -> View {
        match &self.fetch_state {
            FetchState::Pending => View::Loading,
            FetchState::Failed(_) => View::Error,
            FetchState::Ready(snapshot) => {
                let rows = snapshot.events().iter()
                    .map(|ev| match self.editor.state(ev.id()) {
                        RowEditState::Viewing => RowView { key: *ev.id(), editing: false, shown: ev.clone() },
                        RowEditState::Editing { buffer } => RowView { key: *ev.id(), editing: true, shown: buffer.clone() },
                    })
                    .collect();
                View::Table { rows, form: self.new_record.clone() }
            },
        }
    }
}
