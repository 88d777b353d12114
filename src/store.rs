//! This module provides a local event source, that stores its events in a local file (or only in memory)

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{EventFields, EventId, EventRecord};
use crate::mock_behaviour::MockBehaviour;
use crate::traits::{EventSource, SourceError};


/// An event source that stores its events in a local JSON file
///
/// This is handy for offline use, and it is used to mock a backend in tests (see [`LocalStore::set_mock_behaviour`]).
#[derive(Debug)]
pub struct LocalStore {
    backing_file: Option<PathBuf>,
    data: Mutex<StoredData>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredData {
    events: Vec<EventRecord>,
    next_id: i64,
    last_saved: Option<DateTime<Utc>>,
}

impl Default for StoredData {
    fn default() -> Self {
        Self { events: Vec::new(), next_id: 1, last_saved: None }
    }
}

impl LocalStore {
    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self{
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(data),
            mock_behaviour: None,
        })
    }

    /// Initialize an empty store, that will be saved to `path` after every change
    pub fn new(path: &Path) -> Self {
        Self{
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(StoredData::default()),
            mock_behaviour: None,
        }
    }

    /// Initialize a store that is never saved to disk
    pub fn in_memory() -> Self {
        Self{
            backing_file: None,
            data: Mutex::new(StoredData::default()),
            mock_behaviour: None,
        }
    }

    /// Replace the content of this store. IDs of the given events are kept as is
    pub fn with_events(self, events: Vec<EventRecord>) -> Self {
        {
            let mut data = self.data();
            data.next_id = events.iter()
                .map(|ev| ev.id().as_i64() + 1)
                .max()
                .unwrap_or(1)
                .max(data.next_id);
            data.events = events;
        }
        self
    }

    /// Make this store fail on purpose, according to a `MockBehaviour`
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Returns a copy of the events currently stored
    pub fn events(&self) -> Vec<EventRecord> {
        self.data().events.clone()
    }

    /// Returns the last time this store has been written to its backing file
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.data().last_saved
    }

    fn data(&self) -> MutexGuard<'_, StoredData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_mock(&self, check: fn(&mut MockBehaviour) -> Result<(), SourceError>) -> Result<(), SourceError> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mock) => {
                let mut mock = mock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                check(&mut mock)
            },
        }
    }

    /// Store the current data to the backing file (if any)
    fn save_to_file(&self, data: &mut StoredData) {
        let path = match &self.backing_file {
            None => return,
            Some(p) => p,
        };
        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        data.last_saved = Some(Utc::now());
        if let Err(err) = serde_json::to_writer(file, &*data) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }
}

#[async_trait]
impl EventSource for LocalStore {
    async fn list(&self) -> Result<Vec<EventRecord>, SourceError> {
        self.check_mock(MockBehaviour::can_list)?;
        Ok(self.events())
    }

    async fn create(&self, fields: EventFields) -> Result<EventId, SourceError> {
        self.check_mock(MockBehaviour::can_create)?;

        let mut data = self.data();
        let id = EventId::from(data.next_id);
        data.next_id += 1;
        data.events.push(EventRecord::new(id, fields));
        self.save_to_file(&mut data);
        Ok(id)
    }

    async fn update(&self, record: EventRecord) -> Result<(), SourceError> {
        self.check_mock(MockBehaviour::can_update)?;

        let mut data = self.data();
        match data.events.iter_mut().find(|ev| ev.id() == record.id()) {
            None => return Err(format!("There is no event {}", record.id()).into()),
            Some(ev) => *ev = record,
        }
        self.save_to_file(&mut data);
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<(), SourceError> {
        self.check_mock(MockBehaviour::can_delete)?;

        let mut data = self.data();
        let count_before = data.events.len();
        data.events.retain(|ev| ev.id() != id);
        if data.events.len() == count_before {
            return Err(format!("There is no event {}", id).into());
        }
        self.save_to_file(&mut data);
        Ok(())
    }
}
