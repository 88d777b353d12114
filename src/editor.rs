//! The per-row edit/save state machine
//!
//! Every row is either [`RowEditState::Viewing`] or [`RowEditState::Editing`].
//! At most one row can be editing at a time: entering edit mode on a row silently abandons the edit buffer of any other row.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::event::{EventFields, EventId, EventRecord, FieldChange};


/// The state of a single row
#[derive(Clone, Debug, PartialEq)]
pub enum RowEditState {
    /// The row shows the record from the last fetched list
    Viewing,
    /// The row shows (and edits) its own copy of the record
    Editing { buffer: EventRecord },
}

impl Default for RowEditState {
    fn default() -> Self {
        RowEditState::Viewing
    }
}

impl RowEditState {
    pub fn is_editing(&self) -> bool {
        match self {
            RowEditState::Editing { .. } => true,
            RowEditState::Viewing => false,
        }
    }
}

static VIEWING: RowEditState = RowEditState::Viewing;


/// A change that must be submitted to the event source
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Create(EventFields),
    /// The full record, not a diff
    Update(EventRecord),
    Delete(EventId),
}

impl Display for Mutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Create(fields) => write!(f, "create {:?}", fields.name),
            Mutation::Update(record) => write!(f, "update event {}", record.id()),
            Mutation::Delete(id) => write!(f, "delete event {}", id),
        }
    }
}


/// Tracks the edit state of every row
#[derive(Clone, Debug, Default)]
pub struct EventRowEditor {
    rows: HashMap<EventId, RowEditState>,
    /// The row that is in `Editing` state, if any
    editing: Option<EventId>,
}

impl EventRowEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of a row. Unknown rows are `Viewing`
    pub fn state(&self, id: &EventId) -> &RowEditState {
        self.rows.get(id).unwrap_or(&VIEWING)
    }

    /// Returns the ID of the row being edited, if any
    pub fn editing_id(&self) -> Option<&EventId> {
        self.editing.as_ref()
    }

    /// Returns the edit buffer of a row, if this row is being edited
    pub fn buffer(&self, id: &EventId) -> Option<&EventRecord> {
        match self.rows.get(id) {
            Some(RowEditState::Editing { buffer }) => Some(buffer),
            _ => None,
        }
    }

    /// Keep track of exactly these rows.
    ///
    /// New rows start as `Viewing`. Rows that are not listed anymore are forgotten, together with their edit buffer
    pub fn sync_rows<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a EventId>,
    {
        let mut rows = HashMap::new();
        for id in ids {
            let state = self.rows.remove(id).unwrap_or_default();
            rows.insert(*id, state);
        }
        for (id, state) in self.rows.drain() {
            if state.is_editing() {
                log::debug!("Row {} has disappeared while being edited, dropping its edit buffer", id);
            }
        }
        if let Some(id) = self.editing {
            if rows.contains_key(&id) == false {
                self.editing = None;
            }
        }
        self.rows = rows;
    }

    /// Viewing → Editing. The edit buffer is a full copy of `record`.
    ///
    /// Any other row that was being edited goes back to `Viewing`, without saving anything.
    /// Editing a row that is already being edited copies `record` again, so that unsaved changes are lost.
    pub fn edit(&mut self, record: &EventRecord) {
        if let Some(previous) = self.editing.take() {
            if &previous != record.id() {
                log::debug!("Abandoning the unsaved changes of row {}", previous);
            } else {
                log::debug!("Reloading row {}, discarding its unsaved changes", previous);
            }
            self.rows.insert(previous, RowEditState::Viewing);
        }

        log::debug!("Editing row {}", record.id());
        self.rows.insert(*record.id(), RowEditState::Editing { buffer: record.clone() });
        self.editing = Some(*record.id());
    }

    /// Change a single field of the edit buffer.
    ///
    /// Returns `false` (and does nothing) in case no row is being edited
    pub fn change(&mut self, change: FieldChange) -> bool {
        let id = match self.editing {
            None => {
                log::debug!("Ignoring {:?}, since no row is being edited", change);
                return false;
            },
            Some(id) => id,
        };
        match self.rows.get_mut(&id) {
            Some(RowEditState::Editing { buffer }) => {
                buffer.apply(change);
                true
            },
            _ => {
                log::warn!("Inconsistent editor state: row {} should be editing", id);
                self.editing = None;
                false
            },
        }
    }

    /// Editing → Viewing. Returns the update to submit (the whole edit buffer), or `None` if no row is being edited.
    ///
    /// The row leaves edit mode at once, whatever happens to the update afterwards.
    pub fn save(&mut self) -> Option<Mutation> {
        let id = self.editing.take()?;
        match self.rows.insert(id, RowEditState::Viewing) {
            Some(RowEditState::Editing { buffer }) => {
                log::debug!("Saving row {}", id);
                Some(Mutation::Update(buffer))
            },
            _ => None,
        }
    }

    /// Editing → Viewing, dropping the edit buffer
    pub fn cancel(&mut self) {
        if let Some(id) = self.editing.take() {
            log::debug!("Cancelling the edition of row {}", id);
            self.rows.insert(id, RowEditState::Viewing);
        }
    }

    /// Returns the deletion to submit for a row.
    /// This does not change the state of any row: rows are removed when the list is refreshed.
    pub fn delete(&self, id: &EventId) -> Mutation {
        log::debug!("Deleting row {}", id);
        Mutation::Delete(*id)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::event::VenueId;

    fn record(id: i64, name: &str) -> EventRecord {
        EventRecord::new(EventId::from(id), EventFields {
            name: name.to_string(),
            date: "2024-05-01".to_string(),
            venue_id: VenueId::from(3),
            is_starred: false,
            is_private: false,
            is_cancelled: false,
        })
    }

    #[test]
    fn edit_copies_the_record() {
        let gala = record(1, "Gala");
        let mut editor = EventRowEditor::new();
        editor.sync_rows(&[*gala.id()]);

        assert_eq!(editor.state(gala.id()), &RowEditState::Viewing);
        editor.edit(&gala);
        assert_eq!(editor.buffer(gala.id()), Some(&gala));
        assert_eq!(editor.editing_id(), Some(gala.id()));
    }

    #[test]
    fn save_returns_the_whole_buffer() {
        let gala = record(1, "Gala");
        let mut editor = EventRowEditor::new();
        editor.edit(&gala);
        assert!(editor.change(FieldChange::Name("Grand Gala".to_string())));

        let expected = record(1, "Grand Gala");
        assert_eq!(editor.save(), Some(Mutation::Update(expected)));
        assert_eq!(editor.state(gala.id()), &RowEditState::Viewing);
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.save(), None);
    }

    #[test]
    fn only_one_row_is_edited() {
        let a = record(1, "A");
        let b = record(2, "B");
        let mut editor = EventRowEditor::new();
        editor.sync_rows(&[*a.id(), *b.id()]);

        editor.edit(&a);
        editor.change(FieldChange::Starred(true));
        editor.edit(&b);

        assert_eq!(editor.state(a.id()), &RowEditState::Viewing);
        assert_eq!(editor.buffer(b.id()), Some(&b));
        // A's change has been dropped, and is never submitted
        assert_eq!(editor.save(), Some(Mutation::Update(b)));
    }

    #[test]
    fn editing_again_discards_changes() {
        let a = record(1, "A");
        let mut editor = EventRowEditor::new();
        editor.edit(&a);
        editor.change(FieldChange::Date("2025-01-01".to_string()));
        editor.edit(&a);
        assert_eq!(editor.buffer(a.id()), Some(&a));
    }

    #[test]
    fn changes_without_editing_are_ignored() {
        let mut editor = EventRowEditor::new();
        assert_eq!(editor.change(FieldChange::Name("nope".to_string())), false);
        editor.cancel();
        assert_eq!(editor.editing_id(), None);
    }

    #[test]
    fn delete_keeps_other_rows() {
        let a = record(1, "A");
        let b = record(5, "B");
        let mut editor = EventRowEditor::new();
        editor.sync_rows(&[*a.id(), *b.id()]);
        editor.edit(&a);
        editor.change(FieldChange::Private(true));

        assert_eq!(editor.delete(b.id()), Mutation::Delete(EventId::from(5)));
        assert!(editor.buffer(a.id()).unwrap().is_private());
        assert_eq!(editor.state(b.id()), &RowEditState::Viewing);
    }

    #[test]
    fn disappeared_rows_are_forgotten() {
        let a = record(1, "A");
        let b = record(2, "B");
        let mut editor = EventRowEditor::new();
        editor.sync_rows(&[*a.id(), *b.id()]);
        editor.edit(&b);

        editor.sync_rows(&[*a.id()]);
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.buffer(b.id()), None);
        assert_eq!(editor.change(FieldChange::Name("ghost".to_string())), false);

        // Rows that are still there keep their state
        editor.edit(&a);
        editor.sync_rows(&[*a.id(), *b.id()]);
        assert_eq!(editor.buffer(a.id()), Some(&a));
    }
}
