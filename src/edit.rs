//! Draft values for rows being edited inline.
//!
//! A row is either in view mode or editing mode. Opening an edit snapshots the
//! record; typing only touches the snapshot; closing hands the draft back so
//! the caller can commit it to the store.

use std::collections::BTreeMap;

use crate::records::{EditField, RecordId, UserRecord};

#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    drafts: BTreeMap<RecordId, UserRecord>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `record` into the buffer, replacing any stale draft for its id.
    pub fn open(&mut self, record: &UserRecord) {
        self.drafts.insert(record.id, record.clone());
    }

    pub fn is_editing(&self, id: RecordId) -> bool {
        self.drafts.contains_key(&id)
    }

    pub fn draft(&self, id: RecordId) -> Option<&UserRecord> {
        self.drafts.get(&id)
    }

    /// Overwrite one field of the draft. Returns `false` when `id` is not being edited.
    pub fn set_field(&mut self, id: RecordId, field: EditField, value: impl Into<String>) -> bool {
        match self.drafts.get_mut(&id) {
            Some(draft) => {
                *draft.field_mut(field) = value.into();
                true
            }
            None => false,
        }
    }

    pub fn push_char(&mut self, id: RecordId, field: EditField, c: char) {
        if let Some(draft) = self.drafts.get_mut(&id) {
            draft.field_mut(field).push(c);
        }
    }

    pub fn pop_char(&mut self, id: RecordId, field: EditField) {
        if let Some(draft) = self.drafts.get_mut(&id) {
            draft.field_mut(field).pop();
        }
    }

    /// Remove and return the draft for `id`.
    pub fn take(&mut self, id: RecordId) -> Option<UserRecord> {
        self.drafts.remove(&id)
    }

    pub fn discard(&mut self, id: RecordId) -> bool {
        self.drafts.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }
}
