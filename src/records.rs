//! In-memory record store.
//!
//! Holds the user records in load order. All mutations are synchronous and
//! identifier based; the identifier of a record is never rewritten.

use std::collections::BTreeSet;

use serde::Deserialize;

/// Stable identifier assigned by the data source.
pub type RecordId = u64;

/// A single user row as returned by the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserRecord {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// Read one of the editable fields.
    pub fn field(&self, field: EditField) -> &str {
        match field {
            EditField::Name => &self.name,
            EditField::Email => &self.email,
            EditField::Role => &self.role,
        }
    }

    pub fn field_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Name => &mut self.name,
            EditField::Email => &mut self.email,
            EditField::Role => &mut self.role,
        }
    }
}

/// The three columns a user may change inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditField {
    Name,
    Email,
    Role,
}

impl EditField {
    pub const ALL: [EditField; 3] = [EditField::Name, EditField::Email, EditField::Role];

    pub fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Email,
            EditField::Email => EditField::Role,
            EditField::Role => EditField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::Name => EditField::Role,
            EditField::Email => EditField::Name,
            EditField::Role => EditField::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditField::Name => "Name",
            EditField::Email => "Email",
            EditField::Role => "Role",
        }
    }
}

/// Ordered collection of user records, insertion order = load order.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<UserRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    /// Replace the whole collection, as after a successful load.
    pub fn replace_all(&mut self, records: Vec<UserRecord>) {
        self.records = records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Remove every record whose id is in `ids` and return how many went away.
    pub fn delete_many(&mut self, ids: &BTreeSet<RecordId>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        before - self.records.len()
    }

    /// Copy name, email and role from `draft` onto the record with `id`.
    ///
    /// The draft's own `id` is ignored. Returns `false` when no record has `id`.
    pub fn commit_edit(&mut self, id: RecordId, draft: &UserRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.name = draft.name.clone();
                record.email = draft.email.clone();
                record.role = draft.role.clone();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ids: &[RecordId]) -> RecordStore {
        RecordStore::new(
            ids.iter()
                .map(|&id| UserRecord::new(id, format!("user{id}"), format!("u{id}@example.com"), "member"))
                .collect(),
        )
    }

    #[test]
    fn delete_missing_id_is_silent() {
        let mut s = store(&[1, 2, 3]);
        assert!(!s.delete(42));
        assert_eq!(s.len(), 3);
        assert!(s.delete(2));
        let ids: Vec<_> = s.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn delete_many_reports_only_present_ids() {
        let mut s = store(&[7, 9, 10]);
        let ids: BTreeSet<RecordId> = [7, 8, 9].into_iter().collect();
        assert_eq!(s.delete_many(&ids), 2);
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.records()[0].id, 10);
    }

    #[test]
    fn commit_edit_keeps_identifier() {
        let mut s = store(&[5]);
        let draft = UserRecord::new(99, "B", "b@example.com", "admin");
        assert!(s.commit_edit(5, &draft));
        let r = s.get(5).unwrap();
        assert_eq!(r.id, 5);
        assert_eq!(r.name, "B");
        assert_eq!(r.role, "admin");
        assert!(s.get(99).is_none());
    }

    #[test]
    fn commit_edit_on_missing_record_is_noop() {
        let mut s = store(&[1]);
        let draft = UserRecord::new(2, "x", "x", "x");
        assert!(!s.commit_edit(2, &draft));
        assert_eq!(s.get(1).unwrap().name, "user1");
    }

    #[test]
    fn record_decodes_with_missing_strings() {
        let r: UserRecord = serde_json::from_str(r#"{"id": 3, "name": "Ada"}"#).unwrap();
        assert_eq!(r, UserRecord::new(3, "Ada", "", ""));
    }

    #[test]
    fn edit_field_cycles() {
        assert_eq!(EditField::Name.next(), EditField::Email);
        assert_eq!(EditField::Role.next(), EditField::Name);
        assert_eq!(EditField::Name.prev(), EditField::Role);
    }
}
