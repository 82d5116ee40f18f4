//! Checked rows, independent of the page being shown.

use std::collections::BTreeSet;

use crate::records::RecordId;

/// State of the header checkbox for the rows of one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderCheck {
    pub fn glyph(self) -> &'static str {
        match self {
            HeaderCheck::Unchecked => "[ ]",
            HeaderCheck::Indeterminate => "[-]",
            HeaderCheck::Checked => "[x]",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: RecordId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn remove(&mut self, id: RecordId) {
        self.ids.remove(&id);
    }

    /// Check or uncheck every id on the page; ids elsewhere are left alone.
    pub fn select_page(&mut self, page_ids: &[RecordId], checked: bool) {
        for id in page_ids {
            if checked {
                self.ids.insert(*id);
            } else {
                self.ids.remove(id);
            }
        }
    }

    /// Header checkbox for a page. An empty page is never checked.
    pub fn header_state(&self, page_ids: &[RecordId]) -> HeaderCheck {
        let selected = page_ids.iter().filter(|id| self.ids.contains(*id)).count();
        if page_ids.is_empty() || selected == 0 {
            HeaderCheck::Unchecked
        } else if selected == page_ids.len() {
            HeaderCheck::Checked
        } else {
            HeaderCheck::Indeterminate
        }
    }

    pub fn ids(&self) -> &BTreeSet<RecordId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
