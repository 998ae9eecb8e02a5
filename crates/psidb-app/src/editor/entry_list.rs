//! Ordered, user-editable list of indexed entries
//!
//! Each editor owns a monotonic counter: every added entry gets the next
//! index, and an index is never handed out twice by the same editor, even
//! after its entry is removed.

use psidb_core::prelude::*;
use psidb_core::{EntryIndex, IdEntry, PathEntry};

use crate::ports::{PathPicker, PickRequest};

/// An entry shape an [`EntryListEditor`] can manage
pub trait ListEntry: Clone {
    /// What the user supplies when adding an entry
    type Input;

    fn create(index: EntryIndex, input: Self::Input) -> Self;

    fn index(&self) -> EntryIndex;
}

impl ListEntry for PathEntry {
    type Input = String;

    fn create(index: EntryIndex, path: String) -> Self {
        PathEntry::new(index, path)
    }

    fn index(&self) -> EntryIndex {
        self.index
    }
}

impl ListEntry for IdEntry {
    type Input = String;

    fn create(index: EntryIndex, value: String) -> Self {
        IdEntry::new(index).with_value(value)
    }

    fn index(&self) -> EntryIndex {
        self.index
    }
}

/// Manager for an ordered set of entries, each removable by index
#[derive(Debug, Clone)]
pub struct EntryListEditor<T> {
    entries: Vec<T>,
    next_index: EntryIndex,
}

/// Picked paths, each with an optional argument
pub type PathListEditor = EntryListEditor<PathEntry>;

/// Raw identifier inputs
pub type IdListEditor = EntryListEditor<IdEntry>;

impl<T> Default for EntryListEditor<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_index: 0,
        }
    }
}

impl<T: ListEntry> EntryListEditor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index
    pub fn add(&mut self, input: T::Input) -> EntryIndex {
        let index = self.next_index;
        self.next_index += 1;
        self.entries.push(T::create(index, input));
        index
    }

    /// Remove the entry with this index
    ///
    /// Unknown indices are ignored; returns whether something was removed.
    pub fn remove(&mut self, index: EntryIndex) -> bool {
        match self.entries.iter().position(|e| e.index() == index) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => {
                trace!("remove: no entry with index {}", index);
                false
            }
        }
    }

    /// Current entries in the order they were added
    pub fn list(&self) -> &[T] {
        &self.entries
    }

    pub fn get(&self, index: EntryIndex) -> Option<&T> {
        self.entries.iter().find(|e| e.index() == index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, index: EntryIndex) -> Option<&mut T> {
        self.entries.iter_mut().find(|e| e.index() == index)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path variant
// ─────────────────────────────────────────────────────────────────────────────

impl EntryListEditor<PathEntry> {
    /// Add every path in the order given
    pub fn add_paths<I, S>(&mut self, paths: I) -> Vec<EntryIndex>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths.into_iter().map(|p| self.add(p.into())).collect()
    }

    /// Ask the picker for paths and add each one
    ///
    /// Zero, one or many paths may come back; a bare path is treated as a
    /// one-element list.
    pub async fn add_from_picker<P: PathPicker>(
        &mut self,
        picker: &P,
        request: PickRequest,
    ) -> Vec<EntryIndex> {
        let paths = picker.pick(request).await.into_paths();
        debug!("picker returned {} path(s)", paths.len());
        self.add_paths(paths)
    }

    /// Set or clear the argument of an entry, keeping its index
    pub fn set_argument(&mut self, index: EntryIndex, argument: Option<String>) -> bool {
        match self.entry_mut(index) {
            Some(entry) => {
                entry.argument = argument;
                true
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Id variant
// ─────────────────────────────────────────────────────────────────────────────

impl EntryListEditor<IdEntry> {
    /// Add an empty id input
    pub fn add_empty(&mut self) -> EntryIndex {
        self.add(String::new())
    }

    /// Replace the typed text of an entry, keeping its index
    pub fn set_value(&mut self, index: EntryIndex, value: impl Into<String>) -> bool {
        match self.entry_mut(index) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Add one input per value, in order
    pub fn add_values<I, S>(&mut self, values: I) -> Vec<EntryIndex>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(|v| self.add(v.into())).collect()
    }
}
