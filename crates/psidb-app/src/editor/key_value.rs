//! Open-ended set of metadata key/value pairs
//!
//! Pairs are only ever appended; there is no per-pair removal. Both fields
//! stay editable for the lifetime of the form, so validation always works
//! from a fresh [`snapshot`](KeyValueFormEditor::snapshot).

use psidb_core::KeyValuePair;

#[derive(Debug, Clone, Default)]
pub struct KeyValueFormEditor {
    pairs: Vec<KeyValuePair>,
}

impl KeyValueFormEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty pair and return its position
    pub fn add_pair(&mut self) -> usize {
        self.pairs.push(KeyValuePair::default());
        self.pairs.len() - 1
    }

    pub fn set_key(&mut self, position: usize, key: impl Into<String>) -> bool {
        match self.pairs.get_mut(position) {
            Some(pair) => {
                pair.key = key.into();
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, position: usize, value: impl Into<String>) -> bool {
        match self.pairs.get_mut(position) {
            Some(pair) => {
                pair.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Append a pair and fill both fields
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        let position = self.add_pair();
        self.pairs[position] = KeyValuePair::new(key, value);
        position
    }

    /// Current pairs, in the order they were added
    pub fn snapshot(&self) -> Vec<KeyValuePair> {
        self.pairs.clone()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
