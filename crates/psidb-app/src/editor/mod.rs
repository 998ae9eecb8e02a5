//! Typed form state: path and id lists, metadata pairs

pub mod entry_list;
pub mod key_value;

pub use entry_list::{EntryListEditor, IdListEditor, ListEntry, PathListEditor};
pub use key_value::KeyValueFormEditor;
