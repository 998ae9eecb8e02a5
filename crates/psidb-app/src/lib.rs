//! # psidb-app - Form State, Validation and Dispatch
//!
//! The client-side pipeline every psidb screen runs: collect typed form
//! state, validate it with a layered accept / confirm / reject policy,
//! serialize it into the backend's wire encoding, and dispatch exactly one
//! command with user feedback.
//!
//! Depends on [`psidb_core`] for domain types and [`psidb_backend`] for the
//! command contract. Knows nothing about terminals: user interaction goes
//! through the [`ports`].
//!
//! ## Public API
//!
//! ### Form State
//! - [`PathListEditor`], [`IdListEditor`] - Indexed entry lists
//! - [`KeyValueFormEditor`] - Metadata pairs
//!
//! ### Pipeline
//! - [`Validator`] - Path, id and metadata validation
//! - [`serializer`] - Wire encoding of validated state
//! - [`CommandDispatcher`] - One-shot invocation with feedback
//! - [`gate`] - Database-availability precondition
//!
//! ### Screens
//! - [`pages`] - One controller per use case, plus [`SubmitOutcome`]
//!
//! ### Configuration
//! - [`config`] - `config.toml` loading

pub mod config;
pub mod dispatcher;
pub mod editor;
pub mod gate;
pub mod pages;
pub mod ports;
pub mod serializer;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use editor::{EntryListEditor, IdListEditor, KeyValueFormEditor, PathListEditor};
pub use pages::{PageContext, SubmitOutcome};
pub use ports::{NotificationPort, PathPicker, PickRequest, Picked};
pub use validation::{IdPolicy, ValidationOutcome, Validator};
