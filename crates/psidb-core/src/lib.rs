//! # psidb-core - Core Domain Types
//!
//! Foundation crate for the psidb client. Provides the typed form model,
//! error handling and logging bootstrap shared by every other crate.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, toml, dirs).
//!
//! ## Public API
//!
//! ### Form Model (`types`)
//! - [`PathEntry`] - A picked filesystem path with an optional script argument
//! - [`IdEntry`] - Raw, not yet validated identifier text
//! - [`KeyValuePair`] - One metadata pair
//! - [`Action`] - Connection kind accepted by the `connect` command
//! - [`Severity`] - Notification severity (info, warning, error)
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum grouped by layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use psidb_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::{Action, EntryIndex, IdEntry, KeyValuePair, PathEntry, Severity};
