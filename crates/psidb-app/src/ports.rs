//! Capabilities the application borrows from its surroundings
//!
//! - [`NotificationPort`] - message and confirmation dialogs
//! - [`PathPicker`] - the native "choose file/directory" dialog
//!
//! Both are suspension points: the calling action waits for a human.

use psidb_core::Severity;

/// User-facing notification surface
///
/// Implementations cannot fail: a surface that is unable to ask the user
/// must answer `false` from [`confirm`](LocalNotificationPort::confirm).
#[trait_variant::make(NotificationPort: Send)]
pub trait LocalNotificationPort {
    /// Show a message with the given severity
    async fn notify(&self, severity: Severity, text: &str);

    /// Show a warning and ask whether to proceed
    async fn confirm(&self, text: &str) -> bool;
}

/// What the path dialog should offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub title: String,
    pub directory: bool,
    pub multiple: bool,
}

impl PickRequest {
    /// Pick any number of files
    pub fn files(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            directory: false,
            multiple: true,
        }
    }

    /// Pick a single directory
    pub fn directory(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            directory: true,
            multiple: false,
        }
    }
}

/// Raw picker answer: nothing, a bare path, or a list of paths
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Picked {
    #[default]
    Nothing,
    Single(String),
    Many(Vec<String>),
}

impl Picked {
    /// Normalize into a list; a bare path becomes a one-element list
    pub fn into_paths(self) -> Vec<String> {
        match self {
            Picked::Nothing => Vec::new(),
            Picked::Single(path) => vec![path],
            Picked::Many(paths) => paths,
        }
    }

    /// Directory answer for the database dialogs
    ///
    /// Only a bare path counts; a list or nothing yields the empty string,
    /// which the backend resolves to its default location.
    pub fn into_directory(self) -> String {
        match self {
            Picked::Single(path) => path,
            Picked::Nothing | Picked::Many(_) => String::new(),
        }
    }
}

/// Native path dialog
#[trait_variant::make(PathPicker: Send)]
pub trait LocalPathPicker {
    async fn pick(&self, request: PickRequest) -> Picked;
}
