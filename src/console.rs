//! Interactive terminal surface
//!
//! Messages go to stderr so stdout stays clean for command output.
//! Confirmations use `dialoguer`; when no terminal is available the prompt
//! fails and the answer is "cancel".

use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::{debug, warn};

use psidb_app::ports::{NotificationPort, PathPicker, PickRequest, Picked};
use psidb_core::Severity;

/// Notifications on stderr, confirmations through a y/N prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    assume_yes: bool,
}

impl ConsoleNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ️ ",
        Severity::Warning => "⚠️ ",
        Severity::Error => "❌",
    }
}

impl NotificationPort for ConsoleNotifier {
    async fn notify(&self, severity: Severity, text: &str) {
        eprintln!("{} {}", icon(severity), text);
    }

    async fn confirm(&self, text: &str) -> bool {
        if self.assume_yes {
            eprintln!("{} {} (yes)", icon(Severity::Warning), text);
            return true;
        }

        let prompt = format!("{} Continue?", text);
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(yes)) => yes,
            Ok(Err(e)) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation task failed: {}", e);
                false
            }
        }
    }
}

/// Picker that answers with paths given on the command line
///
/// Zero paths is "nothing picked", one is a bare path, more is a list,
/// mirroring what a native dialog hands back.
#[derive(Debug, Clone, Default)]
pub struct ArgPicker {
    paths: Vec<String>,
}

impl ArgPicker {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }
}

impl PathPicker for ArgPicker {
    async fn pick(&self, request: PickRequest) -> Picked {
        debug!("{}: {} path(s) from arguments", request.title, self.paths.len());
        match self.paths.as_slice() {
            [] => Picked::Nothing,
            [single] => Picked::Single(single.clone()),
            many => Picked::Many(many.to_vec()),
        }
    }
}
