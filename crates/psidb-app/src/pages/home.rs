//! Landing screen: what the user can do right now

use std::fmt;

use psidb_backend::Backend;

use super::PageContext;
use crate::ports::NotificationPort;

/// A screen reachable from home
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    AddData,
    AddTransform,
    Chain,
    Apply,
    Link,
    Connect,
    InitDatabase,
    Settings,
}

impl Screen {
    /// Screens that need a loaded database
    pub const MUTATING: [Screen; 6] = [
        Screen::AddData,
        Screen::AddTransform,
        Screen::Chain,
        Screen::Apply,
        Screen::Link,
        Screen::Connect,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::AddData => "Add data",
            Screen::AddTransform => "Add transform",
            Screen::Chain => "Chain transforms",
            Screen::Apply => "Apply transform",
            Screen::Link => "Link data",
            Screen::Connect => "Connect entries",
            Screen::InitDatabase => "Initialize database",
            Screen::Settings => "Settings",
        }
    }

    /// CLI subcommand that opens this screen
    pub fn command(&self) -> &'static str {
        match self {
            Screen::AddData => "add-data",
            Screen::AddTransform => "add-transform",
            Screen::Chain => "chain",
            Screen::Apply => "apply",
            Screen::Link => "link",
            Screen::Connect => "connect",
            Screen::InitDatabase => "init",
            Screen::Settings => "load",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

impl HomePage {
    /// Screens to offer, based on whether a database is loaded
    ///
    /// When none is loaded the user is told so and only initialization and
    /// settings are offered.
    pub async fn available_screens<B: Backend, N: NotificationPort>(
        &self,
        ctx: &PageContext<'_, B, N>,
    ) -> Vec<Screen> {
        if ctx.require_database().await {
            let mut screens = Screen::MUTATING.to_vec();
            screens.push(Screen::Settings);
            screens
        } else {
            vec![Screen::InitDatabase, Screen::Settings]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::NO_DATABASE_MSG;
    use crate::test_utils::ScriptedNotifier;
    use psidb_backend::test_utils::MockBackend;

    #[tokio::test]
    async fn test_loaded_database_lists_mutating_screens() {
        let backend = MockBackend::new();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let screens = HomePage.available_screens(&ctx).await;

        assert_eq!(&screens[..6], &Screen::MUTATING);
        assert!(!screens.contains(&Screen::InitDatabase));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_missing_database_offers_init() {
        let backend = MockBackend::without_database();
        let notifier = ScriptedNotifier::new();
        let ctx = PageContext::new(&backend, &notifier);

        let screens = HomePage.available_screens(&ctx).await;

        assert_eq!(screens, vec![Screen::InitDatabase, Screen::Settings]);
        assert_eq!(notifier.messages(), vec![NO_DATABASE_MSG]);
    }
}
