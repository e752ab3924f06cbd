//! Top-level application state and the actions that change it.

use tracing::{info, warn};

use crate::models::User;
use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Pastel,
    Cupcake,
    Lofi,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Pastel => "pastel",
            ThemeName::Cupcake => "cupcake",
            ThemeName::Lofi => "lofi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Pastel => "Pastel",
            ThemeName::Cupcake => "Cupcake",
            ThemeName::Lofi => "Lo-Fi",
        }
    }

    /// Unknown names fall back to Pastel.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "cupcake" => ThemeName::Cupcake,
            "lofi" | "lo-fi" | "lo_fi" => ThemeName::Lofi,
            _ => ThemeName::Pastel,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Pastel => ThemeName::Cupcake,
            ThemeName::Cupcake => ThemeName::Lofi,
            ThemeName::Lofi => ThemeName::Pastel,
        }
    }
}

/// Screens shown before signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Signup,
}

/// Sidebar sections available once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Lessons,
    Practice,
    Tutor,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Lessons, View::Practice, View::Tutor];

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Lessons => "Lessons",
            View::Practice => "Practice",
            View::Tutor => "Tutor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub page: Page,
    pub view: View,
    pub theme: ThemeName,
    pub user: Option<User>,
    pub sidebar_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::Home,
            view: View::Dashboard,
            theme: ThemeName::default(),
            user: None,
            sidebar_open: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowPage(Page),
    Navigate(View),
    ToggleSidebar,
    SetTheme(ThemeName),
    CycleTheme,
    LoggedIn(User),
    Logout,
}

/// Apply `action` to `state`.
pub fn reduce(state: AppState, action: &Action) -> AppState {
    match action {
        Action::ShowPage(page) => AppState { page: *page, ..state },
        Action::Navigate(view) => AppState { view: *view, ..state },
        Action::ToggleSidebar => AppState {
            sidebar_open: !state.sidebar_open,
            ..state
        },
        Action::SetTheme(theme) => AppState { theme: *theme, ..state },
        Action::CycleTheme => AppState {
            theme: state.theme.next(),
            ..state
        },
        Action::LoggedIn(user) => AppState {
            user: Some(user.clone()),
            view: View::Dashboard,
            ..state
        },
        Action::Logout => AppState {
            user: None,
            page: Page::Home,
            ..state
        },
    }
}

impl AppState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Rebuild the state saved by a previous session.
    pub fn restore(store: &dyn KeyValueStore, fallback_theme: ThemeName) -> Self {
        let theme = match load_json::<String>(store, StorageKey::Theme) {
            Ok(Some(name)) => ThemeName::from_str(&name),
            Ok(None) => fallback_theme,
            Err(e) => {
                warn!(error = %e, "Failed to load theme");
                fallback_theme
            }
        };

        let user = load_json::<User>(store, StorageKey::User).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load signed-in user");
            None
        });

        Self {
            theme,
            user,
            ..Self::default()
        }
    }
}

/// Write whatever changed between `prev` and `next` to `store`.
pub fn persist_transition(prev: &AppState, next: &AppState, store: &dyn KeyValueStore) {
    if prev.theme != next.theme {
        if let Err(e) = save_json(store, StorageKey::Theme, &next.theme.as_str()) {
            warn!(error = %e, "Failed to save theme");
        }
    }

    if prev.user != next.user {
        let result = match &next.user {
            Some(user) => {
                info!(email = %user.email, "Signed in");
                save_json(store, StorageKey::User, user)
            }
            None => {
                info!("Signed out");
                store.remove(StorageKey::User)
            }
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to save signed-in user");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BrokenStore, MemoryStore};
    use serde_json::json;

    fn ana() -> User {
        User {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn theme_names_round_trip_and_cycle() {
        for name in [ThemeName::Pastel, ThemeName::Cupcake, ThemeName::Lofi] {
            assert_eq!(ThemeName::from_str(name.as_str()), name);
        }
        assert_eq!(ThemeName::from_str("Lo-Fi"), ThemeName::Lofi);
        assert_eq!(ThemeName::from_str("nord"), ThemeName::Pastel);
        assert_eq!(ThemeName::Lofi.next(), ThemeName::Pastel);
    }

    #[test]
    fn login_lands_on_dashboard_and_logout_returns_home() {
        let state = reduce(AppState::default(), &Action::ShowPage(Page::Login));
        let state = reduce(state, &Action::Navigate(View::Lessons));
        let state = reduce(state, &Action::LoggedIn(ana()));
        assert!(state.is_signed_in());
        assert_eq!(state.view, View::Dashboard);

        let state = reduce(state, &Action::Logout);
        assert!(!state.is_signed_in());
        assert_eq!(state.page, Page::Home);
    }

    #[test]
    fn reduce_leaves_input_untouched_for_other_fields() {
        let before = AppState::default();
        let after = reduce(before.clone(), &Action::ToggleSidebar);
        assert!(!after.sidebar_open);
        assert_eq!(AppState { sidebar_open: true, ..after.clone() }, before);

        let themed = reduce(after, &Action::CycleTheme);
        assert_eq!(themed.theme, ThemeName::Cupcake);
        let themed = reduce(themed, &Action::SetTheme(ThemeName::Lofi));
        assert_eq!(themed.theme, ThemeName::Lofi);
    }

    #[test]
    fn transitions_are_persisted_and_restored() {
        let store = MemoryStore::default();
        let start = AppState::restore(&store, ThemeName::Pastel);
        assert_eq!(start, AppState::default());

        let next = reduce(start.clone(), &Action::CycleTheme);
        persist_transition(&start, &next, &store);
        let signed_in = reduce(next.clone(), &Action::LoggedIn(ana()));
        persist_transition(&next, &signed_in, &store);

        assert_eq!(store.load(StorageKey::Theme).unwrap(), Some(json!("cupcake")));

        let restored = AppState::restore(&store, ThemeName::Pastel);
        assert_eq!(restored.theme, ThemeName::Cupcake);
        assert_eq!(restored.user, Some(ana()));

        let signed_out = reduce(signed_in.clone(), &Action::Logout);
        persist_transition(&signed_in, &signed_out, &store);
        assert!(store.load(StorageKey::User).unwrap().is_none());
    }

    #[test]
    fn restore_falls_back_when_storage_fails() {
        let restored = AppState::restore(&BrokenStore, ThemeName::Lofi);
        assert_eq!(restored.theme, ThemeName::Lofi);
        assert!(restored.user.is_none());

        // Must not panic.
        let next = reduce(restored.clone(), &Action::LoggedIn(ana()));
        persist_transition(&restored, &next, &BrokenStore);
    }
}
