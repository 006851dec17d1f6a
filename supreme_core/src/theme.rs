// Light/dark theme preference

use crate::models::Theme;
use crate::storage_trait::{keys, StorageBackend};
use log::{info, warn};
use std::sync::Arc;

/// Tracks the active theme. Until the user picks one explicitly the theme
/// follows the system colour scheme and nothing is written to storage.
pub struct ThemeManager<S> {
    store: Arc<S>,
    current: Theme,
    explicit: bool,
}

impl<S: StorageBackend> ThemeManager<S> {
    pub fn load(store: Arc<S>, system_prefers_dark: bool) -> Self {
        let stored = match store.get_raw(keys::THEME) {
            Ok(raw) => raw.as_deref().and_then(Theme::parse),
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                None
            }
        };
        let (current, explicit) = match stored {
            Some(theme) => (theme, true),
            None => (Theme::from_system(system_prefers_dark), false),
        };
        Self {
            store,
            current,
            explicit,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Whether the theme came from a stored user choice
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }

    /// Apply and persist a user choice
    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        self.explicit = true;
        if let Err(e) = self.store.set_raw(keys::THEME, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        }
        info!("Theme set to {}", theme);
        theme
    }

    /// React to a system colour-scheme change. Ignored once the user has
    /// chosen a theme. Returns the theme now in effect.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> Theme {
        if !self.explicit {
            self.current = Theme::from_system(prefers_dark);
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_trait::MemoryStorage;

    #[test]
    fn test_defaults_to_system_preference() {
        let store = Arc::new(MemoryStorage::new());
        assert_eq!(ThemeManager::load(store.clone(), true).current(), Theme::Dark);
        assert_eq!(ThemeManager::load(store.clone(), false).current(), Theme::Light);
        assert!(store.get_raw(keys::THEME).unwrap().is_none());
    }

    #[test]
    fn test_toggle_persists() {
        let store = Arc::new(MemoryStorage::new());
        let mut themes = ThemeManager::load(store.clone(), false);
        assert_eq!(themes.toggle(), Theme::Dark);
        assert_eq!(store.get_raw(keys::THEME).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeManager::load(store, false);
        assert_eq!(reloaded.current(), Theme::Dark);
        assert!(reloaded.is_explicit());
    }

    #[test]
    fn test_system_change_only_when_not_explicit() {
        let store = Arc::new(MemoryStorage::new());
        let mut themes = ThemeManager::load(store, false);
        assert_eq!(themes.on_system_change(true), Theme::Dark);
        themes.set(Theme::Light);
        assert_eq!(themes.on_system_change(true), Theme::Light);
    }

    #[test]
    fn test_json_encoded_and_garbage_values() {
        let store = Arc::new(MemoryStorage::new());
        store.set_raw(keys::THEME, "\"dark\"").unwrap();
        assert_eq!(ThemeManager::load(store.clone(), false).current(), Theme::Dark);

        store.set_raw(keys::THEME, "sepia").unwrap();
        let themes = ThemeManager::load(store, true);
        assert_eq!(themes.current(), Theme::Dark);
        assert!(!themes.is_explicit());
    }
}
