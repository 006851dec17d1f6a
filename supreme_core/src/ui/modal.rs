// Modal dialogs registered by element id

use log::debug;
use std::collections::BTreeMap;

pub const LOGIN_MODAL: &str = "login-modal";
pub const REGISTER_MODAL: &str = "register-modal";

/// Open/closed state of every registered modal. Operations on ids that were
/// never registered are ignored.
#[derive(Debug, Default)]
pub struct ModalManager {
    modals: BTreeMap<String, bool>,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a modal (closed). Registering twice keeps the current state.
    pub fn register(&mut self, id: &str) {
        self.modals.entry(id.to_string()).or_insert(false);
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.modals.contains_key(id)
    }

    /// Returns true if the modal went from closed to open
    pub fn open(&mut self, id: &str) -> bool {
        self.set(id, true)
    }

    /// Returns true if the modal went from open to closed
    pub fn close(&mut self, id: &str) -> bool {
        self.set(id, false)
    }

    pub fn close_all(&mut self) {
        for open in self.modals.values_mut() {
            *open = false;
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.modals.get(id).copied().unwrap_or(false)
    }

    /// Whether any modal is open (the body gets `modal-open`)
    pub fn any_open(&self) -> bool {
        self.modals.values().any(|open| *open)
    }

    pub fn open_ids(&self) -> Vec<&str> {
        self.modals
            .iter()
            .filter(|(_, open)| **open)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Escape closes every open modal
    pub fn on_escape(&mut self) {
        self.close_all();
    }

    /// A click that landed on the backdrop itself (not the dialog) closes it
    pub fn on_backdrop_click(&mut self, id: &str) -> bool {
        self.close(id)
    }

    fn set(&mut self, id: &str, open: bool) -> bool {
        match self.modals.get_mut(id) {
            Some(state) if *state != open => {
                *state = open;
                debug!("Modal {} {}", id, if open { "opened" } else { "closed" });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_idempotent() {
        let mut modals = ModalManager::new();
        modals.register(LOGIN_MODAL);
        assert!(modals.open(LOGIN_MODAL));
        assert!(!modals.open(LOGIN_MODAL));
        assert!(modals.any_open());
        assert!(modals.close(LOGIN_MODAL));
        assert!(!modals.close(LOGIN_MODAL));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut modals = ModalManager::new();
        assert!(!modals.open("nope"));
        assert!(!modals.is_open("nope"));
    }

    #[test]
    fn test_escape_and_backdrop() {
        let mut modals = ModalManager::new();
        modals.register(LOGIN_MODAL);
        modals.register(REGISTER_MODAL);
        modals.open(LOGIN_MODAL);
        modals.open(REGISTER_MODAL);
        assert_eq!(modals.open_ids(), vec![LOGIN_MODAL, REGISTER_MODAL]);
        modals.on_escape();
        assert!(!modals.any_open());

        modals.open(REGISTER_MODAL);
        assert!(modals.on_backdrop_click(REGISTER_MODAL));
        assert!(!modals.is_open(REGISTER_MODAL));
    }
}
