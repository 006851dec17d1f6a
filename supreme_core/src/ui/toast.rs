// Transient notification surface
// Holds at most one toast and drives its show/hide lifecycle on the scheduler

use crate::scheduler::Scheduler;
use crate::settings::Settings;
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// Severity or icon of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
    Favorite,
    Unfavorite,
}

impl ToastKind {
    /// Material symbol rendered next to the message
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "check_circle",
            ToastKind::Error => "error",
            ToastKind::Favorite => "favorite",
            ToastKind::Unfavorite => "favorite_border",
        }
    }

    /// Favorites toasts fade in after a short delay; notifications show at once
    pub fn is_favorites_toast(&self) -> bool {
        matches!(self, ToastKind::Favorite | ToastKind::Unfavorite)
    }
}

/// Fire-and-forget sink for user-facing messages
pub trait Notifier {
    fn show(&mut self, message: &str, kind: ToastKind);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    /// Mounted but not yet visible
    Pending,
    Visible,
    /// Fading out, removed once the removal delay elapses
    Hiding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub phase: ToastPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Show,
    Hide,
    Remove,
}

pub struct ToastSurface {
    show_delay: Duration,
    visible_until: Duration,
    removal: Duration,
    notification_visible: Duration,
    current: Option<Toast>,
    tasks: Scheduler<Step>,
}

impl ToastSurface {
    pub fn new(settings: &Settings) -> Self {
        Self {
            show_delay: Duration::from_millis(settings.toast_show_delay_ms),
            visible_until: Duration::from_millis(settings.toast_visible_ms),
            removal: Duration::from_millis(settings.toast_removal_ms),
            notification_visible: Duration::from_millis(settings.notification_visible_ms),
            current: None,
            tasks: Scheduler::new(),
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        matches!(&self.current, Some(t) if t.phase == ToastPhase::Visible)
    }

    /// Close button: remove immediately and drop pending steps
    pub fn dismiss(&mut self) {
        self.tasks.cancel_all();
        self.current = None;
    }

    /// Apply due lifecycle steps. Returns whether the toast changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let steps = self.tasks.advance(elapsed);
        let changed = !steps.is_empty();
        for step in steps {
            match step {
                Step::Show => self.set_phase(ToastPhase::Visible),
                Step::Hide => self.set_phase(ToastPhase::Hiding),
                Step::Remove => self.current = None,
            }
        }
        changed
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }

    fn set_phase(&mut self, phase: ToastPhase) {
        if let Some(toast) = self.current.as_mut() {
            toast.phase = phase;
        }
    }
}

impl Notifier for ToastSurface {
    /// Replace whatever is on screen. Timers of the replaced toast are
    /// cancelled so they cannot hide the new one.
    fn show(&mut self, message: &str, kind: ToastKind) {
        self.tasks.cancel_all();
        debug!("Toast ({:?}): {}", kind, message);
        let phase = if kind.is_favorites_toast() {
            self.tasks.schedule(self.show_delay, Step::Show);
            self.tasks.schedule(self.visible_until, Step::Hide);
            self.tasks.schedule(self.visible_until + self.removal, Step::Remove);
            ToastPhase::Pending
        } else {
            self.tasks.schedule(self.notification_visible, Step::Remove);
            ToastPhase::Visible
        };
        self.current = Some(Toast {
            message: message.to_string(),
            kind,
            phase,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn phase(surface: &ToastSurface) -> Option<ToastPhase> {
        surface.current().map(|t| t.phase)
    }

    #[test]
    fn test_favorite_toast_timeline() {
        let mut surface = ToastSurface::new(&Settings::default());
        surface.show("Produto adicionado aos favoritos!", ToastKind::Favorite);
        assert_eq!(phase(&surface), Some(ToastPhase::Pending));

        surface.advance(ms(99));
        assert!(!surface.is_visible());
        surface.advance(ms(1));
        assert!(surface.is_visible());

        surface.advance(ms(2899));
        assert!(surface.is_visible());
        surface.advance(ms(1));
        assert_eq!(phase(&surface), Some(ToastPhase::Hiding));

        surface.advance(ms(300));
        assert!(surface.current().is_none());
        assert_eq!(surface.next_due_in(), None);
    }

    #[test]
    fn test_second_toast_replaces_first() {
        let mut surface = ToastSurface::new(&Settings::default());
        surface.show("Produto adicionado aos favoritos!", ToastKind::Favorite);
        surface.advance(ms(2000));
        surface.show("Produto removido dos favoritos", ToastKind::Unfavorite);

        // the first toast's hide at 3 s must not touch the new one
        surface.advance(ms(1500));
        let toast = surface.current().unwrap();
        assert_eq!(toast.message, "Produto removido dos favoritos");
        assert_eq!(toast.phase, ToastPhase::Visible);

        surface.advance(ms(1800));
        assert!(surface.current().is_none());
    }

    #[test]
    fn test_notification_shows_immediately_for_five_seconds() {
        let mut surface = ToastSurface::new(&Settings::default());
        surface.show("Login realizado com sucesso!", ToastKind::Success);
        assert!(surface.is_visible());
        surface.advance(ms(4999));
        assert!(surface.is_visible());
        surface.advance(ms(1));
        assert!(surface.current().is_none());
    }

    #[test]
    fn test_dismiss() {
        let mut surface = ToastSurface::new(&Settings::default());
        surface.show("x", ToastKind::Error);
        surface.dismiss();
        assert!(surface.current().is_none());
        assert!(!surface.advance(ms(10_000)));
    }
}
