// Header search toggle on small screens

use crate::scheduler::Scheduler;
use crate::settings::Settings;
use std::time::Duration;

const FOCUS: &str = "focus";

pub struct MobileSearch {
    active: bool,
    focus_delay: Duration,
    tasks: Scheduler<()>,
}

impl MobileSearch {
    pub fn new(settings: &Settings) -> Self {
        Self {
            active: false,
            focus_delay: Duration::from_millis(settings.mobile_search_focus_ms),
            tasks: Scheduler::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Opening queues a deferred input focus; closing cancels it
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        if self.active {
            self.tasks.schedule_keyed(FOCUS, self.focus_delay, ());
        } else {
            self.tasks.cancel_key(FOCUS);
        }
        self.active
    }

    pub fn on_outside_click(&mut self) {
        self.active = false;
        self.tasks.cancel_key(FOCUS);
    }

    /// Returns true when the input should receive focus now
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        !self.tasks.advance(elapsed).is_empty() && self.active
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }
}
