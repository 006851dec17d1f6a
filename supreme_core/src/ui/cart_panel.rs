// Cart sidebar state: open/closed and the per-product "added" affordance

use crate::scheduler::Scheduler;
use crate::settings::Settings;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

const AUTO_OPEN: &str = "auto-open";

pub const ADD_LABEL: &str = "Adicionar ao Carrinho";
pub const ADDED_LABEL: &str = "Adicionado!";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PanelTask {
    Open,
    ClearFeedback(String),
}

/// What changed while the panel clock advanced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum PanelEvent {
    Opened,
    FeedbackCleared(String),
}

pub struct CartPanel {
    open: bool,
    feedback: BTreeSet<String>,
    auto_open_delay: Duration,
    feedback_for: Duration,
    tasks: Scheduler<PanelTask>,
}

impl CartPanel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            open: false,
            feedback: BTreeSet::new(),
            auto_open_delay: settings.cart_auto_open_delay(),
            feedback_for: settings.cart_feedback(),
            tasks: Scheduler::new(),
        }
    }

    /// A product was just added: flag its button and queue the auto-open.
    /// Re-adding restarts both windows.
    pub fn on_added(&mut self, product_id: &str) {
        self.feedback.insert(product_id.to_string());
        self.tasks.schedule_keyed(
            feedback_key(product_id),
            self.feedback_for,
            PanelTask::ClearFeedback(product_id.to_string()),
        );
        self.tasks
            .schedule_keyed(AUTO_OPEN, self.auto_open_delay, PanelTask::Open);
    }

    pub fn open(&mut self) {
        self.tasks.cancel_key(AUTO_OPEN);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.tasks.cancel_key(AUTO_OPEN);
        self.open = false;
    }

    /// Close and forget every pending timer and affordance
    pub fn reset(&mut self) {
        self.tasks.cancel_all();
        self.feedback.clear();
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_auto_open_pending(&self) -> bool {
        self.tasks.is_key_pending(AUTO_OPEN)
    }

    pub fn shows_feedback(&self, product_id: &str) -> bool {
        self.feedback.contains(product_id)
    }

    /// Label for the add-to-cart button of `product_id`
    pub fn button_label(&self, product_id: &str) -> &'static str {
        if self.shows_feedback(product_id) {
            ADDED_LABEL
        } else {
            ADD_LABEL
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<PanelEvent> {
        self.tasks
            .advance(elapsed)
            .into_iter()
            .map(|task| match task {
                PanelTask::Open => {
                    self.open = true;
                    PanelEvent::Opened
                }
                PanelTask::ClearFeedback(id) => {
                    self.feedback.remove(&id);
                    PanelEvent::FeedbackCleared(id)
                }
            })
            .collect()
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }
}

fn feedback_key(product_id: &str) -> String {
    format!("feedback:{}", product_id)
}
