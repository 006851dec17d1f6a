// Header search box: input text, suggestion panel and transient messages

use crate::models::Product;
use crate::scheduler::Scheduler;
use crate::search::{Search, SearchOutcome, Suggestions};
use crate::settings::Settings;
use serde::Serialize;
use std::time::Duration;

const HIDE: &str = "hide";
const MESSAGE: &str = "message";

/// Content of the dropdown under the search input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PanelContent {
    Suggestions(Suggestions),
    Message { text: String },
    Outcome(SearchOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelVisibility {
    Hidden,
    Visible,
    /// Fade-out in progress; the panel is gone once the hide delay elapses
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxTask {
    Hidden,
    HideMessage,
}

pub struct SearchBox {
    input: String,
    visibility: PanelVisibility,
    content: Option<PanelContent>,
    min_query_chars: usize,
    hide_delay: Duration,
    message_for: Duration,
    tasks: Scheduler<BoxTask>,
}

impl SearchBox {
    pub fn new(settings: &Settings) -> Self {
        Self {
            input: String::new(),
            visibility: PanelVisibility::Hidden,
            content: None,
            min_query_chars: settings.min_query_chars,
            hide_delay: Duration::from_millis(settings.search_panel_hide_ms),
            message_for: Duration::from_millis(settings.search_message_ms),
            tasks: Scheduler::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    /// Typing: long enough queries show matching suggestions, anything
    /// shorter hides the panel
    pub fn on_input(&mut self, search: &Search, value: &str) {
        self.input = value.to_string();
        if value.trim().chars().count() >= self.min_query_chars {
            self.show_suggestions(search.suggest(value));
        } else {
            self.hide();
        }
    }

    /// Focus with an empty input shows popular products
    pub fn on_focus(&mut self, search: &Search) {
        if self.input.trim().is_empty() {
            self.show_suggestions(search.suggest(""));
        } else if self.input.trim().chars().count() >= self.min_query_chars {
            self.show_suggestions(search.suggest(&self.input));
        }
    }

    /// Picking a suggestion fills the input with its name. Returns the query
    /// to execute.
    pub fn select_suggestion(&mut self, product: &Product) -> String {
        self.input = product.name.clone();
        self.hide();
        self.input.clone()
    }

    /// Show a temporary message (e.g. the minimum-length hint)
    pub fn show_message(&mut self, text: &str) {
        self.show(PanelContent::Message {
            text: text.to_string(),
        });
        self.tasks
            .schedule_keyed(MESSAGE, self.message_for, BoxTask::HideMessage);
    }

    /// Show a completed search that stays in the dropdown (the empty state)
    pub fn show_outcome(&mut self, outcome: SearchOutcome) {
        self.show(PanelContent::Outcome(outcome));
    }

    /// Start hiding the panel; it disappears after the hide delay
    pub fn hide(&mut self) {
        self.tasks.cancel_key(MESSAGE);
        if self.visibility == PanelVisibility::Hidden {
            return;
        }
        self.visibility = PanelVisibility::Hiding;
        self.tasks.schedule_keyed(HIDE, self.hide_delay, BoxTask::Hidden);
    }

    /// Drop the panel at once, without the fade
    pub fn reset(&mut self) {
        self.tasks.cancel_all();
        self.visibility = PanelVisibility::Hidden;
        self.content = None;
    }

    /// Click outside the search form
    pub fn on_outside_click(&mut self) {
        self.hide();
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let mut remaining = elapsed;
        // the message timer schedules the hide, so step through due points
        while let Some(fired) = self.tasks.step(&mut remaining) {
            for task in fired {
                match task {
                    BoxTask::HideMessage => self.hide(),
                    BoxTask::Hidden => {
                        self.visibility = PanelVisibility::Hidden;
                        self.content = None;
                    }
                }
            }
        }
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }

    fn show_suggestions(&mut self, suggestions: Suggestions) {
        if suggestions.products.is_empty() {
            self.hide();
        } else {
            self.show(PanelContent::Suggestions(suggestions));
        }
    }

    fn show(&mut self, content: PanelContent) {
        self.tasks.cancel_key(HIDE);
        self.tasks.cancel_key(MESSAGE);
        self.content = Some(content);
        self.visibility = PanelVisibility::Visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::search::SuggestionKind;
    use std::sync::Arc;

    fn setup() -> (Search, SearchBox) {
        let settings = Settings::default();
        (
            Search::new(Arc::new(Catalog::seeded()), &settings),
            SearchBox::new(&settings),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn suggestion_kind(b: &SearchBox) -> Option<SuggestionKind> {
        match b.content() {
            Some(PanelContent::Suggestions(s)) => Some(s.kind),
            _ => None,
        }
    }

    #[test]
    fn test_focus_on_empty_input_shows_popular() {
        let (search, mut b) = setup();
        b.on_focus(&search);
        assert_eq!(b.visibility(), PanelVisibility::Visible);
        assert_eq!(suggestion_kind(&b), Some(SuggestionKind::Popular));
    }

    #[test]
    fn test_input_threshold() {
        let (search, mut b) = setup();
        b.on_input(&search, "wh");
        assert_eq!(suggestion_kind(&b), Some(SuggestionKind::Matches));

        b.on_input(&search, "w");
        assert_eq!(b.visibility(), PanelVisibility::Hiding);
        b.advance(ms(199));
        assert_eq!(b.visibility(), PanelVisibility::Hiding);
        b.advance(ms(1));
        assert_eq!(b.visibility(), PanelVisibility::Hidden);
        assert!(b.content().is_none());
    }

    #[test]
    fn test_no_matches_hides_panel() {
        let (search, mut b) = setup();
        b.on_input(&search, "whey");
        b.on_input(&search, "zzzz");
        assert_eq!(b.visibility(), PanelVisibility::Hiding);
    }

    #[test]
    fn test_typing_during_hide_keeps_panel_open() {
        let (search, mut b) = setup();
        b.on_input(&search, "whey");
        b.on_outside_click();
        b.advance(ms(100));
        b.on_input(&search, "creatina");
        b.advance(ms(500));
        assert_eq!(b.visibility(), PanelVisibility::Visible);
    }

    #[test]
    fn test_message_hides_after_two_seconds() {
        let (_, mut b) = setup();
        b.show_message("Digite pelo menos 2 caracteres para buscar");
        b.advance(ms(1999));
        assert_eq!(b.visibility(), PanelVisibility::Visible);
        b.advance(ms(1));
        assert_eq!(b.visibility(), PanelVisibility::Hiding);
        b.advance(ms(200));
        assert_eq!(b.visibility(), PanelVisibility::Hidden);
    }

    #[test]
    fn test_select_suggestion_fills_input() {
        let (search, mut b) = setup();
        let product = Catalog::seeded().get_by_id("creatina-1").cloned().unwrap();
        b.on_input(&search, "crea");
        let query = b.select_suggestion(&product);
        assert_eq!(query, product.name);
        assert_eq!(b.input(), product.name);
    }
}
