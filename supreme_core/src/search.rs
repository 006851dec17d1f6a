// Query-driven product search with suggestions

use crate::catalog::Catalog;
use crate::models::{Category, Product};
use crate::scheduler::{Scheduler, TaskId};
use crate::settings::Settings;
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const SEARCH_TASK: &str = "search";

/// Heading of the suggestion panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Popular,
    Matches,
}

impl SuggestionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SuggestionKind::Popular => "Produtos populares",
            SuggestionKind::Matches => "Sugestões",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestions {
    pub kind: SuggestionKind,
    pub title: &'static str,
    pub products: Vec<Product>,
}

/// Result of a completed search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// Nothing matched; `hints` are the category names to suggest instead
    Empty { query: String, hints: Vec<&'static str> },
    Results { query: String, products: Vec<Product> },
}

impl SearchOutcome {
    pub fn query(&self) -> &str {
        match self {
            SearchOutcome::Empty { query, .. } | SearchOutcome::Results { query, .. } => query,
        }
    }
}

/// Outcome of starting a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteStatus {
    /// The query was too short; nothing was started
    TooShort { message: String },
    /// Results will be resolved when the task fires
    Pending(TaskId),
}

/// Receives non-empty result sets (results page renderer or a redirect)
pub trait ResultsSink {
    fn deliver(&mut self, query: &str, results: &[Product]);
}

/// Search over the catalog.
///
/// `execute` simulates request latency through a cancelable task: while it is
/// pending `is_loading` is true, and a newer `execute` replaces the older one.
pub struct Search {
    catalog: Arc<Catalog>,
    min_query_chars: usize,
    suggestion_limit: usize,
    latency: Duration,
    results_page: String,
    loading: bool,
    tasks: Scheduler<String>,
}

impl Search {
    pub fn new(catalog: Arc<Catalog>, settings: &Settings) -> Self {
        Self {
            catalog,
            min_query_chars: settings.min_query_chars,
            suggestion_limit: settings.suggestion_limit,
            latency: settings.search_latency(),
            results_page: settings.results_page.clone(),
            loading: false,
            tasks: Scheduler::new(),
        }
    }

    /// Popular products for an empty query, otherwise the first matches
    pub fn suggest(&self, query: &str) -> Suggestions {
        let query = query.trim();
        let (kind, products) = if query.is_empty() {
            (SuggestionKind::Popular, self.catalog.first(self.suggestion_limit).to_vec())
        } else {
            let matches = self
                .catalog
                .search(query)
                .into_iter()
                .take(self.suggestion_limit)
                .cloned()
                .collect();
            (SuggestionKind::Matches, matches)
        };
        Suggestions {
            kind,
            title: kind.title(),
            products,
        }
    }

    pub fn too_short_message(&self) -> String {
        format!("Digite pelo menos {} caracteres para buscar", self.min_query_chars)
    }

    /// Whether a (trimmed) query is long enough to run
    pub fn accepts(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_chars
    }

    /// Start a search. Short queries are rejected without touching the
    /// loading state.
    pub fn execute(&mut self, query: &str) -> ExecuteStatus {
        if !self.accepts(query) {
            return ExecuteStatus::TooShort {
                message: self.too_short_message(),
            };
        }
        let query = query.trim().to_string();
        info!("Searching for {:?}", query);
        self.loading = true;
        ExecuteStatus::Pending(self.tasks.schedule_keyed(SEARCH_TASK, self.latency, query))
    }

    /// Resolve immediately, skipping the simulated latency
    pub fn execute_now(&self, query: &str) -> Result<SearchOutcome, String> {
        if !self.accepts(query) {
            return Err(self.too_short_message());
        }
        Ok(self.resolve(query.trim()))
    }

    /// Advance the search clock, returning completed searches
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SearchOutcome> {
        let fired = self.tasks.advance(elapsed);
        if !fired.is_empty() && !self.tasks.is_key_pending(SEARCH_TASK) {
            self.loading = false;
        }
        fired.iter().map(|q| self.resolve(q)).collect()
    }

    /// Drop a pending search
    pub fn cancel(&mut self) {
        self.tasks.cancel_all();
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }

    fn resolve(&self, query: &str) -> SearchOutcome {
        let products: Vec<Product> = self.catalog.search(query).into_iter().cloned().collect();
        debug!("Search {:?} matched {} products", query, products.len());
        if products.is_empty() {
            SearchOutcome::Empty {
                query: query.to_string(),
                hints: Category::ALL.iter().map(|c| c.label()).collect(),
            }
        } else {
            SearchOutcome::Results {
                query: query.to_string(),
                products,
            }
        }
    }

    /// Deep link to the results page, e.g. `pages/search.html?q=whey+growth`
    pub fn results_url(&self, query: &str) -> String {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .finish();
        format!("{}?{}", self.results_page, params)
    }

    pub fn results_page(&self) -> &str {
        &self.results_page
    }
}

/// Extract the `q` parameter from a location query string (`?q=...`)
pub fn query_from_location(search: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .filter(|q| !q.trim().is_empty())
}

/// Page title for a results page
pub fn results_title(query: &str) -> String {
    format!("Busca: {} - Supreme Nutrition", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> Search {
        Search::new(Arc::new(Catalog::seeded()), &Settings::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_suggest_empty_is_popular() {
        let s = search().suggest("   ");
        assert_eq!(s.kind, SuggestionKind::Popular);
        assert_eq!(s.title, "Produtos populares");
        let ids: Vec<_> = s.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["whey-1", "whey-2", "whey-3", "whey-4", "whey-5"]);
    }

    #[test]
    fn test_suggest_truncates_to_five_in_catalog_order() {
        let s = search().suggest("whey");
        assert_eq!(s.kind, SuggestionKind::Matches);
        assert_eq!(s.title, "Sugestões");
        assert_eq!(s.products.len(), 5);
        assert_eq!(s.products[0].id, "whey-1");

        let few = search().suggest("Growth");
        assert_eq!(few.products.len(), 4);
    }

    #[test]
    fn test_execute_short_query_never_starts() {
        let mut s = search();
        match s.execute("a") {
            ExecuteStatus::TooShort { message } => {
                assert_eq!(message, "Digite pelo menos 2 caracteres para buscar")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!s.is_loading());
        assert!(s.advance(ms(1000)).is_empty());

        // trimming applies before the length check
        assert!(matches!(s.execute(" a "), ExecuteStatus::TooShort { .. }));
    }

    #[test]
    fn test_execute_loading_window() {
        let mut s = search();
        assert!(matches!(s.execute("creatina"), ExecuteStatus::Pending(_)));
        assert!(s.is_loading());
        assert!(s.advance(ms(299)).is_empty());
        assert!(s.is_loading());

        let done = s.advance(ms(1));
        assert!(!s.is_loading());
        match &done[..] {
            [SearchOutcome::Results { query, products }] => {
                assert_eq!(query, "creatina");
                assert_eq!(products.len(), 4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_newer_execute_replaces_pending() {
        let mut s = search();
        s.execute("whey");
        s.advance(ms(200));
        s.execute("darkness");
        let done = s.advance(ms(150));
        assert!(done.is_empty());
        assert!(s.is_loading());
        let done = s.advance(ms(150));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].query(), "darkness");
    }

    #[test]
    fn test_empty_outcome_lists_categories() {
        let outcome = search().execute_now("xyz").unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Empty {
                query: "xyz".to_string(),
                hints: vec!["Whey Protein", "Creatina", "Pré-Treino"],
            }
        );
    }

    #[test]
    fn test_cancel_clears_loading() {
        let mut s = search();
        s.execute("whey");
        s.cancel();
        assert!(!s.is_loading());
        assert!(s.advance(ms(500)).is_empty());
    }

    #[test]
    fn test_results_url_round_trip() {
        let s = search();
        let url = s.results_url("pré treino & café");
        assert!(url.starts_with("pages/search.html?q="));
        let (_, qs) = url.split_once('?').unwrap();
        assert_eq!(query_from_location(qs).as_deref(), Some("pré treino & café"));
        assert_eq!(query_from_location("?page=2"), None);
        assert_eq!(results_title("whey"), "Busca: whey - Supreme Nutrition");
    }
}
