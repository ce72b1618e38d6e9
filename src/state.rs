use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::ActionError;
use crate::matcher::FuzzyMatcher;
use crate::model::{CatalogEntry, QueryResult};
use crate::ranking::rank;
use crate::resolver::TitleResolver;
use crate::worker::ActionWorker;

/// What the launcher keeps between keystrokes.
pub struct Session {
    pub catalog: Arc<Catalog>,
    pub resolver: TitleResolver,
    pub results: Vec<QueryResult>,
    pub selected_index: usize,
    pub query: String,
    pub matcher: FuzzyMatcher,
    pub worker: ActionWorker,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, resolver: TitleResolver, worker: ActionWorker) -> Self {
        Self {
            catalog,
            resolver,
            results: Vec::new(),
            selected_index: 0,
            query: String::new(),
            matcher: FuzzyMatcher::new(),
            worker,
        }
    }

    pub fn update_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.update_results();
    }

    pub fn update_results(&mut self) {
        let mut results = rank(&self.query, &self.catalog, &self.resolver, &mut self.matcher);

        // Ranking keeps catalog order; the launcher shows best matches first.
        // Stable, so equal scores stay in catalog order.
        results.sort_by(|a, b| b.score.cmp(&a.score));
        self.results = results;

        log::info!("Session: query='{}', result_count={}", self.query, self.results.len());
        self.selected_index = 0;
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.results.is_empty() {
            self.selected_index = 0;
            return;
        }

        let len = self.results.len() as i32;
        let new_index = (self.selected_index as i32 + delta).rem_euclid(len);
        self.selected_index = new_index as usize;
    }

    pub fn get_selected(&self) -> Option<(&QueryResult, &CatalogEntry)> {
        let result = self.results.get(self.selected_index)?;
        self.catalog.get(result.entry).map(|entry| (result, entry))
    }

    /// Hands the selected entry's action to the worker and returns right away.
    pub fn trigger_selected(&self) -> Result<(), ActionError> {
        let (result, entry) = self
            .get_selected()
            .ok_or_else(|| ActionError::UnknownEntry(self.query.clone()))?;

        log::info!("Session: triggering '{}' ({})", result.title, entry.key);
        self.worker.submit(entry.action.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Session;
    use crate::catalog::Catalog;
    use crate::config::Environment;
    use crate::diagnostics::CollectingSink;
    use crate::executor::tests::{context, Recorder};
    use crate::i18n::{Locale, Translations};
    use crate::model::ShutdownStep;
    use crate::resolver::TitleResolver;
    use crate::worker::ActionWorker;

    fn session(recorder: Arc<Recorder>) -> Session {
        let translations = Translations::new(Locale::Fr);
        let steps = vec![ShutdownStep::new("shutdown", "/s /t 0")];
        let catalog = Arc::new(Catalog::build(&translations, Environment::Work, steps));
        let resolver = TitleResolver::new(Arc::new(translations), Arc::new(CollectingSink::default()));
        let worker = ActionWorker::spawn(context(recorder, Arc::default()), 4);
        Session::new(catalog, resolver, worker)
    }

    #[test]
    fn results_are_sorted_best_first() {
        let mut session = session(Arc::new(Recorder::default()));
        session.update_query("office lights");

        assert!(!session.results.is_empty());
        assert!(session.results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn empty_query_clears_results() {
        let mut session = session(Arc::new(Recorder::default()));
        session.update_query("hot");
        assert!(!session.results.is_empty());
        session.update_query("");
        assert!(session.results.is_empty());
        assert!(session.get_selected().is_none());
    }

    #[test]
    fn selection_wraps_around() {
        let mut session = session(Arc::new(Recorder::default()));
        session.update_query("outside");
        let len = session.results.len();
        assert!(len >= 3);

        session.move_selection(-1);
        assert_eq!(session.selected_index, len - 1);
        session.move_selection(1);
        assert_eq!(session.selected_index, 0);
    }

    #[test]
    fn french_query_shows_french_title() {
        let mut session = session(Arc::new(Recorder::default()));
        session.update_query("chaud");

        let hot = session
            .results
            .iter()
            .find(|r| session.catalog.entries()[r.entry].key == "office_hot")
            .unwrap();
        assert_eq!(hot.title, "Bureau chaud");
    }

    #[test]
    fn triggering_runs_the_action_on_the_worker() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session(recorder.clone());
        session.update_query("fan toggle");
        assert_eq!(session.get_selected().unwrap().1.key, "fan_toggle");

        session.trigger_selected().unwrap();
        session.worker.shutdown();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("/api/services/switch/toggle"));
    }
}
