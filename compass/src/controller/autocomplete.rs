//! Debounced autocomplete
//!
//! Every keystroke shows an echo of the raw input and restarts the debounce
//! timer. When the timer fires the title list is fetched and each title is
//! enriched with its summary. Results carry the generation they were started
//! for and are dropped if the input moved on in the meantime.

use compass_common::FetchResult;
use futures_util::future::join_all;

use super::Command;
use crate::backends::{SuggestBackend, SummaryBackend};
use crate::types::Suggestion;

/// Suggestion state behind the search input
#[derive(Debug, Default)]
pub struct Autocomplete {
    input: String,
    suggestions: Vec<Suggestion>,
    generation: u64,
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A keystroke. Shows the echo entry and (re)starts the debounce timer.
    pub fn on_input(&mut self, value: &str) -> Command {
        self.input = value.to_string();
        self.suggestions = if value.is_empty() {
            Vec::new()
        } else {
            vec![Suggestion::plain(value)]
        };
        self.generation += 1;

        Command::ScheduleSuggestions {
            generation: self.generation,
        }
    }

    /// Overwrite the input without suggesting (location changed)
    pub fn sync_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    /// The debounce timer for `generation` fired
    pub fn on_debounce_elapsed(&mut self, generation: u64) -> Option<Command> {
        if generation != self.generation {
            return None;
        }

        if self.input.is_empty() {
            self.suggestions.clear();
            return None;
        }

        Some(Command::FetchSuggestions {
            input: self.input.clone(),
            generation,
        })
    }

    /// Apply fetched suggestions. A top-level failure clears the list.
    pub fn on_suggestions(&mut self, generation: u64, result: FetchResult<Vec<Suggestion>>) {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "discarding stale suggestions");
            return;
        }

        match result {
            Ok(enriched) => {
                let raw = self.input.to_lowercase();
                let mut list = Vec::with_capacity(enriched.len() + 1);
                list.push(Suggestion::plain(self.input.clone()));
                list.extend(
                    enriched
                        .into_iter()
                        .filter(|s| s.title.to_lowercase() != raw),
                );
                self.suggestions = list;
            }
            Err(e) => {
                tracing::debug!(error = %e, "suggestion fetch failed");
                self.suggestions.clear();
            }
        }
    }

    /// Hide suggestions and invalidate anything in flight
    pub fn dismiss(&mut self) -> Command {
        self.suggestions.clear();
        self.generation += 1;
        Command::CancelSuggestions
    }

    /// Empty the input box
    pub fn clear(&mut self) -> Command {
        self.input.clear();
        self.dismiss()
    }

    /// Title of the suggestion at `index`
    pub fn title_at(&self, index: usize) -> Option<String> {
        self.suggestions.get(index).map(|s| s.title.clone())
    }
}

/// Fetch titles for `input` and enrich each one concurrently.
///
/// A per-title summary failure degrades that entry to its bare title; only a
/// failure of the title fetch itself is returned as an error.
pub async fn fetch_suggestions(
    suggest: &dyn SuggestBackend,
    summary: &dyn SummaryBackend,
    input: &str,
) -> FetchResult<Vec<Suggestion>> {
    let titles = suggest.titles(input).await?;

    let enriched = join_all(titles.into_iter().map(|title| async move {
        match summary.summary(&title).await {
            Ok(Some(s)) => Suggestion {
                img: s.thumb().map(str::to_string),
                desc: s.description,
                title,
            },
            Ok(None) => Suggestion::plain(title),
            Err(e) => {
                tracing::debug!(%title, error = %e, "suggestion enrichment failed");
                Suggestion::plain(title)
            }
        }
    }))
    .await;

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Summary, Thumbnail};
    use async_trait::async_trait;
    use compass_common::FetchError;

    struct Titles(Vec<&'static str>);

    #[async_trait]
    impl SuggestBackend for Titles {
        async fn titles(&self, _input: &str) -> FetchResult<Vec<String>> {
            Ok(self.0.iter().map(|t| t.to_string()).collect())
        }
    }

    struct Offline;

    #[async_trait]
    impl SuggestBackend for Offline {
        async fn titles(&self, _input: &str) -> FetchResult<Vec<String>> {
            Err(FetchError::Unavailable("offline".into()))
        }
    }

    /// Knows "Dog", fails on "Dogecoin", has no page for anything else
    struct Summaries;

    #[async_trait]
    impl SummaryBackend for Summaries {
        async fn summary(&self, title: &str) -> FetchResult<Option<Summary>> {
            match title {
                "Dog" => Ok(Some(Summary {
                    title: "Dog".into(),
                    description: Some("Domesticated mammal".into()),
                    extract: Some("The dog...".into()),
                    thumbnail: Some(Thumbnail {
                        source: "https://img/dog.jpg".into(),
                    }),
                })),
                "Dogecoin" => Err(FetchError::Unavailable("timeout".into())),
                _ => Ok(None),
            }
        }
    }

    fn schedule_generation(cmd: Command) -> u64 {
        match cmd {
            Command::ScheduleSuggestions { generation } => generation,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_keystroke_shows_echo() {
        let mut ac = Autocomplete::new();
        ac.on_input("ca");
        assert_eq!(ac.suggestions(), &[Suggestion::plain("ca")]);
        ac.on_input("");
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn test_only_latest_timer_fetches() {
        let mut ac = Autocomplete::new();
        let first = schedule_generation(ac.on_input("cat"));
        let second = schedule_generation(ac.on_input("cats"));

        assert!(ac.on_debounce_elapsed(first).is_none());
        match ac.on_debounce_elapsed(second) {
            Some(Command::FetchSuggestions { input, generation }) => {
                assert_eq!(input, "cats");
                assert_eq!(generation, second);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_timer_on_empty_input_clears() {
        let mut ac = Autocomplete::new();
        ac.on_input("c");
        let g = schedule_generation(ac.on_input(""));
        assert!(ac.on_debounce_elapsed(g).is_none());
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn test_results_filter_echo_duplicate() {
        let mut ac = Autocomplete::new();
        let g = schedule_generation(ac.on_input("dog"));
        ac.on_suggestions(
            g,
            Ok(vec![Suggestion::plain("Dog"), Suggestion::plain("Dog breeds")]),
        );
        let titles: Vec<&str> = ac.suggestions().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["dog", "Dog breeds"]);
    }

    #[test]
    fn test_failure_clears_suggestions() {
        let mut ac = Autocomplete::new();
        let g = schedule_generation(ac.on_input("dog"));
        ac.on_suggestions(g, Err(FetchError::Unavailable("offline".into())));
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut ac = Autocomplete::new();
        let g = schedule_generation(ac.on_input("do"));
        ac.on_input("dog");
        ac.on_suggestions(g, Ok(vec![Suggestion::plain("Dover")]));
        assert_eq!(ac.suggestions(), &[Suggestion::plain("dog")]);
    }

    #[test]
    fn test_dismiss_invalidates_pending_work() {
        let mut ac = Autocomplete::new();
        let g = schedule_generation(ac.on_input("dog"));
        assert!(matches!(ac.dismiss(), Command::CancelSuggestions));
        assert!(ac.suggestions().is_empty());
        assert!(ac.on_debounce_elapsed(g).is_none());
        ac.on_suggestions(g, Ok(vec![Suggestion::plain("Dog")]));
        assert!(ac.suggestions().is_empty());
        assert_eq!(ac.input(), "dog");

        ac.clear();
        assert_eq!(ac.input(), "");
    }

    #[tokio::test]
    async fn test_enrichment_is_best_effort() {
        let suggestions = fetch_suggestions(
            &Titles(vec!["Dog", "Dogecoin", "Dogma"]),
            &Summaries,
            "dog",
        )
        .await
        .unwrap();

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].img.as_deref(), Some("https://img/dog.jpg"));
        assert_eq!(suggestions[0].desc.as_deref(), Some("Domesticated mammal"));
        assert_eq!(suggestions[1], Suggestion::plain("Dogecoin"));
        assert_eq!(suggestions[2], Suggestion::plain("Dogma"));
    }

    #[tokio::test]
    async fn test_title_failure_is_an_error() {
        let result = fetch_suggestions(&Offline, &Summaries, "dog").await;
        assert!(result.is_err());
    }
}
