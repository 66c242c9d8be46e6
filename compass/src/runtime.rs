//! Command executor
//!
//! [`SearchRuntime`] is the cooperative scheduler around a [`SearchController`]:
//! user actions run synchronously on the controller, the resulting commands are
//! spawned as tokio tasks, and their completions are queued on an unbounded
//! channel and applied one at a time. The debounce timer is the only
//! cancelable task; network requests always run to completion and are
//! filtered by the controller's sequence numbers when they land.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backends::Services;
use crate::controller::autocomplete::fetch_suggestions;
use crate::controller::view::ViewState;
use crate::controller::{Command, Event, SearchController};
use crate::navigation::Navigator;

/// Drives a controller against real (or test) services
pub struct SearchRuntime {
    controller: SearchController,
    services: Services,
    navigator: Arc<dyn Navigator>,
    debounce: Duration,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    /// Pending debounce timer and the generation it was started for
    timer: Option<(u64, JoinHandle<()>)>,
    /// Spawned requests whose completion has not been applied yet
    in_flight: usize,
}

impl SearchRuntime {
    pub fn new(
        controller: SearchController,
        services: Services,
        navigator: Arc<dyn Navigator>,
        debounce: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            services,
            navigator,
            debounce,
            events_tx,
            events_rx,
            timer: None,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn view(&self) -> ViewState {
        self.controller.view()
    }

    /// Whether a request or the debounce timer is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.timer.is_some()
    }

    /// Run a user action against the controller and execute what it asks for
    pub fn act<F>(&mut self, action: F)
    where
        F: FnOnce(&mut SearchController) -> Vec<Command>,
    {
        let commands = action(&mut self.controller);
        self.dispatch(commands);
    }

    /// Wait for the next completion and apply it. Returns false if nothing is outstanding.
    pub async fn step(&mut self) -> bool {
        if !self.is_busy() {
            return false;
        }

        let Some(event) = self.events_rx.recv().await else {
            return false;
        };

        match &event {
            Event::DebounceElapsed { generation } => {
                if matches!(self.timer, Some((g, _)) if g == *generation) {
                    self.timer = None;
                }
            }
            _ => self.in_flight = self.in_flight.saturating_sub(1),
        }

        let commands = self.controller.apply(event);
        self.dispatch(commands);
        true
    }

    /// Apply completions until nothing is outstanding
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Unmount the controller and cancel the debounce timer
    pub fn shutdown(&mut self) {
        self.act(|c| c.unmount());
    }

    fn cancel_timer(&mut self) {
        if let Some((generation, handle)) = self.timer.take() {
            tracing::debug!(generation, "debounce timer canceled");
            handle.abort();
        }
    }

    fn dispatch(&mut self, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();

        while let Some(command) = queue.pop_front() {
            match command {
                Command::Search {
                    kind,
                    query,
                    cursor,
                    seq,
                } => {
                    let backend = self.services.search.clone();
                    let tx = self.events_tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let result = backend.search(kind, &query, cursor.as_deref()).await;
                        let _ = tx.send(Event::SearchCompleted { kind, seq, result });
                    });
                }
                Command::LookupSummary { query, seq } => {
                    let backend = self.services.summary.clone();
                    let tx = self.events_tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let result = backend.summary(&query).await;
                        let _ = tx.send(Event::SummaryCompleted { seq, result });
                    });
                }
                Command::ScheduleSuggestions { generation } => {
                    self.cancel_timer();
                    let tx = self.events_tx.clone();
                    let delay = self.debounce;
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Event::DebounceElapsed { generation });
                    });
                    self.timer = Some((generation, handle));
                }
                Command::FetchSuggestions { input, generation } => {
                    let suggest = self.services.suggest.clone();
                    let summary = self.services.summary.clone();
                    let tx = self.events_tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let result = fetch_suggestions(&*suggest, &*summary, &input).await;
                        let _ = tx.send(Event::SuggestionsFetched { generation, result });
                    });
                }
                Command::CancelSuggestions => self.cancel_timer(),
                Command::Navigate { path } => {
                    self.navigator.navigate(&path);
                    queue.extend(self.controller.location_changed(&path));
                }
            }
        }
    }
}

impl Drop for SearchRuntime {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
