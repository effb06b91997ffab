//! Conversational disambiguation flow.
//!
//! A transport adapter (chat bot, inline query handler, test console)
//! maps its own updates (text messages, button presses, commands) onto
//! [`DialogEvent`]s and renders the returned [`DialogAction`]s. The flow
//! itself never sees the transport: it only talks to the aggregators, the
//! title index, the chart renderer, and the operator notifier.

pub mod render;

use std::sync::Arc;

use crate::aggregate::{HistoryAggregator, PriceAggregator};
use crate::chart::ChartRenderer;
use crate::error::SeekerError;
use crate::matching::{find_matches, MatchResult, TitleIndex};
use crate::notify::OperatorNotifier;
use crate::store::CatalogStore;
use crate::types::{MatchCandidate, PriceSnapshot};

/// Candidate list page size before the "show more" affordance kicks in.
pub const LIST_PAGE_SIZE: usize = 3;

/// Per-conversation dialog state. Long-lived; no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Default: free text is a search query.
    Searching,
    /// A report command was issued; the next free text goes to the
    /// operator channel.
    AwaitingReport,
}

/// Transport-agnostic input events.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// Search session start; refreshes the title index.
    Start,
    /// Free-text message.
    Query(String),
    /// Selection of a candidate game id (button press).
    Select(i64),
    /// "Show more" expansion for a previously shown query.
    ShowMore(String),
    /// History request for a game id.
    ShowHistory(i64),
    /// Report command.
    Report,
    /// Cancel command.
    Cancel,
    /// Anything the adapter could not map.
    Unrecognized,
}

/// Structured output of one dialog step, rendered by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    /// Consolidated price view for one game, vendors ascending by price.
    /// The game id doubles as the affordance for a history request.
    Detail {
        game_id: i64,
        snapshots: Vec<(String, PriceSnapshot)>,
    },
    /// Selectable candidate list. `expandable` carries the query to
    /// replay when the user asks for the rest of the list.
    CandidateList {
        candidates: Vec<MatchCandidate>,
        expandable: Option<String>,
    },
    /// Nothing matched directly; bounded fuzzy suggestions instead.
    NoMatch { suggestions: Vec<MatchCandidate> },
    /// Rendered history chart for one game.
    Chart { game_id: i64, image: Vec<u8> },
    /// Session started; invite the user to search.
    Greeting,
    /// Ask the user to describe their problem.
    ReportPrompt,
    /// Report delivered to the operator channel.
    ReportForwarded,
    /// Report entry cancelled, back to searching.
    ReportCancelled,
    /// Unrecognized input; list the available commands.
    Help,
    /// Explicit "not found" message.
    NotFound,
    /// A data source could not be reached.
    Unavailable(String),
}

/// Collaborators one dialog session talks to. Shared across sessions.
pub struct DialogServices {
    pub store: Arc<dyn CatalogStore>,
    pub prices: PriceAggregator,
    pub history: HistoryAggregator,
    pub index: Arc<TitleIndex>,
    pub charts: Arc<dyn ChartRenderer>,
    pub notifier: Arc<dyn OperatorNotifier>,
}

/// One conversation's disambiguation state machine.
///
/// State is owned exclusively by the conversation; the adapter keeps one
/// session per chat/peer and never shares it.
pub struct DialogSession {
    state: DialogState,
    services: Arc<DialogServices>,
}

impl DialogSession {
    pub fn new(services: Arc<DialogServices>) -> Self {
        Self {
            state: DialogState::Searching,
            services,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Advance the state machine by one event.
    ///
    /// Never returns an error: aggregation failures become `NotFound` /
    /// `Unavailable` actions and matching degrades to the bounded
    /// fallback, so the adapter always has something to render.
    pub async fn handle(&mut self, event: DialogEvent) -> DialogAction {
        match (self.state, event) {
            (DialogState::Searching, DialogEvent::Start) => {
                // Explicit refresh trigger; a failure keeps the previous
                // snapshot and the session stays usable.
                match self.services.index.refresh(self.services.store.as_ref()).await {
                    Ok(count) => log::debug!("✅ Title index refreshed ({} titles)", count),
                    Err(e) => log::warn!("⚠️  Title refresh failed: {}", e),
                }
                DialogAction::Greeting
            }
            (DialogState::Searching, DialogEvent::Query(query)) => self.search(&query).await,
            (DialogState::Searching, DialogEvent::Select(game_id)) => self.detail(game_id).await,
            (DialogState::Searching, DialogEvent::ShowMore(query)) => self.show_more(&query),
            (DialogState::Searching, DialogEvent::ShowHistory(game_id)) => {
                self.history_chart(game_id).await
            }
            (DialogState::Searching, DialogEvent::Report) => {
                self.state = DialogState::AwaitingReport;
                DialogAction::ReportPrompt
            }
            (DialogState::AwaitingReport, DialogEvent::Query(text)) => {
                // Fire-and-forget: delivery problems are the collaborator's
                // concern, the user goes back to searching either way.
                if let Err(e) = self.services.notifier.notify(&text).await {
                    log::warn!("⚠️  Operator notification failed: {}", e);
                }
                self.state = DialogState::Searching;
                DialogAction::ReportForwarded
            }
            (DialogState::AwaitingReport, DialogEvent::Cancel) => {
                self.state = DialogState::Searching;
                DialogAction::ReportCancelled
            }
            // Everything else is unrecognized in its state; say so and
            // stay put.
            _ => DialogAction::Help,
        }
    }

    /// Free-text query in `Searching`: exact-match shortcut, capped list,
    /// or no-match suggestions.
    async fn search(&mut self, query: &str) -> DialogAction {
        let snapshot = self.services.index.snapshot();

        match find_matches(query, &snapshot) {
            MatchResult::Direct(candidates) => {
                // Exact-match shortcut: a top candidate whose title equals
                // the raw query is a confident single answer.
                if candidates[0].title == query {
                    return self.detail(candidates[0].game_id).await;
                }

                let expandable = if candidates.len() > LIST_PAGE_SIZE {
                    Some(query.to_string())
                } else {
                    None
                };
                let mut page = candidates;
                page.truncate(LIST_PAGE_SIZE);

                DialogAction::CandidateList {
                    candidates: page,
                    expandable,
                }
            }
            MatchResult::Fallback(suggestions) => DialogAction::NoMatch { suggestions },
        }
    }

    /// "Show more" recomputes the full match list for the same query.
    /// Idempotent: matching is pure over the current snapshot, there is
    /// no server-side pagination state to continue.
    fn show_more(&self, query: &str) -> DialogAction {
        let snapshot = self.services.index.snapshot();
        match find_matches(query, &snapshot) {
            MatchResult::Direct(candidates) => DialogAction::CandidateList {
                candidates,
                expandable: None,
            },
            MatchResult::Fallback(suggestions) => DialogAction::NoMatch { suggestions },
        }
    }

    async fn detail(&self, game_id: i64) -> DialogAction {
        match self.services.prices.aggregate(game_id).await {
            Ok(snapshots) => {
                // Cheapest offer first; vendor name breaks price ties so
                // the order is stable across calls.
                let mut snapshots: Vec<(String, PriceSnapshot)> = snapshots.into_iter().collect();
                snapshots.sort_by(|a, b| {
                    a.1.price
                        .partial_cmp(&b.1.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.0.cmp(&b.0))
                });
                DialogAction::Detail { game_id, snapshots }
            }
            Err(SeekerError::NotFound) => DialogAction::NotFound,
            Err(e) => DialogAction::Unavailable(e.to_string()),
        }
    }

    async fn history_chart(&self, game_id: i64) -> DialogAction {
        let series = match self.services.history.history(game_id).await {
            Ok(series) => series,
            Err(SeekerError::NotFound) => return DialogAction::NotFound,
            Err(e) => return DialogAction::Unavailable(e.to_string()),
        };

        match self.services.charts.render(&series).await {
            Ok(image) => DialogAction::Chart { game_id, image },
            Err(e) => DialogAction::Unavailable(e.to_string()),
        }
    }
}
