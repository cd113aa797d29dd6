//! Loads the rulebook once and shares it with every caller.
//!
//! At most one load runs at a time. Callers that arrive while a load is in flight wait for it
//! and observe the same result; a failed load leaves the table unset and the next caller
//! retries.

pub(crate) mod parser;
mod source;

pub use source::{FsRuleSource, RuleSection, RuleSource, RuleSourceError};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use super::table::{RuleTable, RuleTableSummary};

/// Failure to produce a complete rule table.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuleLoadError {
    #[error("failed to fetch the {section} rule section: {source}")]
    Fetch {
        section: RuleSection,
        #[source]
        source: Arc<RuleSourceError>,
    },
    #[error("rule loading task failed: {0}")]
    Worker(String),
}

enum LoadState {
    NotStarted,
    Loading,
    Ready,
    Failed { attempt: u64, error: RuleLoadError },
}

struct LoadedRules {
    table: Arc<RuleTable>,
    loaded_at: DateTime<Utc>,
}

/// Externally visible state of the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RuleLoadStatus {
    NotStarted,
    Loading,
    Ready {
        loaded_at: DateTime<Utc>,
        summary: RuleTableSummary,
    },
    Failed {
        attempt: u64,
        error: String,
    },
}

impl RuleLoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, RuleLoadStatus::Ready { .. })
    }
}

pub struct RuleTableLoader<S> {
    source: Arc<S>,
    state: Mutex<LoadState>,
    settled_attempts: AtomicU64,
    loaded: OnceLock<LoadedRules>,
}

impl<S: RuleSource> RuleTableLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Mutex::new(LoadState::NotStarted),
            settled_attempts: AtomicU64::new(0),
            loaded: OnceLock::new(),
        }
    }

    /// Loaded table, or `None` until a load has fully completed.
    pub fn table(&self) -> Option<Arc<RuleTable>> {
        self.loaded.get().map(|loaded| Arc::clone(&loaded.table))
    }

    pub fn status(&self) -> RuleLoadStatus {
        if let Some(loaded) = self.loaded.get() {
            return RuleLoadStatus::Ready {
                loaded_at: loaded.loaded_at,
                summary: loaded.table.summary(),
            };
        }

        match self.state.try_lock() {
            Ok(state) => match &*state {
                LoadState::NotStarted => RuleLoadStatus::NotStarted,
                LoadState::Failed { attempt, error } => RuleLoadStatus::Failed {
                    attempt: *attempt,
                    error: error.to_string(),
                },
                LoadState::Loading | LoadState::Ready => RuleLoadStatus::Loading,
            },
            Err(_) => RuleLoadStatus::Loading,
        }
    }

    /// Loads the table unless it is already loaded, sharing any load already in flight.
    pub async fn ensure_loaded(&self) -> Result<Arc<RuleTable>, RuleLoadError> {
        if let Some(table) = self.table() {
            return Ok(table);
        }

        let observed = self.settled_attempts.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        match &*state {
            LoadState::Ready => {
                if let Some(table) = self.table() {
                    return Ok(table);
                }
            }
            LoadState::Failed { attempt, error } if *attempt > observed => {
                return Err(error.clone());
            }
            _ => {}
        }

        let attempt = self.settled_attempts.load(Ordering::Acquire) + 1;
        *state = LoadState::Loading;
        tracing::info!(attempt, "loading exalted rule table");

        let source = Arc::clone(&self.source);
        let outcome = match tokio::task::spawn_blocking(move || read_rule_table(source.as_ref()))
            .await
        {
            Ok(result) => result,
            Err(join_error) => Err(RuleLoadError::Worker(join_error.to_string())),
        };

        let result = match outcome {
            Ok(table) => {
                let table = Arc::new(table);
                let summary = table.summary();
                let _ = self.loaded.set(LoadedRules {
                    table: Arc::clone(&table),
                    loaded_at: Utc::now(),
                });
                *state = LoadState::Ready;
                tracing::info!(attempt, ?summary, "exalted rule table ready");
                Ok(table)
            }
            Err(error) => {
                tracing::warn!(attempt, %error, "exalted rule table failed to load");
                *state = LoadState::Failed {
                    attempt,
                    error: error.clone(),
                };
                Err(error)
            }
        };

        self.settled_attempts.store(attempt, Ordering::Release);
        result
    }
}

fn fetch<S: RuleSource>(source: &S, section: RuleSection) -> Result<String, RuleLoadError> {
    source
        .fetch(section)
        .map_err(|error| RuleLoadError::Fetch {
            section,
            source: Arc::new(error),
        })
}

/// Fetches and parses every section. Malformed rows are skipped by the parsers.
pub(crate) fn read_rule_table<S: RuleSource>(source: &S) -> Result<RuleTable, RuleLoadError> {
    let mut builder = RuleTable::builder();

    for section in RuleSection::ALL {
        let text = fetch(source, section)?;
        let label = section.label();
        builder = match section {
            RuleSection::SetBonuses => builder.set_bonuses(parser::parse_set_bonuses(label, &text)),
            RuleSection::Banned => builder.banned(parser::parse_item_list(label, &text)),
            RuleSection::Penalties => builder.penalties(parser::parse_item_list(label, &text)),
            RuleSection::Points5
            | RuleSection::Points3
            | RuleSection::Points2
            | RuleSection::Points1 => {
                let points = section.tier_points().unwrap_or_default();
                builder.tier(points, parser::parse_point_rules(label, &text))
            }
            RuleSection::Catalog => builder.catalog(parser::parse_catalog(label, &text)),
            RuleSection::Reskins => builder.reskins(parser::parse_reskins(label, &text)),
        };
    }

    Ok(builder.build())
}
