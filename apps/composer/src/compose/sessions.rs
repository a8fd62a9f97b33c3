//! In-memory composition sessions.
//!
//! A session owns the curation state for one job plus the debounce scheduler for its
//! pending text saves. Dropping a session (teardown or re-open) aborts those saves; a
//! save that already reached the tracker is discarded if its session is gone.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::curation::catalog::ItemKey;
use crate::curation::session::{Action, CurationState};
use crate::curation::view::{build_views, SaveStatus, SourceView};
use crate::curation::CurationError;
use crate::persistence::debounce::DebounceScheduler;
use crate::persistence::{save_item_text, ItemStore, TrackerError};

#[derive(Debug, Clone, Serialize)]
pub struct CompositionView {
    pub job_id: i64,
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub sources: Vec<SourceView>,
    /// False while every payload list is empty.
    pub submit_enabled: bool,
}

pub struct Session {
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub state: CurationState,
    pub save_errors: HashMap<ItemKey, String>,
    saves: DebounceScheduler<ItemKey>,
}

impl Session {
    pub fn new(state: CurationState, job_title: String, company_name: String, save_delay: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            job_title,
            company_name,
            state,
            save_errors: HashMap::new(),
            saves: DebounceScheduler::new(save_delay),
        }
    }

    pub fn job_id(&self) -> i64 {
        self.state.job_id
    }

    /// Advances the state. On error the state is left as it was.
    pub fn apply(&mut self, action: Action) -> Result<(), CurationError> {
        self.state = self.state.apply(action)?;
        Ok(())
    }

    pub fn view(&self) -> CompositionView {
        let sources = build_views(&self.state, |source, id| {
            let key = ItemKey { source, id };
            SaveStatus {
                pending: self.saves.is_pending(&key),
                error: self.save_errors.get(&key).cloned(),
            }
        });
        CompositionView {
            job_id: self.job_id(),
            session_id: self.id,
            opened_at: self.opened_at,
            job_title: self.job_title.clone(),
            company_name: self.company_name.clone(),
            sources,
            submit_enabled: !self.state.payload().is_empty(),
        }
    }

    /// Debounces a save of `text` for `key`. A later edit to the same item replaces it.
    pub fn schedule_save(
        &self,
        registry: &SessionRegistry,
        store: Arc<dyn ItemStore>,
        key: ItemKey,
        text: String,
    ) {
        debug!(
            "Save of {} {} for job {} scheduled in {:?}",
            key.source,
            key.id,
            self.job_id(),
            self.saves.delay()
        );
        self.saves.schedule(
            key,
            persist_edit(registry.clone(), store, self.job_id(), self.id, key, text),
        );
    }

    /// Reconciles the outcome of a save of `sent` for `key`.
    fn record_save(&mut self, key: ItemKey, sent: &str, result: Result<String, TrackerError>) {
        match result {
            Ok(canonical) => {
                self.save_errors.remove(&key);
                let current = self
                    .state
                    .source(key.source)
                    .catalog
                    .get(key.id)
                    .map(|item| item.text.as_str());
                // A newer local edit takes precedence over the echoed text.
                if current == Some(sent) && canonical != sent {
                    let reconciled = self.apply(Action::ReplaceText {
                        source: key.source,
                        id: key.id,
                        text: canonical,
                    });
                    if let Err(e) = reconciled {
                        warn!("Could not reconcile saved text for {} {}: {e}", key.source, key.id);
                    }
                }
                info!("Saved {} {} for job {}", key.source, key.id, self.job_id());
            }
            Err(e) => {
                warn!(
                    "Failed to save {} {} for job {}: {e}",
                    key.source,
                    key.id,
                    self.job_id()
                );
                self.save_errors.insert(key, e.to_string());
            }
        }
    }

    /// Cancels pending saves and returns how many were dropped.
    pub fn close(self) -> usize {
        self.saves.cancel_all()
    }
}

async fn persist_edit(
    registry: SessionRegistry,
    store: Arc<dyn ItemStore>,
    job_id: i64,
    session_id: Uuid,
    key: ItemKey,
    text: String,
) {
    let result = save_item_text(store.as_ref(), key, &text).await;

    let mut sessions = registry.lock().await;
    match sessions.get_mut(&job_id) {
        Some(session) if session.id == session_id => session.record_save(key, &text, result),
        _ => debug!("Discarding save of {} {}: session {session_id} is gone", key.source, key.id),
    }
}

/// Open sessions keyed by job id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<i64, Session>>>,
}

impl SessionRegistry {
    pub async fn lock(&self) -> MutexGuard<'_, HashMap<i64, Session>> {
        self.sessions.lock().await
    }

    /// Installs `session`, replacing and closing any previous session for the same job.
    pub async fn open(&self, session: Session) -> CompositionView {
        let view = session.view();
        let previous = self.lock().await.insert(session.job_id(), session);
        if let Some(previous) = previous {
            let dropped = previous.close();
            info!(
                "Replaced composition for job {} ({dropped} pending saves dropped)",
                view.job_id
            );
        }
        view
    }

    /// Removes the session for `job_id`, returning how many pending saves were dropped.
    pub async fn close(&self, job_id: i64) -> Option<usize> {
        let session = self.lock().await.remove(&job_id)?;
        Some(session.close())
    }
}
