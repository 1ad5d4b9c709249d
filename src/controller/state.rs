//! View state owned by the table controller and the transitions applied to it.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, warn};

use crate::models::{IncidentPage, IncidentQuery};
use crate::SafedeskResult;

/// Monotonic id handed out for each scheduled fetch
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Showing the last committed result
    Idle,
    /// A request is in flight; the last committed result is still shown
    Fetching,
}

/// Consistent view of the controller published on every transition
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub committed: IncidentPage,
    pub query: IncidentQuery,
    pub state: FetchState,
    /// Most recently scheduled request; 0 before the first fetch
    pub last_request: RequestId,
    pub last_error: Option<String>,
    pub responses_discarded: u64,
    pub column_visibility: HashMap<String, bool>,
    pub row_selection: BTreeSet<String>,
}

impl ControllerSnapshot {
    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Fetching
    }

    /// Columns are visible unless explicitly hidden
    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column_visibility
            .get(column_id)
            .copied()
            .unwrap_or(true)
    }
}

#[derive(Debug)]
pub(crate) struct ControllerState {
    pub(crate) query: IncidentQuery,
    pub(crate) committed: IncidentPage,
    fetching: bool,
    latest: RequestId,
    last_error: Option<String>,
    responses_discarded: u64,
    pub(crate) column_visibility: HashMap<String, bool>,
    pub(crate) row_selection: BTreeSet<String>,
}

impl ControllerState {
    pub(crate) fn new(query: IncidentQuery, committed: IncidentPage) -> Self {
        Self {
            query,
            committed,
            fetching: false,
            latest: 0,
            last_error: None,
            responses_discarded: 0,
            column_visibility: HashMap::new(),
            row_selection: BTreeSet::new(),
        }
    }

    /// Register a new request for the current query; any older request is now stale.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.latest += 1;
        self.fetching = true;
        self.latest
    }

    /// Apply a finished request. Returns whether it was committed.
    pub(crate) fn complete(
        &mut self,
        request: RequestId,
        result: SafedeskResult<IncidentPage>,
    ) -> bool {
        if request != self.latest {
            self.responses_discarded += 1;
            match result {
                Ok(_) => debug!(
                    request_id = request,
                    latest = self.latest,
                    "Discarding superseded incident response"
                ),
                Err(err) => warn!(
                    request_id = request,
                    latest = self.latest,
                    error = %err,
                    "Superseded incident request failed"
                ),
            }
            return false;
        }

        self.fetching = false;
        match result {
            Ok(page) => {
                debug!(
                    request_id = request,
                    rows = page.data.len(),
                    total = page.total_count,
                    "Committing incident page"
                );
                self.committed = page;
                self.last_error = None;
                true
            }
            Err(err) => {
                error!(
                    request_id = request,
                    error = %err,
                    "Error fetching incidents; keeping last result"
                );
                self.last_error = Some(err.user_message());
                false
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            committed: self.committed.clone(),
            query: self.query.clone(),
            state: if self.fetching {
                FetchState::Fetching
            } else {
                FetchState::Idle
            },
            last_request: self.latest,
            last_error: self.last_error.clone(),
            responses_discarded: self.responses_discarded,
            column_visibility: self.column_visibility.clone(),
            row_selection: self.row_selection.clone(),
        }
    }
}
