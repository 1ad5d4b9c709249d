//! Table controller: owns the query parameters and keeps the displayed page in step.
//!
//! Every parameter change schedules exactly one fetch through an [`IncidentService`].
//! Fetches are never cancelled. A response is committed only if it belongs to the
//! most recently scheduled request, so the view never shows a page for a query
//! the user has already moved past, whatever order the responses arrive in.
//!
//! State is published on a `tokio::sync::watch` channel after every transition;
//! getters read the latest published snapshot.

pub mod state;

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::config::settings::TableSettings;
use crate::models::{
    ColumnFilter, Incident, IncidentPage, IncidentQuery, Pagination, SortDescriptor,
};
use crate::service::IncidentService;

pub use state::{ControllerSnapshot, FetchState, RequestId};
use state::ControllerState;

/// Construction options for [`IncidentTableController`]
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub initial_query: IncidentQuery,
    /// Result shown before the first fetch completes; empty if unset
    pub initial_page: Option<IncidentPage>,
    /// Issue a fetch for `initial_query` as soon as the controller starts
    pub fetch_on_start: bool,
}

impl ControllerOptions {
    pub fn from_settings(table: &TableSettings) -> Self {
        Self {
            initial_query: IncidentQuery {
                pagination: Pagination::new(0, table.default_page_size),
                ..IncidentQuery::default()
            },
            initial_page: None,
            fetch_on_start: true,
        }
    }
}

pub struct IncidentTableController {
    service: Arc<dyn IncidentService>,
    state: Arc<RwLock<ControllerState>>,
    state_tx: Arc<watch::Sender<ControllerSnapshot>>,
}

impl IncidentTableController {
    /// Create an idle controller. Does not fetch, regardless of `fetch_on_start`.
    pub fn new(service: Arc<dyn IncidentService>, options: ControllerOptions) -> Self {
        let state = ControllerState::new(
            options.initial_query,
            options.initial_page.unwrap_or_default(),
        );
        let (state_tx, _) = watch::channel(state.snapshot());

        Self {
            service,
            state: Arc::new(RwLock::new(state)),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Create a controller and issue the initial fetch if `fetch_on_start` is set.
    pub async fn start(service: Arc<dyn IncidentService>, options: ControllerOptions) -> Self {
        let fetch_on_start = options.fetch_on_start;
        let controller = Self::new(service, options);
        if fetch_on_start {
            controller.refetch().await;
        }
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Rows of the committed page
    pub fn data(&self) -> Vec<Incident> {
        self.state_tx.borrow().committed.data.clone()
    }

    pub fn total_count(&self) -> usize {
        self.state_tx.borrow().committed.total_count
    }

    pub fn page_count(&self) -> usize {
        self.state_tx.borrow().committed.page_count
    }

    pub fn pagination(&self) -> Pagination {
        self.state_tx.borrow().query.pagination
    }

    pub fn sorting(&self) -> Vec<SortDescriptor> {
        self.state_tx.borrow().query.sorting.clone()
    }

    pub fn column_filters(&self) -> Vec<ColumnFilter> {
        self.state_tx.borrow().query.column_filters.clone()
    }

    pub fn global_filter(&self) -> String {
        self.state_tx.borrow().query.global_filter.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state_tx.borrow().is_loading()
    }

    /// Error of the most recent request, cleared by the next successful commit
    pub fn last_error(&self) -> Option<String> {
        self.state_tx.borrow().last_error.clone()
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.state_tx.borrow().is_column_visible(column_id)
    }

    pub fn row_selection(&self) -> BTreeSet<String> {
        self.state_tx.borrow().row_selection.clone()
    }

    pub async fn set_pagination(&self, pagination: Pagination) -> RequestId {
        self.update_query(|query| query.pagination = pagination)
            .await
    }

    pub async fn set_sorting(&self, sorting: Vec<SortDescriptor>) -> RequestId {
        self.update_query(|query| query.sorting = sorting).await
    }

    pub async fn set_column_filters(&self, column_filters: Vec<ColumnFilter>) -> RequestId {
        self.update_query(|query| query.column_filters = column_filters)
            .await
    }

    pub async fn set_global_filter(&self, global_filter: impl Into<String>) -> RequestId {
        let global_filter = global_filter.into();
        self.update_query(|query| query.global_filter = global_filter)
            .await
    }

    /// Re-issue the current query unconditionally
    pub async fn refetch(&self) -> RequestId {
        self.update_query(|_| {}).await
    }

    pub async fn set_column_visibility(&self, column_id: impl Into<String>, visible: bool) {
        let mut state = self.state.write().await;
        state.column_visibility.insert(column_id.into(), visible);
        self.state_tx.send_replace(state.snapshot());
    }

    pub async fn set_row_selection(&self, ids: BTreeSet<String>) {
        let mut state = self.state.write().await;
        state.row_selection = ids;
        self.state_tx.send_replace(state.snapshot());
    }

    /// Flip selection of one row; returns whether it is now selected
    pub async fn toggle_row_selected(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let selected = if state.row_selection.remove(id) {
            false
        } else {
            state.row_selection.insert(id.to_string());
            true
        };
        self.state_tx.send_replace(state.snapshot());
        selected
    }

    /// Wait until no request is in flight and return that snapshot
    pub async fn wait_idle(&self) -> ControllerSnapshot {
        self.wait_for(|snapshot| !snapshot.is_loading()).await
    }

    pub async fn wait_for<F>(&self, mut predicate: F) -> ControllerSnapshot
    where
        F: FnMut(&ControllerSnapshot) -> bool,
    {
        let mut rx = self.subscribe();
        let result = match rx.wait_for(|snapshot| predicate(snapshot)).await {
            Ok(snapshot) => snapshot.clone(),
            // Sender lives as long as the controller
            Err(_) => self.snapshot(),
        };
        result
    }

    async fn update_query<F>(&self, update: F) -> RequestId
    where
        F: FnOnce(&mut IncidentQuery),
    {
        let (request_id, query) = {
            let mut state = self.state.write().await;
            update(&mut state.query);
            let request_id = state.begin_request();
            self.state_tx.send_replace(state.snapshot());
            (request_id, state.query.clone())
        };

        debug!(request_id, "Scheduling incident fetch");
        self.spawn_fetch(request_id, query);
        request_id
    }

    fn spawn_fetch(&self, request_id: RequestId, query: IncidentQuery) {
        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let state_tx = Arc::clone(&self.state_tx);

        tokio::spawn(async move {
            let result = service.get_incidents(query).await;

            let mut state = state.write().await;
            state.complete(request_id, result);
            state_tx.send_replace(state.snapshot());
        });
    }
}
