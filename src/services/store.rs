use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::gateway::DirectoryGateway;
use crate::models::{column, column_catalog, ServiceError, SortDirection, UserRecord, ViewSnapshot};
use crate::services::view::{self, ViewState};

/// Single source of truth for the cached record set and the table view
/// state. Services and handlers only read and request refreshes; nobody
/// edits the cached records in place.
pub struct RecordStore {
    gateway: Arc<dyn DirectoryGateway>,
    refresh_window: Duration,
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    records: Vec<UserRecord>,
    view: ViewState,
    last_applied: Option<Instant>,
    issued_seq: u64,
    applied_seq: u64,
}

impl RecordStore {
    pub fn new(gateway: Arc<dyn DirectoryGateway>, refresh_window: Duration) -> Self {
        Self {
            gateway,
            refresh_window,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Fetch the record set from the gateway. Non-forced calls inside the
    /// refresh window return the cached set without touching the network.
    /// Every fetch carries a monotonic sequence number; a response that
    /// loses the race to a newer one is discarded instead of applied.
    pub async fn refresh(&self, force: bool) -> Result<Vec<UserRecord>, ServiceError> {
        if !force {
            let inner = self.inner.read().await;
            if let Some(applied) = inner.last_applied {
                if applied.elapsed() < self.refresh_window {
                    return Ok(inner.records.clone());
                }
            }
        }

        let seq = {
            let mut inner = self.inner.write().await;
            inner.issued_seq += 1;
            inner.issued_seq
        };

        let fetched = self.gateway.fetch_users().await?;

        let mut inner = self.inner.write().await;
        if seq > inner.applied_seq {
            inner.applied_seq = seq;
            inner.records = fetched;
            inner.last_applied = Some(Instant::now());
            let StoreInner { records, view, .. } = &mut *inner;
            view.prune_selection(records);
            Ok(records.clone())
        } else {
            tracing::debug!(seq, "discarding stale record refresh response");
            Ok(inner.records.clone())
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let inner = self.inner.read().await;
        Self::render(&inner)
    }

    pub async fn apply_filter(
        &self,
        filter_text: Option<String>,
        carreras: Option<Vec<String>>,
        groups: Option<Vec<String>>,
    ) -> ViewSnapshot {
        let mut inner = self.inner.write().await;
        if let Some(text) = filter_text {
            inner.view.filter_text = text;
        }
        if let Some(carreras) = carreras {
            inner.view.selected_carreras = carreras.into_iter().collect();
        }
        if let Some(groups) = groups {
            inner.view.selected_groups = groups.into_iter().collect();
        }
        Self::render_and_sync(&mut inner)
    }

    pub async fn apply_sort(
        &self,
        sort_column: Option<String>,
        direction: Option<SortDirection>,
    ) -> Result<ViewSnapshot, ServiceError> {
        if let Some(key) = sort_column.as_deref() {
            let descriptor = column(key)
                .ok_or_else(|| ServiceError::ValidationError(format!("Unknown column: {}", key)))?;
            if !descriptor.sortable {
                return Err(ServiceError::ValidationError(format!(
                    "Column {} is not sortable",
                    key
                )));
            }
        }

        let mut inner = self.inner.write().await;
        inner.view.sort_column = sort_column;
        inner.view.sort_direction = direction.unwrap_or(SortDirection::Asc);
        // Changing the sort always returns the view to the first page.
        inner.view.page = 1;
        Ok(Self::render_and_sync(&mut inner))
    }

    pub async fn apply_page(&self, page: Option<usize>, page_size: Option<usize>) -> ViewSnapshot {
        let mut inner = self.inner.write().await;
        if let Some(size) = page_size {
            inner.view.page_size = size.max(1);
        }
        if let Some(page) = page {
            inner.view.page = page.max(1);
        }
        Self::render_and_sync(&mut inner)
    }

    pub async fn apply_columns(&self, visible: Vec<String>) -> Result<ViewSnapshot, ServiceError> {
        for key in &visible {
            if column(key).is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown column: {}",
                    key
                )));
            }
        }

        let mut inner = self.inner.write().await;
        let mut keys: BTreeSet<String> = visible.into_iter().collect();
        // Fixed columns cannot be hidden.
        for descriptor in column_catalog().iter().filter(|c| c.fixed) {
            keys.insert(descriptor.key.to_string());
        }
        inner.view.visible_columns = keys;
        Ok(Self::render_and_sync(&mut inner))
    }

    pub async fn toggle_row(&self, username: &str) -> ViewSnapshot {
        let mut inner = self.inner.write().await;
        {
            let StoreInner { records, view, .. } = &mut *inner;
            view.toggle_row(records, username);
        }
        Self::render_and_sync(&mut inner)
    }

    /// Toggle the whole currently visible slice, all-or-nothing.
    pub async fn toggle_visible_page(&self) -> ViewSnapshot {
        let mut inner = self.inner.write().await;
        let projection = view::project(&inner.records, &inner.view, column_catalog());
        inner.view.toggle_visible(&projection.rows);
        Self::render_and_sync(&mut inner)
    }

    pub async fn selected_ids(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner.view.selected_rows.iter().cloned().collect()
    }

    pub async fn export_csv(&self) -> String {
        let inner = self.inner.read().await;
        view::export_csv(&inner.records, &inner.view, column_catalog())
    }

    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn last_refresh_age(&self) -> Option<Duration> {
        self.inner.read().await.last_applied.map(|at| at.elapsed())
    }

    /// Render a snapshot and write the clamped page back so the stored
    /// state never points past the end of the result.
    fn render_and_sync(inner: &mut StoreInner) -> ViewSnapshot {
        let snapshot = Self::render(inner);
        inner.view.page = snapshot.page;
        snapshot
    }

    fn render(inner: &StoreInner) -> ViewSnapshot {
        let projection = view::project(&inner.records, &inner.view, column_catalog());
        ViewSnapshot {
            success: true,
            rows: view::export_rows(&projection.rows, &inner.view),
            total_count: projection.total_count,
            total_pages: projection.total_pages,
            page: projection.page,
            page_size: inner.view.page_size,
            filter_text: inner.view.filter_text.clone(),
            selected_carreras: inner.view.selected_carreras.iter().cloned().collect(),
            selected_groups: inner.view.selected_groups.iter().cloned().collect(),
            sort_column: inner.view.sort_column.clone(),
            sort_direction: inner.view.sort_direction,
            visible_columns: inner.view.visible_columns.iter().cloned().collect(),
            selected_rows: inner.view.selected_rows.iter().cloned().collect(),
        }
    }
}
