use serde::{Deserialize, Serialize};

use super::engine::compute_view;
use super::types::{ColumnVisibility, Pagination, SortSpec, ViewOutput, ViewQuery};
use crate::record::ListRecord;

/// Identifies one fetch started by a list page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Ephemeral controls of one list page.
///
/// Filter and search changes send the user back to page 1; a page-size
/// change keeps the page but clamps it to the new page count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListViewState {
    query: ViewQuery,
    columns: ColumnVisibility,
    /// Row count from the last applied result, used to clamp page changes.
    /// `None` until a result has been seen.
    #[serde(default)]
    last_total: Option<usize>,
    #[serde(skip)]
    generation: u64,
}

impl ListViewState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            query: ViewQuery { pagination: Pagination::new(1, rows_per_page), ..ViewQuery::default() },
            ..Self::default()
        }
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn current_page(&self) -> usize {
        self.query.pagination.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.query.pagination.rows_per_page
    }

    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.filters.filters.insert(name.into(), value.into());
        self.reset_page();
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.query.filters.filters.remove(name);
        self.reset_page();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.filters.search = search.into();
        self.reset_page();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.pagination.current_page = page.max(1);
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        let rows_per_page = rows_per_page.max(1);
        self.query.pagination.rows_per_page = rows_per_page;
        if let Some(total) = self.last_total {
            self.query.pagination.current_page = self.query.pagination.clamped_page(total);
        }
    }

    pub fn set_column_visible(&mut self, column: impl Into<String>, visible: bool) {
        self.columns.set(column, visible);
    }

    pub fn toggle_column(&mut self, column: &str) {
        self.columns.toggle(column);
    }

    pub fn set_columns(&mut self, columns: ColumnVisibility) {
        self.columns = columns;
    }

    fn reset_page(&mut self) {
        self.query.pagination.current_page = 1;
    }

    /// Recompute the view over in-memory records and keep the clamped page
    pub fn compute<T: ListRecord + Clone>(&mut self, records: &[T]) -> ViewOutput<T> {
        let output = compute_view(records, &self.query);
        self.record_result(&output);
        output
    }

    /// Remember totals of a result computed elsewhere (e.g. by the backend)
    pub fn record_result<T>(&mut self, output: &ViewOutput<T>) {
        self.last_total = Some(output.total_count);
        self.query.pagination.current_page = output.current_page;
    }

    /// Start a fetch; only the most recently started one will be accepted
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a completed fetch if it is still the latest. Returns whether it was applied.
    pub fn accept<T>(&mut self, ticket: FetchTicket, output: &ViewOutput<T>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("discarding stale list result (ticket {}, current {})", ticket.0, self.generation);
            return false;
        }
        self.record_result(output);
        true
    }
}
