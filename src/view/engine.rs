use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ViewOutput, ViewQuery};
use crate::record::ListRecord;

/// Produce the rows and pagination metadata for one table render.
///
/// Stages run in a fixed order: filter, search, sort, paginate. Projection
/// is left to the caller through [`super::ColumnVisibility`]. The function
/// is pure; identical inputs give identical output.
pub fn compute_view<T: ListRecord + Clone>(records: &[T], query: &ViewQuery) -> ViewOutput<T> {
    let retained = FilterWhere::retain(records, &query.filters);

    let ordered = match &query.sort {
        Some(spec) => FilterOrder::sort(retained, spec),
        None => retained,
    };

    let total_count = ordered.len();
    let pagination = query.pagination;
    let rows_per_page = pagination.rows_per_page.max(1);
    let total_pages = pagination.total_pages(total_count);
    let current_page = pagination.clamped_page(total_count);

    let start = (current_page - 1) * rows_per_page;
    let rows: Vec<T> = ordered
        .into_iter()
        .skip(start)
        .take(rows_per_page)
        .cloned()
        .collect();

    tracing::debug!(
        "list view: {} of {} records retained, page {}/{} ({} rows)",
        total_count,
        records.len(),
        current_page,
        total_pages,
        rows.len()
    );

    ViewOutput { rows, total_pages, total_count, current_page }
}
