use super::error::ViewError;
use super::types::{is_active_value, FilterSpec, Pagination, SortDirection, SortSpec, ViewQuery};

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_LIMIT: &str = "limit";

const RESERVED: &[&str] = &[PARAM_SEARCH, PARAM_SORT, PARAM_ORDER, PARAM_PAGE, PARAM_LIMIT];

/// Query-string form of a [`ViewQuery`], shared by the REST client and the backend
pub struct ViewParams;

impl ViewParams {
    /// Encode the query. Inactive filters and an empty search are left out.
    pub fn encode(query: &ViewQuery) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !query.filters.search.is_empty() {
            params.push((PARAM_SEARCH.to_string(), query.filters.search.clone()));
        }
        if let Some(sort) = &query.sort {
            params.push((PARAM_SORT.to_string(), sort.key.clone()));
            params.push((PARAM_ORDER.to_string(), sort.direction.as_str().to_string()));
        }
        params.push((PARAM_PAGE.to_string(), query.pagination.current_page.to_string()));
        params.push((PARAM_LIMIT.to_string(), query.pagination.rows_per_page.to_string()));

        for (name, value) in query.filters.active() {
            params.push((name.to_string(), value.to_string()));
        }
        params
    }

    /// Decode request parameters. `limit` is capped at `max_rows` when given.
    pub fn decode<'a, I>(params: I, max_rows: Option<usize>) -> Result<ViewQuery, ViewError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = FilterSpec::new();
        let mut sort_key: Option<&str> = None;
        let mut direction: Option<SortDirection> = None;
        let mut page = 1usize;
        let mut limit = crate::config::config().list.default_rows_per_page;

        for (key, value) in params {
            match key {
                PARAM_SEARCH => filters.search = value.to_string(),
                PARAM_SORT => sort_key = Some(value).filter(|v| !v.trim().is_empty()),
                PARAM_ORDER => direction = Some(SortDirection::parse(value)?),
                PARAM_PAGE => {
                    page = value
                        .trim()
                        .parse()
                        .map_err(|_| ViewError::InvalidPage(value.to_string()))?;
                }
                PARAM_LIMIT => {
                    limit = value
                        .trim()
                        .parse()
                        .map_err(|_| ViewError::InvalidRowsPerPage(value.to_string()))?;
                }
                name if is_active_value(value.trim()) => {
                    filters.filters.insert(name.to_string(), value.trim().to_string());
                }
                _ => {}
            }
        }

        if let Some(max) = max_rows {
            if limit > max {
                if crate::config::config().list.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max);
                }
                limit = max;
            }
        }

        let sort = match sort_key {
            Some(raw) => {
                let mut spec = SortSpec::parse(raw)?;
                if let Some(direction) = direction {
                    spec.direction = direction;
                }
                Some(spec)
            }
            None => None,
        };

        Ok(ViewQuery { filters, sort, pagination: Pagination::new(page, limit) })
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED.contains(&name)
    }
}
