use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::ViewError;
use crate::record::{FieldValue, ListRecord};

/// Filter value meaning "no constraint"
pub const ALL_SENTINEL: &str = "all";

/// Column that is always rendered, whatever the visibility map says
pub const ACTIONS_COLUMN: &str = "actions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ViewError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(ViewError::InvalidSort(format!("unknown direction '{}'", other))),
        }
    }
}

/// The single active sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self { key: key.into(), direction: SortDirection::Asc }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self { key: key.into(), direction: SortDirection::Desc }
    }

    /// Parse `name`, `name desc`, `name:desc` or `-name`
    pub fn parse(s: &str) -> Result<Self, ViewError> {
        let trimmed = s.trim();
        if let Some(key) = trimmed.strip_prefix('-') {
            return Self::checked(key, SortDirection::Desc);
        }
        let (key, direction) = match trimmed.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((key, dir)) => (key, SortDirection::parse(dir)?),
            None => (trimmed, SortDirection::Asc),
        };
        Self::checked(key, direction)
    }

    fn checked(key: &str, direction: SortDirection) -> Result<Self, ViewError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ViewError::InvalidSort("sort key cannot be empty".to_string()));
        }
        let valid_char = |c: char| c.is_alphanumeric() || c == '_' || c == '-';
        if key.starts_with('-') || !key.chars().all(valid_char) {
            return Err(ViewError::InvalidSort(format!("invalid sort key '{}'", key)));
        }
        Ok(Self { key: key.to_string(), direction })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction.as_str())
    }
}

/// Field filters plus the free-text search term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub search: String,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Parse a `name=value` pair as typed on a command line
    pub fn parse_pair(s: &str) -> Result<(String, String), ViewError> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| ViewError::InvalidFilter(format!("expected name=value, got '{}'", s)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::InvalidFilter(format!("missing filter name in '{}'", s)));
        }
        Ok((name.to_string(), value.trim().to_string()))
    }

    /// Filters that actually constrain the result, values trimmed
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(name, value)| (name.as_str(), value.trim()))
            .filter(|(_, value)| is_active_value(value))
    }

    pub fn is_neutral(&self) -> bool {
        self.active().next().is_none() && self.search.is_empty()
    }
}

/// Expects an already trimmed value
pub(crate) fn is_active_value(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case(ALL_SENTINEL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based
    pub current_page: usize,
    pub rows_per_page: usize,
}

impl Pagination {
    pub fn new(current_page: usize, rows_per_page: usize) -> Self {
        Self { current_page: current_page.max(1), rows_per_page: rows_per_page.max(1) }
    }

    pub fn total_pages(&self, total_count: usize) -> usize {
        total_count.div_ceil(self.rows_per_page.max(1)).max(1)
    }

    /// Current page clamped into `[1, total_pages]`
    pub fn clamped_page(&self, total_count: usize) -> usize {
        self.current_page.clamp(1, self.total_pages(total_count))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::config::config().list.default_rows_per_page)
    }
}

/// Everything the engine needs besides the records
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Per-column render flags. Columns not in the map are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility {
    columns: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show exactly `visible` (plus the actions column)
    pub fn only<I, S>(all: I, visible: &[S]) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        S: AsRef<str>,
    {
        let columns = all
            .into_iter()
            .map(Into::into)
            .map(|key: String| {
                let shown = visible.iter().any(|v| v.as_ref() == key);
                (key, shown)
            })
            .collect();
        Self { columns }
    }

    pub fn set(&mut self, column: impl Into<String>, visible: bool) {
        let column = column.into();
        if column != ACTIONS_COLUMN {
            self.columns.insert(column, visible);
        }
    }

    pub fn toggle(&mut self, column: &str) {
        let visible = self.is_visible(column);
        self.set(column, !visible);
    }

    pub fn is_visible(&self, column: &str) -> bool {
        column == ACTIONS_COLUMN || self.columns.get(column).copied().unwrap_or(true)
    }

    /// The visible subset of `columns`, in the given order
    pub fn visible<'a>(&self, columns: &'a [String]) -> Vec<&'a str> {
        columns
            .iter()
            .map(String::as_str)
            .filter(|c| self.is_visible(c))
            .collect()
    }

    /// Cells a renderer would display for `record`
    pub fn project<T: ListRecord>(&self, record: &T) -> Vec<(String, FieldValue)> {
        record
            .columns()
            .into_iter()
            .filter(|c| self.is_visible(c))
            .map(|c| {
                let value = record.field(&c).unwrap_or(FieldValue::Null);
                (c, value)
            })
            .collect()
    }
}

/// The rows to render plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOutput<T> {
    pub rows: Vec<T>,
    pub total_pages: usize,
    pub total_count: usize,
    /// Page the rows were taken from, after clamping
    pub current_page: usize,
}

impl<T> ViewOutput<T> {
    pub fn empty() -> Self {
        Self { rows: vec![], total_pages: 1, total_count: 0, current_page: 1 }
    }
}

impl<T: ListRecord> ViewOutput<T> {
    pub fn project(&self, columns: &ColumnVisibility) -> Vec<Vec<(String, FieldValue)>> {
        self.rows.iter().map(|row| columns.project(row)).collect()
    }
}
