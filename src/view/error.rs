use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid sort specification: {0}")]
    InvalidSort(String),

    #[error("Invalid filter expression: {0}")]
    InvalidFilter(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid rows per page: {0}")]
    InvalidRowsPerPage(String),
}
