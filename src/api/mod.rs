//! Wire formats shared by the REST backend and the console client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::permission::User;
use crate::view::ViewOutput;

/// Server-paginated list response: `{ data, page, limit, total }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

impl<T> ListEnvelope<T> {
    pub fn from_view(output: ViewOutput<T>, limit: usize) -> Self {
        Self {
            data: output.rows,
            page: output.current_page,
            limit,
            total: output.total_count,
        }
    }

    /// Pagination metadata computed by the server, as the engine would report it
    pub fn into_view(self) -> ViewOutput<T> {
        let limit = self.limit.max(1);
        ViewOutput {
            rows: self.data,
            total_pages: self.total.div_ceil(limit).max(1),
            total_count: self.total,
            current_page: self.page.max(1),
        }
    }
}

/// Single-object response: `{ success, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
}

fn default_success() -> bool {
    true
}

impl<T> DataEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Error body produced by the backend for every non-2xx response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub field_errors: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Form-level checks run before anything is sent
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut field_errors = HashMap::new();
        let username = self.username.trim();

        if username.is_empty() {
            field_errors.insert("username".to_string(), "This field is required".to_string());
        } else if username.contains('@') && !looks_like_email(username) {
            field_errors.insert("username".to_string(), "Invalid email address".to_string());
        }
        if self.password.is_empty() {
            field_errors.insert("password".to_string(), "This field is required".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors)
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_reports_at_least_one_page() {
        let envelope: ListEnvelope<u8> = ListEnvelope { data: vec![], page: 1, limit: 10, total: 0 };
        let view = envelope.into_view();
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.total_count, 0);

        let envelope: ListEnvelope<u8> = ListEnvelope { data: vec![1], page: 3, limit: 10, total: 21 };
        assert_eq!(envelope.into_view().total_pages, 3);
    }

    #[test]
    fn login_validation_reports_each_field() {
        let errors = LoginRequest::new("", "").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));

        let errors = LoginRequest::new("ada@", "pw").validate().unwrap_err();
        assert_eq!(errors.get("username").map(String::as_str), Some("Invalid email address"));

        assert!(LoginRequest::new("ada@portal.io", "pw").validate().is_ok());
        assert!(LoginRequest::new("ada", "pw").validate().is_ok());
    }
}
