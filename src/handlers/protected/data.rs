use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::api::ListEnvelope;
use crate::config;
use crate::entities::{Coupon, Job, PortalUser, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::permission;
use crate::record::ListRecord;
use crate::server::AppState;
use crate::types::Operation;
use crate::view::{compute_view, params::PARAM_SORT, ViewParams, ViewQuery};

/// Resolve the path segment and check the caller's grant for `operation`
fn authorize(auth_user: &AuthUser, resource: &str, operation: Operation) -> Result<Resource, ApiError> {
    let resource: Resource = resource
        .parse()
        .map_err(|_| ApiError::not_found(format!("Unknown resource '{}'", resource)))?;

    if !permission::can(&auth_user.user, resource.as_str(), operation) {
        tracing::warn!(
            "'{}' ({}) denied {} on {}",
            auth_user.user.id,
            auth_user.user.role,
            operation,
            resource
        );
        return Err(ApiError::forbidden(format!(
            "Missing permission {}:{}",
            resource, operation
        )));
    }
    Ok(resource)
}

/// Filter and sort keys must name real fields of the resource
fn check_fields(query: &ViewQuery, fields: &[&str]) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    for (name, _) in query.filters.active() {
        if !fields.contains(&name) {
            field_errors.insert(name.to_string(), format!("Unknown filter field '{}'", name));
        }
    }
    if let Some(sort) = &query.sort {
        if !fields.contains(&sort.key.as_str()) {
            field_errors.insert(PARAM_SORT.to_string(), format!("Unknown sort field '{}'", sort.key));
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Invalid list query", field_errors))
    }
}

fn list_page<T>(records: &[T], query: &ViewQuery, fields: &[&str]) -> Result<Response, ApiError>
where
    T: ListRecord + Clone + Serialize,
{
    check_fields(query, fields)?;
    let limit = query.pagination.rows_per_page;
    let output = compute_view(records, query);
    Ok(Json(ListEnvelope::from_view(output, limit)).into_response())
}

fn find<T: ListRecord + Serialize>(records: &[T], id: &str) -> Result<Option<Value>, ApiError> {
    records
        .iter()
        .find(|record| record.id() == id)
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| {
            tracing::error!("Failed to serialize record {}: {}", id, e);
            ApiError::internal_server_error("Failed to serialize record")
        })
}

/// GET /api/data/:resource - filtered, searched, sorted page of records
///
/// Query: `search`, `sort`, `order`, `page`, `limit`; any other key filters on that field
pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let resource = authorize(&auth_user, &resource, Operation::Read)?;

    let max_rows = config::config().list.max_rows_per_page;
    let query = ViewParams::decode(params.iter().map(|(k, v)| (k.as_str(), v.as_str())), max_rows)?;

    let data = state.store.read().await;
    match resource {
        Resource::Jobs => list_page(&data.jobs, &query, &Job::field_names()),
        Resource::Coupons => list_page(&data.coupons, &query, &Coupon::field_names()),
        other => list_page(&data.users_for(other), &query, &PortalUser::field_names()),
    }
}

/// GET /api/data/:resource/:id - single record
pub async fn record_get(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let resource = authorize(&auth_user, &resource, Operation::Read)?;

    let data = state.store.read().await;
    let found = match resource {
        Resource::Jobs => find(&data.jobs, &id)?,
        Resource::Coupons => find(&data.coupons, &id)?,
        other => find(&data.users_for(other), &id)?,
    };

    found
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("No {} record '{}'", resource, id)))
}

/// DELETE /api/data/:resource/:id - remove a record, 204 on success
pub async fn record_delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<()> {
    let resource = authorize(&auth_user, &resource, Operation::Delete)?;

    if !state.store.remove(resource, &id).await {
        return Err(ApiError::not_found(format!("No {} record '{}'", resource, id)));
    }

    if config::config().security.enable_audit_logging {
        tracing::info!(target: "audit", user = %auth_user.user.id, %resource, %id, "record deleted");
    }

    Ok(ApiResponse::no_content())
}
