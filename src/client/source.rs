use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{ApiClient, ClientError};
use crate::record::ListRecord;
use crate::view::{compute_view, ListViewState, ViewOutput, ViewQuery};

/// Where a list page gets its rows from
#[async_trait]
pub trait RecordSource<T>: Send + Sync {
    async fn fetch(&self, query: &ViewQuery) -> Result<ViewOutput<T>, ClientError>;
}

/// Client-side mode: the whole collection is loaded and the engine runs locally
pub struct InMemorySource<T> {
    records: Vec<T>,
}

impl<T> InMemorySource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl<T> RecordSource<T> for InMemorySource<T>
where
    T: ListRecord + Clone + Send + Sync + 'static,
{
    async fn fetch(&self, query: &ViewQuery) -> Result<ViewOutput<T>, ClientError> {
        Ok(compute_view(&self.records, query))
    }
}

/// Server-paginated mode: the backend runs the equivalent pipeline
pub struct RemoteSource {
    client: ApiClient,
    resource: String,
}

impl RemoteSource {
    pub fn new(client: ApiClient, resource: impl Into<String>) -> Self {
        Self { client, resource: resource.into() }
    }
}

#[async_trait]
impl<T> RecordSource<T> for RemoteSource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, query: &ViewQuery) -> Result<ViewOutput<T>, ClientError> {
        self.client.list(&self.resource, query).await
    }
}

/// Fetch with the state's current query and apply the result only if no
/// newer fetch was started meanwhile. Returns `None` for a stale result.
pub async fn refresh<T, S>(source: &S, state: &Mutex<ListViewState>) -> Result<Option<ViewOutput<T>>, ClientError>
where
    S: RecordSource<T> + ?Sized,
{
    let (ticket, query) = {
        let mut guard = state.lock().await;
        (guard.begin_fetch(), guard.query().clone())
    };

    let result = source.fetch(&query).await;

    let mut guard = state.lock().await;
    if !guard.is_current(ticket) {
        tracing::debug!("list fetch superseded, dropping its result");
        return Ok(None);
    }
    let output = result?;
    guard.accept(ticket, &output);
    Ok(Some(output))
}
