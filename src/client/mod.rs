pub mod error;
pub mod source;
pub mod token_store;

pub use error::ClientError;
pub use source::{refresh, InMemorySource, RecordSource, RemoteSource};
pub use token_store::{StoredSession, TokenStore};

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::api::{DataEnvelope, ErrorBody, ListEnvelope, LoginRequest, LoginResponse};
use crate::permission::User;
use crate::view::{ViewOutput, ViewParams, ViewQuery};

/// Thin REST client for the portal backend.
/// Every request after login carries `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let timeout = crate::config::config().api.request_timeout_secs;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base(base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base(base_url: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(base_url.trim())?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        tracing::debug!("request rejected with {}: {}", status, body.message);
        Err(ClientError::from_status(status.as_u16(), body))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST /auth/login
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest::new(username, password);
        if let Err(field_errors) = request.validate() {
            return Err(ClientError::Validation {
                message: "Invalid login form".to_string(),
                field_errors,
            });
        }
        let url = self.endpoint("auth/login")?;
        // no session exists yet, so a 401 here means bad credentials
        let envelope: DataEnvelope<LoginResponse> =
            match Self::send_json(self.http.post(url).json(&request)).await {
                Err(ClientError::AuthExpiry) => {
                    return Err(ClientError::ServerRejection {
                        status: 401,
                        message: "Invalid username or password".to_string(),
                        field_errors: None,
                    })
                }
                other => other?,
            };
        Ok(envelope.data)
    }

    /// GET /api/auth/whoami
    pub async fn whoami(&self) -> Result<User, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::AuthExpiry);
        }
        let url = self.endpoint("api/auth/whoami")?;
        let envelope: DataEnvelope<User> = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(envelope.data)
    }

    /// GET /api/data/:resource with filters, search, sort and page as query parameters
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ViewQuery,
    ) -> Result<ViewOutput<T>, ClientError> {
        let mut url = self.endpoint(&format!("api/data/{}", resource))?;
        url.query_pairs_mut().extend_pairs(ViewParams::encode(query));
        tracing::debug!("fetching {}", url);
        let envelope: ListEnvelope<T> = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(envelope.into_view())
    }

    /// GET /api/data/:resource/:id
    pub async fn get<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<T, ClientError> {
        let url = self.endpoint(&format!("api/data/{}/{}", resource, id))?;
        let envelope: DataEnvelope<T> = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(envelope.data)
    }

    /// DELETE /api/data/:resource/:id
    pub async fn delete(&self, resource: &str, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("api/data/{}/{}", resource, id))?;
        Self::check(self.request(Method::DELETE, url).send().await?).await?;
        Ok(())
    }
}
