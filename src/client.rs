//! Notes API Client
//!
//! HTTP client for the notes backend. Attaches the stored access token to
//! outgoing requests and, on a 401, refreshes the token once and retries.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::core::{create_transport, HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport};
use crate::error::{
    create_error_from_response, ApiError, ConfigurationError, ProtocolError, UNAUTHORIZED_STATUS,
};
use crate::services::{AuthService, NotesService};
use crate::storage::EncodedStorage;
use crate::token::{RefreshCoordinator, RefreshState, RefreshStats, TokenStore};
use crate::types::{ApiRequest, ClientConfig};

/// Parse and check a base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(base_url).map_err(|_| ConfigurationError::InvalidBaseUrl {
        url: base_url.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: base_url.to_string(),
        });
    }
    Ok(url)
}

/// Append `path` to `base` and encode `query` as form pairs.
fn join_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<String, ApiError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|_| ConfigurationError::InvalidBaseUrl {
        url: joined.clone(),
    })?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

/// Notes API client.
pub struct ApiClient<T: HttpTransport = ReqwestHttpTransport> {
    config: ClientConfig,
    base_url: Url,
    transport: Arc<T>,
    tokens: TokenStore,
    refresh: RefreshCoordinator<T>,
}

impl ApiClient<ReqwestHttpTransport> {
    /// Create a client with the reqwest transport and storage opened from
    /// `config.storage_path`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let storage = Arc::new(EncodedStorage::open(config.storage_path.as_deref()));
        Self::with_storage(config, storage)
    }

    /// Create a client with the reqwest transport over existing storage.
    pub fn with_storage(config: ClientConfig, storage: Arc<EncodedStorage>) -> Result<Self, ApiError> {
        let transport = create_transport(Some(config.timeout))?;
        Self::with_transport(config, transport, storage)
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: T,
        storage: Arc<EncodedStorage>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let refresh_url = join_url(&base_url, &config.refresh_path, &[])?;
        let transport = Arc::new(transport);
        let tokens = TokenStore::new(storage);
        let refresh = RefreshCoordinator::new(
            transport.clone(),
            tokens.clone(),
            refresh_url,
            config.timeout,
        );

        debug!(base_url = %base_url, "notes API client created");

        Ok(Self {
            config,
            base_url,
            transport,
            tokens,
            refresh,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Token store shared with the auth observer.
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Encoded storage the tokens live in.
    pub fn storage(&self) -> &Arc<EncodedStorage> {
        self.tokens.storage()
    }

    /// Current refresh state.
    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Refresh counters.
    pub fn refresh_stats(&self) -> &RefreshStats {
        self.refresh.stats()
    }

    /// Sign-in, sign-up and logout.
    pub fn auth(&self) -> AuthService<'_, T> {
        AuthService::new(self)
    }

    /// Notes and groups.
    pub fn notes(&self) -> NotesService<'_, T> {
        NotesService::new(self)
    }

    /// Absolute URL of an endpoint path.
    pub fn url_for(&self, path: &str) -> Result<String, ApiError> {
        join_url(&self.base_url, path, &[])
    }

    /// Build and send one attempt. Returns the response together with the
    /// access token the request carried.
    async fn dispatch(&self, request: &ApiRequest) -> Result<(HttpResponse, Option<String>), ApiError> {
        let mut headers = HashMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        if request.body.is_some() {
            headers.insert("content-type".to_string(), "application/json".to_string());
        }

        let mut sent_with = None;
        if request.include_auth_token {
            let tokens = self.tokens.get_tokens();
            if let Some(authorization) = tokens.authorization_header() {
                headers.insert("authorization".to_string(), authorization);
                sent_with = tokens.access_token;
            }
        }

        let http_request = HttpRequest {
            method: request.method,
            url: join_url(&self.base_url, &request.path, &request.query)?,
            headers,
            body: request.body.clone(),
            timeout: Some(self.config.timeout),
        };

        let response = self.transport.send(http_request).await?;
        Ok((response, sent_with))
    }

    fn check(response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(create_error_from_response(
                response.status,
                &response.status_text,
                &response.body,
            ))
        }
    }

    /// Send a request.
    ///
    /// A 401 triggers one token refresh and one retry of the same request.
    /// If the refresh cannot be done the stored tokens are cleared and
    /// [`ApiError::Unauthorized`] is returned. A 401 on the retry is
    /// returned as [`ApiError::Status`].
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let (response, sent_with) = self.dispatch(&request).await?;
        if response.status != UNAUTHORIZED_STATUS {
            return Self::check(response);
        }

        debug!("401 received, recovering credentials");
        self.refresh.recover(sent_with.as_deref()).await?;

        let (retried, _) = self.dispatch(&request).await?;
        debug!(status = retried.status, "request retried");
        Self::check(retried)
    }

    /// Send a request and decode its JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.send(request).await?;
        serde_json::from_str(&response.body).map_err(|e| {
            ApiError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }

    /// Send a request, discarding the body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

impl<T: HttpTransport> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

/// Create a notes API client with default components.
pub fn api_client(config: ClientConfig) -> Result<ApiClient, ApiError> {
    ApiClient::new(config)
}
