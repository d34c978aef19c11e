//! Next Step API client

pub mod admin;
pub mod auth;
pub mod calendar;
pub mod refresh;
pub mod reservation;
pub mod session;
pub mod user;

use crate::error::ClientError;
use crate::locale::{ErrorMessages, Locale};
use crate::redirect::RedirectStore;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::token::{Clock, SystemClock, TokenStore};
use crate::types::ErrorBody;
use arc_swap::ArcSwap;
use refresh::RefreshSlot;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Every REST resource lives under this prefix
pub const API_PREFIX: &str = "/api";

/// Called once each time the session is dropped because it could not be renewed
pub type SessionExpiredHandler = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    http: Client,
    base_url: String,
    tokens: TokenStore,
    redirects: RedirectStore,
    locale: ArcSwap<Locale>,
    on_session_expired: Option<SessionExpiredHandler>,
    refresh: RefreshSlot,
}

/// Booking API client.
///
/// Cloning is cheap; clones share tokens, locale, and the in-flight refresh.
#[derive(Clone)]
pub struct NextStepClient {
    inner: Arc<Inner>,
}

impl NextStepClient {
    /// Create a new client with in-memory session storage
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> NextStepClientBuilder {
        NextStepClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub fn redirects(&self) -> &RedirectStore {
        &self.inner.redirects
    }

    /// Locale used for `Accept-Language` and error messages
    pub fn locale(&self) -> Locale {
        **self.inner.locale.load()
    }

    pub fn set_locale(&self, locale: Locale) {
        self.inner.locale.store(Arc::new(locale));
    }

    fn messages(&self) -> &'static ErrorMessages {
        self.locale().messages()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.inner.base_url, API_PREFIX, path)
    }

    fn network_error(&self, source: reqwest::Error) -> ClientError {
        ClientError::Network {
            message: self.messages().network.to_string(),
            source,
        }
    }

    /// GET an authenticated resource
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::GET, path, None).await
    }

    /// Send a JSON body to an authenticated resource
    pub(crate) async fn send<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.execute(method, path, Some(body)).await
    }

    /// Call an authenticated resource without a request body
    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ClientError> {
        self.execute(method, path, None).await
    }

    /// Execute an authenticated request.
    ///
    /// Resolves a bearer token (refreshing it if it is about to expire),
    /// retries exactly once after a `401` if a token was attached, and maps
    /// failure statuses to display-ready errors.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        let token = self.ensure_valid_token().await;
        let mut response = self
            .send_once(method.clone(), path, body.as_deref(), token.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && token.is_some() {
            debug!(%method, path, "Request rejected with 401, forcing token refresh");

            let Some(new_token) = self.refresh_shared().await else {
                return Err(ClientError::SessionExpired(
                    self.messages().session_expired.to_string(),
                ));
            };

            response = self
                .send_once(method.clone(), path, body.as_deref(), Some(&new_token))
                .await?;

            // A fresh token that is still rejected ends the request
            if response.status() == StatusCode::UNAUTHORIZED {
                debug!(%method, path, "Retried request rejected with 401");
                return Err(ClientError::SessionExpired(
                    self.messages().session_expired.to_string(),
                ));
            }
        }

        self.read_response(response).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .inner
            .http
            .request(method, self.api_url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, self.locale().as_str());

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        request.send().await.map_err(|e| self.network_error(e))
    }

    async fn read_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if !status.is_success() {
            let server_message = response
                .bytes()
                .await
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty());
            return Err(ClientError::from_status(
                status.as_u16(),
                server_message,
                self.messages(),
            ));
        }

        // No body to parse
        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }

        let bytes = response.bytes().await.map_err(|e| self.network_error(e))?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Builder for NextStepClient
#[derive(Default)]
pub struct NextStepClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    locale: Locale,
    token_storage: Option<Arc<dyn KeyValueStore>>,
    session_storage: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    on_session_expired: Option<SessionExpiredHandler>,
}

impl NextStepClientBuilder {
    /// Set the origin serving `/api`, e.g. `https://booking.example.com`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a request timeout; by default the transport's own limits apply
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Durable storage for access/refresh tokens
    pub fn token_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.token_storage = Some(storage);
        self
    }

    /// Storage scoped to one session, used for the post-login redirect
    pub fn session_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Register the callback run when a refresh fails and the session is dropped
    pub fn on_session_expired(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(handler));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<NextStepClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("nextstep-client/{}", env!("CARGO_PKG_VERSION"))),
        );

        let http = client_builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let token_storage = self
            .token_storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let session_storage = self
            .session_storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(NextStepClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                tokens: TokenStore::new(token_storage, clock),
                redirects: RedirectStore::new(session_storage),
                locale: ArcSwap::from_pointee(self.locale),
                on_session_expired: self.on_session_expired,
                refresh: RefreshSlot::default(),
            }),
        })
    }
}
