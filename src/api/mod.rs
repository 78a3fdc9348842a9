pub mod menu;
pub mod orders;
pub mod tables;

use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{app_error::AppError, config::BackendConfig, normalize, session::Session};

pub use menu::MenuApi;
pub use orders::OrderApi;
pub use tables::TableApi;

/// Everything the panels need from the restaurant backend.
pub trait Backend: MenuApi + TableApi + OrderApi {}

impl<T: MenuApi + TableApi + OrderApi> Backend for T {}

const BACKEND_NAME: &str = "RestaurantBackend";

/// reqwest client for the restaurant REST backend.
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: Url,
}

impl RestBackend {
    pub fn new(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Backend URL cannot be a base: {}", base_url));
        }
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Self::new(client, &config.url)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        session: &Session,
    ) -> Result<RequestBuilder, AppError> {
        let url = self.endpoint(segments)?;
        debug!("{} {} as {}", method, url, session.role);

        let builder = self.client.request(method, url);
        Ok(match &session.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Sends the request and returns the decoded JSON body.
    ///
    /// Non-success responses become `reject(reason)`, where the reason is the
    /// backend's own message or `fallback` when it gave none.
    async fn send(
        &self,
        builder: RequestBuilder,
        reject: fn(String) -> AppError,
        fallback: &str,
    ) -> Result<Value, AppError> {
        let response = builder.send().await.map_err(|err| {
            warn!("{} request failed: {}", BACKEND_NAME, err);
            AppError::ServiceUnreachable(BACKEND_NAME.into())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read backend response")?;

        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else if status.is_success() {
            serde_json::from_str(&body).context("Failed to parse JSON")?
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };

        if !status.is_success() {
            let reason = normalize::error_message(&value).unwrap_or_else(|| fallback.to_string());
            warn!("{} answered {}: {}", BACKEND_NAME, status, reason);
            return Err(reject(reason));
        }

        Ok(value)
    }

    /// Reloads a list after a mutation the backend already accepted.
    /// A failed reload does not undo the mutation, so it yields `None`.
    async fn relist<T>(
        &self,
        listing: impl Future<Output = Result<Vec<T>, AppError>>,
        what: &str,
    ) -> Option<Vec<T>> {
        match listing.await {
            Ok(list) => Some(list),
            Err(err) => {
                warn!("{} changed but could not be reloaded: {}", what, err);
                None
            }
        }
    }

    async fn get(
        &self,
        segments: &[&str],
        session: &Session,
        fallback: &str,
    ) -> Result<Value, AppError> {
        let builder = self.request(Method::GET, segments, session)?;
        self.send(builder, AppError::Upstream, fallback).await
    }
}
