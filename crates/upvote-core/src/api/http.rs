//! HTTP client for the feature request service.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::FeatureApi;
use crate::config::ClientConfig;
use crate::models::{Feature, FeatureId, FeatureStats, NewFeature};
use crate::util::{compact_text, is_http_url};
use crate::{Error, Result};

/// JSON-over-HTTP client for the feature API
#[derive(Debug, Clone)]
pub struct HttpFeatureApi {
    base_url: String,
    health_url: String,
    client: reqwest::Client,
}

impl HttpFeatureApi {
    /// Builds a client for an explicit API base URL (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let health_url = derive_health_url(&base_url);
        Self::build(base_url, health_url, None)
    }

    /// Builds a client from resolved client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.api_base_url)?;
        let health_url = match config.health_url.as_deref() {
            Some(url) => {
                normalize_base_url(url)?;
                url.trim().to_string()
            }
            None => derive_health_url(&base_url),
        };
        Self::build(base_url, health_url, config.request_timeout())
    }

    fn build(base_url: String, health_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url,
            health_url,
            client: builder.build()?,
        })
    }

    /// Returns the normalized API base URL used by this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    /// Replace a feature's title and description.
    pub async fn update_feature(&self, id: FeatureId, feature: &NewFeature) -> Result<Feature> {
        let response = self
            .send(
                self.request(Method::PUT, &format!("/features/{id}/"))
                    .json(feature),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Delete a feature and, server-side, all of its votes.
    pub async fn delete_feature(&self, id: FeatureId) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/features/{id}/")))
            .await?;
        Ok(())
    }

    /// Call the service health endpoint.
    pub async fn health_check(&self) -> Result<serde_json::Value> {
        let unavailable = |error: reqwest::Error| {
            tracing::debug!("Health check failed: {}", error);
            Error::BackendUnavailable
        };
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(unavailable)?;
        response.json().await.map_err(unavailable)
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, route);
        tracing::debug!("Making {} request to: {}", method, url);
        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|error| {
            tracing::warn!("API request failed: {}", error);
            Error::Http(error)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = parse_api_error(status, &body);
        tracing::warn!("API request failed with HTTP {}: {}", status.as_u16(), message);
        if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(message))
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, route)).await?;
        Ok(response.json().await?)
    }
}

impl FeatureApi for HttpFeatureApi {
    async fn list_features(&self) -> Result<Vec<Feature>> {
        self.get_json("/features/").await
    }

    async fn get_feature(&self, id: FeatureId) -> Result<Feature> {
        self.get_json(&format!("/features/{id}/")).await
    }

    async fn create_feature(&self, feature: &NewFeature) -> Result<Feature> {
        let response = self
            .send(self.request(Method::POST, "/features/").json(feature))
            .await?;
        Ok(response.json().await?)
    }

    async fn increment_vote(&self, id: FeatureId) -> Result<()> {
        self.send(self.request(Method::POST, &format!("/features/{id}/upvote/")))
            .await?;
        Ok(())
    }

    async fn decrement_vote(&self, id: FeatureId) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/features/{id}/remove-vote/")))
            .await?;
        Ok(())
    }

    async fn get_feature_stats(&self, id: FeatureId) -> Result<FeatureStats> {
        self.get_json(&format!("/features/{id}/stats/")).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

/// Extract a readable message from an error response body.
///
/// Prefers the `error` field, then `message`/`detail`; falls back to
/// `HTTP error <status>` when the body carries none of them.
fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload
            .error
            .or(payload.message)
            .or(payload.detail)
            .map(|message| compact_text(&message))
            .filter(|message| !message.is_empty())
        {
            return message;
        }
    }

    format!("HTTP error {}", status.as_u16())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

/// `http://host:8000/api` -> `http://host:8000/health/`
fn derive_health_url(base_url: &str) -> String {
    let scheme_end = base_url.find("://").map_or(0, |index| index + 3);
    let origin_end = base_url[scheme_end..]
        .find('/')
        .map_or(base_url.len(), |index| scheme_end + index);
    format!("{}/health/", &base_url[..origin_end])
}
