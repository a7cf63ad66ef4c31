//! HTTP client for the Nutritionix natural-language nutrients endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::types::config::{ApiConfig, ApiCredentials, Config};
use crate::types::requests::NutrientsRequest;
use crate::{FructError, FructResult};

use super::base::{FetchedPayload, NutritionSource};

/// Nutritionix `v2/natural/nutrients` client.
pub struct NutritionixClient {
    credentials: ApiCredentials,
    endpoint: String,
    remote_user_id: String,
    client: Client,
}

impl std::fmt::Debug for NutritionixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutritionixClient")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl NutritionixClient {
    /// Creates a client with explicit credentials.
    pub fn new(credentials: ApiCredentials, api: &ApiConfig) -> FructResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            credentials,
            endpoint: api.endpoint.clone(),
            remote_user_id: api.remote_user_id.clone(),
            client,
        })
    }

    /// Creates a client, resolving credentials from the environment and config.
    pub fn from_config(config: &Config) -> FructResult<Self> {
        Self::new(config.credentials()?, &config.api)
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NutritionSource for NutritionixClient {
    fn name(&self) -> &str {
        "nutritionix"
    }

    async fn fetch(&self, query: &str) -> FructResult<FetchedPayload> {
        tracing::info!(query, endpoint = %self.endpoint, "querying Nutritionix");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-app-id", &self.credentials.app_id)
            .header("x-app-key", &self.credentials.app_key)
            .header("x-remote-user-id", &self.remote_user_id)
            .json(&NutrientsRequest::new(query))
            .send()
            .await?;

        let status = response.status().as_u16();
        let raw = response.text().await?;

        tracing::debug!(status, bytes = raw.len(), "Nutritionix responded");

        interpret_response(query, status, raw)
    }
}

/// Maps an HTTP status and body onto a payload or an error.
///
/// 404 is how Nutritionix reports "no foods matched", so it becomes
/// `NotFound`; other failures are infrastructure errors.
pub(crate) fn interpret_response(query: &str, status: u16, raw: String) -> FructResult<FetchedPayload> {
    if status == 404 {
        return Err(FructError::not_found(format!(
            "'{}' ({})",
            query,
            error_message(&raw)
        )));
    }

    if !(200..300).contains(&status) {
        return Err(FructError::Api {
            status,
            message: error_message(&raw),
        });
    }

    let payload: Value = serde_json::from_str(&raw).map_err(|e| {
        FructError::not_found(format!("'{}' (unreadable response: {})", query, e))
    })?;

    Ok(FetchedPayload { payload, raw })
}

/// Pulls the `message` field out of an error body, falling back to the text.
fn error_message(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| raw.chars().take(200).collect())
}
