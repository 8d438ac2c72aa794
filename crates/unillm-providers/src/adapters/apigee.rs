//! Enterprise gateway behind Apigee OAuth.
//!
//! Each call carries a fresh bearer token from [`OAuthTokenManager`] plus the
//! gateway's routing headers. When the gateway answers 401 the token is
//! refreshed and the same request is sent exactly once more.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use tracing::{debug, warn};
use uuid::Uuid;

use unillm_core::{ProviderConfig, ProviderKind, Result};

use super::chat::ChatCompletionRequest;
use super::http::{endpoint, extract_gateway_text, read_success, send};
use crate::token::{OAuthTokenManager, TokenManager};
use crate::traits::{GenerateRequest, LlmProvider};

const KIND: ProviderKind = ProviderKind::Apigee;

/// Identifiers the gateway routes and meters on.
#[derive(Clone, Debug, Default)]
struct RoutingHeaders {
    use_case_id: String,
    client_id: String,
    api_key: String,
}

/// Per-call tracing headers, reused unchanged on the credential-refresh resend.
struct CallIds {
    request_date: String,
    request_id: String,
    correlation_id: String,
}

impl CallIds {
    fn fresh() -> Self {
        Self {
            request_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request_id: Uuid::new_v4().to_string(),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

pub struct ApigeeProvider {
    http: reqwest::Client,
    api_base: String,
    model: String,
    routing: RoutingHeaders,
    tokens: Arc<dyn TokenManager>,
    available: bool,
}

impl std::fmt::Debug for ApigeeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApigeeProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("use_case_id", &self.routing.use_case_id)
            .field("client_id", &self.routing.client_id)
            .finish_non_exhaustive()
    }
}

impl ApigeeProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        let oauth = config.oauth().cloned().unwrap_or_default();
        let tokens = Arc::new(OAuthTokenManager::new(KIND, &oauth, http.clone()));
        Self::with_token_manager(config, http, tokens)
    }

    pub fn with_token_manager(
        config: &ProviderConfig,
        http: reqwest::Client,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        let oauth = config.oauth().cloned().unwrap_or_default();
        Self {
            http,
            api_base: config.base_url.clone().unwrap_or_default(),
            model: config.model.clone(),
            routing: RoutingHeaders {
                use_case_id: oauth.use_case_id.unwrap_or_default(),
                client_id: oauth.client_id.unwrap_or_default(),
                api_key: oauth.gateway_api_key.unwrap_or_default(),
            },
            tokens,
            available: config.is_available(),
        }
    }

    fn build(
        &self,
        token: &str,
        ids: &CallIds,
        body: &ChatCompletionRequest,
    ) -> reqwest::RequestBuilder {
        self.http
            .post(endpoint(&self.api_base, "v1/chat/completions"))
            .bearer_auth(token)
            .header("x-wf-request-date", &ids.request_date)
            .header("x-request-id", &ids.request_id)
            .header("x-correlation-id", &ids.correlation_id)
            .header("X-WF-client-id", &self.routing.client_id)
            .header("X-WF-api-key", &self.routing.api_key)
            .header("X-WF-usecase-id", &self.routing.use_case_id)
            .json(body)
    }
}

#[async_trait]
impl LlmProvider for ApigeeProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let ids = CallIds::fresh();
        debug!(
            provider = %KIND,
            model = %self.model,
            request_id = %ids.request_id,
            "Calling LLM"
        );

        let body = ChatCompletionRequest::new(&self.model, request);
        let token = self.tokens.get_token().await?;
        let mut response = send(KIND, self.build(&token, &ids, &body)).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(provider = %KIND, request_id = %ids.request_id, "Gateway rejected token, refreshing");
            let token = self.tokens.refresh().await?;
            response = send(KIND, self.build(&token, &ids, &body)).await?;
        }

        let text = read_success(KIND, response).await?;
        extract_gateway_text(KIND, &text)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
