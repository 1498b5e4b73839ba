//! HTTP API client for the CultivApp backend
//!
//! Every request carries `Authorization: Bearer <token>`. Without a token the
//! header is still sent, empty; the backend decides what to do with it.

use crate::api::{endpoints, types::*};
use crate::catalog::{RuleFilter, RuleSource};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::stages::StageBatchSink;
use async_trait::async_trait;
use cultivapp_common::{Rule, RuleId, RuleType, StageType};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// API client for the CultivApp backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Create from resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.server_url.clone(),
            config.token.clone(),
            config.timeout_secs,
        )
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let auth = self
            .token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
            .unwrap_or_default();

        self.client.request(method, url).header(AUTHORIZATION, auth)
    }

    /// Send and fail on non-success statuses, keeping the body text as detail.
    async fn send(&self, builder: RequestBuilder, context: &str) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "{} failed", context);
        let detail = if body.trim().is_empty() {
            status.to_string()
        } else {
            format!("{} ({})", body.trim(), status)
        };
        Err(CliError::api(format!("{}: {}", context, detail)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, url), context).await?;
        Ok(response.json().await?)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Stage-type catalog. Unknown identifiers are skipped.
    pub async fn stage_types(&self) -> Result<Vec<StageType>> {
        let url = endpoints::stage_types_url(&self.base_url);
        let raw: Vec<String> = self.get_json(&url, "Error fetching stage types").await?;

        Ok(raw
            .into_iter()
            .filter_map(|name| match name.parse::<StageType>() {
                Ok(stage) => Some(stage),
                Err(_) => {
                    warn!(stage_type = %name, "Ignoring unknown stage type from catalog");
                    None
                },
            })
            .collect())
    }

    /// Create a species' stage sequence in one call
    pub async fn create_stages_batch(&self, requests: &[EtapaRequest]) -> Result<Vec<EtapaSummary>> {
        let url = endpoints::stages_batch_url(&self.base_url);
        debug!(stages = requests.len(), "Submitting stage batch");

        let response = self
            .send(
                self.request(Method::POST, &url).json(requests),
                "Error creating stage batch",
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Stages configured for a species, in backend order
    pub async fn stages_by_especie(&self, especie_id: i64) -> Result<Vec<EtapaSummary>> {
        let url = endpoints::stages_by_especie_url(&self.base_url, especie_id);
        let mut stages: Vec<EtapaSummary> = self
            .get_json(&url, "Error fetching stages for species")
            .await?;
        stages.sort_by_key(|s| s.orden);
        Ok(stages)
    }

    // ========================================================================
    // Rules
    // ========================================================================

    /// Rule catalog, optionally restricted to some rule types
    pub async fn list_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>> {
        let url = endpoints::rules_url(&self.base_url);
        let mut builder = self.request(Method::GET, &url);
        if let RuleFilter::Types(types) = filter {
            let query: Vec<(&str, &str)> = types.iter().map(|t| ("tipo", t.code())).collect();
            builder = builder.query(&query);
        }

        let response = self.send(builder, "Error fetching rules").await?;
        Ok(response.json().await?)
    }

    pub async fn rule_types(&self) -> Result<Vec<RuleType>> {
        let url = endpoints::rule_types_url(&self.base_url);
        self.get_json(&url, "Error fetching rule types").await
    }

    pub async fn create_rule(&self, rule: &NewRule) -> Result<Rule> {
        let url = endpoints::rules_url(&self.base_url);
        let response = self
            .send(
                self.request(Method::POST, &url).json(rule),
                "Error creating rule",
            )
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_rule(&self, id: RuleId) -> Result<()> {
        let url = endpoints::rule_url(&self.base_url, id.0);
        self.send(self.request(Method::DELETE, &url), "Error deleting rule")
            .await?;
        Ok(())
    }

    // ========================================================================
    // Crops and tasks
    // ========================================================================

    pub async fn get_crop(&self, id: i64) -> Result<Cultivo> {
        let url = endpoints::crop_url(&self.base_url, id);
        self.get_json(&url, "Error fetching crop").await
    }

    /// All crops, or only those of one user
    pub async fn list_crops(&self, usuario_id: Option<i64>) -> Result<Vec<Cultivo>> {
        let url = match usuario_id {
            Some(id) => endpoints::crops_by_usuario_url(&self.base_url, id),
            None => endpoints::crops_url(&self.base_url),
        };
        self.get_json(&url, "Error fetching crops").await
    }

    /// Mark a task as executed. Health scores are recomputed server-side.
    pub async fn execute_task(&self, tarea_id: i64) -> Result<()> {
        let url = endpoints::execute_task_url(&self.base_url);
        self.send(
            self.request(Method::POST, &url).json(&tarea_id),
            "Error executing task",
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RuleSource for ApiClient {
    async fn fetch_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>> {
        self.list_rules(filter).await
    }
}

#[async_trait]
impl StageBatchSink for ApiClient {
    async fn save_stages(&self, requests: &[EtapaRequest]) -> Result<()> {
        self.create_stages_batch(requests).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
        ApiClient::new(server.uri(), token.map(str::to_string), 5).unwrap()
    }

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new("http://localhost:8080".to_string(), None, 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reglas/tipos"))
            .and(header("authorization", "Bearer secreto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["RIEGO"])))
            .expect(1)
            .mount(&server)
            .await;

        let types = client(&server, Some("secreto")).rule_types().await.unwrap();
        assert_eq!(types, vec![RuleType::Riego]);
    }

    #[tokio::test]
    async fn test_missing_token_sends_empty_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reglas/tipos"))
            .and(|req: &Request| {
                req.headers
                    .get("authorization")
                    .is_some_and(|value| value.is_empty())
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let types = client(&server, None).rule_types().await.unwrap();
        assert!(types.is_empty());
    }

    #[tokio::test]
    async fn test_stage_types_skip_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/etapas/tipos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["SIEMBRA", "CRECIMIENTO", "COSECHA"])),
            )
            .mount(&server)
            .await;

        let types = client(&server, None).stage_types().await.unwrap();
        assert_eq!(types, vec![StageType::Siembra, StageType::Cosecha]);
    }

    #[tokio::test]
    async fn test_filtered_rules_use_tipo_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reglas"))
            .and(query_param("tipo", "RIEGO"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "descripcion": "Regar", "tipo": "RIEGO", "intervaloDias": 2 }
            ])))
            .mount(&server)
            .await;

        let filter = RuleFilter::Types(BTreeSet::from([RuleType::Riego]));
        let rules = client(&server, None).list_rules(&filter).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, RuleId(1));
    }

    #[tokio::test]
    async fn test_batch_error_keeps_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/etapas/batch"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string("Debe especificar al menos 1 regla para la etapa"),
            )
            .mount(&server)
            .await;

        let err = client(&server, None)
            .create_stages_batch(&[])
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Api(_)));
        assert!(err.to_string().contains("Debe especificar al menos 1 regla"));
    }

    #[tokio::test]
    async fn test_execute_task_posts_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tareas/ejecutar"))
            .and(body_json(serde_json::json!(42)))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, None).execute_task(42).await.unwrap();
    }
}
