use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::{AutomationSettings, Credentials};
use crate::errors::{BridgeError, BridgeResult};

/// One page of `GET /api/v2/job_templates/`. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct JobTemplatePage {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<JobTemplateSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTemplateSummary {
    pub id: u64,
}

/// Body of `POST /api/v2/job_templates/{id}/launch/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchResponse {
    #[serde(default)]
    pub job: Option<u64>,
}

#[async_trait]
pub trait AutomationClient: Send + Sync {
    async fn list_job_templates(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> BridgeResult<JobTemplatePage>;

    async fn launch_job_template(
        &self,
        credentials: &Credentials,
        template_id: u64,
        extra_vars: &Map<String, Value>,
    ) -> BridgeResult<LaunchResponse>;
}

/// reqwest-backed client for the AAP controller REST API.
#[derive(Clone)]
pub struct AapClient {
    http: reqwest::Client,
}

impl AapClient {
    pub fn new(settings: &AutomationSettings) -> BridgeResult<Self> {
        if !settings.verify_tls {
            warn!("⚠️ TLS certificate verification for the AAP controller is disabled");
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|e| {
                BridgeError::Misconfigured(format!("Could not build AAP HTTP client: {}", e))
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl AutomationClient for AapClient {
    async fn list_job_templates(
        &self,
        credentials: &Credentials,
        name: &str,
    ) -> BridgeResult<JobTemplatePage> {
        let url = format!("{}/api/v2/job_templates/", credentials.base_url);
        debug!("Looking up job template '{}' at {}", name, url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credentials.token)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("name", name)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(BridgeError::lookup_failed)?;

        response
            .json::<JobTemplatePage>()
            .await
            .map_err(BridgeError::lookup_failed)
    }

    async fn launch_job_template(
        &self,
        credentials: &Credentials,
        template_id: u64,
        extra_vars: &Map<String, Value>,
    ) -> BridgeResult<LaunchResponse> {
        let url = format!(
            "{}/api/v2/job_templates/{}/launch/",
            credentials.base_url, template_id
        );
        debug!("Launching job template {} at {}", template_id, url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&credentials.token)
            .json(&json!({ "extra_vars": extra_vars }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(BridgeError::launch_failed)?;

        response
            .json::<LaunchResponse>()
            .await
            .map_err(BridgeError::launch_failed)
    }
}
