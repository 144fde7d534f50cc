use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AutomationSettings, Credentials};
use crate::core::automation::AutomationClient;
use crate::core::resolver::TemplateResolver;
use crate::errors::{BridgeError, BridgeResult};

/// Rendered in the status URL when the controller does not report a job id.
pub const MISSING_JOB_PLACEHOLDER: &str = "None";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLaunchRequest {
    pub job_template_name: String,
    #[serde(default)]
    pub extra_vars: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLaunchResult {
    pub template_name: String,
    pub job_id: Option<u64>,
    pub aap_url: String,
}

impl JobLaunchResult {
    pub fn message(&self) -> String {
        format!("Successfully launched job template '{}'.", self.template_name)
    }
}

pub fn status_url(base_url: &str, job_id: Option<u64>) -> String {
    let job = job_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| MISSING_JOB_PLACEHOLDER.to_string());
    format!("{}/#/jobs/playbook/{}", base_url, job)
}

/// Resolves a template by name, then launches it.
#[derive(Clone)]
pub struct JobLauncher {
    settings: AutomationSettings,
    resolver: TemplateResolver,
    client: Arc<dyn AutomationClient>,
}

impl JobLauncher {
    pub fn new(settings: AutomationSettings, client: Arc<dyn AutomationClient>) -> Self {
        Self {
            settings,
            resolver: TemplateResolver::new(client.clone()),
            client,
        }
    }

    pub async fn launch(&self, request: &JobLaunchRequest) -> BridgeResult<JobLaunchResult> {
        let credentials = self.settings.credentials()?;

        if request.job_template_name.is_empty() {
            return Err(BridgeError::InvalidRequest(
                "job_template_name must not be empty".to_string(),
            ));
        }

        self.launch_with(&credentials, request).await
    }

    pub async fn launch_with(
        &self,
        credentials: &Credentials,
        request: &JobLaunchRequest,
    ) -> BridgeResult<JobLaunchResult> {
        let name = &request.job_template_name;
        let template_id = self.resolver.resolve(credentials, name).await?;

        let launched = self
            .client
            .launch_job_template(credentials, template_id, &request.extra_vars)
            .await?;

        match launched.job {
            Some(job_id) => info!(template = %name, template_id, job_id, "Launched job"),
            None => warn!(template = %name, template_id, "Controller accepted launch but returned no job id"),
        }

        Ok(JobLaunchResult {
            template_name: name.clone(),
            job_id: launched.job,
            aap_url: status_url(&credentials.base_url, launched.job),
        })
    }
}
