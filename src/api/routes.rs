/*
* Bridge HTTP Routes
* ------------------
* GET  /                - liveness message
* POST /create_vm       - KubeVirt VirtualMachine in the requested namespace
* POST /launch_aap_job  - launch an AAP job template by name
*
* Handlers stay thin: decode the body, hand it to the workflow, and turn the
* result (or BridgeError) into JSON. Every failure goes back to the caller
* with a {"detail": ...} body and the status the workflow picked.
*/

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::api::error::ApiError;
use crate::config::Settings;
use crate::core::{
    AapClient, AutomationClient, JobLaunchRequest, JobLauncher, KubeResourceClient,
    ResourceClient, VirtualMachineRequest, VmProvisioner,
};
use crate::errors::BridgeResult;

pub const ROOT_MESSAGE: &str = "MCP Server for OpenShift Administration is running";

#[derive(Clone)]
pub struct AppState {
    pub vms: VmProvisioner,
    pub jobs: JobLauncher,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        cluster: Arc<dyn ResourceClient>,
        automation: Arc<dyn AutomationClient>,
    ) -> Self {
        Self {
            vms: VmProvisioner::new(cluster),
            jobs: JobLauncher::new(settings.automation.clone(), automation),
        }
    }

    /// Wires the real kube and reqwest adapters. Cluster discovery failing
    /// here is fatal for the caller.
    pub async fn from_settings(settings: &Settings) -> BridgeResult<Self> {
        let cluster = KubeResourceClient::discover(&settings.cluster).await?;
        let automation = AapClient::new(&settings.automation)?;
        Ok(Self::new(settings, Arc::new(cluster), Arc::new(automation)))
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VmCreatedResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JobLaunchedResponse {
    pub status: &'static str,
    pub message: String,
    pub job_id: Option<u64>,
    pub aap_url: String,
}

pub fn create_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/create_vm", post(create_vm))
        .route("/launch_aap_job", post(launch_aap_job))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // oversized bodies surface as a JsonRejection, so they keep the {"detail"} shape
                .layer(DefaultBodyLimit::max(body_limit_bytes)),
        )
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: ROOT_MESSAGE })
}

#[axum::debug_handler]
async fn create_vm(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VirtualMachineRequest>, JsonRejection>,
) -> Result<Json<VmCreatedResponse>, ApiError> {
    let Json(request) = payload?;

    let created = state.vms.create(&request).await?;
    info!("✓ {}", created.message());

    Ok(Json(VmCreatedResponse {
        status: "success",
        message: created.message(),
    }))
}

#[axum::debug_handler]
async fn launch_aap_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JobLaunchRequest>, JsonRejection>,
) -> Result<Json<JobLaunchedResponse>, ApiError> {
    let Json(request) = payload?;

    let launched = state.jobs.launch(&request).await?;

    Ok(Json(JobLaunchedResponse {
        status: "success",
        message: launched.message(),
        job_id: launched.job_id,
        aap_url: launched.aap_url,
    }))
}

async fn fallback_handler(uri: Uri) -> ApiError {
    debug!("No route for {}", uri);
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}
