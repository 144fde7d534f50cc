use async_trait::async_trait;
use kube::api::{Api, DynamicObject, PostParams};
use kube::config::KubeConfigOptions;
use kube::core::ApiResource;
use kube::{Client, Config};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClusterSettings;
use crate::errors::{BridgeError, BridgeResult};

/// Coordinates of a namespaced custom resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomResourceTarget {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
}

impl CustomResourceTarget {
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.to_string(),
            version: self.version.to_string(),
            kind: self.kind.to_string(),
            api_version: self.api_version(),
            plural: self.plural.to_string(),
        }
    }
}

/// The one cluster capability the bridge needs.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create_custom_resource(
        &self,
        target: &CustomResourceTarget,
        namespace: &str,
        body: &Value,
    ) -> BridgeResult<()>;
}

#[derive(Clone)]
pub struct KubeResourceClient {
    client: Client,
}

impl KubeResourceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// In-cluster service account first, then the local kubeconfig.
    pub async fn discover(settings: &ClusterSettings) -> BridgeResult<Self> {
        let mut config = match Config::incluster() {
            Ok(config) => {
                info!("Using in-cluster service account credentials");
                config
            }
            Err(in_cluster) => {
                debug!("In-cluster config unavailable ({}), trying kubeconfig", in_cluster);
                Config::from_kubeconfig(&KubeConfigOptions::default())
                    .await
                    .map_err(|e| BridgeError::ClusterDiscovery(e.to_string()))?
            }
        };
        config.connect_timeout = Some(settings.timeout());
        config.read_timeout = Some(settings.timeout());

        info!("Kubernetes API server: {}", config.cluster_url);
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> BridgeResult<Self> {
        let client = Client::try_from(config)
            .map_err(|e| BridgeError::ClusterDiscovery(e.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    async fn create_custom_resource(
        &self,
        target: &CustomResourceTarget,
        namespace: &str,
        body: &Value,
    ) -> BridgeResult<()> {
        let api_resource = target.api_resource();
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &api_resource);

        let object: DynamicObject = serde_json::from_value(body.clone()).map_err(|e| {
            BridgeError::Orchestration {
                status: 500,
                reason: format!("invalid {} manifest: {}", target.kind, e),
            }
        })?;

        match api.create(&PostParams::default(), &object).await {
            Ok(created) => {
                debug!(
                    "Created {} {:?} (resourceVersion: {:?})",
                    target.kind, created.metadata.name, created.metadata.resource_version
                );
                Ok(())
            }
            Err(e) => {
                debug!("Failed to create {} in namespace {}: {}", target.kind, namespace, e);
                Err(orchestration_error(e))
            }
        }
    }
}

fn orchestration_error(err: kube::Error) -> BridgeError {
    match err {
        kube::Error::Api(response) => {
            let reason = if response.reason.is_empty() {
                response.message
            } else {
                response.reason
            };
            BridgeError::Orchestration { status: response.code, reason }
        }
        other => BridgeError::Orchestration { status: 500, reason: other.to_string() },
    }
}
