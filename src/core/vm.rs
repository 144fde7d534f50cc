use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::core::cluster::{CustomResourceTarget, ResourceClient};
use crate::errors::{BridgeError, BridgeResult};

pub const VIRTUAL_MACHINES: CustomResourceTarget = CustomResourceTarget {
    group: "kubevirt.io",
    version: "v1",
    kind: "VirtualMachine",
    plural: "virtualmachines",
};

pub const CONTAINER_DISK_NAME: &str = "containerdisk";
pub const CONTAINER_DISK_IMAGE: &str = "quay.io/containerdisks/rhel:9";
pub const MEMORY_REQUEST: &str = "2Gi";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualMachineRequest {
    pub vm_name: String,
    pub namespace: String,
}

impl VirtualMachineRequest {
    pub fn validate(&self) -> BridgeResult<()> {
        validate_dns_label("vm_name", &self.vm_name)?;
        validate_dns_label("namespace", &self.namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmCreated {
    pub vm_name: String,
    pub namespace: String,
}

impl VmCreated {
    pub fn message(&self) -> String {
        format!(
            "VirtualMachine '{}' created successfully in namespace '{}'.",
            self.vm_name, self.namespace
        )
    }
}

/// The VM shape is fixed: RHEL container disk, 2Gi of memory, not started.
/// Only the name varies; the namespace is applied by the create call.
pub fn build_manifest(vm_name: &str) -> Value {
    json!({
        "apiVersion": VIRTUAL_MACHINES.api_version(),
        "kind": VIRTUAL_MACHINES.kind,
        "metadata": { "name": vm_name },
        "spec": {
            "running": false,
            "template": {
                "spec": {
                    "domain": {
                        "devices": {
                            "disks": [{
                                "name": CONTAINER_DISK_NAME,
                                "disk": { "bus": "virtio" }
                            }]
                        },
                        "resources": { "requests": { "memory": MEMORY_REQUEST } }
                    },
                    "volumes": [{
                        "name": CONTAINER_DISK_NAME,
                        "containerDisk": { "image": CONTAINER_DISK_IMAGE }
                    }]
                }
            }
        }
    })
}

#[derive(Clone)]
pub struct VmProvisioner {
    client: Arc<dyn ResourceClient>,
}

impl VmProvisioner {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &VirtualMachineRequest) -> BridgeResult<VmCreated> {
        request.validate()?;

        info!(vm = %request.vm_name, namespace = %request.namespace, "Creating VirtualMachine");
        let manifest = build_manifest(&request.vm_name);
        self.client
            .create_custom_resource(&VIRTUAL_MACHINES, &request.namespace, &manifest)
            .await?;

        Ok(VmCreated {
            vm_name: request.vm_name.clone(),
            namespace: request.namespace.clone(),
        })
    }
}

// RFC 1123 label: what the API server accepts for namespaces and VM names
fn validate_dns_label(field: &str, value: &str) -> BridgeResult<()> {
    let invalid = |why: &str| -> BridgeResult<()> {
        Err(BridgeError::InvalidRequest(format!("{} '{}' {}", field, value, why)))
    };

    if value.is_empty() {
        return Err(BridgeError::InvalidRequest(format!("{} must not be empty", field)));
    }
    if value.len() > 63 {
        return invalid("must be no more than 63 characters");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return invalid("must consist of lower case alphanumeric characters or '-'");
    }
    if value.starts_with('-') || value.ends_with('-') {
        return invalid("must start and end with an alphanumeric character");
    }
    Ok(())
}
