pub mod automation;
pub mod cluster;
pub mod jobs;
pub mod resolver;
pub mod vm;

// exports for the api and cli layers
pub use automation::{AapClient, AutomationClient, JobTemplatePage, JobTemplateSummary, LaunchResponse};
pub use cluster::{CustomResourceTarget, KubeResourceClient, ResourceClient};
pub use jobs::{JobLaunchRequest, JobLaunchResult, JobLauncher};
pub use resolver::{TemplateLookup, TemplateResolver};
pub use vm::{VirtualMachineRequest, VmCreated, VmProvisioner};
