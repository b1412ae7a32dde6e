use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rollback policy resource: enumerates the namespaces and deployments
/// this installation monitors. Owned and applied by operators; consumed
/// read-only here.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "doit-intl.com",
    version = "v1",
    kind = "Rbs",
    plural = "rbs",
    namespaced
)]
pub struct RbsSpec {
    #[serde(default)]
    pub namespaces: Vec<NamespacePolicy>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
pub struct NamespacePolicy {
    /// Namespace to monitor.
    pub name: String,
    /// Deployment names within the namespace; empty means none.
    #[serde(default)]
    pub deployments: Vec<String>,
}
