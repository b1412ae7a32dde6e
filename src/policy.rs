use kube::{Api, Client, api::ListParams};
use tracing::debug;

use crate::crd::Rbs;
use crate::errors::StartupError;

/// Flatten a policy object into (namespace, deployment) pairs.
pub fn monitored_pairs(policy: &Rbs) -> Vec<(String, String)> {
    policy
        .spec
        .namespaces
        .iter()
        .flat_map(|ns| {
            ns.deployments
                .iter()
                .map(move |dp| (ns.name.clone(), dp.clone()))
        })
        .collect()
}

/// Fetch the rollback policy and list every monitored (namespace,
/// deployment) pair. A single Rbs object per installation is expected;
/// only the first is consulted. Failure to obtain the policy means the
/// boot sequence cannot produce a valid seed and must abort.
pub async fn monitored(
    client: &Client,
    namespace: &str,
) -> Result<Vec<(String, String)>, StartupError> {
    let api: Api<Rbs> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .map_err(StartupError::Policy)?;
    let Some(policy) = list.items.first() else {
        return Err(StartupError::EmptyPolicy(namespace.to_string()));
    };
    let pairs = monitored_pairs(policy);
    debug!(namespace, workloads = pairs.len(), "resolved rollback policy");
    Ok(pairs)
}
