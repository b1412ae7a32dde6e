use std::collections::BTreeMap;

use kube::Client;
use tracing::info;

use crate::config::RbsConfig;
use crate::errors::StartupError;
use crate::policy;
use crate::watch::DeploymentObserver;

/// Compute the initial record contents: the facts of every deployment the
/// rollback policy names, merged last-write-wins. A workload that is
/// missing or unreadable contributes nothing; only an unobtainable policy
/// aborts the boot.
pub async fn seed(
    client: &Client,
    cfg: &RbsConfig,
    data: &mut BTreeMap<String, String>,
) -> Result<(), StartupError> {
    let pairs = policy::monitored(client, &cfg.policy_namespace).await?;
    info!(workloads = pairs.len(), "seeding initial rollout state");
    for (namespace, name) in pairs {
        let observer = DeploymentObserver::new(client.clone(), &namespace, &name);
        data.extend(observer.observe().await.facts());
    }
    Ok(())
}
