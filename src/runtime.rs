use std::sync::Arc;

use kube::Client;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{error, info};

use crate::config::RbsConfig;
use crate::policy;
use crate::store::{SharedStore, StateStore};
use crate::watch::DeploymentObserver;

/// Spawn one periodic publisher for a monitored deployment. The first
/// publication happens immediately; a failed save is logged and retried
/// on the next tick.
pub fn spawn_publisher(
    client: Client,
    store: Arc<StateStore>,
    namespace: String,
    name: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let observer = DeploymentObserver::new(client, &namespace, &name);
        let mut tick = tokio::time::interval(period);
        loop {
            tick.tick().await;
            if let Err(e) = observer.publish(&store).await {
                error!(
                    namespace = %namespace,
                    deployment = %name,
                    error = %e,
                    "publish failed; retrying next cycle"
                );
            }
        }
    })
}

/// Resolve the shared store (fetching or bootstrapping the record), then
/// run one publisher per workload the rollback policy names.
pub async fn run_all(client: Client, cfg: RbsConfig) -> anyhow::Result<()> {
    let shared = SharedStore::new(client.clone(), cfg.clone());
    let store = shared.get().await?.clone();

    let pairs = policy::monitored(&client, &cfg.policy_namespace).await?;
    info!(workloads = pairs.len(), "starting rollout state publishers");

    let period = Duration::from_secs(cfg.poll_interval_secs);
    let publishers: Vec<_> = pairs
        .into_iter()
        .map(|(namespace, name)| {
            spawn_publisher(
                client.clone(),
                store.clone(),
                namespace,
                name,
                period,
            )
        })
        .collect();

    for publisher in publishers {
        publisher.await?;
    }
    Ok(())
}
