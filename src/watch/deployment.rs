use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::{Api, Client};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::store::StateStore;

/// Condition type marking an active rollout.
pub const PROGRESSING_CONDITION: &str = "Progressing";

pub fn last_update_key(namespace: &str, name: &str) -> String {
    format!("{namespace}-{name}-LastUpdateTime")
}

pub fn image_key(namespace: &str, name: &str, container: &str) -> String {
    format!("{namespace}-{name}-Container-{container}-Image")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    pub image: String,
}

/// Point-in-time view of one monitored deployment. Built per poll,
/// flattened into record keys, then discarded.
#[derive(Clone, Debug, Default)]
pub struct DeploymentSnapshot {
    pub namespace: String,
    pub name: String,
    /// Containers in pod-template declaration order.
    pub containers: Vec<Container>,
    pub last_updated: Option<Time>,
}

impl DeploymentSnapshot {
    /// Derive the flat fact set: one image key per container plus one
    /// last-update key. An absent Progressing condition leaves the
    /// last-update value empty.
    pub fn facts(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        let updated = self
            .last_updated
            .as_ref()
            .map(|t| t.0.to_rfc3339())
            .unwrap_or_default();
        data.insert(last_update_key(&self.namespace, &self.name), updated);
        for c in &self.containers {
            data.insert(
                image_key(&self.namespace, &self.name, &c.name),
                c.image.clone(),
            );
        }
        data
    }
}

/// Outcome of observing one workload. `Missing` and `Unreadable` both
/// contribute an empty fact set; callers that care can tell "nothing to
/// report" apart from "could not determine".
#[derive(Debug)]
pub enum Observation {
    Facts(DeploymentSnapshot),
    Missing,
    Unreadable,
}

impl Observation {
    pub fn facts(&self) -> BTreeMap<String, String> {
        match self {
            Observation::Facts(snapshot) => snapshot.facts(),
            Observation::Missing | Observation::Unreadable => BTreeMap::new(),
        }
    }
}

/// Read-only extractor for exactly one deployment's rollout facts.
pub struct DeploymentObserver {
    api: Api<Deployment>,
    namespace: String,
    name: String,
}

impl DeploymentObserver {
    pub fn new(client: Client, namespace: &str, name: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Query the deployment's current status and pod template. Retrieval
    /// problems are logged and swallowed here; polling of other workloads
    /// must not be affected by one workload's outage.
    pub async fn observe(&self) -> Observation {
        let dep = match self.api.get_opt(&self.name).await {
            Ok(Some(dep)) => dep,
            Ok(None) => {
                debug!(
                    namespace = %self.namespace,
                    deployment = %self.name,
                    "deployment not found"
                );
                return Observation::Missing;
            }
            Err(e) => {
                warn!(
                    namespace = %self.namespace,
                    deployment = %self.name,
                    error = %e,
                    "failed to read deployment"
                );
                return Observation::Unreadable;
            }
        };

        let mut snapshot = DeploymentSnapshot {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            ..Default::default()
        };
        if let Some(conditions) = dep.status.and_then(|s| s.conditions) {
            snapshot.last_updated = conditions
                .iter()
                .filter(|c| c.type_ == PROGRESSING_CONDITION)
                .filter_map(|c| c.last_update_time.clone())
                .max_by_key(|t| t.0);
        }
        if let Some(pod) = dep.spec.and_then(|s| s.template.spec) {
            for c in pod.containers {
                snapshot.containers.push(Container {
                    name: c.name,
                    image: c.image.unwrap_or_default(),
                });
            }
        }
        Observation::Facts(snapshot)
    }

    /// Sample-and-publish in one step: observe, merge into the shared
    /// store, persist. An empty observation publishes nothing.
    pub async fn publish(&self, store: &StateStore) -> Result<(), StoreError> {
        match self.observe().await {
            Observation::Facts(snapshot) => {
                store.set_many(&snapshot.facts()).await;
                store.save().await
            }
            Observation::Missing | Observation::Unreadable => Ok(()),
        }
    }
}
