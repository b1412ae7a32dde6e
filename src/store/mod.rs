pub mod bootstrap;

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::core::ObjectMeta;
use kube::{Api, Client, api::PostParams};
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RbsConfig;
use crate::errors::{StartupError, StoreError};

/// Fixed identity of the persisted record.
pub const STORE_NAME: &str = "kuberbs";
pub const STORE_NAMESPACE: &str = "kube-system";

/// Reserved key holding the installation identifier, written once at
/// creation and never overwritten.
pub const UUID_KEY: &str = "uuid";

/// The process-wide rollout record: an in-memory copy of the `kuberbs`
/// ConfigMap plus the API handle used to persist it. Reads share the
/// lock; mutations and the remote round trips of [`load`](Self::load)
/// and [`save`](Self::save) exclude everything else for their duration.
#[derive(Debug)]
pub struct StateStore {
    api: Api<ConfigMap>,
    cached: RwLock<ConfigMap>,
}

impl StateStore {
    /// Fetch the record by its fixed identity, or create it when absent:
    /// a fresh installation id plus the facts of every workload the
    /// rollback policy names. Any other retrieval failure is fatal — the
    /// store must not come into existence without a determinate initial
    /// state.
    pub async fn initialize(
        client: Client,
        cfg: &RbsConfig,
    ) -> Result<Self, StartupError> {
        let api: Api<ConfigMap> =
            Api::namespaced(client.clone(), STORE_NAMESPACE);
        let cm = match api.get_opt(STORE_NAME).await {
            Ok(Some(cm)) => {
                info!(
                    name = STORE_NAME,
                    namespace = STORE_NAMESPACE,
                    "found existing rollout state"
                );
                cm
            }
            Ok(None) => {
                info!(
                    name = STORE_NAME,
                    namespace = STORE_NAMESPACE,
                    "no rollout state found; seeding from live cluster"
                );
                let mut data = BTreeMap::new();
                data.insert(UUID_KEY.to_string(), Uuid::new_v4().to_string());
                bootstrap::seed(&client, cfg, &mut data).await?;
                let fresh = ConfigMap {
                    metadata: ObjectMeta {
                        name: Some(STORE_NAME.to_string()),
                        namespace: Some(STORE_NAMESPACE.to_string()),
                        ..Default::default()
                    },
                    data: Some(data),
                    ..Default::default()
                };
                api.create(&PostParams::default(), &fresh)
                    .await
                    .map_err(StartupError::Create)?
            }
            Err(e) => return Err(StartupError::Fetch(e)),
        };
        Ok(Self {
            api,
            cached: RwLock::new(cm),
        })
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let cm = self.cached.read().await;
        cm.data.as_ref().and_then(|d| d.get(key)).cloned()
    }

    /// Snapshot of the current local cache.
    pub async fn data(&self) -> BTreeMap<String, String> {
        let cm = self.cached.read().await;
        cm.data.clone().unwrap_or_default()
    }

    pub async fn set(&self, key: &str, value: &str) {
        let mut cm = self.cached.write().await;
        cm.data
            .get_or_insert_with(Default::default)
            .insert(key.to_string(), value.to_string());
    }

    pub async fn set_many(&self, entries: &BTreeMap<String, String>) {
        let mut cm = self.cached.write().await;
        let data = cm.data.get_or_insert_with(Default::default);
        for (k, v) in entries {
            data.insert(k.clone(), v.clone());
        }
    }

    pub async fn delete(&self, key: &str) {
        let mut cm = self.cached.write().await;
        if let Some(data) = cm.data.as_mut() {
            data.remove(key);
        }
    }

    pub async fn delete_many<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cm = self.cached.write().await;
        if let Some(data) = cm.data.as_mut() {
            for key in keys {
                data.remove(key);
            }
        }
    }

    /// Replace the local cache with the latest remote copy. Unsaved local
    /// edits are discarded; there is no merge.
    pub async fn load(&self) -> Result<(), StoreError> {
        let mut cm = self.cached.write().await;
        match self.api.get(STORE_NAME).await {
            Ok(latest) => {
                *cm = latest;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to reload rollout state");
                Err(StoreError::Load(e))
            }
        }
    }

    /// Persist the local cache, overwriting the remote copy. The replace
    /// carries the cached resourceVersion, so a concurrent writer surfaces
    /// as a conflict the caller may resolve with [`load`](Self::load).
    pub async fn save(&self) -> Result<(), StoreError> {
        let mut cm = self.cached.write().await;
        match self.api.replace(STORE_NAME, &PostParams::default(), &*cm).await {
            Ok(updated) => {
                *cm = updated;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to save rollout state");
                Err(StoreError::Save(e))
            }
        }
    }
}

/// Handle shared by every publisher task. Built once at process entry and
/// passed explicitly; the inner store is initialized on first use, exactly
/// once, with concurrent callers blocking on the same initialization and
/// receiving the same instance.
pub struct SharedStore {
    client: Client,
    cfg: RbsConfig,
    cell: OnceCell<Arc<StateStore>>,
}

impl SharedStore {
    pub fn new(client: Client, cfg: RbsConfig) -> Self {
        Self {
            client,
            cfg,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&Arc<StateStore>, StartupError> {
        self.cell
            .get_or_try_init(|| async {
                StateStore::initialize(self.client.clone(), &self.cfg)
                    .await
                    .map(Arc::new)
            })
            .await
    }
}
