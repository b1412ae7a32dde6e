use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct RbsConfig {
    /// Namespace holding the Rbs policy resource.
    /// Env: KUBERBS_POLICY_NAMESPACE
    #[envconfig(from = "KUBERBS_POLICY_NAMESPACE", default = "default")]
    pub policy_namespace: String,

    /// Seconds between rollout state publications per monitored deployment.
    /// Env: KUBERBS_POLL_INTERVAL_SECS
    #[envconfig(from = "KUBERBS_POLL_INTERVAL_SECS", default = "60")]
    pub poll_interval_secs: u64,
}
