use thiserror::Error;

/// Fatal failures while bringing the shared store into existence.
/// The boot sequence must abort rather than run with a partial seed.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("State ConfigMap lookup failed: {0}")]
    Fetch(kube::Error),

    #[error("State ConfigMap creation failed: {0}")]
    Create(kube::Error),

    #[error("Rollback policy unavailable: {0}")]
    Policy(kube::Error),

    #[error("No rollback policy found in namespace {0}")]
    EmptyPolicy(String),
}

/// Steady-state store failures. Returned to the caller, who decides
/// whether to retry on the next cycle.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("State reload failed: {0}")]
    Load(kube::Error),

    #[error("State save failed: {0}")]
    Save(kube::Error),
}
