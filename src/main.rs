use envconfig::Envconfig;
use kube::Client;
use kuberbs_state::{config::RbsConfig, init_tracing, runtime};
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    // rustls needs a process-level crypto provider before the first TLS
    // handshake; a compatible provider may already be installed.
    if let Err(e) = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::aws_lc_rs::default_provider(),
    ) {
        tracing::debug!(?e, "CryptoProvider already installed; proceeding");
    }

    let cfg = RbsConfig::init_from_env()?;
    info!(?cfg, "Starting kuberbs state layer");

    let client = Client::try_default().await?;
    runtime::run_all(client, cfg).await
}
