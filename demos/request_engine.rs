//! Forwarding arbitrary API calls through the request engine.
//!
//! Connection and credentials come from `PROXMOX_*` variables (or a `.env`
//! file). Set `RUST_LOG=proxmox_engine=debug` to watch logins and retries.

use proxmox_engine::{HttpMethod, ProxmoxEngineBuilder, ProxmoxResult, RequestParams};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ProxmoxResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = ProxmoxEngineBuilder::from_env()?.build()?;
    println!(
        "Using {} ({} auth)",
        engine.connection().url(),
        if engine.is_token_auth() { "token" } else { "ticket" }
    );

    let version = engine.request(HttpMethod::Get, "/api2/json/version", None).await?;
    println!("PVE version: {}", version["version"]);

    let nodes = engine
        .request(
            HttpMethod::Get,
            "/api2/json/cluster/resources",
            Some(RequestParams::new().with("type", "node")),
        )
        .await?;
    for node in nodes.as_array().into_iter().flatten() {
        println!("{} ({})", node["node"], node["status"]);
    }

    println!("Session status: {:?}", engine.session_status().await);
    Ok(())
}
