//! Session persistence workflow for the request engine.
//!
//! Logs in, stores the session to disk, and restores it into a second
//! engine that then calls the API without a login of its own.

use proxmox_engine::{HttpMethod, ProxmoxEngineBuilder, ProxmoxResult};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ProxmoxResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = ProxmoxEngineBuilder::from_env()?.build()?;
    if engine.is_token_auth() {
        println!("API tokens have no session to persist");
        return Ok(());
    }

    engine.login().await?;
    println!("Logged in. Ticket: {}", engine.ticket().await.unwrap_or_default());

    let session_path = std::env::temp_dir().join("pve-session.json");
    engine.save_session_to_file(&session_path).await?;
    println!("Session saved to {}", session_path.display());

    let restored = ProxmoxEngineBuilder::from_env()?.build()?;
    restored.load_session_from_file(&session_path).await?;
    println!("Session loaded. Authenticated: {}", restored.is_authenticated().await);

    let nodes = restored.request(HttpMethod::Get, "/api2/json/nodes", None).await?;
    println!("{} node(s) visible", nodes.as_array().map_or(0, Vec::len));

    assert_eq!(engine.ticket().await, restored.ticket().await);

    tokio::fs::remove_file(&session_path).await?;
    Ok(())
}
