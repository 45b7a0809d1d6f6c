use std::sync::Arc;

use duet_relay::completion::create_completion;
use duet_relay::config::ServerConfig;
use duet_relay::relay::ConnectionRegistry;
use duet_relay::routes::configure_routes;
use duet_relay::state::AppState;
use duet_relay::store::SessionStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("duet_relay=info,warp=warn")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store = Arc::new(SessionStore::default());
    let registry = Arc::new(ConnectionRegistry::new());
    let mut state = AppState::new(store.clone(), registry).with_max_tokens(config.max_tokens);

    match config.gcp_project_id.clone() {
        Some(project_id) => {
            match create_completion(
                config.model.clone(),
                project_id,
                config.gcp_location.clone(),
                config.request_timeout,
            )
            .await
            {
                Ok(completion) => {
                    info!(model = config.model.as_str(), "text completion enabled");
                    state = state.with_completion(completion);
                }
                Err(e) => error!(error = %e, "text completion unavailable"),
            }
        }
        None => warn!("GCP_PROJECT_ID not set; moderation verdicts are disabled"),
    }

    let routes = configure_routes(state);
    let addr = config.bind_addr();

    info!("Starting server on http://{}", addr);
    tokio::select! {
        _ = warp::serve(routes).run(addr) => {}
        _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
    }

    store.clear().await;
    Ok(())
}
