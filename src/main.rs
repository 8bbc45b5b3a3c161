use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use travel_planner::api::AppState;
use travel_planner::config::{LoggingConfig, PlannerConfig};
use travel_planner::generate::{GeminiClient, Generator};
use travel_planner::session::SessionStore;
use travel_planner::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PlannerConfig::load()?;
    init_tracing(&config.logging);

    // A failed client construction disables generation for the process but
    // the page still serves, rendering the configuration error
    let (generator, config_error) = match GeminiClient::new(&config.gemini) {
        Ok(client) => {
            tracing::info!("Gemini client ready (model {})", config.gemini.model);
            (Some(Arc::new(client) as Arc<dyn Generator>), None)
        }
        Err(e) => {
            tracing::error!("Gemini client unavailable: {e}");
            (None, Some(e.user_message()))
        }
    };

    let state = AppState::new(SessionStore::new(), generator, config_error);
    web::run(&config.server, state).await
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
