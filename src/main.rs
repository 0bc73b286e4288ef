use std::sync::Arc;

use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use roi_calculator::api::health::HealthState;
use roi_calculator::api::{cors_layer, router, ApiState};
use roi_calculator::config::{Config, CHANNEL_CAPACITY};
use roi_calculator::db::LeadWriter;
use roi_calculator::error::Result;
use roi_calculator::types::FormDefaults;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let health = Arc::new(HealthState::new());

    // --- Lead store ---
    let leads = if cfg.lead_store_enabled {
        let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", cfg.db_path)).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Lead store ready at {}", cfg.db_path);

        let (lead_tx, lead_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let writer = LeadWriter::new(pool, lead_rx, Arc::clone(&health));
        tokio::spawn(async move { writer.run().await });
        Some(lead_tx)
    } else {
        warn!("LEAD_STORE_ENABLED=false; submissions will be logged but not stored");
        None
    };

    // --- HTTP API server ---
    let api_state = ApiState {
        health,
        leads,
        defaults: FormDefaults::with_implementation_cost(cfg.implementation_cost),
    };
    let app = router(api_state)
        .layer(cors_layer(&cfg.cors_allow_origin)?)
        .layer(TraceLayer::new_for_http());

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        "HTTP API listening on {bind_addr} (implementation_cost={:.2}, cors={})",
        cfg.implementation_cost, cfg.cors_allow_origin,
    );

    axum::serve(listener, app).await?;

    Ok(())
}
