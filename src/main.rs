use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use namaste_core::{ServiceConfig, TerminologyService};

/// Main entry point for the NAMASTE terminology service
///
/// Loads the terminology table once, then serves the REST API on the configured address.
/// A missing or malformed table aborts startup; there is no partially loaded mode.
///
/// # Environment Variables
/// - `NAMASTE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `NAMASTE_TABLE_PATH`: terminology table, `.csv` or serialized `.json`
///   (default: "data/terminology_data.json")
/// - `RUST_LOG`: tracing filter directives
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the terminology table cannot be built,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("namaste_run=info".parse()?)
                .add_directive("namaste_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_env_values(
        std::env::var("NAMASTE_REST_ADDR").ok(),
        std::env::var("NAMASTE_TABLE_PATH").ok(),
    )?;

    let terminology_service = TerminologyService::load(&cfg)?;
    tracing::info!(
        "++ Loaded {} NAMASTE terms from {}",
        terminology_service.table().len(),
        cfg.table_path().display()
    );

    let app = router(AppState::new(terminology_service));

    tracing::info!("++ Starting NAMASTE REST on {}", cfg.rest_addr());
    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
