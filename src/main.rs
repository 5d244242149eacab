use arbeitszeit::config::{database, settings};
use arbeitszeit::core::expiry;
use arbeitszeit::errors::Result;
use chrono::Utc;
use dotenvy::dotenv;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally

    // 3. Load the application settings
    let settings = settings::load_settings()?;
    info!("Settings loaded: {settings:?}");

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // 5. Seed the social accounting singleton
    let accounting = database::seed_social_accounting(&db).await?;
    info!(
        "Social accounting ready (account {}, psf {}).",
        accounting.account, accounting.account_psf
    );

    // 6. Run the expired-plan sweep on its configured interval
    let mut ticker = tokio::time::interval(Duration::from_secs(settings.expiry_tick_seconds));
    loop {
        ticker.tick().await;
        match expiry::update_expired_plans(&db, Utc::now()).await {
            Ok(sweep) => {
                if sweep.plans_processed > 0 {
                    info!("{}", expiry::format_sweep_summary(&sweep));
                }
            }
            Err(e) => error!("Expired-plan sweep failed: {e}"),
        }
    }
}
