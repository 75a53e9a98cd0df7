use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca::services::{inventory, run_sweeper};
use biblioteca::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biblioteca=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::from_env();

    // Initialize database
    let db = match db::init_db_with_pool(&config.database_url, config.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to the database at {}: {}", config.database_url, e);
            tracing::error!("Check DATABASE_URL and that the database file is writable");
            std::process::exit(1);
        }
    };

    match db::ping(&db).await {
        Ok(()) => tracing::info!(
            max_connections = config.max_connections,
            "Database connection established"
        ),
        Err(e) => tracing::error!("Database did not answer the connectivity check: {}", e),
    }

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
        }
    }

    // Report any drift between book counters and outstanding loans
    match inventory::audit(&db).await {
        Ok(discrepancies) if discrepancies.is_empty() => {
            tracing::info!("Inventory ledger is consistent")
        }
        Ok(discrepancies) => {
            for d in &discrepancies {
                tracing::warn!(
                    book_id = d.book_id,
                    available = d.available_copies,
                    expected = d.expected_available,
                    "Inventory ledger discrepancy"
                );
            }
        }
        Err(e) => tracing::error!("Inventory audit failed: {}", e),
    }

    if config.overdue_sweep_interval_secs > 0 {
        let sweeper_db = db.clone();
        let interval = Duration::from_secs(config.overdue_sweep_interval_secs);
        tokio::spawn(async move {
            run_sweeper(sweeper_db, interval).await;
        });
    } else {
        tracing::info!("Overdue sweeper disabled via OVERDUE_SWEEP_INTERVAL_SECS=0");
    }

    let app = server::build_app(db, &config);

    if let Err(e) = server::serve(app, config.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
