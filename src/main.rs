use clap::Parser;
use sqlx::migrate::Migrator;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::prelude::*;

use plateful_core::cli::{BookingCommands, Cli, Commands, DbCommands};
use plateful_core::{AppState, config, create_app, db, events, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Db(DbCommands::Migrate)) => {
            plateful_core::cli::handle_db_migrate(&config).await?;
            return Ok(());
        }
        Some(Commands::Config) => {
            plateful_core::cli::handle_config_validate(&config)?;
            return Ok(());
        }
        Some(Commands::Booking(BookingCommands::Show { booking_id })) => {
            let pool = db::create_pool(&config).await?;
            plateful_core::cli::handle_booking_show(&pool, booking_id).await?;
            return Ok(());
        }
        Some(Commands::Serve) | None => {}
    }

    // Database pool
    let pool = db::create_pool(&config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    let report = startup::validate_environment(&config, &pool).await?;
    report.print();
    if !report.is_valid() {
        anyhow::bail!("Startup validation failed");
    }

    // Booking change notifications; dashboards subscribe over /ws
    let (event_tx, _event_rx) = events::channel(256);

    let state = AppState::new(pool, event_tx);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
