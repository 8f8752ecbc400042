use clap::Parser;
use sarathi::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sarathi=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let catalog = config.catalog()?;
    tracing::info!("car catalog has {} car(s)", catalog.cars().len());
    let planner = config.planner()?;

    let app = create_router(AppState::new(planner, catalog));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("starting sarathi on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
