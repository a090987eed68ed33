use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use products_api::client::load_aws_clients_from_env;
use products_api::config::AppConfig;
use products_api::database;
use products_api::errors::ServiceError;
use products_api::http::{AppState, create_app};
use products_api::queue::SqsQueueClient;
use products_api::repository::ProductRepository;
use products_api::service::{OrderEventHandler, ProductService};
use products_api::supervisor::ProcessorSupervisor;

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = database::connect(&config.database_url).await?;
    database::run_migrations(&pool).await?;

    let service = Arc::new(ProductService::new(ProductRepository::new(pool.clone())));

    let aws = load_aws_clients_from_env().await;
    if aws.is_none() {
        warn!("no AWS region configured, running without SNS/SQS");
    }
    let queue = aws.as_ref().map(|c| SqsQueueClient::new(c.sqs.clone()));

    let supervisor = match (queue.clone(), config.products_queue_url.as_deref()) {
        (Some(queue), Some(queue_url)) => {
            let mut supervisor = ProcessorSupervisor::new(Arc::new(queue));
            supervisor.register(
                queue_url,
                OrderEventHandler::new(Arc::clone(&service)),
                None,
            )?;
            supervisor.start()?;
            Some(supervisor)
        }
        _ => {
            info!("products queue not configured, skipping message processors");
            None
        }
    };

    let state = Arc::new(AppState {
        db: pool,
        service,
        sns: aws.map(|c| c.sns),
        queue,
        events_queue_url: config.events_queue_url.clone(),
    });

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "products-api listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(supervisor) = supervisor {
        info!("shutting down message processors");
        supervisor.stop().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
