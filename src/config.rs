use std::env;

use crate::errors::ServiceError;

/// Service configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port (`PORT`, default 8080).
    pub port: u16,

    /// Postgres connection string (`DATABASE_URL`, required).
    pub database_url: String,

    /// Queue the order-event processor subscribes to
    /// (`PRODUCTS_QUEUE_URL`, optional).
    pub products_queue_url: Option<String>,

    /// Queue drained by the events endpoint (`EVENTS_QUEUE_URL`, optional).
    pub events_queue_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServiceError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ServiceError::Config(format!("invalid PORT value: {raw}")))?,
            Err(_) => 8080,
        };

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ServiceError::Config("DATABASE_URL must be set".to_string()))?;

        Ok(AppConfig {
            port,
            database_url,
            products_queue_url: env::var("PRODUCTS_QUEUE_URL").ok(),
            events_queue_url: env::var("EVENTS_QUEUE_URL").ok(),
        })
    }
}
