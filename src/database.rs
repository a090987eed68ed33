use std::time::Duration;

use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Report returned by the health endpoint.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub open_connections: u32,
    pub idle_connections: usize,
}

/// Opens the connection pool against `database_url`.
pub async fn connect(database_url: &str) -> Result<PgPool, ServiceError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Creates the products table and its indexes.
///
/// Table creation is fatal on failure; a failed index creation is only a
/// warning, since the table remains usable without it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), ServiceError> {
    info!("running database migrations");

    let products_table = r#"
    CREATE TABLE IF NOT EXISTS products (
        id VARCHAR(255) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        seller_id VARCHAR(255) NOT NULL DEFAULT '',
        quantity INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMP WITH TIME ZONE
    )"#;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_products_seller_id ON products(seller_id)",
        "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at)",
    ];

    sqlx::query(products_table).execute(pool).await?;

    for index in indexes {
        if let Err(e) = sqlx::query(index).execute(pool).await {
            warn!(error = %e, "failed to create index");
        }
    }

    info!("database migrations completed");
    Ok(())
}

/// Pings the database and reports pool statistics.
pub async fn health(pool: &PgPool) -> Health {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Health {
            status: "up".to_string(),
            message: "It's healthy".to_string(),
            open_connections: pool.size(),
            idle_connections: pool.num_idle(),
        },
        Err(e) => Health {
            status: "down".to_string(),
            message: format!("database unreachable: {e}"),
            open_connections: pool.size(),
            idle_connections: pool.num_idle(),
        },
    }
}
