use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::errors::HandlerError;
use crate::handler::MessageHandler;
use crate::models::{OrderEvent, Product, SnsEnvelope};
use crate::queue::Message;
use crate::repository::ProductRepository;

/// Business layer over the product repository.
#[derive(Debug, Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        ProductService { repo }
    }

    pub async fn create(&self, product: &Product) -> Result<Product, sqlx::Error> {
        self.repo.create(product).await.inspect_err(|e| {
            error!(error = %e, "error creating product");
        })
    }

    pub async fn get_products(&self) -> Result<Vec<Product>, sqlx::Error> {
        let products = self.repo.get_all().await.inspect_err(|e| {
            error!(error = %e, "error retrieving products");
        })?;

        info!(count = products.len(), "retrieved products");
        Ok(products)
    }

    /// Applies a sale: looks the product up and decrements its quantity.
    pub async fn update_product_count(&self, id: &str, sold: i32) -> Result<Product, sqlx::Error> {
        let mut product = self.repo.get_product_by_id(id).await.inspect_err(|e| {
            error!(product_id = id, error = %e, "error retrieving product by id");
        })?;

        info!(product_id = id, sold, "updating product count");
        self.repo
            .update_product_count(&mut product, sold)
            .await
            .inspect_err(|e| {
                error!(product_id = id, error = %e, "error updating product count");
            })?;

        Ok(product)
    }
}

/// Parses an SNS-wrapped order event out of a raw queue message body.
pub fn parse_order_event(body: &str) -> Result<OrderEvent, HandlerError> {
    let envelope: SnsEnvelope = serde_json::from_str(body)?;
    let order: OrderEvent = serde_json::from_str(&envelope.message)?;
    Ok(order)
}

/// Handler registered on the products queue: consumes order notifications
/// and applies the sold quantity to the catalog.
///
/// A message that fails to parse or apply is left undeleted; the queue
/// redelivers it after the visibility timeout, so the decrement must be safe
/// to repeat only after a genuine failure, never after success.
pub struct OrderEventHandler {
    service: Arc<ProductService>,
}

impl OrderEventHandler {
    pub fn new(service: Arc<ProductService>) -> Self {
        OrderEventHandler { service }
    }
}

#[async_trait]
impl MessageHandler for OrderEventHandler {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        let order = parse_order_event(&message.body)?;

        info!(
            message_id = %message.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            "processing order event"
        );

        self.service
            .update_product_count(&order.product_id, order.quantity)
            .await?;

        Ok(())
    }
}
