use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog product, one row in the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub seller_id: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub seller_id: String,
    #[serde(default)]
    pub quantity: i32,
}

impl CreateProductRequest {
    /// Scalar validation applied before insert: a product needs a name, a
    /// positive price and a non-negative quantity.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.price > 0.0 && self.quantity >= 0
    }

    /// Builds the product to insert, assigning a fresh server-side id.
    pub fn into_product(self) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            price: self.price,
            seller_id: self.seller_id,
            quantity: self.quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /notify`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyRequest {
    #[serde(rename = "topicArn", default)]
    pub topic_arn: String,
    #[serde(default)]
    pub message: String,
}

/// Envelope SNS wraps around messages it forwards into a subscribed queue.
/// Only the fields the service reads; the envelope carries more.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: String,
    #[serde(rename = "Message")]
    pub message: String,
}

/// Inner payload of an order notification: how many units of a product were
/// sold. Applied to the catalog by decrementing the product's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub product_id: String,
    pub quantity: i32,
}
