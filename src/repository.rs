use sqlx::PgPool;

use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, name, price, seller_id, quantity, created_at, updated_at";

/// Data access for the `products` table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (id, name, price, seller_id, quantity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {PRODUCT_COLUMNS}"
        );

        sqlx::query_as::<_, Product>(&query)
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.seller_id)
            .bind(product.quantity)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products");

        sqlx::query_as::<_, Product>(&query)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_product_by_id(&self, id: &str) -> Result<Product, sqlx::Error> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Decrements the stored quantity by `sold` units and mirrors the change
    /// on the passed product.
    pub async fn update_product_count(
        &self,
        product: &mut Product,
        sold: i32,
    ) -> Result<(), sqlx::Error> {
        product.quantity -= sold;

        sqlx::query("UPDATE products SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(product.quantity)
            .bind(&product.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
