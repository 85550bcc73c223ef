use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{BuyerId, Money, OrderId, ProductId};

use crate::records::{
    NewProduct, OrderLineRecord, OrderReceipt, OrderRecord, OrderStatus, OrderSubmission,
    ProductRecord,
};
use crate::store::{OrderStore, validate_submission};
use crate::{Result, StoreError};

/// PostgreSQL-backed order store implementation.
///
/// `submit_order` runs as a single transaction: stock decrements, the
/// order row, and all line rows commit together or not at all.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: PgRow) -> Result<ProductRecord> {
        Ok(ProductRecord {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            price: Money::from_rupiah(row.try_get("price")?),
            stock: row.try_get::<i32, _>("stock")? as u32,
            seller: row.try_get("seller")?,
            image_url: row.try_get("image_url")?,
            active: row.try_get("active")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<OrderRecord> {
        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::from_db(&status_str)
            .ok_or_else(|| StoreError::InvalidOrder(format!("unknown order status {status_str}")))?;

        Ok(OrderRecord {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            buyer: BuyerId::from_uuid(row.try_get::<Uuid, _>("buyer_id")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            status,
            total: Money::from_rupiah(row.try_get("total_amount")?),
            shipping_address: row.try_get("shipping_address")?,
            shipping_phone: row.try_get("shipping_phone")?,
            lines: Vec::new(),
        })
    }

    fn row_to_line(row: PgRow) -> Result<OrderLineRecord> {
        // The display name prefers the current product row; the snapshot
        // taken at purchase is the fallback for deleted products.
        let current_name: Option<String> = row.try_get("product_name")?;
        let snapshot_name: String = row.try_get("name_at_purchase")?;

        Ok(OrderLineRecord {
            product_id: ProductId::new(row.try_get("product_id")?),
            product_name: current_name.unwrap_or(snapshot_name),
            unit_price: Money::from_rupiah(row.try_get("price_at_purchase")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            image_url: row.try_get("image_url")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn submit_order(&self, submission: OrderSubmission) -> Result<OrderReceipt> {
        validate_submission(&submission)?;

        // Start a transaction; dropping it without commit rolls back.
        let mut tx = self.pool.begin().await?;

        for item in &submission.items {
            let updated = sqlx::query(
                "UPDATE products SET stock = stock - $2 WHERE id = $1 AND active AND stock >= $2",
            )
            .bind(item.product_id.as_i64())
            .bind(item.quantity as i32)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let available: Option<i32> =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 AND active")
                        .bind(item.product_id.as_i64())
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match available {
                    Some(stock) => StoreError::StockShortage {
                        product_id: item.product_id,
                        requested: item.quantity,
                        available: stock as u32,
                    },
                    None => StoreError::ProductNotFound(item.product_id),
                });
            }
        }

        let order_id = OrderId::new();
        let status = OrderStatus::Pending;

        sqlx::query(
            r#"
            INSERT INTO orders (id, buyer_id, status, total_amount, shipping_address, shipping_phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(submission.buyer.as_uuid())
        .bind(status.as_str())
        .bind(submission.total.rupiah())
        .bind(&submission.shipping_address)
        .bind(&submission.shipping_phone)
        .execute(&mut *tx)
        .await?;

        for item in &submission.items {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, product_id, name_at_purchase, price_at_purchase, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id.as_uuid())
            .bind(item.product_id.as_i64())
            .bind(&item.product_name)
            .bind(item.unit_price.rupiah())
            .bind(item.quantity as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        metrics::counter!("orders_persisted_total").increment(1);
        tracing::debug!(order_id = %order_id, buyer = %submission.buyer, "order persisted");

        Ok(OrderReceipt { order_id, status })
    }

    async fn orders_for_buyer(&self, buyer: BuyerId) -> Result<Vec<OrderRecord>> {
        let order_rows = sqlx::query(
            r#"
            SELECT id, buyer_id, created_at, status, total_amount, shipping_address, shipping_phone
            FROM orders
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(buyer.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in &order_rows {
            let mut order = Self::row_to_order(row)?;

            let line_rows = sqlx::query(
                r#"
                SELECT ol.product_id, ol.name_at_purchase, ol.price_at_purchase, ol.quantity,
                       p.name AS product_name, p.image_url
                FROM order_lines ol
                LEFT JOIN products p ON p.id = ol.product_id
                WHERE ol.order_id = $1
                ORDER BY ol.id ASC
                "#,
            )
            .bind(order.id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

            order.lines = line_rows
                .into_iter()
                .map(Self::row_to_line)
                .collect::<Result<Vec<_>>>()?;
            orders.push(order);
        }

        Ok(orders)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        let row = sqlx::query(
            "SELECT id, name, price, stock, seller, image_url, active FROM products WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, stock, seller, image_url, active
            FROM products
            WHERE active
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn insert_product(&self, product: NewProduct) -> Result<ProductRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price, stock, seller, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, stock, seller, image_url, active
            "#,
        )
        .bind(&product.name)
        .bind(product.price.rupiah())
        .bind(product.stock as i32)
        .bind(&product.seller)
        .bind(&product.image_url)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }
}
