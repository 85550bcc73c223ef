use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::{BuyerId, OrderId, ProductId};

use crate::records::{
    NewProduct, OrderLineRecord, OrderReceipt, OrderRecord, OrderStatus, OrderSubmission,
    ProductRecord,
};
use crate::store::{OrderStore, validate_submission};
use crate::{Result, StoreError};

struct MemoryState {
    products: HashMap<ProductId, ProductRecord>,
    /// Orders in insertion order, which is chronological.
    orders: Vec<OrderRecord>,
    next_product_id: i64,
}

/// In-memory order store implementation for testing.
///
/// Provides the same interface and atomicity contract as the PostgreSQL
/// implementation: a submission either creates the order and decrements
/// every product's stock, or changes nothing.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                products: HashMap::new(),
                orders: Vec::new(),
                next_product_id: 1,
            })),
        }
    }

    /// Returns the total number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns a product's current stock, if it exists.
    pub async fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.state.read().await.products.get(&id).map(|p| p.stock)
    }

    /// Clears all products and orders.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.products.clear();
        state.orders.clear();
        state.next_product_id = 1;
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn submit_order(&self, submission: OrderSubmission) -> Result<OrderReceipt> {
        validate_submission(&submission)?;

        let mut state = self.state.write().await;

        // Check every line before mutating anything, so a shortage on the
        // last line cannot leave earlier decrements behind.
        for item in &submission.items {
            let product = state
                .products
                .get(&item.product_id)
                .filter(|p| p.active)
                .ok_or(StoreError::ProductNotFound(item.product_id))?;

            if product.stock < item.quantity {
                return Err(StoreError::StockShortage {
                    product_id: item.product_id,
                    requested: item.quantity,
                    available: product.stock,
                });
            }
        }

        let mut lines = Vec::with_capacity(submission.items.len());
        for item in &submission.items {
            let product = state
                .products
                .get_mut(&item.product_id)
                .expect("checked above");
            product.stock -= item.quantity;

            lines.push(OrderLineRecord {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                image_url: product.image_url.clone(),
            });
        }

        let order = OrderRecord {
            id: OrderId::new(),
            buyer: submission.buyer,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            total: submission.total,
            shipping_address: submission.shipping_address,
            shipping_phone: submission.shipping_phone,
            lines,
        };
        let receipt = OrderReceipt {
            order_id: order.id,
            status: order.status,
        };
        state.orders.push(order);

        metrics::counter!("orders_persisted_total").increment(1);
        tracing::debug!(order_id = %receipt.order_id, "order persisted in memory");

        Ok(receipt)
    }

    async fn orders_for_buyer(&self, buyer: BuyerId) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.buyer == buyer)
            .map(|order| {
                let mut order = order.clone();
                // Same read contract as the SQL join: lines show the current
                // product name and image while the product row exists, and
                // keep the purchase snapshot otherwise.
                for line in &mut order.lines {
                    if let Some(product) = state.products.get(&line.product_id) {
                        line.product_name = product.name.clone();
                        line.image_url = product.image_url.clone();
                    }
                }
                order
            })
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().filter(|p| p.active).cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<ProductRecord> {
        let mut state = self.state.write().await;
        let id = ProductId::new(state.next_product_id);
        state.next_product_id += 1;

        let record = ProductRecord {
            id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            seller: product.seller,
            image_url: product.image_url,
            active: true,
        };
        state.products.insert(id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NewOrderLine;
    use common::Money;

    async fn seed_product(store: &InMemoryOrderStore, price: i64, stock: u32) -> ProductRecord {
        store
            .insert_product(NewProduct {
                name: "Kain Batik".to_string(),
                price: Money::from_rupiah(price),
                stock,
                seller: "UMKM Grobogan".to_string(),
                image_url: Some("https://example.com/batik.jpg".to_string()),
            })
            .await
            .unwrap()
    }

    fn submission_for(buyer: BuyerId, product: &ProductRecord, quantity: u32) -> OrderSubmission {
        OrderSubmission {
            buyer,
            total: product.price.multiply(quantity),
            shipping_address: "Jl. Merdeka 1".to_string(),
            shipping_phone: "081234567890".to_string(),
            items: vec![NewOrderLine {
                product_id: product.id,
                quantity,
                unit_price: product.price,
                product_name: product.name.clone(),
            }],
        }
    }

    #[tokio::test]
    async fn submit_creates_order_and_decrements_stock() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let buyer = BuyerId::new();

        let receipt = store
            .submit_order(submission_for(buyer, &product, 2))
            .await
            .unwrap();

        assert_eq!(receipt.status, OrderStatus::Pending);
        assert_eq!(store.order_count().await, 1);
        assert_eq!(store.stock_of(product.id).await, Some(8));
    }

    #[tokio::test]
    async fn shortage_creates_nothing() {
        let store = InMemoryOrderStore::new();
        let cheap = seed_product(&store, 15000, 10).await;
        let scarce = seed_product(&store, 20000, 1).await;
        let buyer = BuyerId::new();

        let submission = OrderSubmission {
            buyer,
            total: Money::from_rupiah(70000),
            shipping_address: "Jl. Merdeka 1".to_string(),
            shipping_phone: "081234567890".to_string(),
            items: vec![
                NewOrderLine {
                    product_id: cheap.id,
                    quantity: 2,
                    unit_price: cheap.price,
                    product_name: cheap.name.clone(),
                },
                NewOrderLine {
                    product_id: scarce.id,
                    quantity: 2,
                    unit_price: scarce.price,
                    product_name: scarce.name.clone(),
                },
            ],
        };

        let err = store.submit_order(submission).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::StockShortage { product_id, requested: 2, available: 1 }
                if product_id == scarce.id
        ));

        // Nothing was written, including the line that had stock.
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.stock_of(cheap.id).await, Some(10));
        assert_eq!(store.stock_of(scarce.id).await, Some(1));
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let store = InMemoryOrderStore::new();
        let buyer = BuyerId::new();

        let submission = OrderSubmission {
            buyer,
            total: Money::from_rupiah(15000),
            shipping_address: "Jl. Merdeka 1".to_string(),
            shipping_phone: "081234567890".to_string(),
            items: vec![NewOrderLine {
                product_id: ProductId::new(999),
                quantity: 1,
                unit_price: Money::from_rupiah(15000),
                product_name: "Ghost".to_string(),
            }],
        };

        let err = store.submit_order(submission).await.unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(id) if id.as_i64() == 999));
    }

    #[tokio::test]
    async fn orders_for_buyer_returns_newest_first() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let buyer = BuyerId::new();

        let first = store
            .submit_order(submission_for(buyer, &product, 1))
            .await
            .unwrap();
        let second = store
            .submit_order(submission_for(buyer, &product, 2))
            .await
            .unwrap();

        let orders = store.orders_for_buyer(buyer).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.order_id);
        assert_eq!(orders[1].id, first.order_id);
    }

    #[tokio::test]
    async fn orders_are_scoped_to_their_buyer() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let alice = BuyerId::new();
        let bob = BuyerId::new();

        store
            .submit_order(submission_for(alice, &product, 1))
            .await
            .unwrap();

        assert_eq!(store.orders_for_buyer(alice).await.unwrap().len(), 1);
        assert!(store.orders_for_buyer(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_products_skips_inactive() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        seed_product(&store, 20000, 5).await;

        {
            let mut state = store.state.write().await;
            state.products.get_mut(&product.id).unwrap().active = false;
        }

        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_ne!(products[0].id, product.id);
    }

    #[tokio::test]
    async fn inactive_product_cannot_be_ordered() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let buyer = BuyerId::new();

        {
            let mut state = store.state.write().await;
            state.products.get_mut(&product.id).unwrap().active = false;
        }

        let err = store
            .submit_order(submission_for(buyer, &product, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn order_lines_carry_product_image() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let buyer = BuyerId::new();

        store
            .submit_order(submission_for(buyer, &product, 1))
            .await
            .unwrap();

        let orders = store.orders_for_buyer(buyer).await.unwrap();
        assert_eq!(
            orders[0].lines[0].image_url.as_deref(),
            Some("https://example.com/batik.jpg")
        );
    }

    #[tokio::test]
    async fn history_shows_the_current_product_name_and_image() {
        let store = InMemoryOrderStore::new();
        let product = seed_product(&store, 15000, 10).await;
        let buyer = BuyerId::new();

        store
            .submit_order(submission_for(buyer, &product, 1))
            .await
            .unwrap();

        {
            let mut state = store.state.write().await;
            let current = state.products.get_mut(&product.id).unwrap();
            current.name = "Kain Batik Tulis".to_string();
            current.image_url = Some("https://example.com/batik-tulis.jpg".to_string());
        }

        let orders = store.orders_for_buyer(buyer).await.unwrap();
        assert_eq!(orders[0].lines[0].product_name, "Kain Batik Tulis");
        assert_eq!(
            orders[0].lines[0].image_url.as_deref(),
            Some("https://example.com/batik-tulis.jpg")
        );
    }
}
