//! Per-buyer order history reader.

use common::BuyerId;
use order_store::OrderStore;

use crate::Result;
use crate::views::OrderView;

/// Reads a buyer's past orders from the store and shapes them for display.
#[derive(Debug, Clone)]
pub struct OrderHistoryReader<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderHistoryReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The buyer's orders, newest first. An empty history is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_buyer(&self, buyer: BuyerId) -> Result<Vec<OrderView>> {
        let orders = self.store.orders_for_buyer(buyer).await?;
        metrics::counter!("history_reads_total").increment(1);
        tracing::debug!(%buyer, count = orders.len(), "order history read");
        Ok(orders.into_iter().map(OrderView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use order_store::{
        InMemoryOrderStore, NewOrderLine, NewProduct, OrderSubmission, ProductRecord,
    };

    async fn seed_product(store: &InMemoryOrderStore, name: &str, price: i64) -> ProductRecord {
        store
            .insert_product(NewProduct {
                name: name.to_string(),
                price: Money::from_rupiah(price),
                stock: 100,
                seller: "Warung Bu Sari".to_string(),
                image_url: Some(format!("https://img.example/{name}.jpg")),
            })
            .await
            .unwrap()
    }

    async fn submit(store: &InMemoryOrderStore, buyer: BuyerId, product: &ProductRecord, qty: u32) {
        store
            .submit_order(OrderSubmission {
                buyer,
                total: product.price.multiply(qty),
                shipping_address: "Jl. Merdeka 1".to_string(),
                shipping_phone: "081234567890".to_string(),
                items: vec![NewOrderLine {
                    product_id: product.id,
                    quantity: qty,
                    unit_price: product.price,
                    product_name: product.name.clone(),
                }],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_history_is_an_empty_list() {
        let store = InMemoryOrderStore::new();
        let reader = OrderHistoryReader::new(store);
        let views = reader.orders_for_buyer(BuyerId::new()).await.unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn views_come_back_newest_first_with_labels() {
        let store = InMemoryOrderStore::new();
        let buyer = BuyerId::new();
        let keripik = seed_product(&store, "keripik", 15_000).await;
        let kopi = seed_product(&store, "kopi", 20_000).await;
        submit(&store, buyer, &keripik, 1).await;
        submit(&store, buyer, &kopi, 2).await;

        let reader = OrderHistoryReader::new(store);
        let views = reader.orders_for_buyer(buyer).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].lines[0].name, "kopi");
        assert_eq!(views[1].lines[0].name, "keripik");
        assert_eq!(views[0].status_label, "Menunggu");
        assert_eq!(views[0].total, Money::from_rupiah(40_000));
        assert_eq!(views[0].lines[0].line_total, views[0].total);
    }

    #[tokio::test]
    async fn other_buyers_orders_stay_invisible() {
        let store = InMemoryOrderStore::new();
        let keripik = seed_product(&store, "keripik", 15_000).await;
        let dewi = BuyerId::new();
        let rina = BuyerId::new();
        submit(&store, dewi, &keripik, 1).await;

        let reader = OrderHistoryReader::new(store);
        assert_eq!(reader.orders_for_buyer(dewi).await.unwrap().len(), 1);
        assert!(reader.orders_for_buyer(rina).await.unwrap().is_empty());
    }
}
