//! End-to-end checkout flow against the in-memory order store: browse,
//! fill the cart, submit, and read the history back.

use common::{BuyerId, Money};
use domain::{BuyerSession, CheckoutError, CheckoutService, ShippingInfo};
use order_store::{InMemoryOrderStore, NewProduct, OrderStatus, OrderStore, ProductRecord};

fn shipping(address: &str) -> ShippingInfo {
    ShippingInfo {
        name: "Rina Kartika".to_string(),
        phone: "085678901234".to_string(),
        address: address.to_string(),
        notes: None,
    }
}

async fn seeded_store() -> InMemoryOrderStore {
    let store = InMemoryOrderStore::new();
    for (name, price, stock, seller) in [
        ("Keripik Pisang", 15_000, 10, "Warung Bu Sari"),
        ("Kopi Gayo", 20_000, 5, "Kedai Aceh"),
        ("Kain Batik Tulis", 250_000, 2, "Galeri Batik Sekar"),
    ] {
        store
            .insert_product(NewProduct {
                name: name.to_string(),
                price: Money::from_rupiah(price),
                stock,
                seller: seller.to_string(),
                image_url: None,
            })
            .await
            .unwrap();
    }
    store
}

async fn catalog(store: &InMemoryOrderStore) -> Vec<ProductRecord> {
    store.list_products().await.unwrap()
}

#[tokio::test]
async fn browse_fill_submit_and_read_back() {
    let store = seeded_store().await;
    let service = CheckoutService::new(store.clone());
    let buyer = BuyerId::new();
    let mut session = BuyerSession::signed_in(buyer);

    let products = catalog(&store).await;
    assert_eq!(products.len(), 3);

    // Two bags of keripik and one kopi.
    session.cart_mut().add(&products[0]);
    session.cart_mut().add(&products[0]);
    session.cart_mut().add(&products[1]);
    assert_eq!(session.cart().total(), Money::from_rupiah(50_000));

    let receipt = session
        .checkout(&service, &shipping("Jl. Kaliurang Km 5, Sleman"))
        .await
        .unwrap();
    assert_eq!(receipt.status, OrderStatus::Pending);
    assert!(session.cart().is_empty());

    // Stock moved at submission time.
    let products = catalog(&store).await;
    assert_eq!(products[0].stock, 8);
    assert_eq!(products[1].stock, 4);

    // Durable history matches the optimistic one.
    session.refresh_history(&store).await.unwrap();
    assert_eq!(session.history().len(), 1);
    let order = &session.history()[0];
    assert_eq!(order.id, receipt.order_id);
    assert_eq!(order.total, Money::from_rupiah(50_000));
    assert_eq!(order.shipping_address, "Jl. Kaliurang Km 5, Sleman");
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.lines[0].quantity, 2);
}

#[tokio::test]
async fn histories_are_scoped_per_buyer() {
    let store = seeded_store().await;
    let service = CheckoutService::new(store.clone());
    let products = catalog(&store).await;

    let mut dewi = BuyerSession::signed_in(BuyerId::new());
    dewi.cart_mut().add(&products[0]);
    dewi.checkout(&service, &shipping("Jl. Dewi Sartika 3"))
        .await
        .unwrap();

    let mut rina = BuyerSession::signed_in(BuyerId::new());
    rina.cart_mut().add(&products[1]);
    rina.checkout(&service, &shipping("Jl. Pemuda 17"))
        .await
        .unwrap();

    dewi.refresh_history(&store).await.unwrap();
    rina.refresh_history(&store).await.unwrap();
    assert_eq!(dewi.history().len(), 1);
    assert_eq!(rina.history().len(), 1);
    assert_eq!(dewi.history()[0].lines[0].product_name, "Keripik Pisang");
    assert_eq!(rina.history()[0].lines[0].product_name, "Kopi Gayo");
}

#[tokio::test]
async fn shortage_on_one_line_rolls_back_the_whole_order() {
    let store = seeded_store().await;
    let service = CheckoutService::new(store.clone());
    let products = catalog(&store).await;
    let mut session = BuyerSession::signed_in(BuyerId::new());

    // Keripik is plentiful; batik has only two in stock.
    session.cart_mut().add(&products[0]);
    let batik_line = session.cart_mut().add(&products[2]);
    session.cart_mut().update_quantity(batik_line, 3);

    let err = session
        .checkout(&service, &shipping("Jl. Solo Km 9"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CheckoutError::StockShortage {
            product_id: products[2].id
        }
    );

    // Nothing moved, including the line that had enough stock.
    let after = catalog(&store).await;
    assert_eq!(after[0].stock, 10);
    assert_eq!(after[2].stock, 2);
    assert_eq!(session.cart().len(), 2);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn sequential_orders_come_back_newest_first() {
    let store = seeded_store().await;
    let service = CheckoutService::new(store.clone());
    let products = catalog(&store).await;
    let mut session = BuyerSession::signed_in(BuyerId::new());

    let mut receipts = Vec::new();
    for _ in 0..3 {
        session.cart_mut().add(&products[0]);
        receipts.push(
            session
                .checkout(&service, &shipping("Jl. Solo Km 9"))
                .await
                .unwrap(),
        );
    }

    session.refresh_history(&store).await.unwrap();
    let ids: Vec<_> = session.history().iter().map(|o| o.id).collect();
    assert_eq!(ids[0], receipts[2].order_id);
    assert_eq!(ids[1], receipts[1].order_id);
    assert_eq!(ids[2], receipts[0].order_id);
}
