use sea_orm::Database;

use engine::{Engine, EngineError, RoleKind};
use migration::MigratorTrait;

async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn register_consumer(engine: &Engine, login: &str) -> i32 {
    let auth = engine
        .register_user(login, "hash", RoleKind::Consumer)
        .await
        .unwrap();
    auth.require_consumer().unwrap().id
}

/// Seller with a store and one product, returns (seller_id, product_id).
async fn seller_with_product(
    engine: &Engine,
    login: &str,
    price: i64,
    quantity: i64,
) -> (i32, i32) {
    let auth = engine
        .register_user(login, "hash", RoleKind::Seller)
        .await
        .unwrap();
    let seller_id = auth.require_seller().unwrap().id;
    engine.create_store(seller_id, "Shop").await.unwrap();
    let product = engine
        .create_product(seller_id, "Widget", price, Some(quantity))
        .await
        .unwrap();
    (seller_id, product.id)
}

#[tokio::test]
async fn deposit_accumulates() {
    let engine = test_engine().await;
    let consumer_id = register_consumer(&engine, "alice").await;

    assert_eq!(engine.deposit_money(consumer_id, 100).await.unwrap(), 100);
    assert_eq!(engine.deposit_money(consumer_id, 250).await.unwrap(), 350);
}

#[tokio::test]
async fn deposit_rejects_non_positive_amount() {
    let engine = test_engine().await;
    let consumer_id = register_consumer(&engine, "alice").await;

    for amount in [0, -5] {
        let err = engine.deposit_money(consumer_id, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn add_to_cart_reserves_stock() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    let item = engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();
    assert_eq!(item.quantity, 3);

    let catalog = engine.product_by_id(product_id).await.unwrap();
    assert_eq!(catalog.available_quantity, 7);
}

#[tokio::test]
async fn add_to_cart_merges_into_existing_line() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();
    let item = engine.add_to_cart(consumer_id, product_id, 2).await.unwrap();

    assert_eq!(item.quantity, 5);
    let snapshot = engine.cart(consumer_id).await.unwrap();
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        5
    );
}

#[tokio::test]
async fn add_to_cart_over_stock_fails_without_side_effects() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 5).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    let err = engine.add_to_cart(consumer_id, product_id, 6).await.unwrap_err();
    assert_eq!(err, EngineError::InsufficientStock { available: 5 });

    let snapshot = engine.cart(consumer_id).await.unwrap();
    assert!(snapshot.lines.is_empty());
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        5
    );
}

#[tokio::test]
async fn add_to_cart_missing_product_is_not_found() {
    let engine = test_engine().await;
    let consumer_id = register_consumer(&engine, "alice").await;

    let err = engine.add_to_cart(consumer_id, 999, 1).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn remove_from_cart_returns_full_quantity() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    engine.add_to_cart(consumer_id, product_id, 4).await.unwrap();
    let returned = engine.remove_from_cart(consumer_id, product_id).await.unwrap();

    assert_eq!(returned, 4);
    assert!(engine.cart(consumer_id).await.unwrap().lines.is_empty());
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        10
    );
}

#[tokio::test]
async fn remove_from_cart_missing_line_is_not_found() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    let err = engine
        .remove_from_cart(consumer_id, product_id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product not in cart".to_string()));
}

#[tokio::test]
async fn update_cart_quantity_shrink_returns_stock() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    engine.add_to_cart(consumer_id, product_id, 5).await.unwrap();
    let item = engine
        .update_cart_quantity(consumer_id, product_id, 2)
        .await
        .unwrap();

    assert_eq!(item.quantity, 2);
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        8
    );
}

#[tokio::test]
async fn update_cart_quantity_grow_leaves_stock_untouched() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;

    engine.add_to_cart(consumer_id, product_id, 2).await.unwrap();
    let item = engine
        .update_cart_quantity(consumer_id, product_id, 5)
        .await
        .unwrap();

    assert_eq!(item.quantity, 5);
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        8
    );
}

#[tokio::test]
async fn cart_snapshot_joins_product_and_store() {
    let engine = test_engine().await;
    let (_, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;
    engine.deposit_money(consumer_id, 500).await.unwrap();
    engine.add_to_cart(consumer_id, product_id, 2).await.unwrap();

    let snapshot = engine.cart(consumer_id).await.unwrap();

    assert_eq!(snapshot.balance, 500);
    assert_eq!(snapshot.lines.len(), 1);
    let line = &snapshot.lines[0];
    assert_eq!(line.product.title, "Widget");
    assert_eq!(line.store.title, "Shop");
    assert_eq!(line.item.quantity, 2);
}

// StockEntry.quantity + cart quantity + purchased quantity stays equal
// to the total ever stocked, whatever the consumer does.
#[tokio::test]
async fn stock_ledger_is_invariant_across_cart_operations() {
    let engine = test_engine().await;
    let (seller_id, product_id) = seller_with_product(&engine, "sam", 10, 10).await;
    let consumer_id = register_consumer(&engine, "alice").await;
    engine.deposit_money(consumer_id, 1_000).await.unwrap();

    engine
        .increase_product_quantity(seller_id, product_id, 5)
        .await
        .unwrap();
    let total_stocked = 15;

    engine.add_to_cart(consumer_id, product_id, 6).await.unwrap();
    engine
        .update_cart_quantity(consumer_id, product_id, 2)
        .await
        .unwrap();
    engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();
    let outcome = engine.purchase_cart(consumer_id).await.unwrap();

    let purchased: i64 = outcome.purchases.iter().map(|p| p.quantity).sum();
    let in_cart: i64 = engine
        .cart(consumer_id)
        .await
        .unwrap()
        .lines
        .iter()
        .map(|line| line.item.quantity)
        .sum();
    let available = engine.product_by_id(product_id).await.unwrap().available_quantity;

    assert_eq!(available + in_cart + purchased, total_stocked);
}
