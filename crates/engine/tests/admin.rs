use sea_orm::Database;

use engine::{Engine, EngineError, RoleKind};
use migration::MigratorTrait;

async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

/// Full marketplace fixture: a seller with a stocked product, a
/// consumer with a cart line and a completed purchase of the same
/// product.
struct Fixture {
    seller_user_id: i32,
    consumer_user_id: i32,
    consumer_id: i32,
    store_id: i32,
    product_id: i32,
}

async fn marketplace(engine: &Engine) -> Fixture {
    let seller = engine
        .register_user("sam", "hash", RoleKind::Seller)
        .await
        .unwrap();
    let seller_id = seller.require_seller().unwrap().id;
    let store = engine.create_store(seller_id, "Shop").await.unwrap();
    let product = engine
        .create_product(seller_id, "Widget", 100, Some(10))
        .await
        .unwrap();

    let consumer = engine
        .register_user("alice", "hash", RoleKind::Consumer)
        .await
        .unwrap();
    let consumer_id = consumer.require_consumer().unwrap().id;
    engine.deposit_money(consumer_id, 1_000).await.unwrap();
    engine.add_to_cart(consumer_id, product.id, 2).await.unwrap();
    engine.purchase_cart(consumer_id).await.unwrap();
    engine.add_to_cart(consumer_id, product.id, 1).await.unwrap();

    Fixture {
        seller_user_id: seller.user.id,
        consumer_user_id: consumer.user.id,
        consumer_id,
        store_id: store.id,
        product_id: product.id,
    }
}

#[tokio::test]
async fn delete_missing_user_is_not_found() {
    let engine = test_engine().await;

    let err = engine.delete_user(999).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn delete_consumer_removes_cart_and_history() {
    let engine = test_engine().await;
    let fixture = marketplace(&engine).await;

    engine.delete_user(fixture.consumer_user_id).await.unwrap();

    let err = engine.auth_user(fixture.consumer_user_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.cart(fixture.consumer_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // The login is free again.
    assert!(engine.user_by_login("alice").await.unwrap().is_none());
    // The catalog is unaffected.
    assert_eq!(
        engine
            .product_by_id(fixture.product_id)
            .await
            .unwrap()
            .available_quantity,
        7
    );
}

#[tokio::test]
async fn delete_seller_tears_down_its_store() {
    let engine = test_engine().await;
    let fixture = marketplace(&engine).await;

    engine.delete_user(fixture.seller_user_id).await.unwrap();

    let err = engine.auth_user(fixture.seller_user_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.product_by_id(fixture.product_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.store_products(fixture.store_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // The consumer's cart line referenced the deleted product and went
    // with it; the consumer itself survives.
    assert!(engine.cart(fixture.consumer_id).await.unwrap().lines.is_empty());
}

#[tokio::test]
async fn delete_admin_removes_only_the_user() {
    let engine = test_engine().await;
    let fixture = marketplace(&engine).await;
    let admin = engine
        .register_user("root", "hash", RoleKind::Admin)
        .await
        .unwrap();

    engine.delete_user(admin.user.id).await.unwrap();

    let err = engine.auth_user(admin.user.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    // Everyone else is untouched.
    assert!(engine.auth_user(fixture.seller_user_id).await.is_ok());
    assert!(engine.auth_user(fixture.consumer_user_id).await.is_ok());
}

#[tokio::test]
async fn delete_product_cascades_to_all_references() {
    let engine = test_engine().await;
    let fixture = marketplace(&engine).await;

    engine.delete_product(fixture.product_id).await.unwrap();

    let err = engine.product_by_id(fixture.product_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.cart(fixture.consumer_id).await.unwrap().lines.is_empty());
    // The store survives, just emptied.
    let (_, products) = engine.store_products(fixture.store_id).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn delete_store_removes_products_and_dependents() {
    let engine = test_engine().await;
    let fixture = marketplace(&engine).await;

    engine.delete_store(fixture.store_id).await.unwrap();

    let err = engine.store_products(fixture.store_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.product_by_id(fixture.product_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.cart(fixture.consumer_id).await.unwrap().lines.is_empty());
    assert!(engine.all_products().await.unwrap().is_empty());
    assert!(engine.all_stores().await.unwrap().is_empty());
}
