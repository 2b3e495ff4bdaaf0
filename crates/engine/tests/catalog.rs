use sea_orm::Database;

use engine::{Engine, EngineError, RoleKind};
use migration::MigratorTrait;

async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn register_seller(engine: &Engine, login: &str) -> i32 {
    let auth = engine
        .register_user(login, "hash", RoleKind::Seller)
        .await
        .unwrap();
    auth.require_seller().unwrap().id
}

#[tokio::test]
async fn all_products_reports_availability() {
    let engine = test_engine().await;
    let seller_id = register_seller(&engine, "sam").await;
    engine.create_store(seller_id, "Shop").await.unwrap();
    engine
        .create_product(seller_id, "Widget", 100, Some(10))
        .await
        .unwrap();
    engine
        .create_product(seller_id, "Gadget", 50, None)
        .await
        .unwrap();

    let mut products = engine.all_products().await.unwrap();
    products.sort_by_key(|p| p.product.id);

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product.title, "Widget");
    assert_eq!(products[0].available_quantity, 10);
    assert_eq!(products[1].product.title, "Gadget");
    assert_eq!(products[1].available_quantity, 0);
}

#[tokio::test]
async fn all_stores_carries_the_seller() {
    let engine = test_engine().await;
    let sam = register_seller(&engine, "sam").await;
    let tess = register_seller(&engine, "tess").await;
    engine.create_store(sam, "Sam's").await.unwrap();
    engine.create_store(tess, "Tess's").await.unwrap();

    let stores = engine.all_stores().await.unwrap();

    assert_eq!(stores.len(), 2);
    assert!(stores.iter().any(|s| s.store.title == "Sam's" && s.seller.id == sam));
    assert!(stores.iter().any(|s| s.store.title == "Tess's" && s.seller.id == tess));
}

#[tokio::test]
async fn store_products_scopes_to_one_store() {
    let engine = test_engine().await;
    let sam = register_seller(&engine, "sam").await;
    let tess = register_seller(&engine, "tess").await;
    let sams = engine.create_store(sam, "Sam's").await.unwrap();
    engine.create_store(tess, "Tess's").await.unwrap();
    engine.create_product(sam, "Widget", 100, Some(3)).await.unwrap();
    engine.create_product(tess, "Gadget", 50, Some(5)).await.unwrap();

    let (store, products) = engine.store_products(sams.id).await.unwrap();

    assert_eq!(store.store.id, sams.id);
    assert_eq!(store.seller.id, sam);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product.title, "Widget");
    assert_eq!(products[0].available_quantity, 3);
}

#[tokio::test]
async fn missing_store_and_product_are_not_found() {
    let engine = test_engine().await;

    let err = engine.product_by_id(999).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.store_products(999).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
