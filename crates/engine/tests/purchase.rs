use sea_orm::Database;

use engine::{Engine, EngineError, Role, RoleKind};
use migration::MigratorTrait;

async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

/// Returns (user_id, consumer_id).
async fn register_consumer(engine: &Engine, login: &str) -> (i32, i32) {
    let auth = engine
        .register_user(login, "hash", RoleKind::Consumer)
        .await
        .unwrap();
    (auth.user.id, auth.require_consumer().unwrap().id)
}

/// Returns (user_id, seller_id, product_id).
async fn seller_with_product(
    engine: &Engine,
    login: &str,
    price: i64,
    quantity: i64,
) -> (i32, i32, i32) {
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
    (auth.user.id, seller_id, product.id)
}

async fn seller_balance(engine: &Engine, user_id: i32) -> i64 {
    match engine.auth_user(user_id).await.unwrap().role {
        Role::Seller(seller) => seller.money,
        _ => panic!("expected seller role"),
    }
}

#[tokio::test]
async fn purchase_moves_money_and_clears_cart() {
    let engine = test_engine().await;
    let (seller_user_id, _, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;

    engine.deposit_money(consumer_id, 1_000).await.unwrap();
    engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();

    let outcome = engine.purchase_cart(consumer_id).await.unwrap();

    assert_eq!(outcome.total_cost, 300);
    assert_eq!(outcome.purchases.len(), 1);
    assert_eq!(outcome.purchases[0].quantity, 3);
    assert_eq!(outcome.purchases[0].product_id, product_id);

    let snapshot = engine.cart(consumer_id).await.unwrap();
    assert!(snapshot.lines.is_empty());
    assert_eq!(snapshot.balance, 700);
    assert_eq!(seller_balance(&engine, seller_user_id).await, 300);

    // Stock stays where add_to_cart left it.
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        7
    );
}

#[tokio::test]
async fn purchase_empty_cart_fails() {
    let engine = test_engine().await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;
    engine.deposit_money(consumer_id, 100).await.unwrap();

    let err = engine.purchase_cart(consumer_id).await.unwrap_err();
    assert_eq!(err, EngineError::EmptyCart);
}

#[tokio::test]
async fn purchase_with_insufficient_funds_changes_nothing() {
    let engine = test_engine().await;
    let (seller_user_id, _, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;

    engine.deposit_money(consumer_id, 250).await.unwrap();
    engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();

    let err = engine.purchase_cart(consumer_id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            required: 300,
            available: 250,
        }
    );

    // Cart, balances and stock are all untouched.
    let snapshot = engine.cart(consumer_id).await.unwrap();
    assert_eq!(snapshot.balance, 250);
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.lines[0].item.quantity, 3);
    assert_eq!(seller_balance(&engine, seller_user_id).await, 0);
    assert_eq!(
        engine.product_by_id(product_id).await.unwrap().available_quantity,
        7
    );
}

#[tokio::test]
async fn purchase_pays_each_seller_its_share() {
    let engine = test_engine().await;
    let (sam_user_id, _, widget_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let (tess_user_id, _, gadget_id) = seller_with_product(&engine, "tess", 40, 10).await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;

    engine.deposit_money(consumer_id, 1_000).await.unwrap();
    engine.add_to_cart(consumer_id, widget_id, 2).await.unwrap();
    engine.add_to_cart(consumer_id, gadget_id, 5).await.unwrap();

    let outcome = engine.purchase_cart(consumer_id).await.unwrap();

    assert_eq!(outcome.total_cost, 400);
    assert_eq!(outcome.purchases.len(), 2);
    assert_eq!(seller_balance(&engine, sam_user_id).await, 200);
    assert_eq!(seller_balance(&engine, tess_user_id).await, 200);
    assert_eq!(engine.cart(consumer_id).await.unwrap().balance, 600);
}

#[tokio::test]
async fn purchase_records_share_one_timestamp() {
    let engine = test_engine().await;
    let (_, _, widget_id) = seller_with_product(&engine, "sam", 10, 10).await;
    let (_, _, gadget_id) = seller_with_product(&engine, "tess", 10, 10).await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;

    engine.deposit_money(consumer_id, 100).await.unwrap();
    engine.add_to_cart(consumer_id, widget_id, 1).await.unwrap();
    engine.add_to_cart(consumer_id, gadget_id, 1).await.unwrap();

    let outcome = engine.purchase_cart(consumer_id).await.unwrap();

    assert_eq!(outcome.purchases.len(), 2);
    assert_eq!(
        outcome.purchases[0].purchased_at,
        outcome.purchases[1].purchased_at
    );
}

#[tokio::test]
async fn seller_withdraw_caps_at_balance() {
    let engine = test_engine().await;
    let (_, seller_id, product_id) = seller_with_product(&engine, "sam", 100, 10).await;
    let (_, consumer_id) = register_consumer(&engine, "alice").await;

    engine.deposit_money(consumer_id, 500).await.unwrap();
    engine.add_to_cart(consumer_id, product_id, 3).await.unwrap();
    engine.purchase_cart(consumer_id).await.unwrap();

    let err = engine.withdraw_money(seller_id, 400).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            required: 400,
            available: 300,
        }
    );

    assert_eq!(engine.withdraw_money(seller_id, 120).await.unwrap(), 180);
}
