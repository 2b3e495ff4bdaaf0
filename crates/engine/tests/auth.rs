use sea_orm::Database;

use engine::{Engine, EngineError, Role, RoleKind};
use migration::MigratorTrait;

async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

#[tokio::test]
async fn register_creates_user_with_role_row() {
    let engine = test_engine().await;

    let auth = engine
        .register_user("alice", "hash", RoleKind::Consumer)
        .await
        .unwrap();

    assert_eq!(auth.user.login, "alice");
    assert_eq!(auth.role.kind(), RoleKind::Consumer);
    let Role::Consumer(consumer) = &auth.role else {
        panic!("expected consumer role");
    };
    assert_eq!(consumer.user_id, auth.user.id);
    assert_eq!(consumer.money, 0);
}

#[tokio::test]
async fn duplicate_login_conflicts() {
    let engine = test_engine().await;

    engine
        .register_user("alice", "hash", RoleKind::Consumer)
        .await
        .unwrap();
    let err = engine
        .register_user("alice", "other-hash", RoleKind::Seller)
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
}

#[tokio::test]
async fn duplicate_login_leaves_no_partial_rows() {
    let engine = test_engine().await;

    let first = engine
        .register_user("alice", "hash", RoleKind::Consumer)
        .await
        .unwrap();
    let _ = engine
        .register_user("alice", "other-hash", RoleKind::Seller)
        .await
        .unwrap_err();

    // The original registration is still the one that resolves.
    let reloaded = engine.auth_user(first.user.id).await.unwrap();
    assert_eq!(reloaded.role.kind(), RoleKind::Consumer);
    let stored = engine.user_by_login("alice").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "hash");
}

#[tokio::test]
async fn empty_login_is_rejected() {
    let engine = test_engine().await;

    let err = engine
        .register_user("   ", "hash", RoleKind::Consumer)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn user_by_login_misses_unknown_login() {
    let engine = test_engine().await;

    engine
        .register_user("alice", "hash", RoleKind::Consumer)
        .await
        .unwrap();

    assert!(engine.user_by_login("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn auth_user_reloads_each_role() {
    let engine = test_engine().await;

    for (login, kind) in [
        ("carol", RoleKind::Consumer),
        ("sam", RoleKind::Seller),
        ("root", RoleKind::Admin),
    ] {
        let registered = engine.register_user(login, "hash", kind).await.unwrap();
        let reloaded = engine.auth_user(registered.user.id).await.unwrap();
        assert_eq!(reloaded.role.kind(), kind);
        assert_eq!(reloaded.user.login, login);
    }
}

#[tokio::test]
async fn auth_user_missing_id_is_not_found() {
    let engine = test_engine().await;

    let err = engine.auth_user(999).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
