use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
};

use std::sync::Arc;

use crate::{admin, auth, auth_routes, catalog, consumer, seller};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<auth::AuthKeys>,
}

async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}

fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth_routes::register))
        .route("/auth/login", post(auth_routes::login))
        .route("/products", get(catalog::products))
        .route("/products/{id}", get(catalog::product))
        .route("/stores", get(catalog::stores))
        .route("/stores/{id}/products", get(catalog::store_products));

    let protected = Router::new()
        .route("/consumer/deposit", post(consumer::deposit))
        .route(
            "/consumer/cart",
            get(consumer::cart).post(consumer::add_to_cart),
        )
        .route("/consumer/cart/purchase", post(consumer::purchase))
        .route(
            "/consumer/cart/{id}",
            delete(consumer::remove_from_cart).patch(consumer::update_cart_quantity),
        )
        .route("/seller/store", post(seller::create_store))
        .route(
            "/seller/products",
            get(seller::store_products).post(seller::create_product),
        )
        .route(
            "/seller/products/{id}",
            patch(seller::update_product).delete(seller::delete_product),
        )
        .route(
            "/seller/products/{id}/quantity",
            post(seller::increase_quantity),
        )
        .route("/seller/withdraw", post(seller::withdraw))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/products/{id}", delete(admin::delete_product))
        .route("/admin/stores/{id}", delete(admin::delete_store))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(route_not_found)
        .with_state(state)
}

pub async fn run(engine: Engine, auth_keys: auth::AuthKeys, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, auth_keys, listener).await {
        tracing::error!("server failed: {err}");
    }
}

/// The full application router, also used to drive the server in tests
/// without binding a socket.
pub fn app(engine: Engine, auth_keys: auth::AuthKeys) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(auth_keys),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    auth_keys: auth::AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, auth_keys)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    auth_keys: auth::AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, auth_keys, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
