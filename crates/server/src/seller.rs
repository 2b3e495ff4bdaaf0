//! Seller endpoints: store, products, stock and balance.

use api_types::MessageResponse;
use api_types::seller::{
    BalanceResponse, CreateProduct, CreateStore, IncreaseQuantity, ProductResponse, ProductView,
    StockEntryView, StockLineView, StockResponse, StoreProductsResponse, StoreResponse, StoreView,
    UpdateProduct, Withdraw,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::AuthUser;

use crate::{ServerError, server::ServerState};

fn store_view(store: &engine::stores::Model) -> StoreView {
    StoreView {
        id: store.id,
        title: store.title.clone(),
        seller_id: store.seller_id,
    }
}

fn product_view(product: &engine::products::Model) -> ProductView {
    ProductView {
        id: product.id,
        title: product.title.clone(),
        price: product.price,
        store_id: product.store_id,
    }
}

pub async fn create_store(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CreateStore>,
) -> Result<(StatusCode, Json<StoreResponse>), ServerError> {
    let seller = user.require_seller()?;
    let store = state.engine.create_store(seller.id, &payload.title).await?;

    Ok((
        StatusCode::CREATED,
        Json(StoreResponse {
            message: "Store created successfully".to_string(),
            store: store_view(&store),
        }),
    ))
}

pub async fn create_product(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ProductResponse>), ServerError> {
    let seller = user.require_seller()?;
    let product = state
        .engine
        .create_product(seller.id, &payload.title, payload.price, payload.quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product: product_view(&product),
        }),
    ))
}

pub async fn update_product(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<ProductResponse>, ServerError> {
    let seller = user.require_seller()?;
    let product = state
        .engine
        .update_product(
            seller.id,
            product_id,
            payload.title.as_deref(),
            payload.price,
        )
        .await?;

    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product: product_view(&product),
    }))
}

pub async fn delete_product(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
) -> Result<Json<MessageResponse>, ServerError> {
    let seller = user.require_seller()?;
    state
        .engine
        .delete_product_as_seller(seller.id, product_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

pub async fn increase_quantity(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<IncreaseQuantity>,
) -> Result<Json<StockResponse>, ServerError> {
    let seller = user.require_seller()?;
    let entry = state
        .engine
        .increase_product_quantity(seller.id, product_id, payload.quantity)
        .await?;

    Ok(Json(StockResponse {
        message: "Product quantity increased".to_string(),
        store_product: StockEntryView {
            id: entry.id,
            store_id: entry.store_id,
            product_id: entry.product_id,
            quantity: entry.quantity,
        },
    }))
}

pub async fn withdraw(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<Withdraw>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let seller = user.require_seller()?;
    let balance = state.engine.withdraw_money(seller.id, payload.amount).await?;

    Ok(Json(BalanceResponse {
        message: "Money withdrawn successfully".to_string(),
        balance,
    }))
}

pub async fn store_products(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<StoreProductsResponse>, ServerError> {
    let seller = user.require_seller()?;
    let overview = state.engine.seller_store_products(seller.id).await?;

    let products = overview
        .products
        .iter()
        .map(|line| StockLineView {
            product: product_view(&line.product),
            quantity: line.entry.quantity,
        })
        .collect();

    Ok(Json(StoreProductsResponse {
        store: store_view(&overview.store),
        products,
    }))
}
