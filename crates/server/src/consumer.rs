//! Consumer endpoints: balance, cart and purchase.

use api_types::consumer::{
    AddToCart, BalanceResponse, CartItemResponse, CartItemView, CartLineView, CartResponse,
    Deposit, PurchaseResponse, PurchaseView, RemoveFromCartResponse, UpdateCartQuantity,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::AuthUser;

use crate::{ServerError, server::ServerState};

fn item_view(item: &engine::cart_items::Model) -> CartItemView {
    CartItemView {
        id: item.id,
        product_id: item.product_id,
        quantity: item.quantity,
    }
}

pub async fn deposit(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<Deposit>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let balance = state.engine.deposit_money(consumer.id, payload.amount).await?;

    Ok(Json(BalanceResponse {
        message: "Money deposited successfully".to_string(),
        balance,
    }))
}

pub async fn cart(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<CartResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let snapshot = state.engine.cart(consumer.id).await?;

    let cart_items = snapshot
        .lines
        .into_iter()
        .map(|line| CartLineView {
            id: line.item.id,
            product_id: line.product.id,
            product_title: line.product.title,
            price: line.product.price,
            quantity: line.item.quantity,
            store_id: line.store.id,
            store_title: line.store.title,
        })
        .collect();

    Ok(Json(CartResponse {
        cart_items,
        balance: snapshot.balance,
    }))
}

pub async fn add_to_cart(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<AddToCart>,
) -> Result<Json<CartItemResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let item = state
        .engine
        .add_to_cart(consumer.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(CartItemResponse {
        message: "Product added to cart".to_string(),
        cart_item: item_view(&item),
    }))
}

pub async fn remove_from_cart(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
) -> Result<Json<RemoveFromCartResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let returned_quantity = state.engine.remove_from_cart(consumer.id, product_id).await?;

    Ok(Json(RemoveFromCartResponse {
        message: "Product removed from cart".to_string(),
        returned_quantity,
    }))
}

pub async fn update_cart_quantity(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateCartQuantity>,
) -> Result<Json<CartItemResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let item = state
        .engine
        .update_cart_quantity(consumer.id, product_id, payload.quantity)
        .await?;

    Ok(Json(CartItemResponse {
        message: "Cart quantity updated".to_string(),
        cart_item: item_view(&item),
    }))
}

pub async fn purchase(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<PurchaseResponse>, ServerError> {
    let consumer = user.require_consumer()?;
    let outcome = state.engine.purchase_cart(consumer.id).await?;

    let purchases = outcome
        .purchases
        .into_iter()
        .map(|record| PurchaseView {
            id: record.id,
            product_id: record.product_id,
            quantity: record.quantity,
            purchase_date: record.purchased_at,
        })
        .collect();

    Ok(Json(PurchaseResponse {
        message: "Purchase completed successfully".to_string(),
        total_cost: outcome.total_cost,
        purchases,
    }))
}
