//! Public catalog endpoints. No authentication required.

use api_types::catalog::{
    CatalogProductView, ProductsResponse, StoreProductsResponse, StoreWithSellerView,
    StoresResponse,
};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

fn product_view(catalog: &engine::CatalogProduct) -> CatalogProductView {
    CatalogProductView {
        id: catalog.product.id,
        title: catalog.product.title.clone(),
        price: catalog.product.price,
        store_id: catalog.product.store_id,
        available_quantity: catalog.available_quantity,
    }
}

pub async fn products(
    State(state): State<ServerState>,
) -> Result<Json<ProductsResponse>, ServerError> {
    let products = state.engine.all_products().await?;

    Ok(Json(ProductsResponse {
        products: products.iter().map(product_view).collect(),
    }))
}

pub async fn product(
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
) -> Result<Json<CatalogProductView>, ServerError> {
    let catalog = state.engine.product_by_id(product_id).await?;

    Ok(Json(product_view(&catalog)))
}

pub async fn stores(State(state): State<ServerState>) -> Result<Json<StoresResponse>, ServerError> {
    let stores = state.engine.all_stores().await?;

    Ok(Json(StoresResponse {
        stores: stores
            .iter()
            .map(|entry| StoreWithSellerView {
                id: entry.store.id,
                title: entry.store.title.clone(),
                seller_id: entry.seller.id,
            })
            .collect(),
    }))
}

pub async fn store_products(
    State(state): State<ServerState>,
    Path(store_id): Path<i32>,
) -> Result<Json<StoreProductsResponse>, ServerError> {
    let (store, products) = state.engine.store_products(store_id).await?;

    Ok(Json(StoreProductsResponse {
        store: StoreWithSellerView {
            id: store.store.id,
            title: store.store.title.clone(),
            seller_id: store.seller.id,
        },
        products: products.iter().map(product_view).collect(),
    }))
}
