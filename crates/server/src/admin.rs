//! Admin endpoints: cascading deletes.

use api_types::MessageResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::AuthUser;

use crate::{ServerError, server::ServerState};

pub async fn delete_user(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<MessageResponse>, ServerError> {
    user.require_admin()?;
    state.engine.delete_user(user_id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

pub async fn delete_product(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(product_id): Path<i32>,
) -> Result<Json<MessageResponse>, ServerError> {
    user.require_admin()?;
    state.engine.delete_product(product_id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

pub async fn delete_store(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(store_id): Path<i32>,
) -> Result<Json<MessageResponse>, ServerError> {
    user.require_admin()?;
    state.engine.delete_store(store_id).await?;

    Ok(Json(MessageResponse {
        message: "Store deleted successfully".to_string(),
    }))
}
