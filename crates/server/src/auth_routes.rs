//! Registration and login endpoints.

use api_types::auth::{AuthResponse, Login, Register, UserView};
use axum::{Json, extract::State, http::StatusCode};
use engine::RoleKind;

use crate::{ServerError, auth, server::ServerState};

fn role_view(kind: RoleKind) -> api_types::Role {
    match kind {
        RoleKind::Consumer => api_types::Role::Consumer,
        RoleKind::Seller => api_types::Role::Seller,
        RoleKind::Admin => api_types::Role::Admin,
    }
}

fn user_view(auth_user: &engine::AuthUser) -> UserView {
    UserView {
        id: auth_user.user.id,
        login: auth_user.user.login.clone(),
        role: role_view(auth_user.role.kind()),
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let role = match payload.role {
        api_types::Role::Consumer => RoleKind::Consumer,
        api_types::Role::Seller => RoleKind::Seller,
        api_types::Role::Admin => RoleKind::Admin,
    };

    if payload.password.is_empty() {
        return Err(ServerError::Generic(
            "password must not be empty".to_string(),
        ));
    }
    let password_hash = auth::hash_password(&payload.password)
        .map_err(|_| ServerError::Generic("failed to hash password".to_string()))?;

    let auth_user = state
        .engine
        .register_user(&payload.login, &password_hash, role)
        .await?;
    let token = state
        .auth
        .issue(auth_user.user.id)
        .map_err(|_| ServerError::Generic("failed to issue token".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user_view(&auth_user),
        }),
    ))
}

/// Unknown login and wrong password answer identically, so the response
/// never reveals which logins exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<AuthResponse>, ServerError> {
    let invalid = || ServerError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .engine
        .user_by_login(&payload.login)
        .await?
        .ok_or_else(invalid)?;
    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(invalid());
    }

    let auth_user = state.engine.auth_user(user.id).await?;
    let token = state
        .auth
        .issue(auth_user.user.id)
        .map_err(|_| ServerError::Generic("failed to issue token".to_string()))?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user_view(&auth_user),
    }))
}
