//! Registration, login and session introspection.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use grabdock_core::{StoreError, UserStoreError};

use super::download::ErrorResponse;
use super::middleware::AuthUser;
use crate::metrics::AUTH_FAILURES_TOTAL;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Serialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub username: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    match state
        .users()
        .create(request.username.trim(), &request.password)
        .await
    {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(UserResponse {
                id: user.id,
                username: user.username,
            }),
        )),
        Err(UserStoreError::DuplicateUsername(_)) => {
            Err(api_error(StatusCode::CONFLICT, "Username already taken"))
        }
        Err(e) => Err(store_error(e)),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = match state.users().find_by_username(&request.username).await {
        Ok(user) => user,
        Err(e) => return Err(store_error(e)),
    };

    let valid = user
        .as_ref()
        .is_some_and(|u| grabdock_core::JsonUserStore::verify_password(u, &request.password));

    let Some(user) = user.filter(|_| valid) else {
        AUTH_FAILURES_TOTAL.with_label_values(&["login"]).inc();
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
        ));
    };

    let token = state.signer().issue(&user).map_err(|e| {
        error!(error = %e, "token issuance failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.",
        )
    })?;

    Ok(Json(TokenResponse {
        token,
        expires_in: state.token_ttl_secs(),
    }))
}

pub async fn me(AuthUser(identity): AuthUser) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        user_id: identity.user_id,
        username: identity.username,
    })
}

fn store_error(e: UserStoreError) -> ApiError {
    match e {
        UserStoreError::Store(StoreError::Unavailable(_)) => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Storage is unavailable. Try again later.",
        ),
        e => {
            error!(error = %e, "user store operation failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred.",
            )
        }
    }
}
