use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, LoginResponse, MessageResponse},
        password,
    },
    error::{ApiError, StoreError},
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (username, plain) = payload.into_parts().ok_or_else(|| {
        ApiError::Validation("Username and password are required".into())
    })?;

    // Fast path; the unique index still decides under concurrent registration.
    match state.users.find_by_username(&username).await {
        Ok(Some(_)) => {
            warn!(%username, "username already registered");
            return Err(ApiError::Conflict("UserName Already Exists".into()));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(ApiError::Internal("Registration Failed".into()));
        }
    }

    let hash = match password::hash(plain).await {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(ApiError::Internal("Registration Failed".into()));
        }
    };

    match state.users.insert(&username, &hash).await {
        Ok(user) => {
            info!(username = %user.username, "user registered");
            Ok(Json(MessageResponse {
                message: "Registration Successful",
            }))
        }
        Err(StoreError::Duplicate(_)) => {
            warn!(%username, "username taken by concurrent registration");
            Err(ApiError::Conflict("UserName Already Exists".into()))
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Err(ApiError::Internal("Registration Failed".into()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, plain) = payload.into_parts().ok_or_else(|| {
        ApiError::Validation("Username and password are required".into())
    })?;

    let user = match state.users.find_by_username(&username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%username, "login unknown username");
            return Err(ApiError::UnknownUser("User Not Found!".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(ApiError::Internal("Login Failed!".into()));
        }
    };

    let ok = match password::verify(plain, user.password_hash.clone()).await {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, username = %user.username, "verify_password failed");
            return Err(ApiError::Internal("Login Failed!".into()));
        }
    };

    if !ok {
        warn!(username = %user.username, "login invalid password");
        return Err(ApiError::Auth("Invalid Password".into()));
    }

    info!(username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login Successful",
        username: user.username,
    }))
}
