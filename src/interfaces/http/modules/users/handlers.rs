//! User API handlers
//!
//! Every route validates the OIB before touching the store. Absence is
//! decided here, not in the service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use super::dto::{CreateUserRequest, UserDto};
use crate::application::{ExportError, SharedUserService};
use crate::domain::validate_oib;
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::error::ApiError;

pub const IO_FAILURE_MESSAGE: &str = "File generation failed due to an I/O error.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "File generation failed due to an unexpected error.";

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: SharedUserService,
}

#[utoipa::path(
    get,
    path = "/api/user/{oib}",
    tag = "Users",
    params(("oib" = String, Path, description = "User OIB")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 400, description = "Invalid OIB", body = String),
        (status = 404, description = "Not found", body = String)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(oib): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    validate_oib(&oib)?;

    let user = state
        .user_service
        .find_by_oib(&oib)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("The user with OIB {} not found!", oib)))?;

    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error, invalid OIB or OIB already registered")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    // `into_user` leaves the id unset so the store always inserts.
    let user = request.into_user();
    validate_oib(&user.oib)?;

    if state.user_service.find_by_oib(&user.oib).await?.is_some() {
        return Err(ApiError::AlreadyExists(format!(
            "User with OIB: {} already exists.",
            user.oib
        )));
    }

    let user = state.user_service.save(user).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

#[utoipa::path(
    delete,
    path = "/api/user/{oib}",
    tag = "Users",
    params(("oib" = String, Path, description = "User OIB")),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 400, description = "Invalid OIB", body = String),
        (status = 404, description = "Not found", body = String)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(oib): Path<String>,
) -> Result<String, ApiError> {
    validate_oib(&oib)?;

    if state.user_service.find_by_oib(&oib).await?.is_none() {
        return Err(ApiError::NotFound(format!("User with OIB: {} not found.", oib)));
    }

    state.user_service.delete_by_oib(&oib).await?;
    Ok(format!("User with OIB: {} has been deleted.", oib))
}

#[utoipa::path(
    get,
    path = "/api/generate/{oib}",
    tag = "Users",
    params(("oib" = String, Path, description = "User OIB")),
    responses(
        (status = 200, description = "Export file written", body = String),
        (status = 400, description = "Invalid OIB", body = String),
        (status = 404, description = "Not found", body = String),
        (status = 500, description = "Export file already exists or could not be written", body = String)
    )
)]
pub async fn generate_file(
    State(state): State<UserHandlerState>,
    Path(oib): Path<String>,
) -> Result<String, ApiError> {
    validate_oib(&oib)?;

    let mut user = state
        .user_service
        .find_by_oib(&oib)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("The user with OIB {} not found!", oib)))?;

    if let Some(existing) = user.active_file() {
        return Err(ApiError::ActiveFileExists(existing.to_string()));
    }

    let file_name = state
        .user_service
        .generate_file(&user)
        .await
        .map_err(|e| {
            error!(oib = %oib, error = %e, "Export failed");
            match e {
                ExportError::Io(_) => ApiError::ExportFailed(IO_FAILURE_MESSAGE),
                ExportError::InvalidStatus(_) => ApiError::ExportFailed(UNEXPECTED_FAILURE_MESSAGE),
            }
        })?;

    user.file_name = Some(file_name.clone());
    state.user_service.save(user).await.map_err(|e| {
        error!(oib = %oib, error = %e, "Failed to record export file name");
        ApiError::ExportFailed(UNEXPECTED_FAILURE_MESSAGE)
    })?;

    Ok(format!(
        "File: {} saved in the working app directory!",
        file_name
    ))
}
