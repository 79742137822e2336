//! HTTP routes.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use roster_domain::{Character, CharacterId};
use roster_shared::{CharacterInput, DataResponse, ErrorCode, ErrorResponse, ListCharactersQuery};

use crate::app::App;
use crate::use_cases::management::{CharacterFilter, ManagementError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(replace_character)
                .patch(patch_character)
                .delete(delete_character),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Characters
// =============================================================================

async fn list_characters(
    State(app): State<Arc<App>>,
    query: Result<Query<ListCharactersQuery>, QueryRejection>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = match (query.level, query.character_class) {
        (Some(level), _) => CharacterFilter::Level(level),
        (None, Some(class)) => CharacterFilter::Class(class),
        (None, None) => CharacterFilter::All,
    };

    let characters = app.use_cases.management.character.list(filter).await?;
    Ok(Json(characters))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Character>>, ApiError> {
    let character = app
        .use_cases
        .management
        .character
        .get(&CharacterId::new(id))
        .await?;
    Ok(Json(DataResponse::new(character)))
}

async fn create_character(
    State(app): State<Arc<App>>,
    body: Result<Json<CharacterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Character>>), ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let character = app
        .use_cases
        .management
        .character
        .create(input.sanitize())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(character))))
}

async fn replace_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    body: Result<Json<CharacterInput>, JsonRejection>,
) -> Result<Json<DataResponse<Character>>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let character = app
        .use_cases
        .management
        .character
        .replace(&CharacterId::new(id), input.sanitize())
        .await?;
    Ok(Json(DataResponse::new(character)))
}

async fn patch_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    body: Result<Json<CharacterInput>, JsonRejection>,
) -> Result<Json<DataResponse<Character>>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let character = app
        .use_cases
        .management
        .character
        .patch(&CharacterId::new(id), input.sanitize())
        .await?;
    Ok(Json(DataResponse::new(character)))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Character>>, ApiError> {
    let removed = app
        .use_cases
        .management
        .character
        .delete(&CharacterId::new(id))
        .await?;
    Ok(Json(DataResponse::new(removed)))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::character_not_found()),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(ErrorCode::InvalidCharacter, msg)),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Character request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        ErrorCode::BackendFailure,
                        "Internal error",
                    )),
                )
                    .into_response()
            }
        }
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::NotFound => ApiError::NotFound,
            ManagementError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ManagementError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}
