use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum GameServiceError {
    #[error("Invalid request body: {0}")]
    Validation(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("A game with this title already exists!")]
    DuplicateTitle,

    #[error("This genre already exists!")]
    DuplicateGenre,

    #[error("This platform already exists!")]
    DuplicatePlatform,

    #[error("Could not find a genre with this id!")]
    GenreNotFound,

    #[error("Could not find a platform with this id!")]
    PlatformNotFound,

    #[error("Could not find a game with this id!")]
    GameNotFound,

    #[error("No games match the given filter")]
    NoMatchingGames,

    #[error("{0} table is empty")]
    EmptyTable(&'static str),

    #[error("At least one game is needed to compute the average playtime")]
    MissingGames,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GameServiceError::InvalidParameter(_) | GameServiceError::MissingGames => {
                StatusCode::BAD_REQUEST
            }
            GameServiceError::DuplicateTitle
            | GameServiceError::DuplicateGenre
            | GameServiceError::DuplicatePlatform => StatusCode::CONFLICT,
            GameServiceError::GenreNotFound
            | GameServiceError::PlatformNotFound
            | GameServiceError::GameNotFound
            | GameServiceError::NoMatchingGames
            | GameServiceError::EmptyTable(_) => StatusCode::NOT_FOUND,
            GameServiceError::Database(_) | GameServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameServiceError::Validation(_) => "validation_error",
            GameServiceError::InvalidParameter(_) => "invalid_parameter",
            GameServiceError::DuplicateTitle
            | GameServiceError::DuplicateGenre
            | GameServiceError::DuplicatePlatform => "conflict",
            GameServiceError::GenreNotFound
            | GameServiceError::PlatformNotFound
            | GameServiceError::GameNotFound
            | GameServiceError::NoMatchingGames
            | GameServiceError::EmptyTable(_) => "not_found",
            GameServiceError::MissingGames => "missing_games",
            GameServiceError::Database(_) | GameServiceError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for GameServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
