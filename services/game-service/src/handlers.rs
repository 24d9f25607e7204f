use axum::{
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
};
use common::{
    CreateGameRequest, CreateGenreRequest, CreatePlatformRequest, Game, GameFilter, GameListing,
    Genre, Platform, UpdatePlaytimeRequest,
};

use crate::AppState;
use crate::error::GameServiceError;
use crate::service::average_playtime_message;
use crate::types::GamesQuery;
use crate::validation;

/// Malformed bodies (wrong content type, bad JSON, wrong shape) are all 422.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GameServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| GameServiceError::Validation(rejection.body_text()))
}

fn game_id(raw: &str) -> Result<i32, GameServiceError> {
    validation::parse_game_id(raw).map_err(GameServiceError::InvalidParameter)
}

pub async fn get_games(
    State(state): State<AppState>,
    query: Result<Query<GamesQuery>, QueryRejection>,
) -> Result<ResponseJson<Vec<GameListing>>, GameServiceError> {
    let Query(query) =
        query.map_err(|rejection| GameServiceError::InvalidParameter(rejection.body_text()))?;

    let filter = GameFilter {
        genre: validation::validate_name_filter("genre", query.genre)
            .map_err(GameServiceError::InvalidParameter)?,
        platform: validation::validate_name_filter("platform", query.platform)
            .map_err(GameServiceError::InvalidParameter)?,
    };

    let games = state.games.list(&filter).await?;
    Ok(ResponseJson(games))
}

pub async fn create_game_http(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<StatusCode, GameServiceError> {
    let request = body(payload)?;

    state.games.create(request).await?;
    Ok(StatusCode::CREATED)
}

pub async fn update_playtime_http(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePlaytimeRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Game>), GameServiceError> {
    let id = game_id(&id)?;
    let request = body(payload)?;

    let game = state.games.update_playtime(id, request).await?;
    Ok((StatusCode::CREATED, ResponseJson(game)))
}

pub async fn delete_game_http(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, GameServiceError> {
    let id = game_id(&id)?;

    state.games.delete(id).await?;
    Ok(StatusCode::OK)
}

pub async fn get_playtime_average(
    State(state): State<AppState>,
) -> Result<String, GameServiceError> {
    let average = state.games.average_playtime().await?;
    Ok(average_playtime_message(average))
}

pub async fn get_genres(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Genre>>, GameServiceError> {
    Ok(ResponseJson(state.genres.list_all().await?))
}

pub async fn create_genre_http(
    State(state): State<AppState>,
    payload: Result<Json<CreateGenreRequest>, JsonRejection>,
) -> Result<StatusCode, GameServiceError> {
    let request = body(payload)?;

    state.genres.create(request).await?;
    Ok(StatusCode::CREATED)
}

pub async fn get_platforms(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Platform>>, GameServiceError> {
    Ok(ResponseJson(state.platforms.list_all().await?))
}

pub async fn create_platform_http(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlatformRequest>, JsonRejection>,
) -> Result<StatusCode, GameServiceError> {
    let request = body(payload)?;

    state.platforms.create(request).await?;
    Ok(StatusCode::CREATED)
}

pub async fn health() -> &'static str {
    "OK"
}
