use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;
use crate::handlers::{
    create_game_http, create_genre_http, create_platform_http, delete_game_http, get_games,
    get_genres, get_platforms, get_playtime_average, health, update_playtime_http,
};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/games", get(get_games).post(create_game_http))
        .route("/games/playtime-avg", get(get_playtime_average))
        .route("/games/{id}", patch(update_playtime_http).delete(delete_game_http))
        .route("/genres", get(get_genres).post(create_genre_http))
        .route("/platforms", get(get_platforms).post(create_platform_http))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
