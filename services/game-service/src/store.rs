//! Persistence seams for the service.
//!
//! [`crate::db::PgStore`] backs these traits with Postgres and
//! [`crate::memory::MemoryStore`] keeps the same contract in process memory.
//! Both enforce uniqueness at insert time and report a taken name with the
//! matching `Duplicate*` variant instead of a separate lookup.

use async_trait::async_trait;
use common::{Game, GameFilter, GameListing, Genre, Platform};
use rust_decimal::Decimal;

use crate::error::GameServiceError;
use crate::models::NewGame;

pub type StoreResult<T> = Result<T, GameServiceError>;

#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Inserts a game. A taken title yields `DuplicateTitle`; a dangling
    /// genre or platform id yields `GenreNotFound` / `PlatformNotFound`.
    async fn create_game(&self, game: &NewGame) -> StoreResult<Game>;

    /// Games joined with their genre and platform names, ordered by id.
    async fn find_games(&self, filter: &GameFilter) -> StoreResult<Vec<GameListing>>;

    async fn find_game_by_id(&self, id: i32) -> StoreResult<Option<Game>>;

    /// Returns the updated row, or `None` when no game has this id.
    async fn update_playtime(&self, id: i32, playtime: i32) -> StoreResult<Option<Game>>;

    /// Returns whether a row was removed.
    async fn delete_game(&self, id: i32) -> StoreResult<bool>;

    /// Mean playtime over every game, `None` when the table is empty.
    async fn average_playtime(&self) -> StoreResult<Option<Decimal>>;
}

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_genre_by_id(&self, id: i32) -> StoreResult<Option<Genre>>;
    async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>>;
    async fn create_genre(&self, name: &str) -> StoreResult<Genre>;
    async fn find_genres(&self) -> StoreResult<Vec<Genre>>;
}

#[async_trait]
pub trait PlatformRepository: Send + Sync {
    async fn find_platform_by_id(&self, id: i32) -> StoreResult<Option<Platform>>;
    async fn find_platform_by_name(&self, name: &str) -> StoreResult<Option<Platform>>;
    async fn create_platform(&self, name: &str) -> StoreResult<Platform>;
    async fn find_platforms(&self) -> StoreResult<Vec<Platform>>;
}

/// Everything the HTTP service needs from a backing store.
pub trait Store: GameRepository + GenreRepository + PlatformRepository {}

impl<T> Store for T where T: GameRepository + GenreRepository + PlatformRepository {}
