//! In-process store with the same contract as the Postgres one.
//!
//! Used when no `DATABASE_URL` is configured, and by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use common::{Game, GameFilter, GameListing, Genre, GenreName, Platform, PlatformName};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::GameServiceError;
use crate::models::NewGame;
use crate::store::{GameRepository, GenreRepository, PlatformRepository, StoreResult};

#[derive(Default)]
struct Tables {
    genres: Vec<Genre>,
    platforms: Vec<Platform>,
    games: Vec<Game>,
    next_genre_id: i32,
    next_platform_id: i32,
    next_game_id: i32,
}

impl Tables {
    fn genre(&self, id: i32) -> Option<&Genre> {
        self.genres.iter().find(|g| g.id == id)
    }

    fn platform(&self, id: i32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn matches_filter(filter: &GameFilter, genre: &str, platform: Option<&str>) -> bool {
    let genre_ok = filter
        .genre
        .as_deref()
        .is_none_or(|prefix| starts_with_ignore_case(genre, prefix));
    let platform_ok = filter.platform.as_deref().is_none_or(|prefix| {
        platform.is_some_and(|name| starts_with_ignore_case(name, prefix))
    });
    genre_ok && platform_ok
}

#[async_trait]
impl GameRepository for MemoryStore {
    async fn create_game(&self, game: &NewGame) -> StoreResult<Game> {
        let mut tables = self.tables.write().await;

        if tables.games.iter().any(|g| g.title == game.title) {
            return Err(GameServiceError::DuplicateTitle);
        }
        if tables.genre(game.genre_id).is_none() {
            return Err(GameServiceError::GenreNotFound);
        }
        if tables.platform(game.platform_id).is_none() {
            return Err(GameServiceError::PlatformNotFound);
        }

        tables.next_game_id += 1;
        let record = Game {
            id: tables.next_game_id,
            title: game.title.clone(),
            playtime: game.playtime,
            genre_id: game.genre_id,
            platform_id: Some(game.platform_id),
            created_at: Utc::now(),
        };
        tables.games.push(record.clone());

        Ok(record)
    }

    async fn find_games(&self, filter: &GameFilter) -> StoreResult<Vec<GameListing>> {
        let tables = self.tables.read().await;

        let mut listings = Vec::new();
        for game in &tables.games {
            let Some(genre) = tables.genre(game.genre_id) else {
                continue;
            };
            let platform = game.platform_id.and_then(|id| tables.platform(id));

            if !matches_filter(filter, &genre.genre, platform.map(|p| p.platform.as_str())) {
                continue;
            }

            listings.push(GameListing {
                id: game.id,
                title: game.title.clone(),
                playtime: game.playtime,
                genres: GenreName { genre: genre.genre.clone() },
                platforms: platform.map(|p| PlatformName { platform: p.platform.clone() }),
            });
        }

        Ok(listings)
    }

    async fn find_game_by_id(&self, id: i32) -> StoreResult<Option<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.games.iter().find(|g| g.id == id).cloned())
    }

    async fn update_playtime(&self, id: i32, playtime: i32) -> StoreResult<Option<Game>> {
        let mut tables = self.tables.write().await;

        Ok(tables.games.iter_mut().find(|g| g.id == id).map(|game| {
            game.playtime = playtime;
            game.clone()
        }))
    }

    async fn delete_game(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.games.len();
        tables.games.retain(|g| g.id != id);
        Ok(tables.games.len() < before)
    }

    async fn average_playtime(&self) -> StoreResult<Option<Decimal>> {
        let tables = self.tables.read().await;

        if tables.games.is_empty() {
            return Ok(None);
        }

        let total: i64 = tables.games.iter().map(|g| i64::from(g.playtime)).sum();
        let count = tables.games.len() as i64;
        Ok(Some(Decimal::from(total) / Decimal::from(count)))
    }
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn find_genre_by_id(&self, id: i32) -> StoreResult<Option<Genre>> {
        Ok(self.tables.read().await.genre(id).cloned())
    }

    async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.genres.iter().find(|g| g.genre == name).cloned())
    }

    async fn create_genre(&self, name: &str) -> StoreResult<Genre> {
        let mut tables = self.tables.write().await;

        if tables.genres.iter().any(|g| g.genre == name) {
            return Err(GameServiceError::DuplicateGenre);
        }

        tables.next_genre_id += 1;
        let genre = Genre { id: tables.next_genre_id, genre: name.to_string() };
        tables.genres.push(genre.clone());
        Ok(genre)
    }

    async fn find_genres(&self) -> StoreResult<Vec<Genre>> {
        Ok(self.tables.read().await.genres.clone())
    }
}

#[async_trait]
impl PlatformRepository for MemoryStore {
    async fn find_platform_by_id(&self, id: i32) -> StoreResult<Option<Platform>> {
        Ok(self.tables.read().await.platform(id).cloned())
    }

    async fn find_platform_by_name(&self, name: &str) -> StoreResult<Option<Platform>> {
        let tables = self.tables.read().await;
        Ok(tables.platforms.iter().find(|p| p.platform == name).cloned())
    }

    async fn create_platform(&self, name: &str) -> StoreResult<Platform> {
        let mut tables = self.tables.write().await;

        if tables.platforms.iter().any(|p| p.platform == name) {
            return Err(GameServiceError::DuplicatePlatform);
        }

        tables.next_platform_id += 1;
        let platform = Platform { id: tables.next_platform_id, platform: name.to_string() };
        tables.platforms.push(platform.clone());
        Ok(platform)
    }

    async fn find_platforms(&self) -> StoreResult<Vec<Platform>> {
        Ok(self.tables.read().await.platforms.clone())
    }
}
