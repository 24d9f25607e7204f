use async_trait::async_trait;
use common::{Game, GameFilter, GameListing, Genre, Platform};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::GameServiceError;
use crate::models::{DbGame, DbGameListing, DbGenre, DbPlatform, NewGame};
use crate::store::{GameRepository, GenreRepository, PlatformRepository, StoreResult};

/// Postgres-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
     pool: PgPool,
}

impl PgStore {
     pub fn new(pool: PgPool) -> Self {
          Self { pool }
     }

     pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
          let pool = PgPoolOptions::new()
               .max_connections(max_connections)
               .connect(database_url)
               .await?;

          Ok(Self::new(pool))
     }

     pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
          sqlx::migrate!("./migrations").run(&self.pool).await
     }

     pub async fn close(&self) {
          self.pool.close().await;
     }
}

/// Maps named constraint violations onto the domain errors they stand for.
pub fn map_constraint_error(err: sqlx::Error) -> GameServiceError {
     let constraint = err
          .as_database_error()
          .and_then(|db_err| db_err.constraint())
          .map(str::to_owned);

     match constraint.as_deref() {
          Some("games_title_key") => GameServiceError::DuplicateTitle,
          Some("games_genre_id_fkey") => GameServiceError::GenreNotFound,
          Some("games_platform_id_fkey") => GameServiceError::PlatformNotFound,
          Some("games_playtime_check") => {
               GameServiceError::Validation("Playtime must be a non-negative number of minutes".to_string())
          }
          Some("genres_genre_key") => GameServiceError::DuplicateGenre,
          Some("platforms_platform_key") => GameServiceError::DuplicatePlatform,
          _ => GameServiceError::Database(err),
     }
}

/// Builds an `ILIKE` pattern that matches names starting with `prefix`,
/// treating `%`, `_` and `\` in the prefix literally.
pub fn like_prefix(prefix: &str) -> String {
     let mut pattern = String::with_capacity(prefix.len() + 1);
     for c in prefix.chars() {
          if matches!(c, '%' | '_' | '\\') {
               pattern.push('\\');
          }
          pattern.push(c);
     }
     pattern.push('%');
     pattern
}

#[async_trait]
impl GameRepository for PgStore {
     async fn create_game(&self, game: &NewGame) -> StoreResult<Game> {
          let record = sqlx::query_as::<_, DbGame>(
               r#"
               INSERT INTO games (title, playtime, genre_id, platform_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id, title, playtime, genre_id, platform_id, created_at
               "#,
          )
          .bind(&game.title)
          .bind(game.playtime)
          .bind(game.genre_id)
          .bind(game.platform_id)
          .fetch_one(&self.pool)
          .await
          .map_err(map_constraint_error)?;

          Ok(record.into())
     }

     async fn find_games(&self, filter: &GameFilter) -> StoreResult<Vec<GameListing>> {
          let genre_pattern = filter.genre.as_deref().map(like_prefix);
          let platform_pattern = filter.platform.as_deref().map(like_prefix);

          let records = sqlx::query_as::<_, DbGameListing>(
               r#"
               SELECT g.id, g.title, g.playtime, ge.genre, p.platform
               FROM games g
               JOIN genres ge ON ge.id = g.genre_id
               LEFT JOIN platforms p ON p.id = g.platform_id
               WHERE ($1::text IS NULL OR ge.genre ILIKE $1)
                 AND ($2::text IS NULL OR p.platform ILIKE $2)
               ORDER BY g.id
               "#,
          )
          .bind(genre_pattern)
          .bind(platform_pattern)
          .fetch_all(&self.pool)
          .await?;

          Ok(records.into_iter().map(GameListing::from).collect())
     }

     async fn find_game_by_id(&self, id: i32) -> StoreResult<Option<Game>> {
          let record = sqlx::query_as::<_, DbGame>(
               r#"
               SELECT id, title, playtime, genre_id, platform_id, created_at
               FROM games
               WHERE id = $1
               "#,
          )
          .bind(id)
          .fetch_optional(&self.pool)
          .await?;

          Ok(record.map(Game::from))
     }

     async fn update_playtime(&self, id: i32, playtime: i32) -> StoreResult<Option<Game>> {
          let record = sqlx::query_as::<_, DbGame>(
               r#"
               UPDATE games
               SET playtime = $2
               WHERE id = $1
               RETURNING id, title, playtime, genre_id, platform_id, created_at
               "#,
          )
          .bind(id)
          .bind(playtime)
          .fetch_optional(&self.pool)
          .await
          .map_err(map_constraint_error)?;

          Ok(record.map(Game::from))
     }

     async fn delete_game(&self, id: i32) -> StoreResult<bool> {
          let result = sqlx::query("DELETE FROM games WHERE id = $1")
               .bind(id)
               .execute(&self.pool)
               .await?;

          Ok(result.rows_affected() > 0)
     }

     async fn average_playtime(&self) -> StoreResult<Option<Decimal>> {
          let average = sqlx::query_scalar::<_, Option<Decimal>>("SELECT AVG(playtime) FROM games")
               .fetch_one(&self.pool)
               .await?;

          Ok(average)
     }
}

#[async_trait]
impl GenreRepository for PgStore {
     async fn find_genre_by_id(&self, id: i32) -> StoreResult<Option<Genre>> {
          let record = sqlx::query_as::<_, DbGenre>("SELECT id, genre FROM genres WHERE id = $1")
               .bind(id)
               .fetch_optional(&self.pool)
               .await?;

          Ok(record.map(Genre::from))
     }

     async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>> {
          let record = sqlx::query_as::<_, DbGenre>("SELECT id, genre FROM genres WHERE genre = $1")
               .bind(name)
               .fetch_optional(&self.pool)
               .await?;

          Ok(record.map(Genre::from))
     }

     async fn create_genre(&self, name: &str) -> StoreResult<Genre> {
          let record = sqlx::query_as::<_, DbGenre>(
               "INSERT INTO genres (genre) VALUES ($1) RETURNING id, genre",
          )
          .bind(name)
          .fetch_one(&self.pool)
          .await
          .map_err(map_constraint_error)?;

          Ok(record.into())
     }

     async fn find_genres(&self) -> StoreResult<Vec<Genre>> {
          let records = sqlx::query_as::<_, DbGenre>("SELECT id, genre FROM genres ORDER BY id")
               .fetch_all(&self.pool)
               .await?;

          Ok(records.into_iter().map(Genre::from).collect())
     }
}

#[async_trait]
impl PlatformRepository for PgStore {
     async fn find_platform_by_id(&self, id: i32) -> StoreResult<Option<Platform>> {
          let record =
               sqlx::query_as::<_, DbPlatform>("SELECT id, platform FROM platforms WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

          Ok(record.map(Platform::from))
     }

     async fn find_platform_by_name(&self, name: &str) -> StoreResult<Option<Platform>> {
          let record =
               sqlx::query_as::<_, DbPlatform>("SELECT id, platform FROM platforms WHERE platform = $1")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?;

          Ok(record.map(Platform::from))
     }

     async fn create_platform(&self, name: &str) -> StoreResult<Platform> {
          let record = sqlx::query_as::<_, DbPlatform>(
               "INSERT INTO platforms (platform) VALUES ($1) RETURNING id, platform",
          )
          .bind(name)
          .fetch_one(&self.pool)
          .await
          .map_err(map_constraint_error)?;

          Ok(record.into())
     }

     async fn find_platforms(&self) -> StoreResult<Vec<Platform>> {
          let records =
               sqlx::query_as::<_, DbPlatform>("SELECT id, platform FROM platforms ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?;

          Ok(records.into_iter().map(Platform::from).collect())
     }
}
