use chrono::{DateTime, Utc};
use common::{Game, GameListing, Genre, GenreName, Platform, PlatformName};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGame {
     pub id: i32,
     pub title: String,
     pub playtime: i32,
     pub genre_id: i32,
     pub platform_id: Option<i32>,
     pub created_at: DateTime<Utc>,
}

/// Flat row of `games` joined with `genres` and (optionally) `platforms`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGameListing {
     pub id: i32,
     pub title: String,
     pub playtime: i32,
     pub genre: String,
     pub platform: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGenre {
     pub id: i32,
     pub genre: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbPlatform {
     pub id: i32,
     pub platform: String,
}

/// Validated input for a new `games` row.
#[derive(Debug, Clone)]
pub struct NewGame {
     pub title: String,
     pub playtime: i32,
     pub genre_id: i32,
     pub platform_id: i32,
}

impl From<DbGame> for Game {
     fn from(row: DbGame) -> Self {
          Game {
               id: row.id,
               title: row.title,
               playtime: row.playtime,
               genre_id: row.genre_id,
               platform_id: row.platform_id,
               created_at: row.created_at,
          }
     }
}

impl From<DbGameListing> for GameListing {
     fn from(row: DbGameListing) -> Self {
          GameListing {
               id: row.id,
               title: row.title,
               playtime: row.playtime,
               genres: GenreName { genre: row.genre },
               platforms: row.platform.map(|platform| PlatformName { platform }),
          }
     }
}

impl From<DbGenre> for Genre {
     fn from(row: DbGenre) -> Self {
          Genre { id: row.id, genre: row.genre }
     }
}

impl From<DbPlatform> for Platform {
     fn from(row: DbPlatform) -> Self {
          Platform { id: row.id, platform: row.platform }
     }
}
