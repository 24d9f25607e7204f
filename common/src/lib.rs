use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub mod models {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Genre {
        pub id: i32,
        pub genre: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Platform {
        pub id: i32,
        pub platform: String,
    }

    /// A full `games` row, as returned after a playtime update.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Game {
        pub id: i32,
        pub title: String,
        pub playtime: i32,
        pub genre_id: i32,
        pub platform_id: Option<i32>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GenreName {
        pub genre: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PlatformName {
        pub platform: String,
    }

    /// A game joined with the names of its genre and platform.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GameListing {
        pub id: i32,
        pub title: String,
        pub playtime: i32,
        pub genres: GenreName,
        pub platforms: Option<PlatformName>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateGameRequest {
        pub title: String,
        pub playtime: i32,
        pub genre_id: i32,
        pub platform_id: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UpdatePlaytimeRequest {
        pub playtime: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateGenreRequest {
        pub genre: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreatePlatformRequest {
        pub platform: String,
    }

    /// Case-insensitive name prefixes used to narrow a game listing.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GameFilter {
        pub genre: Option<String>,
        pub platform: Option<String>,
    }

    impl GameFilter {
        pub fn is_empty(&self) -> bool {
            self.genre.is_none() && self.platform.is_none()
        }
    }
}

pub use models::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_without_platform_serializes_null() {
        let listing = GameListing {
            id: 1,
            title: "Foo".to_string(),
            playtime: 100,
            genres: GenreName { genre: "RPG".to_string() },
            platforms: None,
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["genres"]["genre"], "RPG");
        assert!(value["platforms"].is_null());
    }

    #[test]
    fn create_game_request_requires_every_field() {
        let parsed = serde_json::from_str::<CreateGameRequest>(r#"{"title":"Foo"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_filter() {
        assert!(GameFilter::default().is_empty());
        let filter = GameFilter { genre: Some("rp".to_string()), platform: None };
        assert!(!filter.is_empty());
    }
}
