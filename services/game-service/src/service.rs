use std::sync::Arc;

use common::{
    CreateGameRequest, CreateGenreRequest, CreatePlatformRequest, Game, GameFilter, GameListing,
    Genre, Platform, UpdatePlaytimeRequest,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::GameServiceError;
use crate::models::NewGame;
use crate::store::Store;
use crate::validation;

#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn Store>,
}

impl GenreService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, GameServiceError> {
        self.store.find_genre_by_id(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, GameServiceError> {
        self.store.find_genre_by_name(name).await
    }

    /// Fails with `GenreNotFound` unless a genre with this id exists.
    pub async fn require(&self, id: i32) -> Result<Genre, GameServiceError> {
        self.find_by_id(id).await?.ok_or(GameServiceError::GenreNotFound)
    }

    pub async fn create(&self, req: CreateGenreRequest) -> Result<Genre, GameServiceError> {
        validation::validate_name("Genre", &req.genre).map_err(GameServiceError::Validation)?;

        let genre = self.store.create_genre(&req.genre).await?;
        tracing::info!(id = genre.id, genre = %genre.genre, "genre created");
        Ok(genre)
    }

    pub async fn list_all(&self) -> Result<Vec<Genre>, GameServiceError> {
        let genres = self.store.find_genres().await?;
        if genres.is_empty() {
            return Err(GameServiceError::EmptyTable("Genres"));
        }
        Ok(genres)
    }
}

#[derive(Clone)]
pub struct PlatformService {
    store: Arc<dyn Store>,
}

impl PlatformService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Platform>, GameServiceError> {
        self.store.find_platform_by_id(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Platform>, GameServiceError> {
        self.store.find_platform_by_name(name).await
    }

    /// Fails with `PlatformNotFound` unless a platform with this id exists.
    pub async fn require(&self, id: i32) -> Result<Platform, GameServiceError> {
        self.find_by_id(id).await?.ok_or(GameServiceError::PlatformNotFound)
    }

    pub async fn create(&self, req: CreatePlatformRequest) -> Result<Platform, GameServiceError> {
        validation::validate_name("Platform", &req.platform).map_err(GameServiceError::Validation)?;

        let platform = self.store.create_platform(&req.platform).await?;
        tracing::info!(id = platform.id, platform = %platform.platform, "platform created");
        Ok(platform)
    }

    pub async fn list_all(&self) -> Result<Vec<Platform>, GameServiceError> {
        let platforms = self.store.find_platforms().await?;
        if platforms.is_empty() {
            return Err(GameServiceError::EmptyTable("Platforms"));
        }
        Ok(platforms)
    }
}

#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn Store>,
    genres: GenreService,
    platforms: PlatformService,
}

impl GameService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            genres: GenreService::new(store.clone()),
            platforms: PlatformService::new(store.clone()),
            store,
        }
    }

    /// Genre is checked before platform; title uniqueness is left to the
    /// insert itself so concurrent creations cannot both succeed.
    pub async fn create(&self, req: CreateGameRequest) -> Result<Game, GameServiceError> {
        validation::validate_create_game_request(&req).map_err(GameServiceError::Validation)?;

        self.genres.require(req.genre_id).await?;
        self.platforms.require(req.platform_id).await?;

        let game = self
            .store
            .create_game(&NewGame {
                title: req.title,
                playtime: req.playtime,
                genre_id: req.genre_id,
                platform_id: req.platform_id,
            })
            .await?;

        tracing::info!(id = game.id, title = %game.title, "game created");
        Ok(game)
    }

    /// An empty filtered listing is `NoMatchingGames`; an empty unfiltered
    /// listing is just an empty catalog.
    pub async fn list(&self, filter: &GameFilter) -> Result<Vec<GameListing>, GameServiceError> {
        let games = self.store.find_games(filter).await?;

        if games.is_empty() && !filter.is_empty() {
            return Err(GameServiceError::NoMatchingGames);
        }

        Ok(games)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Game, GameServiceError> {
        self.store
            .find_game_by_id(id)
            .await?
            .ok_or(GameServiceError::GameNotFound)
    }

    pub async fn update_playtime(
        &self,
        id: i32,
        req: UpdatePlaytimeRequest,
    ) -> Result<Game, GameServiceError> {
        validation::validate_update_playtime_request(&req).map_err(GameServiceError::Validation)?;

        let game = self
            .store
            .update_playtime(id, req.playtime)
            .await?
            .ok_or(GameServiceError::GameNotFound)?;

        tracing::info!(id = game.id, playtime = game.playtime, "playtime updated");
        Ok(game)
    }

    pub async fn delete(&self, id: i32) -> Result<(), GameServiceError> {
        if !self.store.delete_game(id).await? {
            return Err(GameServiceError::GameNotFound);
        }

        tracing::info!(id, "game deleted");
        Ok(())
    }

    /// Mean playtime rounded to two decimals. Needs at least one game.
    pub async fn average_playtime(&self) -> Result<Decimal, GameServiceError> {
        let average = self
            .store
            .average_playtime()
            .await?
            .ok_or(GameServiceError::MissingGames)?;

        let mut rounded = average.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        Ok(rounded)
    }
}

pub fn average_playtime_message(average: Decimal) -> String {
    format!("Your average playtime is: {} minutes", average)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    struct Fixture {
        games: GameService,
        genres: GenreService,
        platforms: PlatformService,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Fixture {
            games: GameService::new(store.clone()),
            genres: GenreService::new(store.clone()),
            platforms: PlatformService::new(store),
        }
    }

    async fn seeded() -> Fixture {
        let f = fixture();
        f.genres.create(CreateGenreRequest { genre: "RPG".into() }).await.unwrap();
        f.platforms.create(CreatePlatformRequest { platform: "PC".into() }).await.unwrap();
        f
    }

    fn game_request(title: &str, playtime: i32) -> CreateGameRequest {
        CreateGameRequest {
            title: title.to_string(),
            playtime,
            genre_id: 1,
            platform_id: 1,
        }
    }

    #[tokio::test]
    async fn duplicate_title_fails_whatever_the_other_fields() {
        let f = seeded().await;
        f.platforms.create(CreatePlatformRequest { platform: "PS5".into() }).await.unwrap();
        f.games.create(game_request("Foo", 100)).await.unwrap();

        let err = f
            .games
            .create(CreateGameRequest { playtime: 5, platform_id: 2, ..game_request("Foo", 0) })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::DuplicateTitle));
    }

    #[tokio::test]
    async fn genre_checked_before_platform() {
        let f = fixture();
        let err = f
            .games
            .create(CreateGameRequest { genre_id: 7, platform_id: 9, ..game_request("Foo", 1) })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::GenreNotFound));

        f.genres.create(CreateGenreRequest { genre: "RPG".into() }).await.unwrap();
        let err = f
            .games
            .create(CreateGameRequest { platform_id: 9, ..game_request("Foo", 1) })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::PlatformNotFound));
    }

    #[tokio::test]
    async fn negative_playtime_is_a_validation_error() {
        let f = seeded().await;
        let err = f.games.create(game_request("Foo", -1)).await.unwrap_err();
        assert!(matches!(err, GameServiceError::Validation(_)));

        let game = f.games.create(game_request("Foo", 1)).await.unwrap();
        let err = f
            .games
            .update_playtime(game.id, UpdatePlaytimeRequest { playtime: -10 })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn average_of_two_games() {
        let f = seeded().await;
        f.games.create(game_request("A", 100)).await.unwrap();
        f.games.create(game_request("B", 45)).await.unwrap();

        let average = f.games.average_playtime().await.unwrap();
        assert_eq!(
            average_playtime_message(average),
            "Your average playtime is: 72.50 minutes"
        );
    }

    #[tokio::test]
    async fn average_rounds_to_two_decimals() {
        let f = seeded().await;
        f.games.create(game_request("A", 1)).await.unwrap();
        f.games.create(game_request("B", 1)).await.unwrap();
        f.games.create(game_request("C", 0)).await.unwrap();

        let average = f.games.average_playtime().await.unwrap();
        assert_eq!(average.to_string(), "0.67");
    }

    #[tokio::test]
    async fn average_needs_at_least_one_game() {
        let f = seeded().await;
        let err = f.games.average_playtime().await.unwrap_err();
        assert!(matches!(err, GameServiceError::MissingGames));

        f.games.create(game_request("Solo", 30)).await.unwrap();
        let average = f.games.average_playtime().await.unwrap();
        assert_eq!(average.to_string(), "30.00");
    }

    #[tokio::test]
    async fn filtered_listing_with_no_match_is_not_found() {
        let f = seeded().await;
        f.games.create(game_request("Foo", 10)).await.unwrap();

        let filter = GameFilter { genre: Some("rp".into()), platform: None };
        let games = f.games.list(&filter).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].genres.genre, "RPG");

        let filter = GameFilter { genre: Some("strategy".into()), platform: None };
        let err = f.games.list(&filter).await.unwrap_err();
        assert!(matches!(err, GameServiceError::NoMatchingGames));
    }

    #[tokio::test]
    async fn unfiltered_empty_listing_is_ok() {
        let f = fixture();
        assert!(f.games.list(&GameFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_returns_full_row() {
        let f = seeded().await;
        let created = f.games.create(game_request("Foo", 10)).await.unwrap();

        let updated = f
            .games
            .update_playtime(created.id, UpdatePlaytimeRequest { playtime: 9000 })
            .await
            .unwrap();
        assert_eq!(updated.playtime, 9000);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.genre_id, created.genre_id);
        assert_eq!(updated.platform_id, created.platform_id);
        assert_eq!(updated.created_at, created.created_at);

        let err = f
            .games
            .update_playtime(999, UpdatePlaytimeRequest { playtime: 1 })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::GameNotFound));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let f = seeded().await;
        let a = f.games.create(game_request("A", 10)).await.unwrap();
        f.games.create(game_request("B", 20)).await.unwrap();

        f.games.delete(a.id).await.unwrap();
        assert_eq!(f.games.list(&GameFilter::default()).await.unwrap().len(), 1);
        assert!(matches!(f.games.find_by_id(a.id).await, Err(GameServiceError::GameNotFound)));

        let err = f.games.delete(a.id).await.unwrap_err();
        assert!(matches!(err, GameServiceError::GameNotFound));
    }

    #[tokio::test]
    async fn empty_tables_fail_the_same_way() {
        let f = fixture();
        assert!(matches!(f.genres.list_all().await, Err(GameServiceError::EmptyTable("Genres"))));
        assert!(matches!(
            f.platforms.list_all().await,
            Err(GameServiceError::EmptyTable("Platforms"))
        ));
    }

    #[tokio::test]
    async fn genre_and_platform_lookups() {
        let f = seeded().await;

        assert_eq!(f.genres.find_by_name("RPG").await.unwrap().map(|g| g.id), Some(1));
        assert!(f.genres.find_by_name("rpg").await.unwrap().is_none());
        assert_eq!(f.platforms.require(1).await.unwrap().platform, "PC");
        assert!(matches!(f.platforms.require(2).await, Err(GameServiceError::PlatformNotFound)));

        let err = f.genres.create(CreateGenreRequest { genre: "RPG".into() }).await.unwrap_err();
        assert!(matches!(err, GameServiceError::DuplicateGenre));
        let err = f
            .platforms
            .create(CreatePlatformRequest { platform: "PC".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::DuplicatePlatform));
        let err = f.genres.create(CreateGenreRequest { genre: "".into() }).await.unwrap_err();
        assert!(matches!(err, GameServiceError::Validation(_)));
    }
}
