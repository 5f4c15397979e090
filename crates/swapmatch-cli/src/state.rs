//! Application state wiring all services together.
//!
//! Services are generic over repository traits; AppState pins them to the
//! SQLite implementations.

use std::sync::Arc;

use swapmatch_core::service::availability::AvailabilityService;
use swapmatch_core::service::matching::MatchService;
use swapmatch_core::service::rating::RatingService;
use swapmatch_core::service::swap::SwapService;
use swapmatch_infra::config::{database_url, load_engine_config, resolve_data_dir};
use swapmatch_infra::sqlite::availability::SqliteAvailabilityRepository;
use swapmatch_infra::sqlite::directory::SqliteDirectoryRepository;
use swapmatch_infra::sqlite::pool::DatabasePool;
use swapmatch_infra::sqlite::rating::SqliteRatingRepository;
use swapmatch_infra::sqlite::swap_request::SqliteSwapRequestRepository;
use swapmatch_types::config::EngineConfig;

pub type ConcreteSwapService = SwapService<SqliteDirectoryRepository, SqliteSwapRequestRepository>;

pub type ConcreteMatchService = MatchService<SqliteDirectoryRepository>;

pub type ConcreteAvailabilityService = AvailabilityService<SqliteAvailabilityRepository>;

pub type ConcreteRatingService = RatingService<SqliteSwapRequestRepository, SqliteRatingRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    /// User and skill catalog, also used for seeding.
    pub directory: SqliteDirectoryRepository,
    pub swap_service: Arc<ConcreteSwapService>,
    pub match_service: Arc<ConcreteMatchService>,
    pub availability_service: Arc<ConcreteAvailabilityService>,
    pub rating_service: Arc<ConcreteRatingService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database under the data directory and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let config = load_engine_config(&data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self::from_parts(db_pool, &config))
    }

    fn from_parts(db_pool: DatabasePool, config: &EngineConfig) -> Self {
        let directory = SqliteDirectoryRepository::new(db_pool.clone());
        let swaps = SqliteSwapRequestRepository::new(db_pool.clone());

        let swap_service = SwapService::new(
            directory.clone(),
            swaps.clone(),
            config.listing.clone(),
        );
        let match_service = MatchService::new(directory.clone(), config.matching.clone());
        let availability_service =
            AvailabilityService::new(SqliteAvailabilityRepository::new(db_pool.clone()));
        let rating_service =
            RatingService::new(swaps, SqliteRatingRepository::new(db_pool.clone()));

        Self {
            directory,
            swap_service: Arc::new(swap_service),
            match_service: Arc::new(match_service),
            availability_service: Arc::new(availability_service),
            rating_service: Arc::new(rating_service),
            db_pool,
        }
    }
}
