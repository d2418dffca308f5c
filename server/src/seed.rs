//! Loads a JSON dump of the backend tables into the storage actor.
//!
//! The file holds one array of raw rows per table, in the same loose shape
//! the query builder returns. Rows are mapped with [`FromRow`]; malformed
//! rows and rows pointing at missing parents are logged and skipped.

use crate::server_actors::storage::Storage;
use actix::Addr;
use common::error::{AppError, AppResult};
use common::logger::Logger;
use common::messages::internal_messages::{
    InsertCuisine, InsertDish, InsertMenu, InsertProfile, InsertRestaurant, InsertReview,
    RecomputeRestaurantRating,
};
use common::types::dtos::{CuisineDTO, DishDTO, MenuDTO, ProfileDTO, RestaurantDTO, ReviewDTO};
use common::types::rows::{FromRow, parse_rows};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub cuisines: Vec<Value>,
    #[serde(default)]
    pub profiles: Vec<Value>,
    #[serde(default)]
    pub restaurants: Vec<Value>,
    #[serde(default)]
    pub menus: Vec<Value>,
    #[serde(default)]
    pub dishes: Vec<Value>,
    #[serde(default)]
    pub reviews: Vec<Value>,
}

/// Number of records stored per table, and how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub cuisines: usize,
    pub profiles: usize,
    pub restaurants: usize,
    pub menus: usize,
    pub dishes: usize,
    pub reviews: usize,
    pub skipped: usize,
}

impl SeedFile {
    pub async fn read(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Seed(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::Seed(e.to_string()))
    }
}

/// Rows that mapped, plus the number that did not.
fn mapped<T: FromRow>(rows: &[Value], logger: &Logger) -> (Vec<T>, usize) {
    let records = parse_rows::<T>(rows, logger);
    let dropped = rows.len() - records.len();
    (records, dropped)
}

/// Inserts parents before children so referential checks in the storage
/// pass, then recomputes the rating of every seeded restaurant from its
/// seeded reviews.
pub async fn apply(
    seed: SeedFile,
    storage: &Addr<Storage>,
    logger: &Logger,
) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let (cuisines, dropped) = mapped::<CuisineDTO>(&seed.cuisines, logger);
    summary.skipped += dropped;
    for cuisine in cuisines {
        storage.send(InsertCuisine { cuisine }).await?;
        summary.cuisines += 1;
    }

    let (profiles, dropped) = mapped::<ProfileDTO>(&seed.profiles, logger);
    summary.skipped += dropped;
    for profile in profiles {
        storage.send(InsertProfile { profile }).await?;
        summary.profiles += 1;
    }

    let (restaurants, dropped) = mapped::<RestaurantDTO>(&seed.restaurants, logger);
    summary.skipped += dropped;
    let restaurant_ids: Vec<String> = restaurants
        .iter()
        .map(|restaurant| restaurant.restaurant_id.clone())
        .collect();
    for restaurant in restaurants {
        storage.send(InsertRestaurant { restaurant }).await?;
        summary.restaurants += 1;
    }

    let (menus, dropped) = mapped::<MenuDTO>(&seed.menus, logger);
    summary.skipped += dropped;
    for menu in menus {
        match storage.send(InsertMenu { menu }).await? {
            Ok(()) => summary.menus += 1,
            Err(e) => {
                logger.warn(format!("Skipping menu: {}", e));
                summary.skipped += 1;
            }
        }
    }

    let (dishes, dropped) = mapped::<DishDTO>(&seed.dishes, logger);
    summary.skipped += dropped;
    for dish in dishes {
        match storage.send(InsertDish { dish }).await? {
            Ok(()) => summary.dishes += 1,
            Err(e) => {
                logger.warn(format!("Skipping dish: {}", e));
                summary.skipped += 1;
            }
        }
    }

    let (reviews, dropped) = mapped::<ReviewDTO>(&seed.reviews, logger);
    summary.skipped += dropped;
    for review in reviews {
        match storage.send(InsertReview { review }).await? {
            Ok(()) => summary.reviews += 1,
            Err(e) => {
                logger.warn(format!("Skipping review: {}", e));
                summary.skipped += 1;
            }
        }
    }

    for restaurant_id in restaurant_ids {
        storage
            .send(RecomputeRestaurantRating { restaurant_id })
            .await?;
    }

    logger.info(format!(
        "Seeded {} restaurants, {} menus, {} dishes, {} reviews ({} rows skipped)",
        summary.restaurants, summary.menus, summary.dishes, summary.reviews, summary.skipped
    ));
    Ok(summary)
}

pub async fn load(
    path: &Path,
    storage: &Addr<Storage>,
    logger: &Logger,
) -> AppResult<SeedSummary> {
    logger.info(format!("Loading seed file {}", path.display()));
    let seed = SeedFile::read(path).await?;
    apply(seed, storage, logger).await
}
