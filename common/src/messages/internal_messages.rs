use crate::aggregates::pagination::{Page, PageRequest, PaginationStrategy};
use crate::error::AppResult;
use crate::types::dtos::{CuisineDTO, DishDTO, MenuDTO, ProfileDTO, RestaurantDTO, ReviewDTO};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/////////////////////////////////////////////////////////////////////
// Storage mutations
/////////////////////////////////////////////////////////////////////

/// Every mutation applied by the storage, in the order it was applied.
///
/// ## Purpose
/// Kept as a journal so tests and tooling can inspect what was written, in
/// particular the rating recomputes that follow review mutations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "storage_message")]
pub enum StorageLogMessage {
    InsertRestaurant(InsertRestaurant),
    ReplaceRestaurant(ReplaceRestaurant),
    InsertCuisine(InsertCuisine),
    InsertProfile(InsertProfile),
    InsertMenu(InsertMenu),
    ReplaceMenu(ReplaceMenu),
    InsertDish(InsertDish),
    InsertReview(InsertReview),
    ReplaceReview(ReplaceReview),
    RemoveReview(RemoveReview),
    SetRestaurantRating(SetRestaurantRating),
}

/// Message to store a new restaurant, or overwrite one with the same ID.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "()")]
pub struct InsertRestaurant {
    pub restaurant: RestaurantDTO,
}

/// Message to replace an existing restaurant.
///
/// ## Contents
/// - `restaurant`: the full updated record. Fails if the ID is unknown.
///   `average_rating` and `review_count` are ignored; the stored values are
///   kept and the record as stored is returned.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<RestaurantDTO>")]
pub struct ReplaceRestaurant {
    pub restaurant: RestaurantDTO,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "()")]
pub struct InsertCuisine {
    pub cuisine: CuisineDTO,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "()")]
pub struct InsertProfile {
    pub profile: ProfileDTO,
}

/// Message to store a menu. Fails if its restaurant is unknown.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<()>")]
pub struct InsertMenu {
    pub menu: MenuDTO,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<()>")]
pub struct ReplaceMenu {
    pub menu: MenuDTO,
}

/// Message to store a dish. Fails if its menu is unknown.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<()>")]
pub struct InsertDish {
    pub dish: DishDTO,
}

/// Message to store a review. Fails if its restaurant is unknown.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<()>")]
pub struct InsertReview {
    pub review: ReviewDTO,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<()>")]
pub struct ReplaceReview {
    pub review: ReviewDTO,
}

/// Message to delete a review, returning the removed record.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "AppResult<ReviewDTO>")]
pub struct RemoveReview {
    pub review_id: String,
}

/// Journal entry written by [`RecomputeRestaurantRating`].
///
/// ## Contents
/// - `average_rating`: `None` once the last review is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetRestaurantRating {
    pub restaurant_id: String,
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

/// Message asking the storage to recompute a restaurant's average rating
/// from all of its reviews and persist it.
///
/// ## Purpose
/// Sent without waiting for an answer after every review mutation. Each
/// recompute reads the full review set, so when two race the later one
/// still leaves the correct value.
#[derive(Message, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[rtype(result = "()")]
pub struct RecomputeRestaurantRating {
    pub restaurant_id: String,
}

/////////////////////////////////////////////////////////////////////
// Storage queries
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "Option<RestaurantDTO>")]
pub struct GetRestaurant {
    pub restaurant_id: String,
}

/// Message to fetch one page of restaurants, newest first.
///
/// ## Contents
/// - `request`: page and limit.
/// - `strategy`: how the page metadata is derived.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Page<RestaurantDTO>")]
pub struct GetRestaurantsPage {
    pub request: PageRequest,
    pub strategy: PaginationStrategy,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Vec<CuisineDTO>")]
pub struct GetCuisines;

#[derive(Message, Debug, Clone)]
#[rtype(result = "Option<MenuDTO>")]
pub struct GetMenu {
    pub menu_id: String,
}

/// Message to fetch the menus of a restaurant together with their dishes.
#[derive(Message, Debug, Clone)]
#[rtype(result = "(Vec<MenuDTO>, Vec<DishDTO>)")]
pub struct GetRestaurantMenusWithDishes {
    pub restaurant_id: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Option<ReviewDTO>")]
pub struct GetReview {
    pub review_id: String,
}

/// Message to fetch the reviews of a restaurant, newest first, together
/// with the profiles of their authors.
#[derive(Message, Debug, Clone)]
#[rtype(result = "(Vec<ReviewDTO>, Vec<ProfileDTO>)")]
pub struct GetReviewsWithAuthors {
    pub restaurant_id: String,
}

/// Message to read the mutation journal from a given log index on.
#[derive(Message, Debug, Clone)]
#[rtype(result = "BTreeMap<u64, StorageLogMessage>")]
pub struct GetLogsFromIndex {
    pub index: u64,
}
