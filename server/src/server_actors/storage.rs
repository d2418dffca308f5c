use actix::prelude::*;
use colored::Color;
use common::aggregates::pagination::Page;
use common::aggregates::rating::RatingSummary;
use common::error::{AppError, AppResult};
use common::logger::Logger;
use common::messages::internal_messages::{
    GetCuisines, GetLogsFromIndex, GetMenu, GetRestaurant, GetRestaurantMenusWithDishes,
    GetRestaurantsPage, GetReview, GetReviewsWithAuthors, InsertCuisine, InsertDish, InsertMenu,
    InsertProfile, InsertRestaurant, InsertReview, RecomputeRestaurantRating, RemoveReview,
    ReplaceMenu, ReplaceRestaurant, ReplaceReview, SetRestaurantRating, StorageLogMessage,
};
use common::types::dtos::{CuisineDTO, DishDTO, MenuDTO, ProfileDTO, RestaurantDTO, ReviewDTO};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The `Storage` actor holds every table of the app in memory and applies all
/// state-changing operations.
///
/// # Responsibilities
/// - Stores restaurants, cuisines, profiles, menus, dishes and reviews.
/// - Rejects records pointing at a parent that does not exist.
/// - Serves paged restaurant listings with count based or heuristic metadata.
/// - Recomputes a restaurant's average rating from its full review set.
/// - Journals every mutation with a sequential log id.
pub struct Storage {
    /// Restaurants by ID.
    pub restaurants: HashMap<String, RestaurantDTO>,
    /// Cuisines by ID.
    pub cuisines: HashMap<String, CuisineDTO>,
    /// Profiles by user ID.
    pub profiles: HashMap<String, ProfileDTO>,
    /// Menus by ID.
    pub menus: HashMap<String, MenuDTO>,
    /// Dishes by ID.
    pub dishes: HashMap<String, DishDTO>,
    /// Reviews by ID.
    pub reviews: HashMap<String, ReviewDTO>,
    /// Mutation journal.
    pub storage_updates: BTreeMap<u64, StorageLogMessage>,
    /// Index of the next log entry.
    pub next_log_id: u64,
    /// Logger for storage events.
    pub logger: Logger,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        Self {
            restaurants: HashMap::new(),
            cuisines: HashMap::new(),
            profiles: HashMap::new(),
            menus: HashMap::new(),
            dishes: HashMap::new(),
            reviews: HashMap::new(),
            storage_updates: BTreeMap::new(),
            next_log_id: 1,
            logger: Logger::new("Storage", Color::White),
        }
    }

    /// Adds a new log entry to the journal and increments the log index.
    fn add_to_log(&mut self, log_message: StorageLogMessage) {
        self.storage_updates.insert(self.next_log_id, log_message);
        self.next_log_id += 1;
    }

    fn ensure_restaurant(&self, restaurant_id: &str) -> AppResult<()> {
        if self.restaurants.contains_key(restaurant_id) {
            Ok(())
        } else {
            Err(AppError::RestaurantNotFound(restaurant_id.to_string()))
        }
    }

    fn ratings_of(&self, restaurant_id: &str) -> Vec<f64> {
        self.reviews
            .values()
            .filter(|review| review.restaurant_id == restaurant_id)
            .map(|review| review.rating)
            .collect()
    }

    /// Restaurants ordered newest first, ties broken by ID so pages are stable.
    fn sorted_restaurants(&self) -> Vec<&RestaurantDTO> {
        let mut restaurants: Vec<&RestaurantDTO> = self.restaurants.values().collect();
        restaurants.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
        });
        restaurants
    }
}

impl Actor for Storage {
    type Context = Context<Self>;
}

// --------------- ADD / REPLACE ------------------ //

/// Handles adding a restaurant to storage and logs the operation.
impl Handler<InsertRestaurant> for Storage {
    type Result = ();

    fn handle(&mut self, msg: InsertRestaurant, _ctx: &mut Self::Context) -> Self::Result {
        self.logger.info(format!(
            "Restaurant added: {} ({})",
            msg.restaurant.restaurant_id, msg.restaurant.name
        ));
        self.restaurants
            .insert(msg.restaurant.restaurant_id.clone(), msg.restaurant.clone());
        self.add_to_log(StorageLogMessage::InsertRestaurant(msg));
    }
}

/// Handles replacing the editable fields of an existing restaurant. The
/// stored `average_rating` and `review_count` are kept: only
/// [`RecomputeRestaurantRating`] writes them.
impl Handler<ReplaceRestaurant> for Storage {
    type Result = AppResult<RestaurantDTO>;

    fn handle(&mut self, mut msg: ReplaceRestaurant, _ctx: &mut Self::Context) -> Self::Result {
        let restaurant_id = msg.restaurant.restaurant_id.clone();
        match self.restaurants.get_mut(&restaurant_id) {
            Some(restaurant) => {
                msg.restaurant.average_rating = restaurant.average_rating;
                msg.restaurant.review_count = restaurant.review_count;
                *restaurant = msg.restaurant.clone();
                self.logger
                    .info(format!("Restaurant updated: {}", restaurant_id));
                self.add_to_log(StorageLogMessage::ReplaceRestaurant(msg.clone()));
                Ok(msg.restaurant)
            }
            None => {
                self.logger
                    .error(format!("Restaurant not found: {}", restaurant_id));
                Err(AppError::RestaurantNotFound(restaurant_id))
            }
        }
    }
}

impl Handler<InsertCuisine> for Storage {
    type Result = ();

    fn handle(&mut self, msg: InsertCuisine, _ctx: &mut Self::Context) -> Self::Result {
        self.logger
            .debug(format!("Cuisine added: {}", msg.cuisine.cuisine_id));
        self.cuisines
            .insert(msg.cuisine.cuisine_id.clone(), msg.cuisine.clone());
        self.add_to_log(StorageLogMessage::InsertCuisine(msg));
    }
}

impl Handler<InsertProfile> for Storage {
    type Result = ();

    fn handle(&mut self, msg: InsertProfile, _ctx: &mut Self::Context) -> Self::Result {
        self.logger
            .debug(format!("Profile added: {}", msg.profile.user_id));
        self.profiles
            .insert(msg.profile.user_id.clone(), msg.profile.clone());
        self.add_to_log(StorageLogMessage::InsertProfile(msg));
    }
}

/// Handles adding a menu, provided its restaurant exists.
impl Handler<InsertMenu> for Storage {
    type Result = AppResult<()>;

    fn handle(&mut self, msg: InsertMenu, _ctx: &mut Self::Context) -> Self::Result {
        self.ensure_restaurant(&msg.menu.restaurant_id)?;
        self.logger.info(format!(
            "Menu added: {} for restaurant {}",
            msg.menu.menu_id, msg.menu.restaurant_id
        ));
        self.menus.insert(msg.menu.menu_id.clone(), msg.menu.clone());
        self.add_to_log(StorageLogMessage::InsertMenu(msg));
        Ok(())
    }
}

impl Handler<ReplaceMenu> for Storage {
    type Result = AppResult<()>;

    fn handle(&mut self, msg: ReplaceMenu, _ctx: &mut Self::Context) -> Self::Result {
        let menu_id = msg.menu.menu_id.clone();
        let Some(menu) = self.menus.get_mut(&menu_id) else {
            return Err(AppError::MenuNotFound(menu_id));
        };
        *menu = msg.menu.clone();
        self.logger.info(format!("Menu updated: {}", menu_id));
        self.add_to_log(StorageLogMessage::ReplaceMenu(msg));
        Ok(())
    }
}

/// Handles adding a dish, provided its menu exists.
impl Handler<InsertDish> for Storage {
    type Result = AppResult<()>;

    fn handle(&mut self, msg: InsertDish, _ctx: &mut Self::Context) -> Self::Result {
        if !self.menus.contains_key(&msg.dish.menu_id) {
            return Err(AppError::MenuNotFound(msg.dish.menu_id.clone()));
        }
        self.logger.debug(format!(
            "Dish added: {} to menu {}",
            msg.dish.dish_id, msg.dish.menu_id
        ));
        self.dishes.insert(msg.dish.dish_id.clone(), msg.dish.clone());
        self.add_to_log(StorageLogMessage::InsertDish(msg));
        Ok(())
    }
}

/// Handles adding a review, provided its restaurant exists. The rating is
/// not recomputed here; see [`RecomputeRestaurantRating`].
impl Handler<InsertReview> for Storage {
    type Result = AppResult<()>;

    fn handle(&mut self, msg: InsertReview, _ctx: &mut Self::Context) -> Self::Result {
        self.ensure_restaurant(&msg.review.restaurant_id)?;
        self.logger.info(format!(
            "Review added: {} for restaurant {} (rating {})",
            msg.review.review_id, msg.review.restaurant_id, msg.review.rating
        ));
        self.reviews
            .insert(msg.review.review_id.clone(), msg.review.clone());
        self.add_to_log(StorageLogMessage::InsertReview(msg));
        Ok(())
    }
}

impl Handler<ReplaceReview> for Storage {
    type Result = AppResult<()>;

    fn handle(&mut self, msg: ReplaceReview, _ctx: &mut Self::Context) -> Self::Result {
        let review_id = msg.review.review_id.clone();
        let Some(review) = self.reviews.get_mut(&review_id) else {
            return Err(AppError::ReviewNotFound(review_id));
        };
        *review = msg.review.clone();
        self.logger.info(format!("Review updated: {}", review_id));
        self.add_to_log(StorageLogMessage::ReplaceReview(msg));
        Ok(())
    }
}

// --------------- REMOVE ------------------ //

impl Handler<RemoveReview> for Storage {
    type Result = AppResult<ReviewDTO>;

    fn handle(&mut self, msg: RemoveReview, _ctx: &mut Self::Context) -> Self::Result {
        let removed = self
            .reviews
            .remove(&msg.review_id)
            .ok_or_else(|| AppError::ReviewNotFound(msg.review_id.clone()))?;
        self.logger
            .info(format!("Review removed: {}", msg.review_id));
        self.add_to_log(StorageLogMessage::RemoveReview(msg));
        Ok(removed)
    }
}

// --------------- RATINGS ------------------ //

/// Recomputes the average from every review of the restaurant and writes it
/// back, along with the review count.
impl Handler<RecomputeRestaurantRating> for Storage {
    type Result = ();

    fn handle(&mut self, msg: RecomputeRestaurantRating, _ctx: &mut Self::Context) -> Self::Result {
        let summary = RatingSummary::from_ratings(&self.ratings_of(&msg.restaurant_id));
        let Some(restaurant) = self.restaurants.get_mut(&msg.restaurant_id) else {
            self.logger.warn(format!(
                "Cannot recompute rating, restaurant not found: {}",
                msg.restaurant_id
            ));
            return;
        };
        restaurant.average_rating = summary.average;
        restaurant.review_count = summary.count;
        self.logger.info(format!(
            "Rating of restaurant {} recomputed: {:?} over {} reviews",
            msg.restaurant_id, summary.average, summary.count
        ));
        self.add_to_log(StorageLogMessage::SetRestaurantRating(SetRestaurantRating {
            restaurant_id: msg.restaurant_id,
            average_rating: summary.average,
            review_count: summary.count,
        }));
    }
}

// --------------- QUERIES ------------------ //

impl Handler<GetRestaurant> for Storage {
    type Result = Option<RestaurantDTO>;

    fn handle(&mut self, msg: GetRestaurant, _ctx: &mut Self::Context) -> Self::Result {
        self.restaurants.get(&msg.restaurant_id).cloned()
    }
}

/// Handles requests for one page of restaurants.
impl Handler<GetRestaurantsPage> for Storage {
    type Result = MessageResult<GetRestaurantsPage>;

    fn handle(&mut self, msg: GetRestaurantsPage, _ctx: &mut Self::Context) -> Self::Result {
        let request = msg.request.clamped();
        let restaurants = self.sorted_restaurants();
        let total = restaurants.len();
        let items: Vec<RestaurantDTO> = restaurants
            .into_iter()
            .skip(request.offset())
            .take(request.limit)
            .cloned()
            .collect();
        let descriptor = msg
            .strategy
            .describe(request.page, request.limit, total, items.len());
        if msg.strategy.needs_exact_count() {
            self.logger.debug(format!(
                "Restaurants page {} of {:?} ({} total)",
                request.page, descriptor.total_pages, total
            ));
        } else {
            self.logger.debug(format!(
                "Restaurants page {} with {} rows",
                request.page,
                items.len()
            ));
        }
        MessageResult(Page { items, descriptor })
    }
}

impl Handler<GetCuisines> for Storage {
    type Result = MessageResult<GetCuisines>;

    fn handle(&mut self, _msg: GetCuisines, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.cuisines.values().cloned().collect())
    }
}

impl Handler<GetMenu> for Storage {
    type Result = Option<MenuDTO>;

    fn handle(&mut self, msg: GetMenu, _ctx: &mut Self::Context) -> Self::Result {
        self.menus.get(&msg.menu_id).cloned()
    }
}

/// Handles requests for a restaurant's menus, ordered by ID, and their dishes.
impl Handler<GetRestaurantMenusWithDishes> for Storage {
    type Result = MessageResult<GetRestaurantMenusWithDishes>;

    fn handle(
        &mut self,
        msg: GetRestaurantMenusWithDishes,
        _ctx: &mut Self::Context,
    ) -> Self::Result {
        let mut menus: Vec<MenuDTO> = self
            .menus
            .values()
            .filter(|menu| menu.restaurant_id == msg.restaurant_id)
            .cloned()
            .collect();
        menus.sort_by(|a, b| a.menu_id.cmp(&b.menu_id));

        let menu_ids: HashSet<&str> = menus.iter().map(|menu| menu.menu_id.as_str()).collect();
        let mut dishes: Vec<DishDTO> = self
            .dishes
            .values()
            .filter(|dish| menu_ids.contains(dish.menu_id.as_str()))
            .cloned()
            .collect();
        dishes.sort_by(|a, b| a.dish_id.cmp(&b.dish_id));

        MessageResult((menus, dishes))
    }
}

impl Handler<GetReview> for Storage {
    type Result = Option<ReviewDTO>;

    fn handle(&mut self, msg: GetReview, _ctx: &mut Self::Context) -> Self::Result {
        self.reviews.get(&msg.review_id).cloned()
    }
}

/// Handles requests for a restaurant's reviews, newest first, plus the
/// profiles of whoever wrote them.
impl Handler<GetReviewsWithAuthors> for Storage {
    type Result = MessageResult<GetReviewsWithAuthors>;

    fn handle(&mut self, msg: GetReviewsWithAuthors, _ctx: &mut Self::Context) -> Self::Result {
        let mut reviews: Vec<ReviewDTO> = self
            .reviews
            .values()
            .filter(|review| review.restaurant_id == msg.restaurant_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.review_id.cmp(&b.review_id))
        });

        let authors: Vec<ProfileDTO> = reviews
            .iter()
            .map(|review| review.user_id.as_str())
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|user_id| self.profiles.get(user_id).cloned())
            .collect();

        MessageResult((reviews, authors))
    }
}

/// Handles requests for all journal entries from a given index.
impl Handler<GetLogsFromIndex> for Storage {
    type Result = MessageResult<GetLogsFromIndex>;

    fn handle(&mut self, msg: GetLogsFromIndex, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(
            self.storage_updates
                .range(msg.index..)
                .map(|(id, log)| (*id, log.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::aggregates::pagination::{PageRequest, PaginationStrategy};
    use common::localization::TranslationMap;

    pub fn test_restaurant(restaurant_id: &str, minutes_ago: i64) -> RestaurantDTO {
        RestaurantDTO {
            restaurant_id: restaurant_id.to_string(),
            owner_id: "owner".to_string(),
            name: format!("Restaurant {}", restaurant_id),
            description: TranslationMap::single("es_ES", "Cocina de mercado"),
            address: None,
            cuisine_ids: Vec::new(),
            image_url: None,
            average_rating: None,
            review_count: 0,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    pub fn test_review(review_id: &str, restaurant_id: &str, rating: f64) -> ReviewDTO {
        ReviewDTO {
            review_id: review_id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            user_id: "user".to_string(),
            rating,
            comment: TranslationMap::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[actix_rt::test]
    async fn test_review_for_unknown_restaurant_is_rejected() {
        let storage = Storage::new().start();
        let result = storage
            .send(InsertReview {
                review: test_review("rv1", "nowhere", 4.0),
            })
            .await
            .unwrap();
        assert_eq!(result, Err(AppError::RestaurantNotFound("nowhere".to_string())));
    }

    #[actix_rt::test]
    async fn test_recompute_uses_every_review() {
        let storage = Storage::new().start();
        storage
            .send(InsertRestaurant {
                restaurant: test_restaurant("r1", 0),
            })
            .await
            .unwrap();
        for (id, rating) in [("rv1", 5.0), ("rv2", 4.0), ("rv3", 3.0)] {
            storage
                .send(InsertReview {
                    review: test_review(id, "r1", rating),
                })
                .await
                .unwrap()
                .unwrap();
        }
        storage
            .send(RecomputeRestaurantRating {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap();

        let restaurant = storage
            .send(GetRestaurant {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.average_rating, Some(4.0));
        assert_eq!(restaurant.review_count, 3);

        let logs = storage.send(GetLogsFromIndex { index: 1 }).await.unwrap();
        assert_eq!(logs.len(), 5);
        assert_eq!(
            logs.values().last(),
            Some(&StorageLogMessage::SetRestaurantRating(SetRestaurantRating {
                restaurant_id: "r1".to_string(),
                average_rating: Some(4.0),
                review_count: 3,
            }))
        );
    }

    #[actix_rt::test]
    async fn test_recompute_after_last_review_removed() {
        let storage = Storage::new().start();
        let mut restaurant = test_restaurant("r1", 0);
        restaurant.average_rating = Some(5.0);
        restaurant.review_count = 1;
        storage.send(InsertRestaurant { restaurant }).await.unwrap();
        storage
            .send(InsertReview {
                review: test_review("rv1", "r1", 5.0),
            })
            .await
            .unwrap()
            .unwrap();

        let removed = storage
            .send(RemoveReview {
                review_id: "rv1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.rating, 5.0);
        storage
            .send(RecomputeRestaurantRating {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap();

        let restaurant = storage
            .send(GetRestaurant {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.average_rating, None);
        assert_eq!(restaurant.review_count, 0);
    }

    #[actix_rt::test]
    async fn test_restaurants_page_newest_first() {
        let storage = Storage::new().start();
        for (id, minutes_ago) in [("old", 30), ("new", 0), ("mid", 10)] {
            storage
                .send(InsertRestaurant {
                    restaurant: test_restaurant(id, minutes_ago),
                })
                .await
                .unwrap();
        }

        let page = storage
            .send(GetRestaurantsPage {
                request: PageRequest::new(1, 2),
                strategy: PaginationStrategy::CountBased,
            })
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|r| r.restaurant_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
        assert_eq!(page.descriptor.total, Some(3));
        assert!(page.descriptor.has_next);

        let last = storage
            .send(GetRestaurantsPage {
                request: PageRequest::new(2, 2),
                strategy: PaginationStrategy::LengthHeuristic,
            })
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].restaurant_id, "old");
        assert_eq!(last.descriptor.total, None);
        assert!(!last.descriptor.has_next);
        assert!(last.descriptor.has_prev);
    }

    #[actix_rt::test]
    async fn test_page_past_the_end_is_empty() {
        let storage = Storage::new().start();
        storage
            .send(InsertRestaurant {
                restaurant: test_restaurant("r1", 0),
            })
            .await
            .unwrap();

        for strategy in [PaginationStrategy::CountBased, PaginationStrategy::LengthHeuristic] {
            let page = storage
                .send(GetRestaurantsPage {
                    request: PageRequest::new(usize::MAX, 10),
                    strategy,
                })
                .await
                .unwrap();
            assert!(page.items.is_empty());
            assert!(!page.descriptor.has_next);
            assert!(page.descriptor.has_prev);
        }
    }

    #[actix_rt::test]
    async fn test_replace_restaurant_keeps_stored_rating() {
        let storage = Storage::new().start();
        storage
            .send(InsertRestaurant {
                restaurant: test_restaurant("r1", 0),
            })
            .await
            .unwrap();
        let stale = storage
            .send(GetRestaurant {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();

        storage
            .send(InsertReview {
                review: test_review("rv1", "r1", 5.0),
            })
            .await
            .unwrap()
            .unwrap();
        storage
            .send(RecomputeRestaurantRating {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap();

        let mut edited = stale;
        edited.name = "Renamed".to_string();
        edited.average_rating = Some(1.0);
        edited.review_count = 42;
        let stored = storage
            .send(ReplaceRestaurant { restaurant: edited })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, Some(5.0));

        let restaurant = storage
            .send(GetRestaurant {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.name, "Renamed");
        assert_eq!(restaurant.average_rating, Some(5.0));
        assert_eq!(restaurant.review_count, 1);
    }

    #[actix_rt::test]
    async fn test_replace_unknown_review_fails() {
        let storage = Storage::new().start();
        let result = storage
            .send(ReplaceReview {
                review: test_review("ghost", "r1", 2.0),
            })
            .await
            .unwrap();
        assert_eq!(result, Err(AppError::ReviewNotFound("ghost".to_string())));
    }
}
