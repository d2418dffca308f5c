use crate::server_actors::storage::Storage;
use actix::prelude::*;
use colored::Color;
use common::aggregates::pagination::PaginationStrategy;
use common::error::AppError;
use common::localization::Language;
use common::logger::Logger;
use common::messages::internal_messages::{GetCuisines, GetRestaurantsPage};
use common::messages::{NearbyRestaurants, RequestNearbyRestaurants};
use common::types::coordinate::Coordinate;
use common::types::dtos::RestaurantDTO;
use common::types::views::RestaurantView;

/// The `NearbyRestaurantsService` actor is responsible for handling requests
/// for nearby restaurants based on the user's location. It fetches one page
/// of restaurants from the storage, filters it by distance, and sends the
/// localized results back.
///
/// ## Responsibilities:
/// - Retrieve a page of restaurants from the storage.
/// - Filter restaurants based on the user's location and a radius.
/// - Return the nearby restaurants with the metadata of the fetched page.
///
/// The filter runs after the page is fetched, so a page can come back with
/// fewer than `limit` restaurants even though more pages exist.
pub struct NearbyRestaurantsService {
    /// The address of the Storage actor to fetch restaurants from.
    pub storage_addr: Addr<Storage>,
    /// Radius used when the request does not carry one.
    pub default_radius_km: f64,
    pub fallback_language: Language,
    pub pagination_strategy: PaginationStrategy,
    /// Logger instance for events
    pub logger: Logger,
}

impl NearbyRestaurantsService {
    /// Creates a new instance of `NearbyRestaurantsService`.
    ///
    /// ## Arguments
    /// * `storage_addr` - The address of the Storage actor.
    /// * `default_radius_km` - Radius applied when a request has none.
    /// * `fallback_language` - Language used for missing translations.
    /// * `pagination_strategy` - How page metadata is derived.
    pub fn new(
        storage_addr: Addr<Storage>,
        default_radius_km: f64,
        fallback_language: Language,
        pagination_strategy: PaginationStrategy,
    ) -> Self {
        let logger = Logger::new("Nearby Restaurants Service", Color::Green);
        NearbyRestaurantsService {
            storage_addr,
            default_radius_km,
            fallback_language,
            pagination_strategy,
            logger,
        }
    }

    /// Filters the list of restaurants to find those within `radius_km` of
    /// the user's location. Restaurants without coordinates are left out.
    ///
    /// ## Arguments
    /// * `restaurants` - A page of `RestaurantDTO` as fetched from storage.
    /// * `location` - The user's position.
    /// * `radius_km` - Maximum great-circle distance, inclusive.
    ///
    /// ## Returns
    /// The restaurants within the radius, in their original order.
    pub fn get_nearby_restaurants(
        restaurants: Vec<RestaurantDTO>,
        location: Coordinate,
        radius_km: f64,
    ) -> Vec<RestaurantDTO> {
        restaurants
            .into_iter()
            .filter(|restaurant| {
                restaurant
                    .coordinate()
                    .is_some_and(|position| location.is_within(&position, radius_km))
            })
            .collect()
    }
}

impl Actor for NearbyRestaurantsService {
    type Context = Context<Self>;
}

impl Handler<RequestNearbyRestaurants> for NearbyRestaurantsService {
    type Result = ResponseFuture<NearbyRestaurants>;

    /// Handles the `RequestNearbyRestaurants` message by retrieving a page of
    /// restaurants from storage, filtering them based on the user's location,
    /// and returning the localized results.
    fn handle(&mut self, msg: RequestNearbyRestaurants, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();
        let fallback = self.fallback_language;
        let strategy = self.pagination_strategy;
        let radius_km = msg
            .radius_km
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(self.default_radius_km);
        let request = msg.page.clamped();

        Box::pin(async move {
            let fetched = async {
                let page = storage_addr
                    .send(GetRestaurantsPage { request, strategy })
                    .await?;
                let cuisines = storage_addr.send(GetCuisines).await?;
                Ok::<_, AppError>((page, cuisines))
            }
            .await;

            match fetched {
                Ok((page, cuisines)) => {
                    let fetched_count = page.items.len();
                    let nearby =
                        Self::get_nearby_restaurants(page.items, msg.origin, radius_km);
                    if nearby.is_empty() {
                        logger.warn(format!(
                            "No restaurants within {} km of {:?} on page {}",
                            radius_km, msg.origin, request.page
                        ));
                    } else {
                        logger.info(format!(
                            "Found {} of {} restaurants within {} km of {:?}",
                            nearby.len(),
                            fetched_count,
                            radius_km,
                            msg.origin
                        ));
                    }
                    NearbyRestaurants {
                        restaurants: nearby
                            .iter()
                            .map(|restaurant| {
                                RestaurantView::localize(
                                    restaurant,
                                    &cuisines,
                                    msg.language,
                                    fallback,
                                    Some(msg.origin),
                                )
                            })
                            .collect(),
                        descriptor: page.descriptor,
                        radius_km,
                    }
                }
                Err(e) => {
                    logger.error(format!("Error retrieving restaurants from storage: {}", e));
                    NearbyRestaurants {
                        restaurants: Vec::new(),
                        descriptor: strategy.describe(request.page, request.limit, 0, 0),
                        radius_km,
                    }
                }
            }
        })
    }
}
