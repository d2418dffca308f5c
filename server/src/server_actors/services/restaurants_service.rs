use crate::server_actors::storage::Storage;
use actix::prelude::*;
use chrono::Utc;
use colored::Color;
use common::aggregates::pagination::{Page, PaginationStrategy};
use common::error::{AppError, AppResult};
use common::localization::{Language, TranslationMap, merge};
use common::logger::Logger;
use common::messages::internal_messages::{
    GetCuisines, GetRestaurant, GetRestaurantsPage, InsertRestaurant, ReplaceRestaurant,
};
use common::messages::{
    CreateRestaurant, GetRestaurantDetails, ListRestaurants, NewAddress, UpdateRestaurant,
};
use common::types::dtos::{AddressDTO, RestaurantDTO};
use common::types::views::RestaurantView;
use uuid::Uuid;

/// The `RestaurantsService` actor creates and edits restaurants and renders
/// them for the list and detail screens.
pub struct RestaurantsService {
    pub storage_addr: Addr<Storage>,
    pub fallback_language: Language,
    pub pagination_strategy: PaginationStrategy,
    pub logger: Logger,
}

impl RestaurantsService {
    pub fn new(
        storage_addr: Addr<Storage>,
        fallback_language: Language,
        pagination_strategy: PaginationStrategy,
    ) -> Self {
        RestaurantsService {
            storage_addr,
            fallback_language,
            pagination_strategy,
            logger: Logger::new("Restaurants Service", Color::Green),
        }
    }
}

fn new_address(address: NewAddress, language: Language) -> AddressDTO {
    let tag = language.tag();
    AddressDTO {
        address_id: Uuid::new_v4().to_string(),
        street: TranslationMap::single(tag, address.street),
        city: TranslationMap::single(tag, address.city),
        country: TranslationMap::single(tag, address.country),
        postal_code: address.postal_code,
        coordinate: address.coordinate,
    }
}

/// Applies an edit to a restaurant. Localized fields are merged under the
/// editor's language; the coordinate can only be set while it is missing.
pub fn apply_update(
    mut restaurant: RestaurantDTO,
    update: &UpdateRestaurant,
) -> AppResult<RestaurantDTO> {
    let tag = update.language.tag();

    if let Some(name) = &update.name {
        restaurant.name = name.clone();
    }
    if let Some(description) = &update.description {
        restaurant.description = restaurant.description.merged(description, tag);
    }
    if let Some(cuisine_ids) = &update.cuisine_ids {
        restaurant.cuisine_ids = cuisine_ids.clone();
    }
    if let Some(image_url) = &update.image_url {
        restaurant.image_url = Some(image_url.clone());
    }

    let touches_address = update.street.is_some()
        || update.city.is_some()
        || update.country.is_some()
        || update.postal_code.is_some()
        || update.coordinate.is_some();
    if !touches_address {
        return Ok(restaurant);
    }

    let mut address = restaurant.address.take().unwrap_or_else(|| AddressDTO {
        address_id: Uuid::new_v4().to_string(),
        street: TranslationMap::new(),
        city: TranslationMap::new(),
        country: TranslationMap::new(),
        postal_code: None,
        coordinate: None,
    });
    if let Some(street) = &update.street {
        address.street = merge(Some(&address.street), street, tag);
    }
    if let Some(city) = &update.city {
        address.city = merge(Some(&address.city), city, tag);
    }
    if let Some(country) = &update.country {
        address.country = merge(Some(&address.country), country, tag);
    }
    if let Some(postal_code) = &update.postal_code {
        address.postal_code = Some(postal_code.clone());
    }
    if let Some(coordinate) = update.coordinate {
        match address.coordinate {
            Some(current) if current != coordinate => {
                return Err(AppError::CoordinateAlreadySet(restaurant.restaurant_id));
            }
            _ => address.coordinate = Some(coordinate),
        }
    }
    restaurant.address = Some(address);
    Ok(restaurant)
}

impl Actor for RestaurantsService {
    type Context = Context<Self>;
}

impl Handler<CreateRestaurant> for RestaurantsService {
    type Result = ResponseFuture<AppResult<RestaurantDTO>>;

    fn handle(&mut self, msg: CreateRestaurant, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let restaurant = RestaurantDTO {
                restaurant_id: Uuid::new_v4().to_string(),
                owner_id: msg.owner_id,
                name: msg.name,
                description: TranslationMap::single(msg.language.tag(), msg.description),
                address: msg
                    .address
                    .map(|address| new_address(address, msg.language)),
                cuisine_ids: msg.cuisine_ids,
                image_url: msg.image_url,
                average_rating: None,
                review_count: 0,
                created_at: Utc::now(),
            };
            storage_addr
                .send(InsertRestaurant {
                    restaurant: restaurant.clone(),
                })
                .await?;
            logger.info(format!(
                "Restaurant {} created by {}",
                restaurant.restaurant_id, restaurant.owner_id
            ));
            Ok(restaurant)
        })
    }
}

impl Handler<UpdateRestaurant> for RestaurantsService {
    type Result = ResponseFuture<AppResult<RestaurantDTO>>;

    fn handle(&mut self, msg: UpdateRestaurant, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let current = storage_addr
                .send(GetRestaurant {
                    restaurant_id: msg.restaurant_id.clone(),
                })
                .await?
                .ok_or_else(|| AppError::RestaurantNotFound(msg.restaurant_id.clone()))?;
            let updated = apply_update(current, &msg).inspect_err(|e| {
                logger.warn(format!("Rejected update of {}: {}", msg.restaurant_id, e));
            })?;
            let stored = storage_addr
                .send(ReplaceRestaurant { restaurant: updated })
                .await??;
            Ok(stored)
        })
    }
}

impl Handler<GetRestaurantDetails> for RestaurantsService {
    type Result = ResponseFuture<AppResult<RestaurantView>>;

    fn handle(&mut self, msg: GetRestaurantDetails, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let fallback = self.fallback_language;

        Box::pin(async move {
            let restaurant = storage_addr
                .send(GetRestaurant {
                    restaurant_id: msg.restaurant_id.clone(),
                })
                .await?
                .ok_or(AppError::RestaurantNotFound(msg.restaurant_id))?;
            let cuisines = storage_addr.send(GetCuisines).await?;
            Ok(RestaurantView::localize(
                &restaurant,
                &cuisines,
                msg.language,
                fallback,
                msg.origin,
            ))
        })
    }
}

/// Handles list screen requests. On a storage failure an empty page is
/// returned and the error is logged.
impl Handler<ListRestaurants> for RestaurantsService {
    type Result = ResponseFuture<Page<RestaurantView>>;

    fn handle(&mut self, msg: ListRestaurants, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();
        let fallback = self.fallback_language;
        let strategy = self.pagination_strategy;

        Box::pin(async move {
            let request = msg.page.clamped();
            let fetched = async {
                let page = storage_addr
                    .send(GetRestaurantsPage { request, strategy })
                    .await?;
                let cuisines = storage_addr.send(GetCuisines).await?;
                Ok::<_, AppError>((page, cuisines))
            }
            .await;

            match fetched {
                Ok((page, cuisines)) => page.map(|restaurant| {
                    RestaurantView::localize(
                        &restaurant,
                        &cuisines,
                        msg.language,
                        fallback,
                        msg.origin,
                    )
                }),
                Err(e) => {
                    logger.error(format!("Error retrieving restaurants page: {}", e));
                    Page {
                        items: Vec::new(),
                        descriptor: strategy.describe(request.page, request.limit, 0, 0),
                    }
                }
            }
        })
    }
}
