use crate::aggregates::pagination::{Page, PageDescriptor, PageRequest};
use crate::error::AppResult;
use crate::localization::Language;
use crate::types::coordinate::Coordinate;
use crate::types::dtos::RestaurantDTO;
use crate::types::views::RestaurantView;
use actix::Message;
use serde::{Deserialize, Serialize};

/// Address fields as typed by the owner, in the owner's current language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub coordinate: Option<Coordinate>,
}

/// Message to create a restaurant.
///
/// ## Contents
/// - `language`: language the owner is writing in; every localized field is
///   stored under it.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<RestaurantDTO>")]
pub struct CreateRestaurant {
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub address: Option<NewAddress>,
    pub cuisine_ids: Vec<String>,
    pub image_url: Option<String>,
    pub language: Language,
}

/// Message to edit a restaurant. `None` fields are left untouched.
///
/// ## Purpose
/// Localized fields are merged: only the entry for `language` is replaced and
/// translations made by editors in other languages are kept.
#[derive(Message, Debug, Clone, Default, Serialize, Deserialize)]
#[rtype(result = "AppResult<RestaurantDTO>")]
pub struct UpdateRestaurant {
    pub restaurant_id: String,
    pub language: Language,
    pub name: Option<String>,
    pub description: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    /// Only accepted while the address has no coordinate yet.
    pub coordinate: Option<Coordinate>,
    pub cuisine_ids: Option<Vec<String>>,
    pub image_url: Option<String>,
}

/// Message to fetch one restaurant localized for the detail screen.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<RestaurantView>")]
pub struct GetRestaurantDetails {
    pub restaurant_id: String,
    pub language: Language,
    pub origin: Option<Coordinate>,
}

/// Message to fetch a page of restaurants localized for the list screen.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Page<RestaurantView>")]
pub struct ListRestaurants {
    pub page: PageRequest,
    pub language: Language,
    pub origin: Option<Coordinate>,
}

/// Message to find restaurants around the user.
///
/// ## Contents
/// - `radius_km`: defaults to the configured radius.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "NearbyRestaurants")]
pub struct RequestNearbyRestaurants {
    pub origin: Coordinate,
    pub radius_km: Option<f64>,
    pub page: PageRequest,
    pub language: Language,
}

/// Answer to [`RequestNearbyRestaurants`].
///
/// ## Contents
/// - `restaurants`: the fetched page with far away restaurants filtered out,
///   so it may hold fewer than `descriptor.limit` entries.
/// - `descriptor`: metadata of the fetched page, before filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyRestaurants {
    pub restaurants: Vec<RestaurantView>,
    pub descriptor: PageDescriptor,
    pub radius_km: f64,
}
