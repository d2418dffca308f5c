use crate::localization::{Language, TranslationMap};
use crate::types::coordinate::Coordinate;
use crate::types::schedule::ScheduleWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressDTO {
    /// Unique address ID.
    pub address_id: String,
    /// Street and number, per language.
    pub street: TranslationMap,
    /// City, per language.
    pub city: TranslationMap,
    /// Country, per language.
    pub country: TranslationMap,
    pub postal_code: Option<String>,
    /// Set once when the address is geocoded, never changed afterwards.
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDTO {
    /// Unique restaurant ID.
    pub restaurant_id: String,
    /// Profile ID of the owner.
    pub owner_id: String,
    /// Display name. Not translated.
    pub name: String,
    /// Description, per language.
    pub description: TranslationMap,
    pub address: Option<AddressDTO>,
    pub cuisine_ids: Vec<String>,
    pub image_url: Option<String>,
    /// Derived from the restaurant's reviews; recomputed after every review mutation.
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub created_at: DateTime<Utc>,
}

impl RestaurantDTO {
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.address.as_ref().and_then(|address| address.coordinate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDTO {
    /// Unique menu ID.
    pub menu_id: String,
    pub restaurant_id: String,
    /// Name, per language.
    pub name: TranslationMap,
    /// Description, per language.
    pub description: TranslationMap,
    /// When the menu is served. `None` means whenever the menu is active.
    pub schedule: Option<ScheduleWindow>,
    pub price: Option<f64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishDTO {
    /// Unique dish ID.
    pub dish_id: String,
    pub menu_id: String,
    /// Name, per language.
    pub name: TranslationMap,
    /// Description, per language.
    pub description: TranslationMap,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDTO {
    /// Unique review ID.
    pub review_id: String,
    pub restaurant_id: String,
    /// Profile ID of the author.
    pub user_id: String,
    /// Between 1 and 5, fractional values allowed.
    pub rating: f64,
    /// Comment, per language. Grows as the author edits it in other languages.
    pub comment: TranslationMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuisineDTO {
    pub cuisine_id: String,
    /// Name, per language.
    pub name: TranslationMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDTO {
    pub user_id: String,
    pub username: String,
    pub preferred_language: Language,
    pub avatar_url: Option<String>,
}
