//! Render-ready records: every localized field resolved for one language.

use crate::aggregates::rating::RatingSummary;
use crate::localization::Language;
use crate::types::coordinate::Coordinate;
use crate::types::dtos::{
    AddressDTO, CuisineDTO, DishDTO, MenuDTO, ProfileDTO, RestaurantDTO, ReviewDTO,
};
use crate::utils::{format_distance, round_to_one_decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantView {
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub address_line: String,
    pub cuisines: Vec<String>,
    pub image_url: Option<String>,
    pub rating: RatingSummary,
    /// Rounded to one decimal, present when an origin was given and the
    /// restaurant has coordinates.
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
}

impl RestaurantView {
    pub fn localize(
        restaurant: &RestaurantDTO,
        cuisines: &[CuisineDTO],
        language: Language,
        fallback: Language,
        origin: Option<Coordinate>,
    ) -> Self {
        let (requested, fallback) = (language.tag(), fallback.tag());
        let cuisines = restaurant
            .cuisine_ids
            .iter()
            .filter_map(|id| cuisines.iter().find(|cuisine| &cuisine.cuisine_id == id))
            .map(|cuisine| cuisine.name.resolve(requested, fallback))
            .filter(|name| !name.is_empty())
            .collect();
        let distance_km = origin
            .zip(restaurant.coordinate())
            .map(|(origin, position)| origin.distance_km(&position));

        Self {
            restaurant_id: restaurant.restaurant_id.clone(),
            name: restaurant.name.clone(),
            description: restaurant.description.resolve(requested, fallback),
            address_line: restaurant
                .address
                .as_ref()
                .map(|address| address_line(address, requested, fallback))
                .unwrap_or_default(),
            cuisines,
            image_url: restaurant.image_url.clone(),
            rating: RatingSummary {
                average: restaurant.average_rating,
                count: restaurant.review_count,
            },
            distance_km: distance_km.map(round_to_one_decimal),
            distance_label: distance_km.map(format_distance),
        }
    }
}

/// `street, postal code city, country`, leaving out whatever is empty.
fn address_line(address: &AddressDTO, requested: &str, fallback: &str) -> String {
    let city = address.city.resolve(requested, fallback);
    let locality = match &address.postal_code {
        Some(postal_code) if !city.is_empty() => format!("{} {}", postal_code, city),
        Some(postal_code) => postal_code.clone(),
        None => city,
    };
    [
        address.street.resolve(requested, fallback),
        locality,
        address.country.resolve(requested, fallback),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishView {
    pub dish_id: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub menu_id: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub schedule_label: Option<String>,
    pub is_open: bool,
    pub dishes: Vec<DishView>,
}

impl MenuView {
    /// `is_open` is computed by the caller for the instant being rendered.
    pub fn localize(
        menu: &MenuDTO,
        dishes: &[DishDTO],
        language: Language,
        fallback: Language,
        is_open: bool,
    ) -> Self {
        let (requested, fallback) = (language.tag(), fallback.tag());
        Self {
            menu_id: menu.menu_id.clone(),
            name: menu.name.resolve(requested, fallback),
            description: menu.description.resolve(requested, fallback),
            price: menu.price,
            schedule_label: menu.schedule.as_ref().map(|schedule| schedule.label()),
            is_open,
            dishes: dishes
                .iter()
                .filter(|dish| dish.menu_id == menu.menu_id)
                .map(|dish| DishView {
                    dish_id: dish.dish_id.clone(),
                    name: dish.name.resolve(requested, fallback),
                    description: dish.description.resolve(requested, fallback),
                    price: dish.price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewView {
    pub review_id: String,
    pub rating: f64,
    pub comment: String,
    /// Empty when the author's profile is gone.
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub edited: bool,
}

impl ReviewView {
    pub fn localize(
        review: &ReviewDTO,
        author: Option<&ProfileDTO>,
        language: Language,
        fallback: Language,
    ) -> Self {
        Self {
            review_id: review.review_id.clone(),
            rating: review.rating,
            comment: review.comment.resolve(language.tag(), fallback.tag()),
            author_name: author
                .map(|profile| profile.username.clone())
                .unwrap_or_default(),
            created_at: review.created_at,
            edited: review.updated_at.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::TranslationMap;
    use crate::types::schedule::{ScheduleWindow, Weekday};

    fn restaurant() -> RestaurantDTO {
        RestaurantDTO {
            restaurant_id: "r1".to_string(),
            owner_id: "u1".to_string(),
            name: "Bodega Sepúlveda".to_string(),
            description: [("es_ES", "Vermut y tapas"), ("en_US", "Vermouth and tapas")]
                .into_iter()
                .collect(),
            address: Some(AddressDTO {
                address_id: "a1".to_string(),
                street: TranslationMap::single("es_ES", "Carrer de Sepúlveda, 173"),
                city: [("es_ES", "Barcelona"), ("fr_FR", "Barcelone")].into_iter().collect(),
                country: [("es_ES", "España"), ("en_US", "Spain")].into_iter().collect(),
                postal_code: Some("08011".to_string()),
                coordinate: Some(Coordinate::new(41.3828, 2.1609)),
            }),
            cuisine_ids: vec!["tapas".to_string(), "missing".to_string()],
            image_url: None,
            average_rating: Some(4.5),
            review_count: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_restaurant_view_in_english() {
        let cuisines = vec![CuisineDTO {
            cuisine_id: "tapas".to_string(),
            name: [("es_ES", "Tapas"), ("en_US", "Small plates")].into_iter().collect(),
        }];
        let view = RestaurantView::localize(
            &restaurant(),
            &cuisines,
            Language::English,
            Language::Spanish,
            None,
        );
        assert_eq!(view.description, "Vermouth and tapas");
        assert_eq!(
            view.address_line,
            "Carrer de Sepúlveda, 173, 08011 Barcelona, Spain"
        );
        assert_eq!(view.cuisines, vec!["Small plates".to_string()]);
        assert_eq!(view.rating.label(), Some("4.5 (2)".to_string()));
        assert_eq!(view.distance_km, None);
    }

    #[test]
    fn test_restaurant_view_with_distance() {
        let origin = Coordinate::new(41.3874, 2.1686);
        let view = RestaurantView::localize(
            &restaurant(),
            &[],
            Language::French,
            Language::Spanish,
            Some(origin),
        );
        assert_eq!(view.description, "Vermut y tapas");
        assert!(view.address_line.contains("08011 Barcelone"));
        assert_eq!(view.distance_km, Some(0.8));
        assert_eq!(view.distance_label, Some("821 m".to_string()));
    }

    #[test]
    fn test_menu_view_only_lists_its_dishes() {
        let menu = MenuDTO {
            menu_id: "m1".to_string(),
            restaurant_id: "r1".to_string(),
            name: TranslationMap::single("ca_ES", "Menú migdia"),
            description: TranslationMap::new(),
            schedule: Some(ScheduleWindow::new(
                [Weekday::Monday],
                "13:00".parse().unwrap(),
                "16:00".parse().unwrap(),
            )),
            price: Some(15.5),
            is_active: true,
        };
        let dishes = vec![
            DishDTO {
                dish_id: "d1".to_string(),
                menu_id: "m1".to_string(),
                name: TranslationMap::single("es_ES", "Croquetas"),
                description: TranslationMap::new(),
                price: None,
            },
            DishDTO {
                dish_id: "d2".to_string(),
                menu_id: "m2".to_string(),
                name: TranslationMap::single("es_ES", "Bravas"),
                description: TranslationMap::new(),
                price: None,
            },
        ];
        let view = MenuView::localize(&menu, &dishes, Language::English, Language::Spanish, true);
        assert_eq!(view.name, "Menú migdia");
        assert_eq!(view.description, "");
        assert_eq!(view.schedule_label.as_deref(), Some("monday 13:00-16:00"));
        assert_eq!(view.dishes.len(), 1);
        assert_eq!(view.dishes[0].name, "Croquetas");
    }

    #[test]
    fn test_review_view_without_author() {
        let review = ReviewDTO {
            review_id: "rv1".to_string(),
            restaurant_id: "r1".to_string(),
            user_id: "gone".to_string(),
            rating: 3.5,
            comment: TranslationMap::single("fr_FR", "Correct"),
            created_at: Utc::now(),
            updated_at: None,
        };
        let view = ReviewView::localize(&review, None, Language::Spanish, Language::Spanish);
        assert_eq!(view.comment, "Correct");
        assert_eq!(view.author_name, "");
        assert!(!view.edited);
    }
}
