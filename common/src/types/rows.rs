//! Mapping of raw query-builder rows into the typed records of [`crate::types::dtos`].
//!
//! Rows arrive as loose JSON. Localized columns may hold a plain string (rows
//! written before translations existed, read as the default language) or an
//! object keyed by language tag. Numeric columns may come back as numbers or
//! as numeric strings, ids as strings or integers. Joined tables are nested
//! objects, or single-element arrays when the join is declared one-to-many.

use crate::aggregates::rating::validate_rating;
use crate::constants::DEFAULT_FALLBACK_LANGUAGE;
use crate::error::{AppError, AppResult};
use crate::localization::{Language, TranslationMap};
use crate::logger::Logger;
use crate::types::coordinate::Coordinate;
use crate::types::dtos::{
    AddressDTO, CuisineDTO, DishDTO, MenuDTO, ProfileDTO, RestaurantDTO, ReviewDTO,
};
use crate::types::schedule::{ScheduleWindow, TimeOfDay, Weekday};
use chrono::{DateTime, Utc};
use serde_json::Value;

pub trait FromRow: Sized {
    const TABLE: &'static str;

    fn from_row(row: &Value) -> AppResult<Self>;
}

/// Maps every row it can, logging and skipping the malformed ones.
pub fn parse_rows<T: FromRow>(rows: &[Value], logger: &Logger) -> Vec<T> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match T::from_row(row) {
            Ok(record) => Some(record),
            Err(e) => {
                logger.warn(format!("Skipping {} row #{}: {}", T::TABLE, index, e));
                None
            }
        })
        .collect()
}

fn malformed(table: &'static str, reason: impl Into<String>) -> AppError {
    AppError::MalformedRow {
        table,
        reason: reason.into(),
    }
}

fn ensure_object(table: &'static str, row: &Value) -> AppResult<()> {
    if row.is_object() {
        Ok(())
    } else {
        Err(malformed(table, "expected a JSON object"))
    }
}

/// Missing keys and explicit nulls are treated the same.
fn field<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|value| !value.is_null())
}

fn optional_string(row: &Value, key: &str) -> Option<String> {
    match field(row, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_string(table: &'static str, row: &Value, key: &str) -> AppResult<String> {
    optional_string(row, key).ok_or_else(|| malformed(table, format!("missing '{}'", key)))
}

fn optional_number(table: &'static str, row: &Value, key: &str) -> AppResult<Option<f64>> {
    match field(row, key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| malformed(table, format!("'{}' is not a number: {}", key, s))),
        Some(other) => Err(malformed(
            table,
            format!("'{}' is not a number: {}", key, other),
        )),
    }
}

fn required_number(table: &'static str, row: &Value, key: &str) -> AppResult<f64> {
    optional_number(table, row, key)?.ok_or_else(|| malformed(table, format!("missing '{}'", key)))
}

fn optional_bool(row: &Value, key: &str, default: bool) -> bool {
    match field(row, key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => default,
    }
}

fn optional_timestamp(
    table: &'static str,
    row: &Value,
    key: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    match optional_string(row, key) {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| malformed(table, format!("'{}' is not a timestamp: {}", key, e))),
    }
}

/// Localized column: an object of language → text, or a legacy plain string.
/// Non-string values inside the object are dropped.
fn translation(row: &Value, key: &str) -> TranslationMap {
    match field(row, key) {
        Some(Value::String(text)) => {
            TranslationMap::single(DEFAULT_FALLBACK_LANGUAGE, text.clone())
        }
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(language, text)| text.as_str().map(|text| (language.clone(), text)))
            .collect(),
        _ => TranslationMap::new(),
    }
}

/// A joined record: either a nested object or the first element of an array.
fn joined<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    match field(row, key)? {
        Value::Array(items) => items.first(),
        value @ Value::Object(_) => Some(value),
        _ => None,
    }
}

fn string_list(row: &Value, key: &str) -> Vec<String> {
    match field(row, key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl FromRow for AddressDTO {
    const TABLE: &'static str = "addresses";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        let latitude = optional_number(Self::TABLE, row, "latitude")?;
        let longitude = optional_number(Self::TABLE, row, "longitude")?;
        let coordinate = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            (None, None) => None,
            _ => return Err(malformed(Self::TABLE, "only one of latitude/longitude set")),
        };
        Ok(AddressDTO {
            address_id: required_string(Self::TABLE, row, "id")?,
            street: translation(row, "street"),
            city: translation(row, "city"),
            country: translation(row, "country"),
            postal_code: optional_string(row, "postal_code"),
            coordinate,
        })
    }
}

impl FromRow for RestaurantDTO {
    const TABLE: &'static str = "restaurants";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        let address = match joined(row, "addresses").or_else(|| joined(row, "address")) {
            Some(address_row) => Some(AddressDTO::from_row(address_row)?),
            None => None,
        };

        let mut cuisine_ids = string_list(row, "cuisine_ids");
        if let Some(Value::Array(links)) = field(row, "restaurant_cuisines") {
            cuisine_ids.extend(links.iter().filter_map(|link| optional_string(link, "cuisine_id")));
        }

        let review_count = optional_number(Self::TABLE, row, "review_count")?
            .map(|count| count.max(0.0) as usize)
            .unwrap_or(0);

        Ok(RestaurantDTO {
            restaurant_id: required_string(Self::TABLE, row, "id")?,
            owner_id: required_string(Self::TABLE, row, "owner_id")?,
            name: required_string(Self::TABLE, row, "name")?,
            description: translation(row, "description"),
            address,
            cuisine_ids,
            image_url: optional_string(row, "image_url"),
            average_rating: optional_number(Self::TABLE, row, "average_rating")?,
            review_count,
            created_at: optional_timestamp(Self::TABLE, row, "created_at")?
                .unwrap_or_else(Utc::now),
        })
    }
}

impl FromRow for MenuDTO {
    const TABLE: &'static str = "menus";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        let days = string_list(row, "days")
            .iter()
            .map(|day| day.parse::<Weekday>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(Self::TABLE, e.to_string()))?;
        let start = optional_string(row, "start_time");
        let end = optional_string(row, "end_time");

        let schedule = match (start, end) {
            (Some(start), Some(end)) if !days.is_empty() => {
                let start: TimeOfDay = start
                    .parse()
                    .map_err(|e: AppError| malformed(Self::TABLE, e.to_string()))?;
                let end: TimeOfDay = end
                    .parse()
                    .map_err(|e: AppError| malformed(Self::TABLE, e.to_string()))?;
                Some(ScheduleWindow::new(days, start, end))
            }
            _ => None,
        };

        Ok(MenuDTO {
            menu_id: required_string(Self::TABLE, row, "id")?,
            restaurant_id: required_string(Self::TABLE, row, "restaurant_id")?,
            name: translation(row, "name"),
            description: translation(row, "description"),
            schedule,
            price: optional_number(Self::TABLE, row, "price")?,
            is_active: optional_bool(row, "is_active", true),
        })
    }
}

impl FromRow for DishDTO {
    const TABLE: &'static str = "dishes";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        Ok(DishDTO {
            dish_id: required_string(Self::TABLE, row, "id")?,
            menu_id: required_string(Self::TABLE, row, "menu_id")?,
            name: translation(row, "name"),
            description: translation(row, "description"),
            price: optional_number(Self::TABLE, row, "price")?,
        })
    }
}

impl FromRow for ReviewDTO {
    const TABLE: &'static str = "reviews";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        Ok(ReviewDTO {
            review_id: required_string(Self::TABLE, row, "id")?,
            restaurant_id: required_string(Self::TABLE, row, "restaurant_id")?,
            user_id: required_string(Self::TABLE, row, "user_id")?,
            rating: validate_rating(required_number(Self::TABLE, row, "rating")?)
                .map_err(|e| malformed(Self::TABLE, e.to_string()))?,
            comment: translation(row, "comment"),
            created_at: optional_timestamp(Self::TABLE, row, "created_at")?
                .unwrap_or_else(Utc::now),
            updated_at: optional_timestamp(Self::TABLE, row, "updated_at")?,
        })
    }
}

impl FromRow for CuisineDTO {
    const TABLE: &'static str = "cuisines";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        Ok(CuisineDTO {
            cuisine_id: required_string(Self::TABLE, row, "id")?,
            name: translation(row, "name"),
        })
    }
}

impl FromRow for ProfileDTO {
    const TABLE: &'static str = "profiles";

    fn from_row(row: &Value) -> AppResult<Self> {
        ensure_object(Self::TABLE, row)?;
        // Unknown or missing languages fall back to the default rather than rejecting the profile.
        let preferred_language = optional_string(row, "language")
            .and_then(|language| language.parse::<Language>().ok())
            .unwrap_or_default();
        Ok(ProfileDTO {
            user_id: required_string(Self::TABLE, row, "id")?,
            username: optional_string(row, "username").unwrap_or_default(),
            preferred_language,
            avatar_url: optional_string(row, "avatar_url"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogLevel;
    use colored::Color;
    use ntest::assert_about_eq;
    use serde_json::json;

    #[test]
    fn test_restaurant_with_nested_address() {
        let row = json!({
            "id": 7,
            "owner_id": "u1",
            "name": "Can Solé",
            "description": {"es_ES": "Arroces", "en_US": "Rice dishes", "fr_FR": null},
            "average_rating": "4.5",
            "review_count": 12,
            "created_at": "2024-05-01T10:00:00Z",
            "addresses": [{
                "id": "a1",
                "street": "Carrer de Sant Carles, 4",
                "city": {"es_ES": "Barcelona"},
                "latitude": 41.3795,
                "longitude": "2.1894"
            }],
            "restaurant_cuisines": [{"cuisine_id": "mediterranean"}]
        });

        let restaurant = RestaurantDTO::from_row(&row).unwrap();
        assert_eq!(restaurant.restaurant_id, "7");
        assert_eq!(restaurant.description.len(), 2);
        assert_eq!(restaurant.average_rating, Some(4.5));
        assert_eq!(restaurant.review_count, 12);
        assert_eq!(restaurant.cuisine_ids, vec!["mediterranean".to_string()]);

        let address = restaurant.address.unwrap();
        assert_eq!(address.street.get("es_ES"), Some("Carrer de Sant Carles, 4"));
        let coordinate = address.coordinate.unwrap();
        assert_about_eq!(coordinate.latitude, 41.3795);
        assert_about_eq!(coordinate.longitude, 2.1894);
    }

    #[test]
    fn test_restaurant_missing_name_is_malformed() {
        let row = json!({"id": "r1", "owner_id": "u1"});
        assert_eq!(
            RestaurantDTO::from_row(&row),
            Err(AppError::MalformedRow {
                table: "restaurants",
                reason: "missing 'name'".to_string()
            })
        );
    }

    #[test]
    fn test_address_with_half_a_coordinate_is_malformed() {
        let row = json!({"id": "a1", "latitude": 41.0});
        assert!(AddressDTO::from_row(&row).is_err());
    }

    #[test]
    fn test_menu_schedule_from_columns() {
        let row = json!({
            "id": "m1",
            "restaurant_id": "r1",
            "name": {"ca_ES": "Sopar"},
            "days": ["Friday", "saturday"],
            "start_time": "21:00:00",
            "end_time": "01:30:00",
            "price": 32
        });
        let menu = MenuDTO::from_row(&row).unwrap();
        let schedule = menu.schedule.unwrap();
        assert!(schedule.is_overnight());
        assert!(schedule.days.contains(&Weekday::Friday));
        assert_eq!(schedule.start.to_string(), "21:00");
        assert!(menu.is_active);
        assert_eq!(menu.price, Some(32.0));
    }

    #[test]
    fn test_menu_without_days_has_no_schedule() {
        let row = json!({
            "id": "m1",
            "restaurant_id": "r1",
            "start_time": "12:00",
            "end_time": "16:00"
        });
        assert_eq!(MenuDTO::from_row(&row).unwrap().schedule, None);
    }

    #[test]
    fn test_menu_with_bad_time_is_malformed() {
        let row = json!({
            "id": "m1",
            "restaurant_id": "r1",
            "days": ["monday"],
            "start_time": "lunch",
            "end_time": "16:00"
        });
        assert!(matches!(
            MenuDTO::from_row(&row),
            Err(AppError::MalformedRow { table: "menus", .. })
        ));
    }

    #[test]
    fn test_legacy_plain_string_comment() {
        let row = json!({
            "id": "rv1",
            "restaurant_id": "r1",
            "user_id": "u2",
            "rating": 4,
            "comment": "Muy bueno"
        });
        let review = ReviewDTO::from_row(&row).unwrap();
        assert_eq!(review.comment, TranslationMap::single("es_ES", "Muy bueno"));
        assert_eq!(review.rating, 4.0);
        assert_eq!(review.updated_at, None);
    }

    #[test]
    fn test_review_rating_out_of_range_is_malformed() {
        for rating in [json!(9), json!("NaN"), json!(0)] {
            let row = json!({
                "id": "rv1",
                "restaurant_id": "r1",
                "user_id": "u2",
                "rating": rating
            });
            assert!(matches!(
                ReviewDTO::from_row(&row),
                Err(AppError::MalformedRow { table: "reviews", .. })
            ));
        }
    }

    #[test]
    fn test_profile_language_fallback() {
        let profile = ProfileDTO::from_row(&json!({"id": "u1", "language": "en"})).unwrap();
        assert_eq!(profile.preferred_language, Language::English);

        let profile = ProfileDTO::from_row(&json!({"id": "u2", "language": "xx"})).unwrap();
        assert_eq!(profile.preferred_language, Language::Spanish);
    }

    #[test]
    fn test_parse_rows_skips_malformed() {
        let logger = Logger::with_level("rows", Color::White, LogLevel::Error);
        let rows = vec![
            json!({"id": "c1", "name": {"es_ES": "Italiana"}}),
            json!("not a row"),
            json!({"name": "Sin id"}),
            json!({"id": "c2", "name": "Japonesa"}),
        ];
        let cuisines: Vec<CuisineDTO> = parse_rows(&rows, &logger);
        let ids: Vec<&str> = cuisines.iter().map(|c| c.cuisine_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }
}
