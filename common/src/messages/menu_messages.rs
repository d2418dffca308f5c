use crate::error::AppResult;
use crate::localization::Language;
use crate::types::dtos::{DishDTO, MenuDTO};
use crate::types::schedule::{Moment, ScheduleWindow};
use crate::types::views::MenuView;
use actix::Message;
use serde::{Deserialize, Serialize};

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<MenuDTO>")]
pub struct CreateMenu {
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub schedule: Option<ScheduleWindow>,
    pub price: Option<f64>,
    pub language: Language,
}

/// Message to edit a menu. `None` fields are left untouched; name and
/// description are merged into their translations under `language`.
#[derive(Message, Debug, Clone, Default, Serialize, Deserialize)]
#[rtype(result = "AppResult<MenuDTO>")]
pub struct UpdateMenu {
    pub menu_id: String,
    pub language: Language,
    pub name: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<ScheduleWindow>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<DishDTO>")]
pub struct AddDish {
    pub menu_id: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub language: Language,
}

/// Message to fetch every menu of a restaurant, each flagged open or closed.
///
/// ## Contents
/// - `at`: instant to evaluate availability at, the local clock when `None`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Vec<MenuView>")]
pub struct GetRestaurantMenus {
    pub restaurant_id: String,
    pub language: Language,
    pub at: Option<Moment>,
}

/// Same as [`GetRestaurantMenus`] but only the menus open at `at`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Vec<MenuView>")]
pub struct GetOpenMenus {
    pub restaurant_id: String,
    pub language: Language,
    pub at: Option<Moment>,
}
