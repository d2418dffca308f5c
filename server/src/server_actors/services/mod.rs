pub mod menus_service;
pub mod nearby_restaurants;
pub mod restaurants_service;
pub mod reviews_service;
