use crate::error::AppResult;
use crate::localization::Language;
use crate::types::dtos::ReviewDTO;
use crate::types::views::ReviewView;
use actix::Message;
use serde::{Deserialize, Serialize};

/// Message to post a review. The comment is stored under `language`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<ReviewDTO>")]
pub struct CreateReview {
    pub restaurant_id: String,
    pub user_id: String,
    pub rating: f64,
    pub comment: String,
    pub language: Language,
}

/// Message to edit a review. Only its author may do so.
///
/// ## Contents
/// - `rating`: the restaurant average is recomputed only when it changes.
/// - `comment`: merged into the existing translations under `language`.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<ReviewDTO>")]
pub struct UpdateReview {
    pub review_id: String,
    pub user_id: String,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub language: Language,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "AppResult<()>")]
pub struct DeleteReview {
    pub review_id: String,
    pub user_id: String,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Vec<ReviewView>")]
pub struct GetRestaurantReviews {
    pub restaurant_id: String,
    pub language: Language,
}
