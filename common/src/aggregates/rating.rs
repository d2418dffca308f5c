use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::{AppError, AppResult};
use crate::utils::round_to_one_decimal;
use serde::{Deserialize, Serialize};

/// Mean of `ratings` rounded to one decimal, `None` when there are no ratings yet.
///
/// Always a full recompute over the whole set, never a running average.
pub fn average<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));
    if count == 0 {
        return None;
    }
    Some(round_to_one_decimal(sum / count as f64))
}

/// A single review rating must be finite and within `1.0..=5.0`.
pub fn validate_rating(rating: f64) -> AppResult<f64> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(AppError::RatingOutOfRange(rating))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[f64]) -> Self {
        Self {
            average: average(ratings.iter().copied()),
            count: ratings.len(),
        }
    }

    /// Badge text, `None` while the restaurant has no reviews.
    pub fn label(&self) -> Option<String> {
        self.average
            .map(|average| format!("{:.1} ({})", average, self.count))
    }
}
