use thiserror::Error;

/// Errors surfaced by the services and the boundary layer.
///
/// The localized-content and aggregate helpers never produce these: they
/// degrade to empty strings, `None` averages or `false` availability instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),

    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Rating {0} is out of range, expected a value between 1 and 5")]
    RatingOutOfRange(f64),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Menu not found: {0}")]
    MenuNotFound(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("User {user_id} is not the author of review {review_id}")]
    NotReviewAuthor { review_id: String, user_id: String },

    #[error("Coordinates of restaurant {0} are already set")]
    CoordinateAlreadySet(String),

    #[error("Malformed {table} row: {reason}")]
    MalformedRow { table: &'static str, reason: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Seed file error: {0}")]
    Seed(String),

    #[error("Actor mailbox error: {0}")]
    Mailbox(String),
}

impl From<actix::MailboxError> for AppError {
    fn from(error: actix::MailboxError) -> Self {
        AppError::Mailbox(error.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::InvalidTimeOfDay("25:00".to_string()).to_string(),
            "Invalid time of day '25:00', expected HH:MM"
        );
        assert_eq!(
            AppError::MalformedRow {
                table: "reviews",
                reason: "missing id".to_string()
            }
            .to_string(),
            "Malformed reviews row: missing id"
        );
    }

    #[test]
    fn test_mailbox_error_conversion() {
        let error: AppError = actix::MailboxError::Closed.into();
        assert!(matches!(error, AppError::Mailbox(_)));
    }
}
