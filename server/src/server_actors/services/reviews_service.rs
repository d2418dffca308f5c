use crate::server_actors::storage::Storage;
use actix::prelude::*;
use chrono::Utc;
use colored::Color;
use common::aggregates::rating::validate_rating;
use common::error::{AppError, AppResult};
use common::localization::{Language, TranslationMap};
use common::logger::Logger;
use common::messages::internal_messages::{
    GetReview, GetReviewsWithAuthors, InsertReview, RecomputeRestaurantRating, RemoveReview,
    ReplaceReview,
};
use common::messages::{CreateReview, DeleteReview, GetRestaurantReviews, UpdateReview};
use common::types::dtos::ReviewDTO;
use common::types::views::ReviewView;
use uuid::Uuid;

/// The `ReviewsService` actor handles review mutations and keeps restaurant
/// ratings in step with them.
///
/// ## Responsibilities:
/// - Validate ratings and authorship before writing to the storage.
/// - Merge comment edits into the existing translations.
/// - After a create, a rating change or a delete has been stored, ask the
///   storage to recompute the restaurant's average without waiting for it.
pub struct ReviewsService {
    /// The address of the Storage actor.
    pub storage_addr: Addr<Storage>,
    /// Language used when a review has no text in the requested one.
    pub fallback_language: Language,
    /// Logger instance for events
    pub logger: Logger,
}

impl ReviewsService {
    pub fn new(storage_addr: Addr<Storage>, fallback_language: Language) -> Self {
        ReviewsService {
            storage_addr,
            fallback_language,
            logger: Logger::new("Reviews Service", Color::Magenta),
        }
    }
}

async fn fetch_own_review(
    storage_addr: &Addr<Storage>,
    review_id: &str,
    user_id: &str,
) -> AppResult<ReviewDTO> {
    let review = storage_addr
        .send(GetReview {
            review_id: review_id.to_string(),
        })
        .await?
        .ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))?;
    if review.user_id != user_id {
        return Err(AppError::NotReviewAuthor {
            review_id: review_id.to_string(),
            user_id: user_id.to_string(),
        });
    }
    Ok(review)
}

impl Actor for ReviewsService {
    type Context = Context<Self>;
}

impl Handler<CreateReview> for ReviewsService {
    type Result = ResponseFuture<AppResult<ReviewDTO>>;

    fn handle(&mut self, msg: CreateReview, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let rating = validate_rating(msg.rating)?;
            let review = ReviewDTO {
                review_id: Uuid::new_v4().to_string(),
                restaurant_id: msg.restaurant_id,
                user_id: msg.user_id,
                rating,
                comment: TranslationMap::single(msg.language.tag(), msg.comment),
                created_at: Utc::now(),
                updated_at: None,
            };
            storage_addr
                .send(InsertReview {
                    review: review.clone(),
                })
                .await??;
            logger.info(format!(
                "Review {} created for restaurant {}",
                review.review_id, review.restaurant_id
            ));

            storage_addr.do_send(RecomputeRestaurantRating {
                restaurant_id: review.restaurant_id.clone(),
            });
            Ok(review)
        })
    }
}

impl Handler<UpdateReview> for ReviewsService {
    type Result = ResponseFuture<AppResult<ReviewDTO>>;

    fn handle(&mut self, msg: UpdateReview, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let rating = msg.rating.map(validate_rating).transpose()?;
            let current = fetch_own_review(&storage_addr, &msg.review_id, &msg.user_id).await?;

            let mut updated = current.clone();
            if let Some(rating) = rating {
                updated.rating = rating;
            }
            if let Some(comment) = &msg.comment {
                updated.comment = current.comment.merged(comment, msg.language.tag());
            }
            updated.updated_at = Some(Utc::now());

            storage_addr
                .send(ReplaceReview {
                    review: updated.clone(),
                })
                .await??;
            logger.info(format!("Review {} updated", updated.review_id));

            if updated.rating != current.rating {
                storage_addr.do_send(RecomputeRestaurantRating {
                    restaurant_id: updated.restaurant_id.clone(),
                });
            }
            Ok(updated)
        })
    }
}

impl Handler<DeleteReview> for ReviewsService {
    type Result = ResponseFuture<AppResult<()>>;

    fn handle(&mut self, msg: DeleteReview, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            fetch_own_review(&storage_addr, &msg.review_id, &msg.user_id).await?;
            let removed = storage_addr
                .send(RemoveReview {
                    review_id: msg.review_id,
                })
                .await??;
            logger.info(format!("Review {} deleted", removed.review_id));

            storage_addr.do_send(RecomputeRestaurantRating {
                restaurant_id: removed.restaurant_id,
            });
            Ok(())
        })
    }
}

impl Handler<GetRestaurantReviews> for ReviewsService {
    type Result = ResponseFuture<Vec<ReviewView>>;

    fn handle(&mut self, msg: GetRestaurantReviews, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();
        let fallback = self.fallback_language;

        Box::pin(async move {
            match storage_addr
                .send(GetReviewsWithAuthors {
                    restaurant_id: msg.restaurant_id.clone(),
                })
                .await
            {
                Ok((reviews, authors)) => reviews
                    .iter()
                    .map(|review| {
                        let author = authors
                            .iter()
                            .find(|profile| profile.user_id == review.user_id);
                        ReviewView::localize(review, author, msg.language, fallback)
                    })
                    .collect(),
                Err(e) => {
                    logger.error(format!(
                        "Error retrieving reviews of restaurant {}: {}",
                        msg.restaurant_id, e
                    ));
                    Vec::new()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server_actors::storage::tests::test_restaurant;
    use common::messages::internal_messages::{
        GetLogsFromIndex, GetRestaurant, InsertProfile, InsertRestaurant, StorageLogMessage,
    };
    use common::types::dtos::ProfileDTO;

    async fn setup() -> (Addr<Storage>, Addr<ReviewsService>) {
        let storage = Storage::new().start();
        storage
            .send(InsertRestaurant {
                restaurant: test_restaurant("r1", 0),
            })
            .await
            .unwrap();
        let reviews = ReviewsService::new(storage.clone(), Language::Spanish).start();
        (storage, reviews)
    }

    fn create(rating: f64, user_id: &str) -> CreateReview {
        CreateReview {
            restaurant_id: "r1".to_string(),
            user_id: user_id.to_string(),
            rating,
            comment: "Muy rico".to_string(),
            language: Language::Spanish,
        }
    }

    async fn average_rating(storage: &Addr<Storage>) -> (Option<f64>, usize) {
        let restaurant = storage
            .send(GetRestaurant {
                restaurant_id: "r1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        (restaurant.average_rating, restaurant.review_count)
    }

    #[actix_rt::test]
    async fn test_average_recomputed_after_each_creation() {
        let (storage, reviews) = setup().await;

        let mut averages = Vec::new();
        for (rating, user) in [(5.0, "u1"), (4.0, "u2"), (3.0, "u3")] {
            reviews.send(create(rating, user)).await.unwrap().unwrap();
            averages.push(average_rating(&storage).await);
        }
        assert_eq!(
            averages,
            vec![(Some(5.0), 1), (Some(4.5), 2), (Some(4.0), 3)]
        );

        let recomputes = storage
            .send(GetLogsFromIndex { index: 1 })
            .await
            .unwrap()
            .into_values()
            .filter(|log| matches!(log, StorageLogMessage::SetRestaurantRating(_)))
            .count();
        assert_eq!(recomputes, 3);
    }

    #[actix_rt::test]
    async fn test_create_rejects_out_of_range_rating() {
        let (storage, reviews) = setup().await;
        let result = reviews.send(create(6.0, "u1")).await.unwrap();
        assert_eq!(result, Err(AppError::RatingOutOfRange(6.0)));
        assert_eq!(average_rating(&storage).await, (None, 0));
    }

    #[actix_rt::test]
    async fn test_create_for_unknown_restaurant() {
        let (_storage, reviews) = setup().await;
        let mut msg = create(4.0, "u1");
        msg.restaurant_id = "r404".to_string();
        let result = reviews.send(msg).await.unwrap();
        assert_eq!(result, Err(AppError::RestaurantNotFound("r404".to_string())));
    }

    #[actix_rt::test]
    async fn test_update_merges_comment_and_recomputes_rating() {
        let (storage, reviews) = setup().await;
        let review = reviews.send(create(2.0, "u1")).await.unwrap().unwrap();

        let updated = reviews
            .send(UpdateReview {
                review_id: review.review_id.clone(),
                user_id: "u1".to_string(),
                rating: Some(4.0),
                comment: Some("Very tasty".to_string()),
                language: Language::English,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.comment.get("es_ES"), Some("Muy rico"));
        assert_eq!(updated.comment.get("en_US"), Some("Very tasty"));
        assert!(updated.updated_at.is_some());
        assert_eq!(average_rating(&storage).await, (Some(4.0), 1));
    }

    #[actix_rt::test]
    async fn test_comment_only_update_does_not_recompute() {
        let (storage, reviews) = setup().await;
        let review = reviews.send(create(3.0, "u1")).await.unwrap().unwrap();
        let before = storage.send(GetLogsFromIndex { index: 1 }).await.unwrap().len();

        reviews
            .send(UpdateReview {
                review_id: review.review_id,
                user_id: "u1".to_string(),
                rating: Some(3.0),
                comment: Some("Correcte".to_string()),
                language: Language::Catalan,
            })
            .await
            .unwrap()
            .unwrap();

        let logs = storage.send(GetLogsFromIndex { index: 1 }).await.unwrap();
        assert_eq!(logs.len(), before + 1);
        assert!(matches!(
            logs.values().last(),
            Some(StorageLogMessage::ReplaceReview(_))
        ));
    }

    #[actix_rt::test]
    async fn test_only_author_can_edit_or_delete() {
        let (_storage, reviews) = setup().await;
        let review = reviews.send(create(3.0, "u1")).await.unwrap().unwrap();
        let expected = Err(AppError::NotReviewAuthor {
            review_id: review.review_id.clone(),
            user_id: "intruder".to_string(),
        });

        let update = reviews
            .send(UpdateReview {
                review_id: review.review_id.clone(),
                user_id: "intruder".to_string(),
                rating: Some(1.0),
                comment: None,
                language: Language::Spanish,
            })
            .await
            .unwrap();
        assert_eq!(update.map(|_| ()), expected);

        let delete = reviews
            .send(DeleteReview {
                review_id: review.review_id.clone(),
                user_id: "intruder".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(delete, expected);
    }

    #[actix_rt::test]
    async fn test_delete_recomputes_rating() {
        let (storage, reviews) = setup().await;
        let first = reviews.send(create(5.0, "u1")).await.unwrap().unwrap();
        reviews.send(create(2.0, "u2")).await.unwrap().unwrap();
        assert_eq!(average_rating(&storage).await, (Some(3.5), 2));

        reviews
            .send(DeleteReview {
                review_id: first.review_id,
                user_id: "u1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(average_rating(&storage).await, (Some(2.0), 1));

        let missing = reviews
            .send(DeleteReview {
                review_id: "gone".to_string(),
                user_id: "u1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(missing, Err(AppError::ReviewNotFound("gone".to_string())));
    }

    #[actix_rt::test]
    async fn test_reviews_localized_with_author_names() {
        let (storage, reviews) = setup().await;
        storage
            .send(InsertProfile {
                profile: ProfileDTO {
                    user_id: "u1".to_string(),
                    username: "marta".to_string(),
                    preferred_language: Language::Catalan,
                    avatar_url: None,
                },
            })
            .await
            .unwrap();
        reviews.send(create(4.0, "u1")).await.unwrap().unwrap();

        let views = reviews
            .send(GetRestaurantReviews {
                restaurant_id: "r1".to_string(),
                language: Language::French,
            })
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].author_name, "marta");
        assert_eq!(views[0].comment, "Muy rico");
    }
}
