// Review operations. Reviews hang off one parent entity (hotel, flight,
// package or destination); creating one requires the parent and the author
// to exist, and deletion is restricted to the author.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::models::{Review, ReviewTarget};
use crate::presenter::{review_view, Presenter, ReviewView};
use crate::store::TravelStore;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewError {
    #[error("{kind} {id} not found")]
    TargetNotFound { kind: &'static str, id: u64 },

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("user {0} not found")]
    AuthorNotFound(u64),

    #[error("review {0} not found")]
    NotFound(u64),

    #[error("review {0} belongs to another user")]
    NotAuthor(u64),
}

pub struct ReviewService {
    store: Arc<TravelStore>,
    presenter: Presenter,
}

impl ReviewService {
    pub fn new(store: Arc<TravelStore>) -> Self {
        let presenter = Presenter::new(Arc::clone(&store));
        Self { store, presenter }
    }

    fn target_exists(&self, target: ReviewTarget) -> bool {
        match target {
            ReviewTarget::Hotel(id) => self.store.hotel(id).is_some(),
            ReviewTarget::Flight(id) => self.store.flight(id).is_some(),
            ReviewTarget::Package(id) => self.store.package(id).is_some(),
            ReviewTarget::Destination(id) => self.store.destination(id).is_some(),
        }
    }

    fn require_target(&self, target: ReviewTarget) -> Result<(), ReviewError> {
        if self.target_exists(target) {
            Ok(())
        } else {
            Err(ReviewError::TargetNotFound {
                kind: target.kind(),
                id: target.parent_id(),
            })
        }
    }

    /// Reviews for one parent, newest first, with authors resolved.
    pub fn list(&self, target: ReviewTarget) -> Result<Vec<ReviewView>, ReviewError> {
        self.require_target(target)?;
        Ok(self.presenter.review_views(target))
    }

    pub fn create(
        &self,
        target: ReviewTarget,
        user_id: u64,
        rating: u8,
        text: String,
    ) -> Result<ReviewView, ReviewError> {
        self.require_target(target)?;
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }
        let author = self
            .store
            .user(user_id)
            .ok_or(ReviewError::AuthorNotFound(user_id))?;

        let review = self.store.insert_review(Review {
            id: 0,
            target,
            user_id,
            rating,
            text,
            created_at: Utc::now(),
        });
        Ok(review_view(&review, Some(&author)))
    }

    /// Deletes a review. Only the author may remove their own review.
    pub fn delete(&self, review_id: u64, user_id: u64) -> Result<(), ReviewError> {
        let review = self
            .store
            .review(review_id)
            .ok_or(ReviewError::NotFound(review_id))?;
        if review.user_id != user_id {
            return Err(ReviewError::NotAuthor(review_id));
        }
        self.store.delete_review(review_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, User};
    use test_case::test_case;

    fn service_with_hotel() -> (ReviewService, u64, u64) {
        let store = Arc::new(TravelStore::new());
        let hotel = store.insert_hotel(Hotel {
            id: 0,
            name: "Sea Breeze".to_string(),
            location: "Goa".to_string(),
            star_rating: 4,
            amenities: String::new(),
            price_per_night: 8000.0,
            photo: None,
            gallery: None,
            description: String::new(),
            email: None,
            phone: None,
            website: None,
            policies: None,
            landmarks: None,
        });
        let user = store.insert_user(User {
            id: 0,
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            date_of_birth: None,
            gender: String::new(),
            is_verified: true,
            otp_code: String::new(),
        });
        (ReviewService::new(store), hotel.id, user.id)
    }

    #[test]
    fn test_create_and_list_resolves_author() {
        let (service, hotel_id, user_id) = service_with_hotel();
        let created = service
            .create(ReviewTarget::Hotel(hotel_id), user_id, 5, "Great stay".to_string())
            .unwrap();
        assert_eq!(created.user.as_ref().unwrap().username, "asha");

        let listed = service.list(ReviewTarget::Hotel(hotel_id)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].rating, 5);
    }

    #[test]
    fn test_create_rejects_missing_parent() {
        let (service, _, user_id) = service_with_hotel();
        let err = service
            .create(ReviewTarget::Hotel(999), user_id, 4, String::new())
            .unwrap_err();
        assert_eq!(err, ReviewError::TargetNotFound { kind: "hotel", id: 999 });
    }

    #[test_case(0)]
    #[test_case(6)]
    fn test_create_rejects_out_of_range_rating(rating: u8) {
        let (service, hotel_id, user_id) = service_with_hotel();
        let err = service
            .create(ReviewTarget::Hotel(hotel_id), user_id, rating, String::new())
            .unwrap_err();
        assert_eq!(err, ReviewError::InvalidRating(rating));
    }

    #[test]
    fn test_create_rejects_unknown_author() {
        let (service, hotel_id, _) = service_with_hotel();
        let err = service
            .create(ReviewTarget::Hotel(hotel_id), 777, 4, String::new())
            .unwrap_err();
        assert_eq!(err, ReviewError::AuthorNotFound(777));
    }

    #[test]
    fn test_delete_is_author_only() {
        let (service, hotel_id, user_id) = service_with_hotel();
        let review = service
            .create(ReviewTarget::Hotel(hotel_id), user_id, 3, "ok".to_string())
            .unwrap();

        let err = service.delete(review.id, user_id + 1).unwrap_err();
        assert_eq!(err, ReviewError::NotAuthor(review.id));

        service.delete(review.id, user_id).unwrap();
        assert!(service.list(ReviewTarget::Hotel(hotel_id)).unwrap().is_empty());
        assert_eq!(
            service.delete(review.id, user_id).unwrap_err(),
            ReviewError::NotFound(review.id)
        );
    }
}
