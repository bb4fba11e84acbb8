use crate::api::{Review, ReviewId, ReviewPatch, UserId};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;
use crate::validation;

/// Reviews written by one user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MyReviews {
    pub reviews: Vec<Review>,
}

impl MyReviews {
    pub async fn load(client: &BookstoreClient, user_id: UserId) -> Result<Self, BookstoreError> {
        Ok(Self {
            reviews: client.get_reviews_by_user(user_id).await?,
        })
    }

    pub fn get(&self, review_id: ReviewId) -> Option<&Review> {
        self.reviews
            .iter()
            .find(|review| review.review_id == review_id)
    }

    /// The review disappears from the list only once the backend deleted it
    pub async fn delete(
        &mut self,
        client: &BookstoreClient,
        review_id: ReviewId,
    ) -> Result<(), BookstoreError> {
        self.ensure_present(review_id)?;
        client.delete_review(review_id).await?;
        self.reviews.retain(|review| review.review_id != review_id);
        Ok(())
    }

    /// Replaces the local entry with the copy the backend returned
    pub async fn edit(
        &mut self,
        client: &BookstoreClient,
        review_id: ReviewId,
        rating: u8,
        comment: &str,
    ) -> Result<&Review, BookstoreError> {
        self.ensure_present(review_id)?;
        validation::validate_review(rating, comment)?;

        let updated = client
            .patch_review(
                review_id,
                &ReviewPatch {
                    rating: Some(rating),
                    comment: Some(comment.trim().to_string()),
                },
            )
            .await?;

        let position = self
            .reviews
            .iter()
            .position(|review| review.review_id == updated.review_id)
            .ok_or_else(|| BookstoreError::NotFound(format!("Review {}", updated.review_id)))?;
        self.reviews[position] = updated;
        Ok(&self.reviews[position])
    }

    fn ensure_present(&self, review_id: ReviewId) -> Result<(), BookstoreError> {
        match self.get(review_id) {
            Some(_) => Ok(()),
            None => Err(BookstoreError::NotFound(format!("Review {review_id}"))),
        }
    }
}
