use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::engagement::NewReview;
use crate::domain::types::{PostId, Rating, TypeConstraintError, UserId};

/// Body of `POST /api/likes`.
#[derive(Debug, Deserialize, Validate)]
pub struct LikeInput {
    #[validate(range(min = 1))]
    pub post: i32,
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(range(min = 1))]
    pub post: i32,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPayload {
    pub post_id: PostId,
    pub rating: Rating,
    pub comment: String,
}

impl ReviewPayload {
    pub fn into_new_review(self, user_id: UserId) -> NewReview {
        NewReview {
            post_id: self.post_id,
            user_id,
            rating: self.rating,
            comment: self.comment,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngagementInputError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for EngagementInputError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for EngagementInputError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LikeInput> for PostId {
    type Error = EngagementInputError;

    fn try_from(value: LikeInput) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(PostId::new(value.post)?)
    }
}

impl TryFrom<ReviewInput> for ReviewPayload {
    type Error = EngagementInputError;

    fn try_from(value: ReviewInput) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            post_id: PostId::new(value.post)?,
            rating: Rating::new(value.rating)?,
            comment: value.comment.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_outside_scale_is_rejected() {
        let result = ReviewPayload::try_from(ReviewInput {
            post: 1,
            rating: 6,
            comment: String::new(),
        });
        assert!(matches!(result, Err(EngagementInputError::Validation(_))));
    }

    #[test]
    fn like_input_yields_post_id() {
        let post_id = PostId::try_from(LikeInput { post: 3 }).unwrap();
        assert_eq!(post_id, 3);
        assert!(PostId::try_from(LikeInput { post: 0 }).is_err());
    }
}
