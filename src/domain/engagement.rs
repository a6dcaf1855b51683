//! Reader interactions with posts: likes, reviews, recorded views, plus the
//! company logo reference data shown next to them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyLogoId, CompanyName, LikeId, PostId, PostViewId, Rating, ReviewId, UserId,
};
use crate::domain::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub id: LikeId,
    pub post_id: PostId,
    pub user: User,
    pub created_at: NaiveDateTime,
}

/// Result of an insert-or-ignore on the `(post, user)` like key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Created,
    AlreadyLiked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub post_id: PostId,
    pub user: User,
    pub rating: Rating,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub post_id: PostId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

/// A counted view. Exactly one of `user_id` and `ip_address` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostView {
    pub id: PostViewId,
    pub post_id: PostId,
    pub user_id: Option<UserId>,
    pub ip_address: Option<String>,
    pub viewed_at: NaiveDateTime,
}

/// Result of recording a view for a viewer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Counted,
    AlreadyCounted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyLogo {
    pub id: CompanyLogoId,
    pub name: CompanyName,
    pub logo_svg: String,
}
