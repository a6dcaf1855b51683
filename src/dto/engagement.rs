use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::engagement::{CompanyLogo, Like, PostView, Review};
use crate::dto::users::UserSummaryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeDto {
    pub id: i32,
    /// Liked post id.
    pub post: i32,
    pub user: UserSummaryDto,
    pub created_at: NaiveDateTime,
}

impl From<Like> for LikeDto {
    fn from(value: Like) -> Self {
        Self {
            id: value.id.get(),
            post: value.post_id.get(),
            user: value.user.into(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub post: i32,
    pub user: UserSummaryDto,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.get(),
            post: value.post_id.get(),
            user: value.user.into(),
            rating: value.rating.get(),
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostViewDto {
    pub id: i32,
    pub post: i32,
    pub user: Option<i32>,
    pub ip_address: Option<String>,
    pub viewed_at: NaiveDateTime,
}

impl From<PostView> for PostViewDto {
    fn from(value: PostView) -> Self {
        Self {
            id: value.id.get(),
            post: value.post_id.get(),
            user: value.user_id.map(|id| id.get()),
            ip_address: value.ip_address,
            viewed_at: value.viewed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyLogoDto {
    pub id: i32,
    pub name: String,
    pub logo_svg: String,
}

impl From<CompanyLogo> for CompanyLogoDto {
    fn from(value: CompanyLogo) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            logo_svg: value.logo_svg,
        }
    }
}
