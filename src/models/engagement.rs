use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::engagement::{
    CompanyLogo as DomainCompanyLogo, Like as DomainLike, PostView as DomainPostView,
    Review as DomainReview,
};
use crate::domain::types::{CompanyName, Rating, TypeConstraintError};
use crate::models::user::User;

/// Diesel model representing the `likes` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::likes)]
pub struct Like {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::likes)]
pub struct NewLike {
    pub post_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub post_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::post_view_ips)]
pub struct PostView {
    pub id: i32,
    pub post_id: i32,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub viewed_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::post_view_ips)]
pub struct NewPostView {
    pub post_id: i32,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub viewed_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::company_logos)]
pub struct CompanyLogo {
    pub id: i32,
    pub name: String,
    pub logo_svg: String,
}

impl TryFrom<(Like, User)> for DomainLike {
    type Error = TypeConstraintError;

    fn try_from((like, user): (Like, User)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: like.id.try_into()?,
            post_id: like.post_id.try_into()?,
            user: user.try_into()?,
            created_at: like.created_at,
        })
    }
}

impl TryFrom<(Review, User)> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from((review, user): (Review, User)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: review.id.try_into()?,
            post_id: review.post_id.try_into()?,
            user: user.try_into()?,
            rating: Rating::new(review.rating)?,
            comment: review.comment,
            created_at: review.created_at,
        })
    }
}

impl TryFrom<PostView> for DomainPostView {
    type Error = TypeConstraintError;

    fn try_from(view: PostView) -> Result<Self, Self::Error> {
        Ok(Self {
            id: view.id.try_into()?,
            post_id: view.post_id.try_into()?,
            user_id: view.user_id.map(TryInto::try_into).transpose()?,
            ip_address: view.ip_address,
            viewed_at: view.viewed_at,
        })
    }
}

impl TryFrom<CompanyLogo> for DomainCompanyLogo {
    type Error = TypeConstraintError;

    fn try_from(logo: CompanyLogo) -> Result<Self, Self::Error> {
        Ok(Self {
            id: logo.id.try_into()?,
            name: CompanyName::new(logo.name)?,
            logo_svg: logo.logo_svg,
        })
    }
}
