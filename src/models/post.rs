use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{AdditionalImage as DomainAdditionalImage, Post as DomainPost};
use crate::domain::types::{PostStatus, PostTitle, Slug, TypeConstraintError, ViewCount};

/// Diesel model representing the `blog_posts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::blog_posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub slug: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub status: String,
    pub views: i32,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub author_id: i32,
    pub content_hash: Option<String>,
    pub image_hash: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Post`]; `views` starts at the column default.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::blog_posts)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub featured_image: Option<&'a str>,
    pub featured_image_url: Option<&'a str>,
    pub status: &'a str,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patch applied by post updates; `None` fields are skipped by Diesel.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::blog_posts)]
pub struct PostChangeset<'a> {
    pub title: Option<&'a str>,
    pub subtitle: Option<&'a str>,
    pub description: Option<&'a str>,
    pub featured_image: Option<&'a str>,
    pub featured_image_url: Option<&'a str>,
    pub category_id: Option<i32>,
    /// `Some(None)` writes NULL.
    pub subcategory_id: Option<Option<i32>>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::blog_additional_images)]
pub struct AdditionalImage {
    pub id: i32,
    pub post_id: i32,
    pub additional_image: String,
    pub additional_image_url: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::blog_post_tags)]
pub struct PostTag {
    pub post_id: i32,
    pub tag_id: i32,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            title: PostTitle::new(post.title)?,
            subtitle: post.subtitle,
            slug: Slug::new(post.slug)?,
            description: post.description,
            featured_image: post.featured_image,
            featured_image_url: post.featured_image_url,
            status: PostStatus::try_from(post.status)?,
            views: ViewCount::new(post.views)?,
            category_id: post.category_id.try_into()?,
            subcategory_id: post.subcategory_id.map(TryInto::try_into).transpose()?,
            author_id: post.author_id.try_into()?,
            content_hash: post.content_hash,
            image_hash: post.image_hash,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

impl TryFrom<AdditionalImage> for DomainAdditionalImage {
    type Error = TypeConstraintError;

    fn try_from(image: AdditionalImage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: image.id.try_into()?,
            post_id: image.post_id.try_into()?,
            additional_image: image.additional_image,
            additional_image_url: image.additional_image_url,
        })
    }
}
