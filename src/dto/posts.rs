use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::post::{AdditionalImage, PostDetail, PostSummary};
use crate::dto::categories::{CategoryDto, SubCategoryDto};
use crate::dto::users::{TagDto, UserSummaryDto};

/// Post as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostListDto {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub slug: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub category: CategoryDto,
    pub subcategory: Option<SubCategoryDto>,
    pub author: UserSummaryDto,
    pub status: String,
    pub views: i32,
    pub likes_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub tags: Vec<TagDto>,
    pub comments_count: i64,
}

impl From<PostSummary> for PostListDto {
    fn from(value: PostSummary) -> Self {
        let post = value.post;
        Self {
            id: post.id.get(),
            title: post.title.into_inner(),
            subtitle: post.subtitle,
            slug: post.slug.into_inner(),
            description: post.description,
            featured_image: post.featured_image,
            featured_image_url: post.featured_image_url,
            category: value.category.into(),
            subcategory: value.subcategory.map(Into::into),
            author: value.author.into(),
            status: post.status.as_str().to_string(),
            views: post.views.get(),
            likes_count: value.likes_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            tags: value.tags.into_iter().map(Into::into).collect(),
            comments_count: value.comments_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalImageDto {
    pub id: i32,
    pub additional_image: String,
    pub additional_image_url: Option<String>,
}

impl From<AdditionalImage> for AdditionalImageDto {
    fn from(value: AdditionalImage) -> Self {
        Self {
            id: value.id.get(),
            additional_image: value.additional_image,
            additional_image_url: value.additional_image_url,
        }
    }
}

/// Post detail: the listing fields plus gallery and content fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailDto {
    #[serde(flatten)]
    pub post: PostListDto,
    pub additional_images: Vec<AdditionalImageDto>,
    pub content_hash: Option<String>,
    pub image_hash: Option<String>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(value: PostDetail) -> Self {
        let content_hash = value.summary.post.content_hash.clone();
        let image_hash = value.summary.post.image_hash.clone();
        Self {
            post: value.summary.into(),
            additional_images: value.additional_images.into_iter().map(Into::into).collect(),
            content_hash,
            image_hash,
        }
    }
}
