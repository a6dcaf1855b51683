use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, SubCategory};
use crate::domain::types::{
    AdditionalImageId, CategoryId, PostId, PostStatus, PostTitle, Slug, SubCategoryId, UserId,
    ViewCount,
};
use crate::domain::user::{NewTag, Tag, User};

/// Blog post row without its relations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub subtitle: String,
    pub slug: Slug,
    pub description: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub status: PostStatus,
    pub views: ViewCount,
    pub category_id: CategoryId,
    pub subcategory_id: Option<SubCategoryId>,
    pub author_id: UserId,
    pub content_hash: Option<String>,
    pub image_hash: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A post with the relations and counters needed by list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostSummary {
    pub post: Post,
    pub category: Category,
    pub subcategory: Option<SubCategory>,
    pub author: User,
    pub tags: Vec<Tag>,
    pub likes_count: i64,
    pub comments_count: i64,
}

/// [`PostSummary`] extended with the gallery shown on the detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub additional_images: Vec<AdditionalImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalImage {
    pub id: AdditionalImageId,
    pub post_id: PostId,
    pub additional_image: String,
    pub additional_image_url: Option<String>,
}

/// Data required to insert a new [`Post`] together with its tag names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: PostTitle,
    pub subtitle: String,
    pub slug: Slug,
    pub description: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub status: PostStatus,
    pub category_id: CategoryId,
    pub subcategory_id: Option<SubCategoryId>,
    pub author_id: UserId,
    pub tags: Vec<NewTag>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update of a post. `None` leaves the stored value untouched;
/// `tags: Some(..)` replaces the whole tag set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<PostTitle>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    /// `Some(None)` clears the subcategory.
    pub subcategory_id: Option<Option<SubCategoryId>>,
    pub tags: Option<Vec<NewTag>>,
}
