use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CategoryId, PostTitle, SubCategoryId, TagName, TypeConstraintError};

/// Body of post create and update requests.
///
/// Every field is optional so the same body serves partial updates; create
/// requires `title` and `category`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 300))]
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub featured_image: Option<String>,
    #[validate(url)]
    pub featured_image_url: Option<String>,
    /// Category id.
    pub category: Option<i32>,
    /// Subcategory id. An explicit `null` clears it on update.
    #[serde(default, deserialize_with = "explicit_null")]
    pub subcategory: Option<Option<i32>>,
    /// Flat list of tag names.
    pub tags_list: Option<Vec<String>>,
}

/// Validated post fields. `None` means "not supplied".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostPayload {
    pub title: Option<PostTitle>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    /// `Some(None)` asks to clear the subcategory.
    pub subcategory_id: Option<Option<SubCategoryId>>,
    /// Trimmed, lowercased and deduplicated, in submission order.
    pub tags: Option<Vec<TagName>>,
}

#[derive(Debug, Error)]
pub enum PostInputError {
    #[error("Post validation failed: {0}")]
    Validation(String),
    #[error("Post contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PostInputError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostInputError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Keep a present `null` apart from an absent field.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Normalise submitted tag names, dropping blanks and duplicates.
pub fn normalize_tags(names: Vec<String>) -> Vec<TagName> {
    let mut tags: Vec<TagName> = Vec::with_capacity(names.len());
    for name in names {
        let Ok(tag) = TagName::new(name) else {
            continue;
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<PostInput> for PostPayload {
    type Error = PostInputError;

    fn try_from(value: PostInput) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            title: value.title.map(PostTitle::new).transpose()?,
            subtitle: value.subtitle.map(|v| v.trim().to_string()),
            description: value.description,
            featured_image: optional_text(value.featured_image),
            featured_image_url: optional_text(value.featured_image_url),
            category_id: value.category.map(CategoryId::new).transpose()?,
            subcategory_id: value
                .subcategory
                .map(|id| id.map(SubCategoryId::new).transpose())
                .transpose()?,
            tags: value.tags_list.map(normalize_tags),
        })
    }
}
