use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, Slug, SubCategoryId, SubCategoryName};

/// Top-level blog category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub font_awesome_icon: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub slug: Slug,
    pub font_awesome_icon: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable fields of a [`Category`]. The slug is stable once assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub name: CategoryName,
    pub font_awesome_icon: String,
    pub description: String,
}

/// Subcategory together with the name of its parent category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: SubCategoryName,
    pub slug: Slug,
    pub description: String,
    pub category_id: CategoryId,
    pub category_name: CategoryName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`SubCategory`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSubCategory {
    pub name: SubCategoryName,
    pub slug: Slug,
    pub description: String,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryUpdate {
    pub name: SubCategoryName,
    pub description: String,
    pub category_id: CategoryId,
}
