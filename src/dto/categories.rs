use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::{Category, SubCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub font_awesome_icon: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
            font_awesome_icon: value.font_awesome_icon,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Parent category id.
    pub category: i32,
    pub category_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SubCategory> for SubCategoryDto {
    fn from(value: SubCategory) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
            description: value.description,
            category: value.category_id.get(),
            category_name: value.category_name.into_inner(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
