use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryUpdate, NewCategory, NewSubCategory, SubCategoryUpdate};
use crate::domain::types::{
    CategoryId, CategoryName, Slug, SubCategoryName, TypeConstraintError,
};

/// Body of category create and update requests.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub font_awesome_icon: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPayload {
    pub name: CategoryName,
    pub font_awesome_icon: String,
    pub description: String,
}

impl CategoryPayload {
    pub fn into_new_category(self, slug: Slug) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            slug,
            font_awesome_icon: self.font_awesome_icon,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> CategoryUpdate {
        CategoryUpdate {
            name: self.name,
            font_awesome_icon: self.font_awesome_icon,
            description: self.description,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryInputError {
    #[error("Category validation failed: {0}")]
    Validation(String),
    #[error("Category contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryInputError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryInputError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryInput> for CategoryPayload {
    type Error = CategoryInputError;

    fn try_from(value: CategoryInput) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
            font_awesome_icon: value.font_awesome_icon.trim().to_string(),
            description: value.description.trim().to_string(),
        })
    }
}

/// Body of subcategory create and update requests.
#[derive(Debug, Deserialize, Validate)]
pub struct SubCategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Parent category id.
    #[validate(range(min = 1))]
    pub category: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryPayload {
    pub name: SubCategoryName,
    pub description: String,
    pub category_id: CategoryId,
}

impl SubCategoryPayload {
    pub fn into_new_subcategory(self, slug: Slug) -> NewSubCategory {
        let now = Utc::now().naive_utc();
        NewSubCategory {
            name: self.name,
            slug,
            description: self.description,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> SubCategoryUpdate {
        SubCategoryUpdate {
            name: self.name,
            description: self.description,
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubCategoryInputError {
    #[error("Subcategory validation failed: {0}")]
    Validation(String),
    #[error("Subcategory contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SubCategoryInputError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SubCategoryInputError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SubCategoryInput> for SubCategoryPayload {
    type Error = SubCategoryInputError;

    fn try_from(value: SubCategoryInput) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: SubCategoryName::new(value.name)?,
            description: value.description.trim().to_string(),
            category_id: CategoryId::new(value.category)?,
        })
    }
}
