use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    NewSubCategory as DomainNewSubCategory, SubCategory as DomainSubCategory,
};
use crate::domain::types::{CategoryName, Slug, SubCategoryName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub font_awesome_icon: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub font_awesome_icon: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `subcategories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subcategories)]
pub struct SubCategory {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::subcategories)]
pub struct NewSubCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            slug: Slug::new(category.slug)?,
            font_awesome_icon: category.font_awesome_icon,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            slug: category.slug.into_inner(),
            font_awesome_icon: category.font_awesome_icon,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Subcategories are always loaded together with their parent's name.
impl TryFrom<(SubCategory, String)> for DomainSubCategory {
    type Error = TypeConstraintError;

    fn try_from((subcategory, category_name): (SubCategory, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: subcategory.id.try_into()?,
            name: SubCategoryName::new(subcategory.name)?,
            slug: Slug::new(subcategory.slug)?,
            description: subcategory.description,
            category_id: subcategory.category_id.try_into()?,
            category_name: CategoryName::new(category_name)?,
            created_at: subcategory.created_at,
            updated_at: subcategory.updated_at,
        })
    }
}

impl From<DomainNewSubCategory> for NewSubCategory {
    fn from(subcategory: DomainNewSubCategory) -> Self {
        Self {
            name: subcategory.name.into_inner(),
            slug: subcategory.slug.into_inner(),
            description: subcategory.description,
            category_id: subcategory.category_id.get(),
            created_at: subcategory.created_at,
            updated_at: subcategory.updated_at,
        }
    }
}
