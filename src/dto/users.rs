use serde::Serialize;

use crate::domain::user::{Tag, User};

/// Public fields of a user shown next to their content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummaryDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSummaryDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.into_inner(),
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagDto {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
        }
    }
}
