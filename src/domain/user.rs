use serde::{Deserialize, Serialize};

use crate::domain::types::{Slug, TagId, TagName, UserId, Username};

/// Account record owned by the external auth service, mirrored read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Entry of the shared tag vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub slug: Slug,
}

/// Tag name paired with its slug, ready to be upserted by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTag {
    pub name: TagName,
    pub slug: Slug,
}
