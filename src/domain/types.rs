//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A slug contained characters outside `[a-z0-9_-]`.
    #[error("{0} is not a valid slug")]
    InvalidSlug(String),
    /// Rating outside the accepted scale.
    #[error("rating must be between {min} and {max}")]
    RatingOutOfRange { min: i32, max: i32 },
    /// IP address could not be parsed.
    #[error("{0} is not a valid IP address")]
    InvalidIpAddress(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper returning the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(UserId, "Identifier of an account in the auth service.", "user_id");
id_newtype!(TagId, "Identifier of a tag.", "tag_id");
id_newtype!(CategoryId, "Identifier of a blog category.", "category_id");
id_newtype!(
    SubCategoryId,
    "Identifier of a blog subcategory.",
    "subcategory_id"
);
id_newtype!(PostId, "Identifier of a blog post.", "post_id");
id_newtype!(
    AdditionalImageId,
    "Identifier of an additional post image.",
    "additional_image_id"
);
id_newtype!(LikeId, "Identifier of a like.", "like_id");
id_newtype!(ReviewId, "Identifier of a review.", "review_id");
id_newtype!(PostViewId, "Identifier of a recorded post view.", "post_view_id");
id_newtype!(CompanyLogoId, "Identifier of a company logo.", "company_logo_id");
id_newtype!(QuestionId, "Identifier of a forum question.", "question_id");
id_newtype!(AnswerId, "Identifier of a forum answer.", "answer_id");
id_newtype!(
    FollowSectionId,
    "Identifier of a user's follow section.",
    "follow_section_id"
);

non_empty_string_newtype!(Username, "Login name of a user.", "username");
non_empty_string_newtype!(CategoryName, "Blog category name.", "category name");
non_empty_string_newtype!(
    SubCategoryName,
    "Blog subcategory name.",
    "subcategory name"
);
non_empty_string_newtype!(PostTitle, "Blog post title.", "title");
non_empty_string_newtype!(QuestionTitle, "Forum question title.", "question title");
non_empty_string_newtype!(AnswerContent, "Forum answer body.", "answer content");
non_empty_string_newtype!(CompanyName, "Company name shown with a logo.", "company name");

/// Tag name stored trimmed and lowercased so that upserts by name converge.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new_for_field(value, "tag name")?;
        Ok(Self(inner.as_str().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe identifier: non-empty, lowercase ASCII letters, digits, `-` and `_`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validates an already slugified value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString("slug"));
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if valid {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidSlug(value))
        }
    }

    /// Appends the `-n` disambiguation suffix.
    pub fn with_suffix(&self, counter: u32) -> Self {
        Self(format!("{}-{counter}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Number of recorded views of a post.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ViewCount(i32);

impl ViewCount {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("views"))
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl PartialEq<i32> for ViewCount {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

/// Review score on a 1..=5 scale.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::RatingOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Publication state of a blog post.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl Display for PostStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PostStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "post status: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for PostStatus {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Parsed client address used for anonymous view tracking.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct IpAddress(IpAddr);

impl IpAddress {
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        value
            .trim()
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidIpAddress(value.to_string()))
    }

    pub const fn get(self) -> IpAddr {
        self.0
    }
}

impl From<IpAddr> for IpAddress {
    fn from(value: IpAddr) -> Self {
        Self(value)
    }
}

impl Display for IpAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is viewing a post: a signed-in user, or an anonymous client address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewerIdentity {
    User(UserId),
    Ip(IpAddress),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = NonEmptyString::new("  title  ").unwrap();
        assert_eq!(value.as_str(), "title");
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = PostId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("post_id"));
    }

    #[test]
    fn tag_names_are_lowercased() {
        assert_eq!(TagName::new("  Rust ").unwrap().as_str(), "rust");
        assert!(TagName::new("   ").is_err());
    }

    #[test]
    fn slug_rejects_uppercase_and_spaces() {
        assert!(Slug::new("hello-world_2").is_ok());
        assert!(matches!(
            Slug::new("Hello World").unwrap_err(),
            TypeConstraintError::InvalidSlug(_)
        ));
        assert_eq!(
            Slug::new("").unwrap_err(),
            TypeConstraintError::EmptyString("slug")
        );
    }

    #[test]
    fn slug_suffix_appends_counter() {
        let slug = Slug::new("hello-world").unwrap();
        assert_eq!(slug.with_suffix(2).as_str(), "hello-world-2");
    }

    #[test]
    fn rating_is_bounded() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
    }

    #[test]
    fn post_status_round_trips_through_str() {
        assert_eq!(PostStatus::try_from("published").unwrap(), PostStatus::Published);
        assert_eq!(PostStatus::Draft.as_str(), "draft");
        assert!(PostStatus::try_from("archived").is_err());
    }

    #[test]
    fn views_cannot_be_negative() {
        assert_eq!(
            ViewCount::new(-1).unwrap_err(),
            TypeConstraintError::NegativeNumber("views")
        );
    }

    #[test]
    fn parses_ip_addresses() {
        assert!(IpAddress::parse(" 10.0.0.1 ").is_ok());
        assert!(IpAddress::parse("::1").is_ok());
        assert!(IpAddress::parse("unknown").is_err());
    }
}
