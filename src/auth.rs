//! Session identity issued by the shared auth service.
//!
//! The auth service stores the JSON encoded [`AuthenticatedUser`] claims as
//! the `actix-identity` id inside a cookie signed with the shared secret.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

/// Role granting write access to the taxonomy and to other users' posts.
pub const STAFF_ROLE: &str = "staff";

/// Claims of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Numeric user id, as issued by the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let id = self
            .sub
            .trim()
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("user id: {}", self.sub)))?;
        UserId::new(id)
    }

    pub fn is_staff(&self) -> bool {
        check_role(STAFF_ROLE, &self.roles)
    }
}

/// Check whether `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

fn user_from_request(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|e| ErrorUnauthorized(e.to_string()))?;
    let claims = identity
        .id()
        .map_err(|e| ErrorUnauthorized(e.to_string()))?;
    let user: AuthenticatedUser = serde_json::from_str(&claims).map_err(|e| {
        log::warn!("Rejected malformed identity claims: {e}");
        ErrorUnauthorized("invalid identity")
    })?;

    if user.exp < Utc::now().timestamp() {
        return Err(ErrorUnauthorized("session expired"));
    }

    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(user_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(sub: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: "reader@example.com".into(),
            name: "Reader".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    #[test]
    fn parses_user_id_from_subject() {
        assert_eq!(user("42", &[]).user_id().unwrap(), 42);
        assert!(user("abc", &[]).user_id().is_err());
        assert!(user("0", &[]).user_id().is_err());
    }

    #[test]
    fn staff_role_is_detected() {
        assert!(user("1", &["reader", STAFF_ROLE]).is_staff());
        assert!(!user("1", &["reader"]).is_staff());
    }
}
