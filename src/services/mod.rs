use crate::auth::AuthenticatedUser;
use crate::domain::types::UserId;

pub mod categories;
pub mod engagement;
pub mod errors;
pub mod follow;
pub mod forum;
pub mod posts;
pub mod slug;

pub use errors::{ServiceError, ServiceResult};

/// Numeric id of the signed-in user.
pub(crate) fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Unauthorized
    })
}

pub(crate) fn ensure_staff(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Parse an optional numeric query value, treating garbage as absent.
pub(crate) fn parse_optional<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{AuthenticatedUser, STAFF_ROLE};

    pub fn reader(id: i32) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: id.to_string(),
            email: format!("user{id}@example.com"),
            name: format!("User {id}"),
            roles: vec![],
            exp: i64::MAX,
        }
    }

    pub fn staff(id: i32) -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec![STAFF_ROLE.to_string()],
            ..reader(id)
        }
    }
}
