//! Error conversion glue between the domain, repository, form and service
//! layers.

use crate::domain::types::TypeConstraintError;
use crate::forms::categories::{CategoryInputError, SubCategoryInputError};
use crate::forms::engagement::EngagementInputError;
use crate::forms::forum::ForumFormError;
use crate::forms::posts::PostInputError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::ValidationError(message) => ServiceError::Form(message),
            RepositoryError::Database(_) | RepositoryError::Pool(_) => ServiceError::Internal,
        }
    }
}

impl From<CategoryInputError> for ServiceError {
    fn from(val: CategoryInputError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<SubCategoryInputError> for ServiceError {
    fn from(val: SubCategoryInputError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PostInputError> for ServiceError {
    fn from(val: PostInputError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<EngagementInputError> for ServiceError {
    fn from(val: EngagementInputError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ForumFormError> for ServiceError {
    fn from(val: ForumFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_service_errors() {
        assert_eq!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        );
        assert_eq!(
            ServiceError::from(RepositoryError::Conflict("slug".into())),
            ServiceError::Conflict("slug".into())
        );
        assert_eq!(
            ServiceError::from(RepositoryError::ValidationError("bad".into())),
            ServiceError::Form("bad".into())
        );
    }
}
