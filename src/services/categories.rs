use crate::auth::AuthenticatedUser;
use crate::dto::categories::{CategoryDto, SubCategoryDto};
use crate::forms::categories::{CategoryPayload, SubCategoryPayload};
use crate::repository::{CategoryReader, CategoryWriter, SubCategoryReader, SubCategoryWriter};
use crate::services::slug::{insert_with_unique_slug, slugify_or};

use super::{ServiceError, ServiceResult, ensure_staff};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_category<R>(slug: &str, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    match repo.get_category_by_slug(slug) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_category<R>(
    payload: CategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_staff(user)?;

    let base = slugify_or(payload.name.as_str(), "category")?;
    let category = insert_with_unique_slug(
        &base,
        "category",
        |slug| repo.category_slug_exists(slug),
        |slug| repo.create_category(&payload.clone().into_new_category(slug)),
    )?;

    log::info!("Category '{}' created by {}", category.slug, user.email);

    Ok(category.into())
}

pub fn update_category<R>(
    slug: &str,
    payload: CategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_staff(user)?;

    let category = match repo.get_category_by_slug(slug) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if let Err(e) = repo.update_category(category.id, &payload.into_update()) {
        log::error!("Failed to update category: {e}");
        return Err(e.into());
    }

    match repo.get_category_by_id(category.id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to reload category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_category<R>(slug: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_staff(user)?;

    let category = match repo.get_category_by_slug(slug) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.delete_category(category.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_subcategories<R>(category: Option<&str>, repo: &R) -> ServiceResult<Vec<SubCategoryDto>>
where
    R: SubCategoryReader,
{
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    match repo.list_subcategories(category) {
        Ok(items) => Ok(items.into_iter().map(SubCategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list subcategories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_subcategory<R>(slug: &str, repo: &R) -> ServiceResult<SubCategoryDto>
where
    R: SubCategoryReader,
{
    match repo.get_subcategory_by_slug(slug) {
        Ok(Some(subcategory)) => Ok(subcategory.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get subcategory: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_parent_exists<R>(payload: &SubCategoryPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(format!(
            "category {} does not exist",
            payload.category_id
        ))),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_subcategory<R>(
    payload: SubCategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SubCategoryDto>
where
    R: CategoryReader + SubCategoryReader + SubCategoryWriter,
{
    ensure_staff(user)?;
    ensure_parent_exists(&payload, repo)?;

    let base = slugify_or(payload.name.as_str(), "subcategory")?;
    let subcategory = insert_with_unique_slug(
        &base,
        "subcategory",
        |slug| repo.subcategory_slug_exists(slug),
        |slug| repo.create_subcategory(&payload.clone().into_new_subcategory(slug)),
    )?;

    Ok(subcategory.into())
}

pub fn update_subcategory<R>(
    slug: &str,
    payload: SubCategoryPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SubCategoryDto>
where
    R: CategoryReader + SubCategoryReader + SubCategoryWriter,
{
    ensure_staff(user)?;

    let subcategory = match repo.get_subcategory_by_slug(slug) {
        Ok(Some(subcategory)) => subcategory,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get subcategory: {e}");
            return Err(ServiceError::Internal);
        }
    };

    ensure_parent_exists(&payload, repo)?;

    if let Err(e) = repo.update_subcategory(subcategory.id, &payload.into_update()) {
        log::error!("Failed to update subcategory: {e}");
        return Err(e.into());
    }

    match repo.get_subcategory_by_id(subcategory.id) {
        Ok(Some(subcategory)) => Ok(subcategory.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to reload subcategory: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_subcategory<R>(slug: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: SubCategoryReader + SubCategoryWriter,
{
    ensure_staff(user)?;

    let subcategory = match repo.get_subcategory_by_slug(slug) {
        Ok(Some(subcategory)) => subcategory,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get subcategory: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.delete_subcategory(subcategory.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete subcategory: {e}");
            Err(ServiceError::Internal)
        }
    }
}
