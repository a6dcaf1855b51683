//! URL slugs derived from titles and names.

use deunicode::deunicode;

use crate::domain::types::{Slug, TypeConstraintError};
use crate::repository::{RepositoryError, RepositoryResult};

use super::{ServiceError, ServiceResult};

/// How often an insert is retried when a concurrent writer takes the slug
/// between the existence check and the insert.
pub const SLUG_RETRY_LIMIT: u32 = 5;

/// Turn `value` into a slug: lowercase ASCII letters, digits, `_` and
/// single `-` separators.
///
/// Non-ASCII text is transliterated first, so "Привет мир" becomes
/// `privet-mir`. Anything else that is not a letter, digit, whitespace, `-`
/// or `_` is dropped.
pub fn slugify(value: &str) -> Result<Slug, TypeConstraintError> {
    let ascii = deunicode(value).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut separator = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            separator = true;
        }
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_');
    if slug.is_empty() {
        return Err(TypeConstraintError::InvalidSlug(value.to_string()));
    }

    Slug::new(slug)
}

/// Slug for a title or name, using `fallback` when nothing in `value`
/// survives slugification (a title made only of punctuation, say).
pub fn slugify_or(value: &str, fallback: &str) -> Result<Slug, TypeConstraintError> {
    slugify(value).or_else(|_| slugify(fallback))
}

/// Return `base` if unused, else the first free `base-N` for N = 1, 2, ...
pub fn unique_slug<E>(
    base: &Slug,
    mut exists: impl FnMut(&Slug) -> Result<bool, E>,
) -> Result<Slug, E> {
    if !exists(base)? {
        return Ok(base.clone());
    }

    let mut counter = 1;
    loop {
        let candidate = base.with_suffix(counter);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Insert a record under a unique slug derived from `base`.
///
/// A unique violation reported by `insert` means another writer took the
/// slug first; a fresh slug is computed and the insert repeated up to
/// [`SLUG_RETRY_LIMIT`] times.
pub(crate) fn insert_with_unique_slug<T>(
    base: &Slug,
    entity: &str,
    mut exists: impl FnMut(&Slug) -> RepositoryResult<bool>,
    mut insert: impl FnMut(Slug) -> RepositoryResult<T>,
) -> ServiceResult<T> {
    for attempt in 1..=SLUG_RETRY_LIMIT {
        let slug = unique_slug(base, &mut exists).map_err(|e| {
            log::error!("Failed to check {entity} slug availability: {e}");
            ServiceError::Internal
        })?;

        match insert(slug) {
            Ok(created) => return Ok(created),
            Err(RepositoryError::Conflict(message)) => {
                log::warn!(
                    "Slug for {entity} was taken concurrently (attempt {attempt}): {message}"
                );
            }
            Err(e) => {
                log::error!("Failed to create {entity}: {e}");
                return Err(e.into());
            }
        }
    }

    Err(ServiceError::Conflict(format!(
        "could not allocate a unique slug for {entity} '{base}'"
    )))
}
