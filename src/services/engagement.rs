use crate::auth::AuthenticatedUser;
use crate::domain::engagement::{LikeOutcome, ViewOutcome};
use crate::domain::types::{
    CompanyLogoId, IpAddress, LikeId, PostId, PostStatus, ReviewId, ViewerIdentity,
};
use crate::dto::engagement::{CompanyLogoDto, LikeDto, PostViewDto, ReviewDto};
use crate::forms::engagement::ReviewPayload;
use crate::repository::{
    CompanyLogoReader, LikeReader, LikeWriter, PostReader, ReviewReader, ReviewWriter,
    ViewReader, ViewWriter,
};
use crate::services::posts::find_published_post;

use super::{ServiceError, ServiceResult, current_user_id};

fn ensure_post_exists<R>(post_id: PostId, repo: &R) -> ServiceResult<()>
where
    R: PostReader,
{
    match repo.get_post_by_id(post_id, Some(PostStatus::Published)) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(format!("post {post_id} does not exist"))),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Like the published post `slug` on behalf of `user`. Liking twice keeps a
/// single like.
pub fn like_post<R>(slug: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<LikeOutcome>
where
    R: PostReader + LikeWriter,
{
    let user_id = current_user_id(user)?;
    let post = find_published_post(slug, repo)?;

    match repo.like_post(post.id, user_id) {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            log::error!("Failed to like post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Remove the user's like. Returns `false` when there was nothing to remove.
pub fn unlike_post<R>(slug: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<bool>
where
    R: PostReader + LikeWriter,
{
    let user_id = current_user_id(user)?;
    let post = find_published_post(slug, repo)?;

    match repo.unlike_post(post.id, user_id) {
        Ok(removed) => Ok(removed > 0),
        Err(e) => {
            log::error!("Failed to unlike post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_post_likes<R>(slug: &str, repo: &R) -> ServiceResult<Vec<LikeDto>>
where
    R: PostReader + LikeReader,
{
    let post = find_published_post(slug, repo)?;
    match repo.list_likes_for_post(post.id) {
        Ok(likes) => Ok(likes.into_iter().map(LikeDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list likes: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_post_views<R>(slug: &str, repo: &R) -> ServiceResult<Vec<PostViewDto>>
where
    R: PostReader + ViewReader,
{
    let post = find_published_post(slug, repo)?;
    match repo.list_post_views(post.id) {
        Ok(views) => Ok(views.into_iter().map(PostViewDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list post views: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Identify a viewer by account when signed in, else by client address.
pub fn resolve_viewer(
    user: Option<&AuthenticatedUser>,
    client_ip: Option<&str>,
) -> ServiceResult<ViewerIdentity> {
    if let Some(id) = user.and_then(|u| u.user_id().ok()) {
        return Ok(ViewerIdentity::User(id));
    }

    match client_ip.map(IpAddress::parse) {
        Some(Ok(ip)) => Ok(ViewerIdentity::Ip(ip)),
        Some(Err(e)) => {
            log::warn!("Rejected view with unusable client address: {e}");
            Err(ServiceError::Form("unable to identify viewer".into()))
        }
        None => Err(ServiceError::Form("unable to identify viewer".into())),
    }
}

/// Count a view of `slug` once per viewer identity.
pub fn record_view<R>(
    slug: &str,
    user: Option<&AuthenticatedUser>,
    client_ip: Option<&str>,
    repo: &R,
) -> ServiceResult<ViewOutcome>
where
    R: PostReader + ViewWriter,
{
    let viewer = resolve_viewer(user, client_ip)?;
    let post = find_published_post(slug, repo)?;

    match repo.record_view(post.id, viewer) {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            log::error!("Failed to record view: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_my_likes<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<LikeDto>>
where
    R: LikeReader,
{
    let user_id = current_user_id(user)?;
    match repo.list_likes_for_user(user_id) {
        Ok(likes) => Ok(likes.into_iter().map(LikeDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list likes: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Like a post by id, returning the stored like whether new or existing.
pub fn create_like<R>(
    post_id: PostId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(LikeOutcome, LikeDto)>
where
    R: PostReader + LikeReader + LikeWriter,
{
    let user_id = current_user_id(user)?;
    ensure_post_exists(post_id, repo)?;

    let outcome = match repo.like_post(post_id, user_id) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Failed to like post: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.find_like(post_id, user_id) {
        Ok(Some(like)) => Ok((outcome, like.into())),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load like: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A like owned by `user`. Likes of other users are reported as missing.
pub fn get_like<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<LikeDto>
where
    R: LikeReader,
{
    let user_id = current_user_id(user)?;
    let Ok(id) = LikeId::new(id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_like(id) {
        Ok(Some(like)) if like.user.id == user_id => Ok(like.into()),
        Ok(_) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get like: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_like<R>(id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: LikeWriter,
{
    let user_id = current_user_id(user)?;
    let Ok(id) = LikeId::new(id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.delete_like(id, user_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete like: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Reviews newest first, optionally only those of the post `post_slug`.
pub fn list_reviews<R>(post_slug: Option<&str>, repo: &R) -> ServiceResult<Vec<ReviewDto>>
where
    R: ReviewReader,
{
    let post_slug = post_slug.map(str::trim).filter(|s| !s.is_empty());
    match repo.list_reviews(post_slug) {
        Ok(reviews) => Ok(reviews.into_iter().map(ReviewDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list reviews: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_review<R>(id: i32, repo: &R) -> ServiceResult<ReviewDto>
where
    R: ReviewReader,
{
    let Ok(id) = ReviewId::new(id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_review(id) {
        Ok(Some(review)) => Ok(review.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get review: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_review<R>(
    payload: ReviewPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ReviewDto>
where
    R: PostReader + ReviewWriter,
{
    let user_id = current_user_id(user)?;
    ensure_post_exists(payload.post_id, repo)?;

    match repo.create_review(&payload.into_new_review(user_id)) {
        Ok(review) => Ok(review.into()),
        Err(e) => {
            log::error!("Failed to create review: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn list_company_logos<R>(repo: &R) -> ServiceResult<Vec<CompanyLogoDto>>
where
    R: CompanyLogoReader,
{
    match repo.list_company_logos() {
        Ok(logos) => Ok(logos.into_iter().map(CompanyLogoDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list company logos: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_company_logo<R>(id: i32, repo: &R) -> ServiceResult<CompanyLogoDto>
where
    R: CompanyLogoReader,
{
    let Ok(id) = CompanyLogoId::new(id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_company_logo(id) {
        Ok(Some(logo)) => Ok(logo.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get company logo: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engagement::CompanyLogo;
    use crate::domain::types::{CompanyName, Rating};
    use crate::repository::test::{TestRepository, sample_category, sample_post, sample_user};
    use crate::services::test_support::reader;

    fn repo() -> TestRepository {
        TestRepository::new(vec![sample_user(1), sample_user(2)])
            .with_categories(vec![sample_category(1, "travel")])
            .with_posts(vec![sample_post(1, "trip", 1, 1)])
    }

    #[test]
    fn like_flow_keeps_a_single_like() {
        let repo = repo();
        let user = reader(2);

        assert_eq!(like_post("trip", &user, &repo), Ok(LikeOutcome::Created));
        assert_eq!(like_post("trip", &user, &repo), Ok(LikeOutcome::AlreadyLiked));
        assert_eq!(repo.likes_count(), 1);

        assert_eq!(unlike_post("trip", &user, &repo), Ok(true));
        assert_eq!(unlike_post("trip", &user, &repo), Ok(false));
        assert_eq!(repo.likes_count(), 0);

        assert_eq!(like_post("missing", &user, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn create_like_returns_existing_like_on_repeat() {
        let repo = repo();
        let post_id = PostId::new(1).unwrap();

        let (first, created) = create_like(post_id, &reader(2), &repo).unwrap();
        let (second, existing) = create_like(post_id, &reader(2), &repo).unwrap();

        assert_eq!(first, LikeOutcome::Created);
        assert_eq!(second, LikeOutcome::AlreadyLiked);
        assert_eq!(created.id, existing.id);
        assert!(matches!(
            create_like(PostId::new(99).unwrap(), &reader(2), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn drafts_cannot_be_liked_by_id() {
        let mut draft = sample_post(2, "draft", 1, 1);
        draft.status = PostStatus::Draft;
        let repo = repo().with_posts(vec![draft]);

        assert!(matches!(
            create_like(PostId::new(2).unwrap(), &reader(2), &repo),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(repo.likes_count(), 0);

        let (_, like) = create_like(PostId::new(1).unwrap(), &reader(2), &repo).unwrap();
        assert_eq!(like.post, 1);
    }

    #[test]
    fn likes_are_private_to_their_owner() {
        let repo = repo();
        let (_, like) = create_like(PostId::new(1).unwrap(), &reader(2), &repo).unwrap();

        assert_eq!(get_like(like.id, &reader(1), &repo), Err(ServiceError::NotFound));
        assert_eq!(delete_like(like.id, &reader(1), &repo), Err(ServiceError::NotFound));
        assert_eq!(list_my_likes(&reader(2), &repo).unwrap().len(), 1);
        assert_eq!(delete_like(like.id, &reader(2), &repo), Ok(()));
        assert!(list_my_likes(&reader(2), &repo).unwrap().is_empty());
    }

    #[test]
    fn repeated_views_are_counted_once() {
        let repo = repo();

        let first = record_view("trip", None, Some("203.0.113.7"), &repo);
        let second = record_view("trip", None, Some("203.0.113.7"), &repo);
        let signed_in = record_view("trip", Some(&reader(2)), Some("203.0.113.7"), &repo);

        assert_eq!(first, Ok(ViewOutcome::Counted));
        assert_eq!(second, Ok(ViewOutcome::AlreadyCounted));
        assert_eq!(signed_in, Ok(ViewOutcome::Counted));
        assert_eq!(repo.post("trip").unwrap().views, 2);
        assert_eq!(list_post_views("trip", &repo).unwrap().len(), 2);
    }

    #[test]
    fn viewer_must_be_identifiable() {
        assert!(matches!(
            resolve_viewer(None, None),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            resolve_viewer(None, Some("not-an-ip")),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(
            resolve_viewer(Some(&reader(3)), None),
            Ok(ViewerIdentity::User(crate::domain::types::UserId::new(3).unwrap()))
        );
    }

    #[test]
    fn reviews_require_an_existing_post() {
        let repo = repo();
        let payload = ReviewPayload {
            post_id: PostId::new(1).unwrap(),
            rating: Rating::new(4).unwrap(),
            comment: "Lovely".into(),
        };

        let review = create_review(payload.clone(), &reader(2), &repo).unwrap();
        assert_eq!(review.rating, 4);
        assert_eq!(get_review(review.id, &repo).unwrap(), review);
        assert_eq!(list_reviews(Some("trip"), &repo).unwrap().len(), 1);
        assert!(list_reviews(Some("other"), &repo).unwrap().is_empty());

        let orphan = ReviewPayload {
            post_id: PostId::new(50).unwrap(),
            ..payload
        };
        assert!(matches!(
            create_review(orphan, &reader(2), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn company_logos_are_read_only_lookups() {
        let repo = repo().with_logos(vec![CompanyLogo {
            id: CompanyLogoId::new(1).unwrap(),
            name: CompanyName::new("Acme").unwrap(),
            logo_svg: "<svg/>".into(),
        }]);

        assert_eq!(list_company_logos(&repo).unwrap().len(), 1);
        assert_eq!(get_company_logo(1, &repo).unwrap().name, "Acme");
        assert_eq!(get_company_logo(2, &repo), Err(ServiceError::NotFound));
        assert_eq!(get_company_logo(0, &repo), Err(ServiceError::NotFound));
    }
}
