use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{CategoryId, PostId, PostStatus, SubCategoryId, TagName, UserId};
use crate::domain::user::NewTag;
use crate::dto::posts::{PostDetailDto, PostListDto};
use crate::forms::posts::PostPayload;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    CategoryReader, PostListQuery, PostOrdering, PostReader, PostWriter, SubCategoryReader,
};
use crate::services::slug::{insert_with_unique_slug, slugify_or};

use super::{ServiceError, ServiceResult, current_user_id, parse_optional};

/// Posts need at least this many views to appear among the popular ones.
pub const POPULAR_MIN_VIEWS: i32 = 100;
/// Size of the popular and latest post highlights.
pub const HIGHLIGHT_LIMIT: usize = 10;

/// Query parameters of `GET /api/posts`. Values that fail to parse are
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn load_posts<R>(query: PostListQuery, repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    match repo.list_posts(query) {
        Ok((_total, posts)) => Ok(posts.into_iter().map(PostListDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn load_detail<R>(id: PostId, repo: &R) -> ServiceResult<PostDetailDto>
where
    R: PostReader,
{
    match repo.get_post_detail(id) {
        Ok(Some(detail)) => Ok(detail.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load post detail: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub(crate) fn find_published_post<R>(slug: &str, repo: &R) -> ServiceResult<Post>
where
    R: PostReader,
{
    match repo.get_post_by_slug(slug, Some(PostStatus::Published)) {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Pair tag names with their slugs for the upsert.
fn new_tags(names: Vec<TagName>) -> ServiceResult<Vec<NewTag>> {
    names
        .into_iter()
        .map(|name| {
            let slug = slugify_or(name.as_str(), "tag")?;
            Ok(NewTag { name, slug })
        })
        .collect()
}

fn ensure_taxonomy<R>(
    category_id: Option<CategoryId>,
    subcategory_id: Option<SubCategoryId>,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + SubCategoryReader,
{
    if let Some(id) = category_id {
        match repo.get_category_by_id(id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Form(format!("category {id} does not exist")));
            }
            Err(e) => {
                log::error!("Failed to get category: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    if let Some(id) = subcategory_id {
        match repo.get_subcategory_by_id(id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Form(format!("subcategory {id} does not exist")));
            }
            Err(e) => {
                log::error!("Failed to get subcategory: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    Ok(())
}

/// Published posts matching the filters in `params`.
pub fn list_posts<R>(params: PostListParams, repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    let order = PostOrdering::parse(params.order_by.as_deref());
    let mut query = PostListQuery::published().order(order);

    if let Some(category) = non_blank(params.category) {
        query = query.category(category);
    }
    if let Some(subcategory) = non_blank(params.subcategory) {
        query = query.subcategory(subcategory);
    }
    if let Some(author) = parse_optional::<i32>(params.author.as_deref())
        .and_then(|id| UserId::new(id).ok())
    {
        query = query.author(author);
    }
    if let Some(tag) = non_blank(params.tag) {
        query = query.tag(tag);
    }
    if let Some(search) = non_blank(params.search) {
        query = query.search(search);
    }
    if let Some(page) = parse_optional::<usize>(params.page.as_deref()).filter(|p| *p > 0) {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    load_posts(query, repo)
}

pub fn get_post<R>(slug: &str, repo: &R) -> ServiceResult<PostDetailDto>
where
    R: PostReader,
{
    let post = find_published_post(slug, repo)?;
    load_detail(post.id, repo)
}

/// Create a published post authored by `user` under a fresh unique slug.
pub fn create_post<R>(
    payload: PostPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PostDetailDto>
where
    R: PostReader + PostWriter + CategoryReader + SubCategoryReader,
{
    let author_id = current_user_id(user)?;

    let Some(title) = payload.title else {
        return Err(ServiceError::Form("title is required".into()));
    };
    let Some(category_id) = payload.category_id else {
        return Err(ServiceError::Form("category is required".into()));
    };
    let subcategory_id = payload.subcategory_id.flatten();
    ensure_taxonomy(Some(category_id), subcategory_id, repo)?;

    let base = slugify_or(title.as_str(), "post")?;
    let now = Utc::now().naive_utc();
    let template = NewPost {
        title,
        subtitle: payload.subtitle.unwrap_or_default(),
        slug: base.clone(),
        description: payload.description.unwrap_or_default(),
        featured_image: payload.featured_image,
        featured_image_url: payload.featured_image_url,
        status: PostStatus::Published,
        category_id,
        subcategory_id,
        author_id,
        tags: new_tags(payload.tags.unwrap_or_default())?,
        created_at: now,
        updated_at: now,
    };

    let post = insert_with_unique_slug(
        &base,
        "post",
        |slug| repo.post_slug_exists(slug),
        |slug| {
            repo.create_post(&NewPost {
                slug,
                ..template.clone()
            })
        },
    )?;

    log::info!("Post '{}' created by user {author_id}", post.slug);

    load_detail(post.id, repo)
}

fn ensure_can_edit(post: &Post, user: &AuthenticatedUser) -> ServiceResult<()> {
    let user_id = current_user_id(user)?;
    if post.author_id == user_id || user.is_staff() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Apply the supplied fields to a post. The slug never changes; tags are
/// replaced only when a tag list is supplied.
pub fn update_post<R>(
    slug: &str,
    payload: PostPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<PostDetailDto>
where
    R: PostReader + PostWriter + CategoryReader + SubCategoryReader,
{
    let post = find_published_post(slug, repo)?;
    ensure_can_edit(&post, user)?;
    ensure_taxonomy(payload.category_id, payload.subcategory_id.flatten(), repo)?;

    let update = PostUpdate {
        title: payload.title,
        subtitle: payload.subtitle,
        description: payload.description,
        featured_image: payload.featured_image,
        featured_image_url: payload.featured_image_url,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        tags: payload.tags.map(new_tags).transpose()?,
    };

    match repo.update_post(post.id, &update) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to update post: {e}");
            return Err(e.into());
        }
    }

    load_detail(post.id, repo)
}

pub fn delete_post<R>(slug: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let post = find_published_post(slug, repo)?;
    ensure_can_edit(&post, user)?;

    match repo.delete_post(post.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Every published post, newest first.
pub fn all_posts<R>(repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    load_posts(PostListQuery::published(), repo)
}

/// Most viewed published posts with at least [`POPULAR_MIN_VIEWS`] views.
pub fn popular_posts<R>(repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    let query = PostListQuery::published()
        .min_views(POPULAR_MIN_VIEWS)
        .order(PostOrdering::ViewsDesc)
        .limit(HIGHLIGHT_LIMIT);
    load_posts(query, repo)
}

pub fn latest_posts<R>(repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    load_posts(PostListQuery::published().limit(HIGHLIGHT_LIMIT), repo)
}

pub fn category_posts<R>(slug: &str, repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    load_posts(PostListQuery::published().category(slug), repo)
}

pub fn user_posts<R>(user_id: i32, repo: &R) -> ServiceResult<Vec<PostListDto>>
where
    R: PostReader,
{
    let Ok(user_id) = UserId::new(user_id) else {
        return Ok(vec![]);
    };
    load_posts(PostListQuery::published().author(user_id), repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PostTitle, ViewCount};
    use crate::repository::test::{TestRepository, sample_category, sample_post, sample_user};
    use crate::services::test_support::{reader, staff};

    fn repo() -> TestRepository {
        TestRepository::new(vec![sample_user(1), sample_user(2)])
            .with_categories(vec![sample_category(1, "travel"), sample_category(2, "food")])
    }

    fn payload(title: &str) -> PostPayload {
        PostPayload {
            title: Some(PostTitle::new(title).unwrap()),
            category_id: Some(CategoryId::new(1).unwrap()),
            ..PostPayload::default()
        }
    }

    fn tag_names(names: &[&str]) -> Option<Vec<TagName>> {
        Some(names.iter().map(|n| TagName::new(*n).unwrap()).collect())
    }

    #[test]
    fn identical_titles_get_distinct_slugs() {
        let repo = repo();

        let first = create_post(payload("Hello World"), &reader(1), &repo).unwrap();
        let second = create_post(payload("Hello World"), &reader(1), &repo).unwrap();

        assert_eq!(first.post.slug, "hello-world");
        assert_eq!(second.post.slug, "hello-world-1");
        assert_eq!(first.post.status, "published");
        assert_eq!(first.post.author.id, 1);
    }

    #[test]
    fn non_latin_titles_and_tags_are_transliterated() {
        let repo = repo();

        let cyrillic = create_post(payload("Привет мир"), &reader(1), &repo).unwrap();
        assert_eq!(cyrillic.post.slug, "privet-mir");

        let bengali = create_post(payload("আমার প্রথম ব্লগ"), &reader(1), &repo).unwrap();
        assert!(!bengali.post.slug.is_empty());
        assert!(bengali.post.slug.is_ascii());

        let tagged = PostPayload {
            tags: tag_names(&["প্রোগ্রামিং", "rust"]),
            ..payload("Rust tips")
        };
        let created = create_post(tagged, &reader(1), &repo).unwrap();
        assert_eq!(created.post.slug, "rust-tips");
        assert_eq!(created.post.tags.len(), 2);
        assert!(created.post.tags.iter().all(|t| !t.slug.is_empty()));

        let punctuation = create_post(payload("?!"), &reader(1), &repo).unwrap();
        assert_eq!(punctuation.post.slug, "post");
    }

    #[test]
    fn create_retries_when_slug_is_taken_concurrently() {
        let repo = repo().with_conflicting_post_inserts(2);

        let created = create_post(payload("Race"), &reader(1), &repo).unwrap();
        assert_eq!(created.post.slug, "race");
    }

    #[test]
    fn create_requires_title_and_existing_category() {
        let repo = repo();

        let missing_title = PostPayload {
            title: None,
            ..payload("x")
        };
        assert!(matches!(
            create_post(missing_title, &reader(1), &repo),
            Err(ServiceError::Form(_))
        ));

        let unknown_category = PostPayload {
            category_id: Some(CategoryId::new(42).unwrap()),
            ..payload("x")
        };
        assert!(matches!(
            create_post(unknown_category, &reader(1), &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn tags_are_upserted_and_kept_on_partial_update() {
        let repo = repo();
        let created = create_post(
            PostPayload {
                tags: tag_names(&["rust", "web"]),
                ..payload("Tagged")
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        assert_eq!(created.post.tags.len(), 2);

        let updated = update_post(
            "tagged",
            PostPayload {
                subtitle: Some("Now with subtitle".into()),
                ..PostPayload::default()
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        assert_eq!(updated.post.subtitle, "Now with subtitle");
        assert_eq!(updated.post.slug, "tagged");
        assert_eq!(updated.post.tags.len(), 2);

        let retagged = update_post(
            "tagged",
            PostPayload {
                tags: tag_names(&["rust"]),
                ..PostPayload::default()
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        let names: Vec<&str> = retagged.post.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust"]);
    }

    #[test]
    fn subcategory_can_be_set_and_cleared() {
        use crate::domain::category::NewSubCategory;
        use crate::domain::types::{Slug, SubCategoryName};
        use crate::repository::SubCategoryWriter;
        use crate::repository::test::timestamp;

        let repo = repo();
        let beaches = repo
            .create_subcategory(&NewSubCategory {
                name: SubCategoryName::new("Beaches").unwrap(),
                slug: Slug::new("beaches").unwrap(),
                description: String::new(),
                category_id: CategoryId::new(1).unwrap(),
                created_at: timestamp(0),
                updated_at: timestamp(0),
            })
            .unwrap();
        let created = create_post(
            PostPayload {
                subcategory_id: Some(Some(beaches.id)),
                ..payload("Sandy")
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        assert_eq!(created.post.subcategory.unwrap().slug, "beaches");

        let untouched = update_post(
            "sandy",
            PostPayload {
                subtitle: Some("Sun".into()),
                ..PostPayload::default()
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        assert!(untouched.post.subcategory.is_some());

        let cleared = update_post(
            "sandy",
            PostPayload {
                subcategory_id: Some(None),
                ..PostPayload::default()
            },
            &reader(1),
            &repo,
        )
        .unwrap();
        assert!(cleared.post.subcategory.is_none());
    }

    #[test]
    fn only_author_or_staff_may_edit() {
        let repo = repo().with_posts(vec![sample_post(1, "mine", 1, 1)]);

        assert_eq!(
            delete_post("mine", &reader(2), &repo),
            Err(ServiceError::Forbidden)
        );
        assert!(update_post("mine", PostPayload::default(), &staff(2), &repo).is_ok());
        assert_eq!(delete_post("mine", &reader(1), &repo), Ok(()));
        assert_eq!(get_post("mine", &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn list_filters_and_falls_back_to_newest_first() {
        let mut draft = sample_post(3, "draft", 1, 1);
        draft.status = PostStatus::Draft;
        let repo = repo().with_posts(vec![
            sample_post(1, "older", 1, 1),
            sample_post(2, "newer", 2, 2),
            draft,
        ]);

        let posts = list_posts(
            PostListParams {
                order_by: Some("title".into()),
                ..PostListParams::default()
            },
            &repo,
        )
        .unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let empty = list_posts(
            PostListParams {
                category: Some("unknown".into()),
                ..PostListParams::default()
            },
            &repo,
        )
        .unwrap();
        assert!(empty.is_empty());

        let by_author = list_posts(
            PostListParams {
                author: Some("2".into()),
                page: Some("abc".into()),
                ..PostListParams::default()
            },
            &repo,
        )
        .unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].slug, "newer");
    }

    #[test]
    fn popular_posts_need_enough_views() {
        let mut popular = sample_post(1, "popular", 1, 1);
        popular.views = ViewCount::new(150).unwrap();
        let mut quiet = sample_post(2, "quiet", 1, 1);
        quiet.views = ViewCount::new(50).unwrap();
        let repo = repo().with_posts(vec![popular, quiet]);

        let posts = popular_posts(&repo).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "popular");
        assert_eq!(latest_posts(&repo).unwrap().len(), 2);
    }

    #[test]
    fn category_and_user_listings() {
        let repo = repo().with_posts(vec![
            sample_post(1, "trip", 1, 1),
            sample_post(2, "dinner", 2, 2),
        ]);

        assert_eq!(category_posts("food", &repo).unwrap()[0].slug, "dinner");
        assert_eq!(user_posts(1, &repo).unwrap()[0].slug, "trip");
        assert!(user_posts(-5, &repo).unwrap().is_empty());
    }
}
