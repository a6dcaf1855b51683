use crate::db::{DbConnection, DbPool};
use crate::domain::category::{
    Category, CategoryUpdate, NewCategory, NewSubCategory, SubCategory, SubCategoryUpdate,
};
use crate::domain::engagement::{
    CompanyLogo, Like, LikeOutcome, NewReview, PostView, Review, ViewOutcome,
};
use crate::domain::follow::FollowStats;
use crate::domain::forum::{Answer, NewAnswer, NewQuestion, Question};
use crate::domain::post::{NewPost, Post, PostDetail, PostSummary, PostUpdate};
use crate::domain::types::{
    CategoryId, CompanyLogoId, LikeId, PostId, PostStatus, QuestionId, ReviewId, Slug,
    SubCategoryId, UserId, ViewerIdentity,
};
use crate::domain::user::User;
use crate::pagination::Pagination;

pub mod category;
pub mod engagement;
pub mod errors;
pub mod follow;
pub mod forum;
pub mod post;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Offset and row count for a query capped at `limit` rows and then
/// paginated. `None` rows means unbounded.
pub(crate) fn page_window(
    limit: Option<usize>,
    pagination: Option<&Pagination>,
) -> (usize, Option<usize>) {
    let offset = pagination.map_or(0, Pagination::offset);
    let per_page = pagination.map(|p| p.per_page);
    match limit {
        Some(limit) => {
            let remaining = limit.saturating_sub(offset);
            (offset, Some(per_page.map_or(remaining, |p| p.min(remaining))))
        }
        None => (offset, per_page),
    }
}

/// Whitelisted orderings for post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostOrdering {
    CreatedAsc,
    #[default]
    CreatedDesc,
    ViewsAsc,
    /// Most viewed first; equal counts fall back to newest first.
    ViewsDesc,
}

impl PostOrdering {
    /// Parse an `order_by` query value. Anything outside the allow-list
    /// falls back to newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("created_at") => Self::CreatedAsc,
            Some("-created_at") => Self::CreatedDesc,
            Some("views") => Self::ViewsAsc,
            Some("-views") => Self::ViewsDesc,
            _ => Self::CreatedDesc,
        }
    }
}

/// Query parameters used when listing blog posts.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    /// Restrict to a publication state.
    pub status: Option<PostStatus>,
    /// Category slug.
    pub category: Option<String>,
    /// Subcategory slug.
    pub subcategory: Option<String>,
    pub author: Option<UserId>,
    /// Exact tag name.
    pub tag: Option<String>,
    /// Case-insensitive match over title, description and subtitle.
    pub search: Option<String>,
    pub min_views: Option<i32>,
    pub order: PostOrdering,
    /// Hard cap applied before pagination.
    pub limit: Option<usize>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Self::default()
        }
    }
    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }
    pub fn subcategory(mut self, slug: impl Into<String>) -> Self {
        self.subcategory = Some(slug.into());
        self
    }
    pub fn author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn min_views(mut self, views: i32) -> Self {
        self.min_views = Some(views);
        self
    }
    pub fn order(mut self, order: PostOrdering) -> Self {
        self.order = order;
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Sort modes of the forum question list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionSort {
    /// Most answered first, ties by id.
    Top,
    /// Most answered first, ties by newest.
    Best,
    #[default]
    Latest,
}

impl QuestionSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("top") => Self::Top,
            Some("best") => Self::Best,
            _ => Self::Latest,
        }
    }
}

/// Sort modes of the answers shown under a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerSort {
    Old,
    /// Same order as [`AnswerSort::Newest`]; answers carry no score.
    Top,
    /// Newest first, at most [`AnswerSort::RECENT_LIMIT`] answers.
    Recently,
    #[default]
    Newest,
}

impl AnswerSort {
    pub const RECENT_LIMIT: usize = 5;

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("old") => Self::Old,
            Some("top") => Self::Top,
            Some("recently") => Self::Recently,
            _ => Self::Newest,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    /// Case-insensitive match over title and content.
    pub search: Option<String>,
    pub sort: QuestionSort,
    pub limit: Option<usize>,
    pub pagination: Option<Pagination>,
}

impl QuestionListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn sort(mut self, sort: QuestionSort) -> Self {
        self.sort = sort;
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct AnswerListQuery {
    pub question_id: QuestionId,
    /// Case-insensitive match over the answer content.
    pub search: Option<String>,
    pub sort: AnswerSort,
    pub pagination: Option<Pagination>,
}

impl AnswerListQuery {
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            search: None,
            sort: AnswerSort::default(),
            pagination: None,
        }
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn sort(mut self, sort: AnswerSort) -> Self {
        self.sort = sort;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only access to the mirrored user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn category_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category. Duplicate slugs fail with [`RepositoryError::Conflict`].
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> RepositoryResult<usize>;
    /// Delete a category together with its subcategories and posts.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

pub trait SubCategoryReader {
    /// List subcategories, optionally only those of the category with this slug.
    fn list_subcategories(&self, category_slug: Option<&str>)
    -> RepositoryResult<Vec<SubCategory>>;
    fn get_subcategory_by_slug(&self, slug: &str) -> RepositoryResult<Option<SubCategory>>;
    fn get_subcategory_by_id(&self, id: SubCategoryId) -> RepositoryResult<Option<SubCategory>>;
    fn subcategory_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool>;
}

pub trait SubCategoryWriter {
    fn create_subcategory(&self, subcategory: &NewSubCategory) -> RepositoryResult<SubCategory>;
    fn update_subcategory(
        &self,
        id: SubCategoryId,
        update: &SubCategoryUpdate,
    ) -> RepositoryResult<usize>;
    fn delete_subcategory(&self, id: SubCategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for blog posts.
pub trait PostReader {
    /// List posts matching the query with their relations loaded in batches.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<PostSummary>)>;
    /// Find a post by slug, optionally only in the given state.
    fn get_post_by_slug(
        &self,
        slug: &str,
        status: Option<PostStatus>,
    ) -> RepositoryResult<Option<Post>>;
    fn get_post_by_id(
        &self,
        id: PostId,
        status: Option<PostStatus>,
    ) -> RepositoryResult<Option<Post>>;
    fn get_post_detail(&self, id: PostId) -> RepositoryResult<Option<PostDetail>>;
    fn post_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool>;
}

/// Write operations for blog posts. Tags are upserted by name as part of
/// the same transaction.
pub trait PostWriter {
    /// Insert a post. A slug taken concurrently fails with [`RepositoryError::Conflict`].
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize>;
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

pub trait LikeReader {
    fn list_likes_for_post(&self, post_id: PostId) -> RepositoryResult<Vec<Like>>;
    fn list_likes_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Like>>;
    fn get_like(&self, id: LikeId) -> RepositoryResult<Option<Like>>;
    /// The like keyed by `(post, user)`, if any.
    fn find_like(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<Option<Like>>;
}

pub trait LikeWriter {
    /// Insert the `(post, user)` like unless it already exists.
    fn like_post(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<LikeOutcome>;
    /// Remove the `(post, user)` like; returns the number of removed rows.
    fn unlike_post(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<usize>;
    fn delete_like(&self, id: LikeId, user_id: UserId) -> RepositoryResult<usize>;
}

pub trait ReviewReader {
    /// Newest first, optionally only reviews of the post with this slug.
    fn list_reviews(&self, post_slug: Option<&str>) -> RepositoryResult<Vec<Review>>;
    fn get_review(&self, id: ReviewId) -> RepositoryResult<Option<Review>>;
}

pub trait ReviewWriter {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review>;
}

pub trait ViewReader {
    fn list_post_views(&self, post_id: PostId) -> RepositoryResult<Vec<PostView>>;
}

pub trait ViewWriter {
    /// Store the view unless this identity was already counted, bumping the
    /// post's counter only for a new row.
    fn record_view(
        &self,
        post_id: PostId,
        viewer: ViewerIdentity,
    ) -> RepositoryResult<ViewOutcome>;
}

pub trait CompanyLogoReader {
    fn list_company_logos(&self) -> RepositoryResult<Vec<CompanyLogo>>;
    fn get_company_logo(&self, id: CompanyLogoId) -> RepositoryResult<Option<CompanyLogo>>;
}

pub trait QuestionReader {
    fn list_questions(&self, query: QuestionListQuery)
    -> RepositoryResult<(usize, Vec<Question>)>;
    fn get_question_by_slug(&self, slug: &str) -> RepositoryResult<Option<Question>>;
    fn question_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool>;
}

pub trait QuestionWriter {
    fn create_question(&self, question: &NewQuestion) -> RepositoryResult<Question>;
}

pub trait AnswerReader {
    fn list_answers(&self, query: AnswerListQuery) -> RepositoryResult<(usize, Vec<Answer>)>;
}

pub trait AnswerWriter {
    fn create_answer(&self, answer: &NewAnswer) -> RepositoryResult<usize>;
}

pub trait FollowReader {
    fn get_follow_stats(&self, user_id: UserId) -> RepositoryResult<FollowStats>;
}

pub trait FollowWriter {
    /// Returns `true` when a new follow relationship was created.
    fn follow_user(&self, follower: UserId, followee: UserId) -> RepositoryResult<bool>;
    fn unfollow_user(&self, follower: UserId, followee: UserId) -> RepositoryResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ordering_falls_back_to_newest_first() {
        assert_eq!(PostOrdering::parse(Some("title")), PostOrdering::CreatedDesc);
        assert_eq!(PostOrdering::parse(Some("-title; drop table")), PostOrdering::CreatedDesc);
        assert_eq!(PostOrdering::parse(None), PostOrdering::CreatedDesc);
        assert_eq!(PostOrdering::parse(Some("-views")), PostOrdering::ViewsDesc);
        assert_eq!(PostOrdering::parse(Some("created_at")), PostOrdering::CreatedAsc);
    }

    #[test]
    fn forum_sort_modes_parse_aliases() {
        assert_eq!(QuestionSort::parse(Some("top")), QuestionSort::Top);
        assert_eq!(QuestionSort::parse(Some("best")), QuestionSort::Best);
        assert_eq!(QuestionSort::parse(Some("new")), QuestionSort::Latest);
        assert_eq!(QuestionSort::parse(Some("latest")), QuestionSort::Latest);
        assert_eq!(QuestionSort::parse(Some("bogus")), QuestionSort::Latest);
        assert_eq!(AnswerSort::parse(Some("old")), AnswerSort::Old);
        assert_eq!(AnswerSort::parse(Some("recently")), AnswerSort::Recently);
        assert_eq!(AnswerSort::parse(None), AnswerSort::Newest);
    }

    #[test]
    fn page_window_respects_cap() {
        let page = |page| Pagination { page, per_page: 2 };
        assert_eq!(page_window(None, None), (0, None));
        assert_eq!(page_window(Some(5), None), (0, Some(5)));
        assert_eq!(page_window(Some(5), Some(&page(1))), (0, Some(2)));
        assert_eq!(page_window(Some(5), Some(&page(3))), (4, Some(1)));
        assert_eq!(page_window(Some(5), Some(&page(4))), (6, Some(0)));
        assert_eq!(page_window(None, Some(&page(2))), (2, Some(2)));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_x"), "%100\\%\\_x%");
    }
}
