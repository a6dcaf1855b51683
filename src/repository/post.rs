use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::category::{Category, SubCategory};
use crate::domain::post::{AdditionalImage, NewPost, Post, PostDetail, PostSummary, PostUpdate};
use crate::domain::types::{PostId, PostStatus, Slug};
use crate::domain::user::{NewTag, Tag, User};
use crate::models::category::{Category as DbCategory, SubCategory as DbSubCategory};
use crate::models::post::{
    AdditionalImage as DbAdditionalImage, NewPost as DbNewPost, Post as DbPost, PostChangeset,
    PostTag,
};
use crate::models::user::{NewTag as DbNewTag, Tag as DbTag, User as DbUser};
use crate::repository::{
    DieselRepository, PostListQuery, PostOrdering, PostReader, PostWriter, RepositoryError,
    RepositoryResult, like_pattern, page_window,
};
use crate::schema::blog_posts;

/// Apply the filters of `query` to the posts table.
fn filtered_posts(query: &PostListQuery) -> blog_posts::BoxedQuery<'_, Sqlite> {
    use crate::schema::{blog_post_tags, categories, subcategories, tags};

    let mut items = blog_posts::table.into_boxed::<Sqlite>();

    if let Some(status) = query.status {
        items = items.filter(blog_posts::status.eq(status.as_str()));
    }

    if let Some(slug) = &query.category {
        items = items.filter(
            blog_posts::category_id.eq_any(
                categories::table
                    .filter(categories::slug.eq(slug.as_str()))
                    .select(categories::id),
            ),
        );
    }

    if let Some(slug) = &query.subcategory {
        items = items.filter(
            blog_posts::subcategory_id.eq_any(
                subcategories::table
                    .filter(subcategories::slug.eq(slug.as_str()))
                    .select(subcategories::id.nullable()),
            ),
        );
    }

    if let Some(author) = query.author {
        items = items.filter(blog_posts::author_id.eq(author.get()));
    }

    if let Some(tag) = &query.tag {
        items = items.filter(
            blog_posts::id.eq_any(
                blog_post_tags::table
                    .inner_join(tags::table)
                    .filter(tags::name.eq(tag.trim().to_lowercase()))
                    .select(blog_post_tags::post_id),
            ),
        );
    }

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search.trim());
        items = items.filter(
            blog_posts::title
                .like(pattern.clone())
                .escape('\\')
                .or(blog_posts::description.like(pattern.clone()).escape('\\'))
                .or(blog_posts::subtitle.like(pattern).escape('\\')),
        );
    }

    if let Some(min_views) = query.min_views {
        items = items.filter(blog_posts::views.ge(min_views));
    }

    items
}

/// Load categories, subcategories, authors, tags and counters for `rows`
/// with one query per relation.
fn assemble_summaries(
    conn: &mut SqliteConnection,
    rows: Vec<DbPost>,
) -> RepositoryResult<Vec<PostSummary>> {
    use crate::schema::{blog_post_tags, categories, comments, likes, subcategories, tags, users};

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let post_ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
    let category_ids: Vec<i32> = rows.iter().map(|p| p.category_id).collect();
    let subcategory_ids: Vec<i32> = rows.iter().filter_map(|p| p.subcategory_id).collect();
    let author_ids: Vec<i32> = rows.iter().map(|p| p.author_id).collect();

    let categories_by_id = categories::table
        .filter(categories::id.eq_any(&category_ids))
        .load::<DbCategory>(conn)?
        .into_iter()
        .map(|c| {
            let id = c.id;
            Category::try_from(c).map(|c| (id, c))
        })
        .collect::<Result<HashMap<i32, Category>, _>>()?;

    let subcategories_by_id = subcategories::table
        .inner_join(categories::table)
        .filter(subcategories::id.eq_any(&subcategory_ids))
        .select((DbSubCategory::as_select(), categories::name))
        .load::<(DbSubCategory, String)>(conn)?
        .into_iter()
        .map(|row| {
            let id = row.0.id;
            SubCategory::try_from(row).map(|s| (id, s))
        })
        .collect::<Result<HashMap<i32, SubCategory>, _>>()?;

    let authors_by_id = users::table
        .filter(users::id.eq_any(&author_ids))
        .load::<DbUser>(conn)?
        .into_iter()
        .map(|u| {
            let id = u.id;
            User::try_from(u).map(|u| (id, u))
        })
        .collect::<Result<HashMap<i32, User>, _>>()?;

    let mut tags_by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in blog_post_tags::table
        .inner_join(tags::table)
        .filter(blog_post_tags::post_id.eq_any(&post_ids))
        .select((blog_post_tags::post_id, DbTag::as_select()))
        .order(tags::name.asc())
        .load::<(i32, DbTag)>(conn)?
    {
        tags_by_post
            .entry(post_id)
            .or_default()
            .push(Tag::try_from(tag)?);
    }

    let likes_by_post: HashMap<i32, i64> = likes::table
        .filter(likes::post_id.eq_any(&post_ids))
        .group_by(likes::post_id)
        .select((likes::post_id, count(likes::id)))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    let comments_by_post: HashMap<i32, i64> = comments::table
        .filter(comments::post_id.eq_any(&post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count(comments::id)))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let category = categories_by_id
                .get(&row.category_id)
                .cloned()
                .ok_or_else(|| {
                    RepositoryError::ValidationError(format!("post {id} has no category"))
                })?;
            let author = authors_by_id.get(&row.author_id).cloned().ok_or_else(|| {
                RepositoryError::ValidationError(format!("post {id} has no author"))
            })?;
            let subcategory = row
                .subcategory_id
                .and_then(|sub_id| subcategories_by_id.get(&sub_id).cloned());

            Ok(PostSummary {
                post: row.try_into()?,
                category,
                subcategory,
                author,
                tags: tags_by_post.remove(&id).unwrap_or_default(),
                likes_count: likes_by_post.get(&id).copied().unwrap_or(0),
                comments_count: comments_by_post.get(&id).copied().unwrap_or(0),
            })
        })
        .collect()
}

/// Insert missing tags by name and return the ids of all of `new_tags`.
fn upsert_tags(conn: &mut SqliteConnection, new_tags: &[NewTag]) -> RepositoryResult<Vec<i32>> {
    use crate::schema::tags;

    if new_tags.is_empty() {
        return Ok(vec![]);
    }

    for tag in new_tags {
        diesel::insert_into(tags::table)
            .values(DbNewTag {
                name: tag.name.as_str(),
                slug: tag.slug.as_str(),
            })
            .on_conflict(tags::name)
            .do_nothing()
            .execute(conn)?;
    }

    let names: Vec<&str> = new_tags.iter().map(|t| t.name.as_str()).collect();
    let ids = tags::table
        .filter(tags::name.eq_any(&names))
        .select(tags::id)
        .load::<i32>(conn)?;

    Ok(ids)
}

fn link_tags(conn: &mut SqliteConnection, post_id: i32, tag_ids: &[i32]) -> RepositoryResult<()> {
    use crate::schema::blog_post_tags;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let links: Vec<PostTag> = tag_ids
        .iter()
        .map(|&tag_id| PostTag { post_id, tag_id })
        .collect();

    diesel::insert_into(blog_post_tags::table)
        .values(&links)
        .execute(conn)?;

    Ok(())
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<PostSummary>)> {
        let mut conn = self.conn()?;

        let total = filtered_posts(&query).count().get_result::<i64>(&mut conn)? as usize;
        let total = query.limit.map_or(total, |limit| total.min(limit));

        let (offset, rows) = page_window(query.limit, query.pagination.as_ref());
        if rows == Some(0) {
            return Ok((total, vec![]));
        }

        let items = filtered_posts(&query);
        let items = match query.order {
            PostOrdering::CreatedAsc => {
                items.order((blog_posts::created_at.asc(), blog_posts::id.asc()))
            }
            PostOrdering::CreatedDesc => {
                items.order((blog_posts::created_at.desc(), blog_posts::id.desc()))
            }
            PostOrdering::ViewsAsc => items.order((
                blog_posts::views.asc(),
                blog_posts::created_at.desc(),
                blog_posts::id.desc(),
            )),
            PostOrdering::ViewsDesc => items.order((
                blog_posts::views.desc(),
                blog_posts::created_at.desc(),
                blog_posts::id.desc(),
            )),
        };

        // SQLite treats a negative LIMIT as unbounded.
        let rows = items
            .limit(rows.map_or(-1, |n| n as i64))
            .offset(offset as i64)
            .load::<DbPost>(&mut conn)?;

        let items = assemble_summaries(&mut conn, rows)?;

        Ok((total, items))
    }

    fn get_post_by_slug(
        &self,
        slug: &str,
        status: Option<PostStatus>,
    ) -> RepositoryResult<Option<Post>> {
        let mut conn = self.conn()?;

        let mut query = blog_posts::table
            .filter(blog_posts::slug.eq(slug))
            .into_boxed::<Sqlite>();
        if let Some(status) = status {
            query = query.filter(blog_posts::status.eq(status.as_str()));
        }

        let post = query.first::<DbPost>(&mut conn).optional()?;

        Ok(post.map(TryInto::try_into).transpose()?)
    }

    fn get_post_by_id(
        &self,
        id: PostId,
        status: Option<PostStatus>,
    ) -> RepositoryResult<Option<Post>> {
        let mut conn = self.conn()?;

        let mut query = blog_posts::table
            .filter(blog_posts::id.eq(id.get()))
            .into_boxed::<Sqlite>();
        if let Some(status) = status {
            query = query.filter(blog_posts::status.eq(status.as_str()));
        }

        let post = query.first::<DbPost>(&mut conn).optional()?;

        Ok(post.map(TryInto::try_into).transpose()?)
    }

    fn get_post_detail(&self, id: PostId) -> RepositoryResult<Option<PostDetail>> {
        use crate::schema::blog_additional_images;

        let mut conn = self.conn()?;

        let Some(row) = blog_posts::table
            .find(id.get())
            .first::<DbPost>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let Some(summary) = assemble_summaries(&mut conn, vec![row])?.pop() else {
            return Ok(None);
        };

        let additional_images = blog_additional_images::table
            .filter(blog_additional_images::post_id.eq(id.get()))
            .order(blog_additional_images::id.asc())
            .load::<DbAdditionalImage>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<AdditionalImage>, _>>()?;

        Ok(Some(PostDetail {
            summary,
            additional_images,
        }))
    }

    fn post_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            blog_posts::table.filter(blog_posts::slug.eq(slug.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let mut conn = self.conn()?;

        let db_post = DbNewPost {
            title: post.title.as_str(),
            subtitle: &post.subtitle,
            slug: post.slug.as_str(),
            description: &post.description,
            featured_image: post.featured_image.as_deref(),
            featured_image_url: post.featured_image_url.as_deref(),
            status: post.status.as_str(),
            category_id: post.category_id.get(),
            subcategory_id: post.subcategory_id.map(|id| id.get()),
            author_id: post.author_id.get(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        };

        // Immediate transactions take the write lock up front so concurrent
        // creators queue on `busy_timeout` instead of deadlocking.
        let created = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(blog_posts::table)
                .values(&db_post)
                .returning(DbPost::as_returning())
                .get_result::<DbPost>(conn)?;
            let tag_ids = upsert_tags(conn, &post.tags)?;
            link_tags(conn, row.id, &tag_ids)?;
            Ok(row)
        })?;

        Ok(created.try_into()?)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        use crate::schema::blog_post_tags;

        let mut conn = self.conn()?;

        let changeset = PostChangeset {
            title: update.title.as_ref().map(|t| t.as_str()),
            subtitle: update.subtitle.as_deref(),
            description: update.description.as_deref(),
            featured_image: update.featured_image.as_deref(),
            featured_image_url: update.featured_image_url.as_deref(),
            category_id: update.category_id.map(|id| id.get()),
            subcategory_id: update.subcategory_id.map(|id| id.map(|id| id.get())),
            updated_at: Some(Utc::now().naive_utc()),
        };

        let affected = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(blog_posts::table.find(id.get()))
                .set(&changeset)
                .execute(conn)?;

            if affected > 0
                && let Some(new_tags) = &update.tags
            {
                diesel::delete(blog_post_tags::table.filter(blog_post_tags::post_id.eq(id.get())))
                    .execute(conn)?;
                let tag_ids = upsert_tags(conn, new_tags)?;
                link_tags(conn, id.get(), &tag_ids)?;
            }

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(blog_posts::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}
