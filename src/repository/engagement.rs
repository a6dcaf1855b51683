use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::engagement::{
    CompanyLogo, Like, LikeOutcome, NewReview, PostView, Review, ViewOutcome,
};
use crate::domain::types::{CompanyLogoId, LikeId, PostId, ReviewId, UserId, ViewerIdentity};
use crate::models::engagement::{
    CompanyLogo as DbCompanyLogo, Like as DbLike, NewLike as DbNewLike,
    NewPostView as DbNewPostView, NewReview as DbNewReview, PostView as DbPostView,
    Review as DbReview,
};
use crate::models::user::User as DbUser;
use crate::repository::{
    CompanyLogoReader, DieselRepository, LikeReader, LikeWriter, RepositoryError,
    RepositoryResult, ReviewReader, ReviewWriter, ViewReader, ViewWriter,
};

impl LikeReader for DieselRepository {
    fn list_likes_for_post(&self, post_id: PostId) -> RepositoryResult<Vec<Like>> {
        use crate::schema::{likes, users};

        let mut conn = self.conn()?;

        let items = likes::table
            .inner_join(users::table)
            .filter(likes::post_id.eq(post_id.get()))
            .order((likes::created_at.desc(), likes::id.desc()))
            .select((DbLike::as_select(), DbUser::as_select()))
            .load::<(DbLike, DbUser)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Like>, _>>()?;

        Ok(items)
    }

    fn list_likes_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Like>> {
        use crate::schema::{likes, users};

        let mut conn = self.conn()?;

        let items = likes::table
            .inner_join(users::table)
            .filter(likes::user_id.eq(user_id.get()))
            .order((likes::created_at.desc(), likes::id.desc()))
            .select((DbLike::as_select(), DbUser::as_select()))
            .load::<(DbLike, DbUser)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Like>, _>>()?;

        Ok(items)
    }

    fn get_like(&self, id: LikeId) -> RepositoryResult<Option<Like>> {
        use crate::schema::{likes, users};

        let mut conn = self.conn()?;

        let like = likes::table
            .inner_join(users::table)
            .filter(likes::id.eq(id.get()))
            .select((DbLike::as_select(), DbUser::as_select()))
            .first::<(DbLike, DbUser)>(&mut conn)
            .optional()?;

        Ok(like.map(TryInto::try_into).transpose()?)
    }

    fn find_like(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<Option<Like>> {
        use crate::schema::{likes, users};

        let mut conn = self.conn()?;

        let like = likes::table
            .inner_join(users::table)
            .filter(likes::post_id.eq(post_id.get()))
            .filter(likes::user_id.eq(user_id.get()))
            .select((DbLike::as_select(), DbUser::as_select()))
            .first::<(DbLike, DbUser)>(&mut conn)
            .optional()?;

        Ok(like.map(TryInto::try_into).transpose()?)
    }
}

impl LikeWriter for DieselRepository {
    fn like_post(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<LikeOutcome> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let inserted = diesel::insert_into(likes::table)
            .values(&DbNewLike {
                post_id: post_id.get(),
                user_id: user_id.get(),
                created_at: Utc::now().naive_utc(),
            })
            .on_conflict((likes::post_id, likes::user_id))
            .do_nothing()
            .execute(&mut conn)?;

        Ok(if inserted > 0 {
            LikeOutcome::Created
        } else {
            LikeOutcome::AlreadyLiked
        })
    }

    fn unlike_post(&self, post_id: PostId, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            likes::table
                .filter(likes::post_id.eq(post_id.get()))
                .filter(likes::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_like(&self, id: LikeId, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::likes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            likes::table
                .filter(likes::id.eq(id.get()))
                .filter(likes::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}

impl ReviewReader for DieselRepository {
    fn list_reviews(&self, post_slug: Option<&str>) -> RepositoryResult<Vec<Review>> {
        use crate::schema::{blog_posts, reviews, users};

        let mut conn = self.conn()?;

        let mut query = reviews::table
            .inner_join(users::table)
            .select((DbReview::as_select(), DbUser::as_select()))
            .into_boxed::<Sqlite>();

        if let Some(slug) = post_slug {
            query = query.filter(
                reviews::post_id.eq_any(
                    blog_posts::table
                        .filter(blog_posts::slug.eq(slug))
                        .select(blog_posts::id),
                ),
            );
        }

        let items = query
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .load::<(DbReview, DbUser)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>, _>>()?;

        Ok(items)
    }

    fn get_review(&self, id: ReviewId) -> RepositoryResult<Option<Review>> {
        use crate::schema::{reviews, users};

        let mut conn = self.conn()?;

        let review = reviews::table
            .inner_join(users::table)
            .filter(reviews::id.eq(id.get()))
            .select((DbReview::as_select(), DbUser::as_select()))
            .first::<(DbReview, DbUser)>(&mut conn)
            .optional()?;

        Ok(review.map(TryInto::try_into).transpose()?)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::{reviews, users};

        let mut conn = self.conn()?;

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(reviews::table)
                .values(&DbNewReview {
                    post_id: review.post_id.get(),
                    user_id: review.user_id.get(),
                    rating: review.rating.get(),
                    comment: &review.comment,
                    created_at: review.created_at,
                })
                .returning(DbReview::as_returning())
                .get_result::<DbReview>(conn)?;
            let user = users::table.find(row.user_id).first::<DbUser>(conn)?;
            Ok((row, user))
        })?;

        Ok(created.try_into()?)
    }
}

impl ViewReader for DieselRepository {
    fn list_post_views(&self, post_id: PostId) -> RepositoryResult<Vec<PostView>> {
        use crate::schema::post_view_ips;

        let mut conn = self.conn()?;

        let items = post_view_ips::table
            .filter(post_view_ips::post_id.eq(post_id.get()))
            .order((post_view_ips::viewed_at.desc(), post_view_ips::id.desc()))
            .load::<DbPostView>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<PostView>, _>>()?;

        Ok(items)
    }
}

impl ViewWriter for DieselRepository {
    fn record_view(
        &self,
        post_id: PostId,
        viewer: ViewerIdentity,
    ) -> RepositoryResult<ViewOutcome> {
        use crate::schema::{blog_posts, post_view_ips};

        let mut conn = self.conn()?;

        let (user_id, ip_address) = match viewer {
            ViewerIdentity::User(id) => (Some(id.get()), None),
            ViewerIdentity::Ip(ip) => (None, Some(ip.to_string())),
        };
        let view = DbNewPostView {
            post_id: post_id.get(),
            user_id,
            ip_address,
            viewed_at: Utc::now().naive_utc(),
        };

        // The partial unique indexes on `post_view_ips` decide whether this
        // identity was seen before; the counter moves only with a new row.
        let outcome = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let inserted = diesel::insert_into(post_view_ips::table)
                .values(&view)
                .on_conflict_do_nothing()
                .execute(conn)?;

            if inserted == 0 {
                return Ok(ViewOutcome::AlreadyCounted);
            }

            diesel::update(blog_posts::table.find(post_id.get()))
                .set(blog_posts::views.eq(blog_posts::views + 1))
                .execute(conn)?;

            Ok(ViewOutcome::Counted)
        })?;

        Ok(outcome)
    }
}

impl CompanyLogoReader for DieselRepository {
    fn list_company_logos(&self) -> RepositoryResult<Vec<CompanyLogo>> {
        use crate::schema::company_logos;

        let mut conn = self.conn()?;

        let items = company_logos::table
            .order(company_logos::id.asc())
            .load::<DbCompanyLogo>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CompanyLogo>, _>>()?;

        Ok(items)
    }

    fn get_company_logo(&self, id: CompanyLogoId) -> RepositoryResult<Option<CompanyLogo>> {
        use crate::schema::company_logos;

        let mut conn = self.conn()?;

        let logo = company_logos::table
            .find(id.get())
            .first::<DbCompanyLogo>(&mut conn)
            .optional()?;

        Ok(logo.map(TryInto::try_into).transpose()?)
    }
}
