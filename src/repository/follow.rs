use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::follow::FollowStats;
use crate::domain::types::UserId;
use crate::models::follow::{NewFollowSection, NewFollowing};
use crate::repository::{
    DieselRepository, FollowReader, FollowWriter, RepositoryError, RepositoryResult,
};

impl FollowReader for DieselRepository {
    fn get_follow_stats(&self, user_id: UserId) -> RepositoryResult<FollowStats> {
        use crate::schema::{follow_section_following, follow_sections};

        let mut conn = self.conn()?;

        let followers_count = follow_section_following::table
            .filter(follow_section_following::user_id.eq(user_id.get()))
            .select(count_star())
            .get_result::<i64>(&mut conn)?;

        let following = follow_section_following::table
            .inner_join(follow_sections::table)
            .filter(follow_sections::user_id.eq(user_id.get()))
            .order(follow_section_following::user_id.asc())
            .select(follow_section_following::user_id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .map(UserId::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FollowStats {
            user_id,
            followers_count,
            following,
        })
    }
}

impl FollowWriter for DieselRepository {
    fn follow_user(&self, follower: UserId, followee: UserId) -> RepositoryResult<bool> {
        use crate::schema::{follow_section_following, follow_sections};

        let mut conn = self.conn()?;

        let now = Utc::now().naive_utc();

        let created = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            diesel::insert_into(follow_sections::table)
                .values(&NewFollowSection {
                    user_id: follower.get(),
                    created_at: now,
                    updated_at: now,
                })
                .on_conflict(follow_sections::user_id)
                .do_nothing()
                .execute(conn)?;

            let section_id = follow_sections::table
                .filter(follow_sections::user_id.eq(follower.get()))
                .select(follow_sections::id)
                .first::<i32>(conn)?;

            let inserted = diesel::insert_into(follow_section_following::table)
                .values(&NewFollowing {
                    follow_section_id: section_id,
                    user_id: followee.get(),
                })
                .on_conflict_do_nothing()
                .execute(conn)?;

            if inserted > 0 {
                diesel::update(follow_sections::table.find(section_id))
                    .set(follow_sections::updated_at.eq(now))
                    .execute(conn)?;
            }

            Ok(inserted > 0)
        })?;

        Ok(created)
    }

    fn unfollow_user(&self, follower: UserId, followee: UserId) -> RepositoryResult<usize> {
        use crate::schema::{follow_section_following, follow_sections};

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            follow_section_following::table
                .filter(follow_section_following::user_id.eq(followee.get()))
                .filter(
                    follow_section_following::follow_section_id.eq_any(
                        follow_sections::table
                            .filter(follow_sections::user_id.eq(follower.get()))
                            .select(follow_sections::id),
                    ),
                ),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
