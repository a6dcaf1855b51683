use crate::auth::AuthenticatedUser;
use crate::domain::types::UserId;
use crate::dto::follow::FollowStatsDto;
use crate::repository::{FollowReader, FollowWriter, UserReader};

use super::{ServiceError, ServiceResult, current_user_id};

fn target_user<R>(user_id: i32, repo: &R) -> ServiceResult<UserId>
where
    R: UserReader,
{
    let Ok(user_id) = UserId::new(user_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_user_by_id(user_id) {
        Ok(Some(user)) => Ok(user.id),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn follow_stats<R>(user_id: i32, repo: &R) -> ServiceResult<FollowStatsDto>
where
    R: UserReader + FollowReader,
{
    let user_id = target_user(user_id, repo)?;

    match repo.get_follow_stats(user_id) {
        Ok(stats) => Ok(stats.into()),
        Err(e) => {
            log::error!("Failed to get follow stats: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Follow `user_id`. Following someone twice is a no-op.
pub fn follow_user<R>(
    user_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<FollowStatsDto>
where
    R: UserReader + FollowReader + FollowWriter,
{
    let follower = current_user_id(user)?;
    let followee = target_user(user_id, repo)?;
    if follower == followee {
        return Err(ServiceError::Form("users cannot follow themselves".into()));
    }

    match repo.follow_user(follower, followee) {
        Ok(true) => log::info!("User {follower} now follows user {followee}"),
        Ok(false) => {}
        Err(e) => {
            log::error!("Failed to follow user: {e}");
            return Err(ServiceError::Internal);
        }
    }

    follow_stats(follower.get(), repo)
}

pub fn unfollow_user<R>(
    user_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<FollowStatsDto>
where
    R: UserReader + FollowReader + FollowWriter,
{
    let follower = current_user_id(user)?;
    let followee = target_user(user_id, repo)?;

    match repo.unfollow_user(follower, followee) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to unfollow user: {e}");
            return Err(ServiceError::Internal);
        }
    }

    follow_stats(follower.get(), repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{TestRepository, sample_user};
    use crate::services::test_support::reader;

    fn repo() -> TestRepository {
        TestRepository::new(vec![sample_user(1), sample_user(2), sample_user(3)])
    }

    #[test]
    fn following_updates_both_sides() {
        let repo = repo();

        let mine = follow_user(2, &reader(1), &repo).unwrap();
        follow_user(2, &reader(1), &repo).unwrap();
        follow_user(2, &reader(3), &repo).unwrap();

        assert_eq!(mine.following, vec![2]);
        assert_eq!(mine.following_count, 1);
        assert_eq!(follow_stats(2, &repo).unwrap().followers_count, 2);

        let after = unfollow_user(2, &reader(1), &repo).unwrap();
        assert!(after.following.is_empty());
        assert_eq!(unfollow_user(2, &reader(1), &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn self_and_unknown_follows_are_rejected() {
        let repo = repo();

        assert!(matches!(
            follow_user(1, &reader(1), &repo),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(follow_user(9, &reader(1), &repo), Err(ServiceError::NotFound));
        assert_eq!(follow_stats(0, &repo), Err(ServiceError::NotFound));
    }
}
