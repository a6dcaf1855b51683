use serde::Serialize;

use crate::domain::follow::FollowStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowStatsDto {
    pub user: i32,
    pub followers_count: i64,
    pub following_count: i64,
    pub following: Vec<i32>,
}

impl From<FollowStats> for FollowStatsDto {
    fn from(value: FollowStats) -> Self {
        Self {
            user: value.user_id.get(),
            followers_count: value.followers_count,
            following_count: value.following_count(),
            following: value.following.into_iter().map(|id| id.get()).collect(),
        }
    }
}
