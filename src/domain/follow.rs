use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;

/// Follow relationships of one user, derived from their follow section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowStats {
    pub user_id: UserId,
    /// Users that follow this user.
    pub followers_count: i64,
    /// Users this user follows.
    pub following: Vec<UserId>,
}

impl FollowStats {
    pub fn following_count(&self) -> i64 {
        self.following.len() as i64
    }
}
