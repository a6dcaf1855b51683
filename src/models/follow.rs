use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Diesel model representing the `follow_sections` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::follow_sections)]
pub struct FollowSection {
    pub id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::follow_sections)]
pub struct NewFollowSection {
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::follow_section_following)]
pub struct NewFollowing {
    pub follow_section_id: i32,
    pub user_id: i32,
}
