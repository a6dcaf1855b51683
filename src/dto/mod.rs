//! Response shapes of the JSON API and the forum templates.

pub mod categories;
pub mod engagement;
pub mod follow;
pub mod forum;
pub mod posts;
pub mod users;
