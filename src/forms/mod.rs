pub mod categories;
pub mod engagement;
pub mod forum;
pub mod posts;
