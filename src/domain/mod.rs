//! Domain entities shared by the repository, service and route layers.

pub mod category;
pub mod engagement;
pub mod follow;
pub mod forum;
pub mod post;
pub mod types;
pub mod user;
