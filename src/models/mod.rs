//! Diesel row types and their conversions into domain entities.

pub mod category;
pub mod config;
pub mod engagement;
pub mod follow;
pub mod forum;
pub mod post;
pub mod user;
