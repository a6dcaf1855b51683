use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::api_error;
use crate::services::follow as follow_service;

#[get("/users/{user_id}/follow")]
pub async fn follow_stats(
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match follow_service::follow_stats(user_id.into_inner(), repo.get_ref()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => api_error(err),
    }
}

#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match follow_service::follow_user(user_id.into_inner(), &user, repo.get_ref()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => api_error(err),
    }
}

#[delete("/users/{user_id}/follow")]
pub async fn unfollow_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match follow_service::unfollow_user(user_id.into_inner(), &user, repo.get_ref()) {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => api_error(err),
    }
}
