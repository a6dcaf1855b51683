use actix_web::{HttpResponse, Responder, delete, get, post, route, web};

use crate::auth::AuthenticatedUser;
use crate::forms::posts::{PostInput, PostPayload};
use crate::repository::DieselRepository;
use crate::routes::api_error;
use crate::services::posts::{self as posts_service, PostListParams};

#[get("/posts")]
pub async fn list_posts(
    params: web::Query<PostListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match posts_service::list_posts(params.into_inner(), repo.get_ref()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => api_error(err),
    }
}

#[post("/posts")]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<PostInput>,
) -> impl Responder {
    let payload: PostPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match posts_service::create_post(payload, &user, repo.get_ref()) {
        Ok(post) => HttpResponse::Created().json(post),
        Err(err) => api_error(err),
    }
}

#[get("/posts/{slug}")]
pub async fn get_post(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match posts_service::get_post(&slug, repo.get_ref()) {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => api_error(err),
    }
}

#[route("/posts/{slug}", method = "PUT", method = "PATCH")]
pub async fn update_post(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<PostInput>,
) -> impl Responder {
    let payload: PostPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match posts_service::update_post(&slug, payload, &user, repo.get_ref()) {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => api_error(err),
    }
}

#[delete("/posts/{slug}")]
pub async fn delete_post(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match posts_service::delete_post(&slug, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => api_error(err),
    }
}

#[get("/popular-posts")]
pub async fn popular_posts(repo: web::Data<DieselRepository>) -> impl Responder {
    match posts_service::popular_posts(repo.get_ref()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => api_error(err),
    }
}

#[get("/latest-posts")]
pub async fn latest_posts(repo: web::Data<DieselRepository>) -> impl Responder {
    match posts_service::latest_posts(repo.get_ref()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => api_error(err),
    }
}

#[get("/category/{slug}/posts")]
pub async fn category_posts(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match posts_service::category_posts(&slug, repo.get_ref()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => api_error(err),
    }
}

#[get("/user/{user_id}/posts")]
pub async fn user_posts(
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match posts_service::user_posts(user_id.into_inner(), repo.get_ref()) {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => api_error(err),
    }
}
