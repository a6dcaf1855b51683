use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::domain::engagement::LikeOutcome;
use crate::domain::types::PostId;
use crate::forms::engagement::{LikeInput, ReviewInput, ReviewPayload};
use crate::repository::DieselRepository;
use crate::routes::{api_error, client_ip, json_error};
use crate::services::engagement as engagement_service;

#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    /// Post slug.
    post: Option<String>,
}

fn like_status(outcome: LikeOutcome) -> HttpResponse {
    match outcome {
        LikeOutcome::Created => HttpResponse::Created().json(json!({ "status": "liked" })),
        LikeOutcome::AlreadyLiked => HttpResponse::Ok().json(json!({ "status": "already liked" })),
    }
}

#[post("/posts/{slug}/like")]
pub async fn like_post(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::like_post(&slug, &user, repo.get_ref()) {
        Ok(outcome) => like_status(outcome),
        Err(err) => api_error(err),
    }
}

#[delete("/posts/{slug}/like")]
pub async fn unlike_post(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::unlike_post(&slug, &user, repo.get_ref()) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Not liked yet"),
        Err(err) => api_error(err),
    }
}

#[get("/posts/{slug}/likes")]
pub async fn post_likes(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::list_post_likes(&slug, repo.get_ref()) {
        Ok(likes) => HttpResponse::Ok().json(likes),
        Err(err) => api_error(err),
    }
}

#[get("/posts/{slug}/views")]
pub async fn post_views(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::list_post_views(&slug, repo.get_ref()) {
        Ok(views) => HttpResponse::Ok().json(views),
        Err(err) => api_error(err),
    }
}

#[post("/posts/{slug}/record_view")]
pub async fn record_view(
    req: HttpRequest,
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ip = client_ip(&req);

    match engagement_service::record_view(&slug, user.as_ref(), ip.as_deref(), repo.get_ref()) {
        Ok(_) => HttpResponse::Created().json(json!({ "status": "view recorded" })),
        Err(err) => api_error(err),
    }
}

#[get("/likes")]
pub async fn my_likes(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::list_my_likes(&user, repo.get_ref()) {
        Ok(likes) => HttpResponse::Ok().json(likes),
        Err(err) => api_error(err),
    }
}

#[post("/likes")]
pub async fn create_like(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<LikeInput>,
) -> impl Responder {
    let post_id: PostId = match input.try_into() {
        Ok(post_id) => post_id,
        Err(e) => return api_error(e.into()),
    };

    match engagement_service::create_like(post_id, &user, repo.get_ref()) {
        Ok((LikeOutcome::Created, like)) => HttpResponse::Created().json(like),
        Ok((LikeOutcome::AlreadyLiked, like)) => HttpResponse::Ok().json(like),
        Err(err) => api_error(err),
    }
}

#[get("/likes/{id}")]
pub async fn get_like(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::get_like(id.into_inner(), &user, repo.get_ref()) {
        Ok(like) => HttpResponse::Ok().json(like),
        Err(err) => api_error(err),
    }
}

#[delete("/likes/{id}")]
pub async fn delete_like(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::delete_like(id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => api_error(err),
    }
}

#[get("/reviews")]
pub async fn list_reviews(
    params: web::Query<ReviewListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::list_reviews(params.post.as_deref(), repo.get_ref()) {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(err) => api_error(err),
    }
}

#[post("/reviews")]
pub async fn create_review(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<ReviewInput>,
) -> impl Responder {
    let payload: ReviewPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match engagement_service::create_review(payload, &user, repo.get_ref()) {
        Ok(review) => HttpResponse::Created().json(review),
        Err(err) => api_error(err),
    }
}

#[get("/reviews/{id}")]
pub async fn get_review(id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match engagement_service::get_review(id.into_inner(), repo.get_ref()) {
        Ok(review) => HttpResponse::Ok().json(review),
        Err(err) => api_error(err),
    }
}

#[get("/company-logos")]
pub async fn list_company_logos(repo: web::Data<DieselRepository>) -> impl Responder {
    match engagement_service::list_company_logos(repo.get_ref()) {
        Ok(logos) => HttpResponse::Ok().json(logos),
        Err(err) => api_error(err),
    }
}

#[get("/company-logos/{id}")]
pub async fn get_company_logo(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match engagement_service::get_company_logo(id.into_inner(), repo.get_ref()) {
        Ok(logo) => HttpResponse::Ok().json(logo),
        Err(err) => api_error(err),
    }
}
