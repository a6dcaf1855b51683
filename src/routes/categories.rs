use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::forms::categories::{
    CategoryInput, CategoryPayload, SubCategoryInput, SubCategoryPayload,
};
use crate::repository::DieselRepository;
use crate::routes::api_error;
use crate::services::categories as categories_service;

#[derive(Debug, Deserialize)]
pub struct SubCategoryListParams {
    category: Option<String>,
}

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories_service::list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => api_error(err),
    }
}

#[post("/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<CategoryInput>,
) -> impl Responder {
    let payload: CategoryPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match categories_service::create_category(payload, &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => api_error(err),
    }
}

#[get("/categories/{slug}")]
pub async fn get_category(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::get_category(&slug, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => api_error(err),
    }
}

#[put("/categories/{slug}")]
pub async fn update_category(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<CategoryInput>,
) -> impl Responder {
    let payload: CategoryPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match categories_service::update_category(&slug, payload, &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => api_error(err),
    }
}

#[delete("/categories/{slug}")]
pub async fn delete_category(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::delete_category(&slug, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => api_error(err),
    }
}

#[get("/subcategories")]
pub async fn list_subcategories(
    params: web::Query<SubCategoryListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    match categories_service::list_subcategories(category, repo.get_ref()) {
        Ok(subcategories) => HttpResponse::Ok().json(subcategories),
        Err(err) => api_error(err),
    }
}

#[post("/subcategories")]
pub async fn create_subcategory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<SubCategoryInput>,
) -> impl Responder {
    let payload: SubCategoryPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match categories_service::create_subcategory(payload, &user, repo.get_ref()) {
        Ok(subcategory) => HttpResponse::Created().json(subcategory),
        Err(err) => api_error(err),
    }
}

#[get("/subcategories/{slug}")]
pub async fn get_subcategory(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::get_subcategory(&slug, repo.get_ref()) {
        Ok(subcategory) => HttpResponse::Ok().json(subcategory),
        Err(err) => api_error(err),
    }
}

#[put("/subcategories/{slug}")]
pub async fn update_subcategory(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<SubCategoryInput>,
) -> impl Responder {
    let payload: SubCategoryPayload = match input.try_into() {
        Ok(payload) => payload,
        Err(e) => return api_error(e.into()),
    };

    match categories_service::update_subcategory(&slug, payload, &user, repo.get_ref()) {
        Ok(subcategory) => HttpResponse::Ok().json(subcategory),
        Err(err) => api_error(err),
    }
}

#[delete("/subcategories/{slug}")]
pub async fn delete_subcategory(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories_service::delete_subcategory(&slug, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => api_error(err),
    }
}
