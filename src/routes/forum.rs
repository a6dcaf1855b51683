use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::forum::{AnswerForm, AskQuestionForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::forum::{
    ForumQueryParams, ask_question as ask_question_service, post_answer as post_answer_service,
    show_question as show_question_service, show_questions as show_questions_service,
};

const QUESTIONS_URL: &str = "/forum/questions";

#[get("/forum/questions")]
pub async fn show_questions(
    user: Option<AuthenticatedUser>,
    params: web::Query<ForumQueryParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_questions_service(&params, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "forum",
                &server_config.auth_service_url,
            );
            context.insert("questions", &page.questions);
            context.insert("pager", &page.questions);
            context.insert("popular_questions", &page.popular);
            context.insert("blogs", &page.blogs);
            context.insert("search", params.search.as_deref().unwrap_or_default());
            context.insert("sort", params.sort.as_deref().unwrap_or_default());
            render_template(&tera, "forum/questions.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render questions page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/forum/questions/{slug}")]
pub async fn show_question(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    params: web::Query<ForumQueryParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_question_service(&slug, &params, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "forum",
                &server_config.auth_service_url,
            );
            context.insert("question", &page.question);
            context.insert("answers", &page.answers);
            context.insert("pager", &page.answers);
            context.insert("popular_questions", &page.popular);
            context.insert("blogs", &page.blogs);
            context.insert("search", params.search.as_deref().unwrap_or_default());
            context.insert("sort", params.sort.as_deref().unwrap_or_default());
            render_template(&tera, "forum/question.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render question page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/forum/questions")]
pub async fn ask_question(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AskQuestionForm>,
) -> impl Responder {
    let Some(user) = user else {
        return redirect(QUESTIONS_URL);
    };

    match ask_question_service(form, &user, repo.get_ref()) {
        Ok(_) => redirect(QUESTIONS_URL),
        Err(ServiceError::Unauthorized) => redirect(QUESTIONS_URL),
        Err(err) => {
            log::error!("Failed to ask question: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/forum/questions/{slug}/answer")]
pub async fn post_answer(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AnswerForm>,
) -> impl Responder {
    let Some(user) = user else {
        return redirect(QUESTIONS_URL);
    };

    match post_answer_service(&slug, form, &user, repo.get_ref()) {
        Ok(_) => redirect(&format!("{QUESTIONS_URL}/{slug}")),
        Err(ServiceError::NotFound | ServiceError::Unauthorized) => redirect(QUESTIONS_URL),
        Err(err) => {
            log::error!("Failed to post answer: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
