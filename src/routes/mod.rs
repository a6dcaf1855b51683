use std::net::{IpAddr, SocketAddr};

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde_json::json;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod categories;
pub mod engagement;
pub mod follow;
pub mod forum;
pub mod posts;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Client address: first `X-Forwarded-For` entry, else the peer address.
///
/// A forwarded entry may carry a port (`203.0.113.9:4711`). Entries that are
/// not an address at all, such as `unknown`, fall back to the peer.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .and_then(|value| {
            value
                .parse::<IpAddr>()
                .or_else(|_| value.parse::<SocketAddr>().map(|addr| addr.ip()))
                .ok()
        });

    forwarded
        .or_else(|| req.peer_addr().map(|addr| addr.ip()))
        .map(|ip| ip.to_string())
}

/// JSON body `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

/// Map a service failure onto the JSON API's status codes.
pub fn api_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Not authenticated"),
        ServiceError::Forbidden => json_error(StatusCode::FORBIDDEN, "Permission denied"),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
        ServiceError::Conflict(message) => json_error(StatusCode::CONFLICT, &message),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            json_error(StatusCode::BAD_REQUEST, &message)
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
