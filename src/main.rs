use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use tera::Tera;

use pushkind_agora::db::establish_connection_pool;
use pushkind_agora::models::config::ServerConfig;
use pushkind_agora::repository::DieselRepository;
use pushkind_agora::routes::{categories, engagement, follow, forum, posts};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Invalid session secret, at least 64 bytes are required: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&format!("{}/**/*", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.bind_address.clone(), server_config.port);
    log::info!(
        "Starting server at {}:{}",
        server_config.bind_address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/assets", &server_config.static_dir))
            .service(
                web::scope("/api")
                    .service(categories::list_categories)
                    .service(categories::create_category)
                    .service(categories::get_category)
                    .service(categories::update_category)
                    .service(categories::delete_category)
                    .service(categories::list_subcategories)
                    .service(categories::create_subcategory)
                    .service(categories::get_subcategory)
                    .service(categories::update_subcategory)
                    .service(categories::delete_subcategory)
                    .service(posts::list_posts)
                    .service(posts::create_post)
                    .service(posts::popular_posts)
                    .service(posts::latest_posts)
                    .service(posts::category_posts)
                    .service(posts::user_posts)
                    .service(engagement::like_post)
                    .service(engagement::unlike_post)
                    .service(engagement::post_likes)
                    .service(engagement::post_views)
                    .service(engagement::record_view)
                    .service(posts::get_post)
                    .service(posts::update_post)
                    .service(posts::delete_post)
                    .service(engagement::my_likes)
                    .service(engagement::create_like)
                    .service(engagement::get_like)
                    .service(engagement::delete_like)
                    .service(engagement::list_reviews)
                    .service(engagement::create_review)
                    .service(engagement::get_review)
                    .service(engagement::list_company_logos)
                    .service(engagement::get_company_logo)
                    .service(follow::follow_stats)
                    .service(follow::follow_user)
                    .service(follow::unfollow_user),
            )
            .service(forum::show_questions)
            .service(forum::ask_question)
            .service(forum::show_question)
            .service(forum::post_answer)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
