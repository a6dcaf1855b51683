use actix_identity::{Identity, IdentityMiddleware};
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, post, test, web};
use pushkind_agora::repository::{DieselRepository, PostReader};
use pushkind_agora::routes::engagement;
use serde_json::{Value, json};

mod common;

use common::{TestDb, seed_category, seed_post, signed_in};

/// Stands in for the auth service: stores the claims of user `id` in the
/// identity cookie.
#[post("/sign-in/{id}")]
async fn sign_in(req: HttpRequest, id: web::Path<i32>) -> HttpResponse {
    let claims = serde_json::to_string(&signed_in(*id)).expect("claims serialize");
    Identity::login(&req.extensions(), claims).expect("identity login");
    HttpResponse::Ok().finish()
}

fn session_key() -> Key {
    Key::from(&[7u8; 64][..])
}

macro_rules! api_app {
    ($repo:expr) => {
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), session_key())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($repo))
                .service(sign_in)
                .service(
                    web::scope("/api")
                        .service(engagement::like_post)
                        .service(engagement::unlike_post)
                        .service(engagement::record_view),
                ),
        )
        .await
    };
}

fn seeded(test_db: &TestDb) -> DieselRepository {
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    test_db.seed_user(2);
    let category = seed_category(&repo, "travel");
    seed_post(&repo, "trip", category.id, author, 0);
    repo
}

#[actix_web::test]
async fn like_flow_reports_statuses() {
    let test_db = TestDb::new();
    let app = api_app!(seeded(&test_db));

    let resp = test::call_service(&app, test::TestRequest::post().uri("/sign-in/2").to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie: Cookie<'static> = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();

    let like = || {
        test::TestRequest::post()
            .uri("/api/posts/trip/like")
            .cookie(cookie.clone())
            .to_request()
    };
    let unlike = || {
        test::TestRequest::delete()
            .uri("/api/posts/trip/like")
            .cookie(cookie.clone())
            .to_request()
    };

    let resp = test::call_service(&app, like()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "liked" }));

    let resp = test::call_service(&app, like()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "already liked" }));

    let resp = test::call_service(&app, unlike()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, unlike()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Not liked yet" }));

    let missing = test::TestRequest::post()
        .uri("/api/posts/missing/like")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(
        test::call_service(&app, missing).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn liking_requires_a_session() {
    let test_db = TestDb::new();
    let app = api_app!(seeded(&test_db));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts/trip/like")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn anonymous_views_are_counted_per_address() {
    let test_db = TestDb::new();
    let repo = seeded(&test_db);
    let app = api_app!(repo.clone());

    let view = |forwarded: &str| {
        test::TestRequest::post()
            .uri("/api/posts/trip/record_view")
            .insert_header(("X-Forwarded-For", forwarded))
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_request()
    };

    for forwarded in ["unknown", "192.0.2.1:5123", "192.0.2.1"] {
        let resp = test::call_service(&app, view(forwarded)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "status": "view recorded" }));
    }

    let resp = test::call_service(&app, view("203.0.113.9")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let post = repo
        .get_post_by_slug("trip", None)
        .unwrap()
        .expect("post exists");
    assert_eq!(post.views, 2);

    let anonymous = test::TestRequest::post()
        .uri("/api/posts/trip/record_view")
        .to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::BAD_REQUEST
    );

    let missing = test::TestRequest::post()
        .uri("/api/posts/missing/record_view")
        .peer_addr("192.0.2.1:4000".parse().unwrap())
        .to_request();
    assert_eq!(
        test::call_service(&app, missing).await.status(),
        StatusCode::NOT_FOUND
    );
}
