//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_agora::auth::AuthenticatedUser;
use pushkind_agora::db::{DbPool, establish_connection_pool};
use pushkind_agora::domain::category::{Category, NewCategory};
use pushkind_agora::domain::post::{NewPost, Post};
use pushkind_agora::domain::types::{
    CategoryId, CategoryName, PostStatus, PostTitle, Slug, UserId,
};
use pushkind_agora::repository::{CategoryWriter, DieselRepository, PostWriter};
use pushkind_agora::schema::{blog_posts, users};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Mirror a user account the way the auth service would.
    pub fn seed_user(&self, id: i32) -> UserId {
        let mut conn = self.pool.get().expect("should acquire DB connection");
        diesel::insert_into(users::table)
            .values((
                users::id.eq(id),
                users::username.eq(format!("user{id}")),
                users::email.eq(format!("user{id}@example.com")),
            ))
            .execute(&mut conn)
            .expect("should create user");
        UserId::new(id).expect("valid user id")
    }

    pub fn set_views(&self, post: &Post, views: i32) {
        let mut conn = self.pool.get().expect("should acquire DB connection");
        diesel::update(blog_posts::table.find(post.id.get()))
            .set(blog_posts::views.eq(views))
            .execute(&mut conn)
            .expect("should set views");
    }
}

pub fn timestamp(offset: i64) -> NaiveDateTime {
    DateTime::from_timestamp(1_700_000_000 + offset, 0)
        .expect("valid timestamp")
        .naive_utc()
}

pub fn seed_category(repo: &DieselRepository, slug: &str) -> Category {
    let now = Utc::now().naive_utc();
    repo.create_category(&NewCategory {
        name: CategoryName::new(slug).expect("valid category name"),
        slug: Slug::new(slug).expect("valid slug"),
        font_awesome_icon: String::new(),
        description: String::new(),
        created_at: now,
        updated_at: now,
    })
    .expect("should create category")
}

pub fn new_post(slug: &str, category_id: CategoryId, author_id: UserId, offset: i64) -> NewPost {
    NewPost {
        title: PostTitle::new(slug).expect("valid title"),
        subtitle: String::new(),
        slug: Slug::new(slug).expect("valid slug"),
        description: format!("About {slug}"),
        featured_image: None,
        featured_image_url: None,
        status: PostStatus::Published,
        category_id,
        subcategory_id: None,
        author_id,
        tags: vec![],
        created_at: timestamp(offset),
        updated_at: timestamp(offset),
    }
}

pub fn seed_post(
    repo: &DieselRepository,
    slug: &str,
    category_id: CategoryId,
    author_id: UserId,
    offset: i64,
) -> Post {
    repo.create_post(&new_post(slug, category_id, author_id, offset))
        .expect("should create post")
}

pub fn signed_in(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: id.to_string(),
        email: format!("user{id}@example.com"),
        name: format!("User {id}"),
        roles: vec![],
        exp: i64::MAX,
    }
}
