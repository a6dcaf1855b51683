use std::collections::HashSet;
use std::thread;

use chrono::Utc;
use pushkind_agora::domain::engagement::{LikeOutcome, NewReview, ViewOutcome};
use pushkind_agora::domain::category::NewSubCategory;
use pushkind_agora::domain::forum::{NewAnswer, NewQuestion};
use pushkind_agora::domain::post::PostUpdate;
use pushkind_agora::domain::types::{
    AnswerContent, CategoryId, IpAddress, PostStatus, PostTitle, QuestionTitle, Rating, Slug,
    SubCategoryName, TagName, ViewerIdentity,
};
use pushkind_agora::forms::posts::PostPayload;
use pushkind_agora::repository::{
    AnswerListQuery, AnswerReader, AnswerSort, AnswerWriter, CategoryReader, CategoryWriter,
    FollowReader, FollowWriter, LikeReader, LikeWriter, PostListQuery, PostOrdering, PostReader,
    PostWriter, QuestionListQuery, QuestionReader, QuestionSort, QuestionWriter, ReviewReader,
    ReviewWriter, SubCategoryWriter, ViewReader, ViewWriter,
};
use pushkind_agora::services::posts::{create_post, popular_posts};

mod common;

use common::{TestDb, seed_category, seed_post, signed_in, timestamp};

#[test]
fn liking_twice_keeps_one_like() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let reader = test_db.seed_user(2);
    let category = seed_category(&repo, "travel");
    let post = seed_post(&repo, "trip", category.id, author, 0);

    assert_eq!(repo.like_post(post.id, reader).unwrap(), LikeOutcome::Created);
    assert_eq!(repo.like_post(post.id, reader).unwrap(), LikeOutcome::AlreadyLiked);
    assert_eq!(repo.list_likes_for_post(post.id).unwrap().len(), 1);

    let (_, listed) = repo.list_posts(PostListQuery::published()).unwrap();
    assert_eq!(listed[0].likes_count, 1);

    assert_eq!(repo.unlike_post(post.id, reader).unwrap(), 1);
    assert_eq!(repo.unlike_post(post.id, reader).unwrap(), 0);
}

#[test]
fn reviews_are_listed_newest_first_per_post() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let reader = test_db.seed_user(2);
    let category = seed_category(&repo, "travel");
    let trip = seed_post(&repo, "trip", category.id, author, 0);
    let hike = seed_post(&repo, "hike", category.id, author, 1);

    let review = |post_id, rating, offset| NewReview {
        post_id,
        user_id: reader,
        rating: Rating::new(rating).unwrap(),
        comment: format!("rated {rating}"),
        created_at: timestamp(offset),
    };

    let first = repo.create_review(&review(trip.id, 4, 10)).unwrap();
    let second = repo.create_review(&review(trip.id, 2, 20)).unwrap();
    repo.create_review(&review(hike.id, 5, 30)).unwrap();

    assert_eq!(first.user.id, reader);
    assert_eq!(first.rating.get(), 4);

    let for_trip = repo.list_reviews(Some("trip")).unwrap();
    let ids: Vec<_> = for_trip.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert_eq!(repo.list_reviews(None).unwrap().len(), 3);
    assert!(repo.list_reviews(Some("missing")).unwrap().is_empty());

    let fetched = repo.get_review(first.id).unwrap().expect("review exists");
    assert_eq!(fetched.comment, "rated 4");
    assert_eq!(fetched.post_id, trip.id);
}

#[test]
fn repeated_views_increment_once_per_identity() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    let post = seed_post(&repo, "trip", category.id, author, 0);

    let ip = ViewerIdentity::Ip(IpAddress::parse("203.0.113.7").unwrap());
    let other_ip = ViewerIdentity::Ip(IpAddress::parse("203.0.113.8").unwrap());
    let user = ViewerIdentity::User(author);

    assert_eq!(repo.record_view(post.id, ip).unwrap(), ViewOutcome::Counted);
    assert_eq!(repo.record_view(post.id, ip).unwrap(), ViewOutcome::AlreadyCounted);
    assert_eq!(repo.record_view(post.id, other_ip).unwrap(), ViewOutcome::Counted);
    assert_eq!(repo.record_view(post.id, user).unwrap(), ViewOutcome::Counted);
    assert_eq!(repo.record_view(post.id, user).unwrap(), ViewOutcome::AlreadyCounted);

    let stored = repo
        .get_post_by_slug("trip", None)
        .unwrap()
        .expect("post should exist");
    assert_eq!(stored.views, 3);
    assert_eq!(repo.list_post_views(post.id).unwrap().len(), 3);
}

#[test]
fn category_filter_and_ordering() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let travel = seed_category(&repo, "travel");
    let empty = seed_category(&repo, "empty");
    seed_post(&repo, "older", travel.id, author, 0);
    seed_post(&repo, "newer", travel.id, author, 10);

    let (total, posts) = repo
        .list_posts(PostListQuery::published().category("empty"))
        .unwrap();
    assert_eq!(total, 0);
    assert!(posts.is_empty());
    assert_eq!(empty.slug, "empty");

    let order = PostOrdering::parse(Some("title"));
    let (_, posts) = repo
        .list_posts(PostListQuery::published().category("travel").order(order))
        .unwrap();
    let slugs: Vec<&str> = posts.iter().map(|p| p.post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);

    let (_, posts) = repo
        .list_posts(PostListQuery::published().order(PostOrdering::CreatedAsc))
        .unwrap();
    assert_eq!(posts[0].post.slug, "older");
}

#[test]
fn search_matches_literally_and_case_insensitively() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    seed_post(&repo, "rome", category.id, author, 0);
    seed_post(&repo, "paris", category.id, author, 1);

    let (_, posts) = repo
        .list_posts(PostListQuery::published().search("ABOUT ROME"))
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.slug, "rome");

    let (_, posts) = repo
        .list_posts(PostListQuery::published().search("%"))
        .unwrap();
    assert!(posts.is_empty());
}

#[test]
fn drafts_are_hidden_from_published_listings() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    let mut draft = common::new_post("draft", category.id, author, 0);
    draft.status = PostStatus::Draft;
    repo.create_post(&draft).unwrap();

    let (total, _) = repo.list_posts(PostListQuery::published()).unwrap();
    assert_eq!(total, 0);
    assert!(
        repo.get_post_by_slug("draft", Some(PostStatus::Published))
            .unwrap()
            .is_none()
    );
}

#[test]
fn popular_posts_need_a_hundred_views() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    let popular = seed_post(&repo, "popular", category.id, author, 0);
    let quiet = seed_post(&repo, "quiet", category.id, author, 1);
    test_db.set_views(&popular, 150);
    test_db.set_views(&quiet, 50);

    let posts = popular_posts(&repo).unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "popular");
    assert_eq!(posts[0].views, 150);
}

#[test]
fn tags_are_shared_and_filterable() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    let payload = |title: &str, tags: &[&str]| PostPayload {
        title: Some(PostTitle::new(title).unwrap()),
        category_id: Some(category.id),
        tags: Some(tags.iter().map(|t| TagName::new(*t).unwrap()).collect()),
        ..PostPayload::default()
    };

    let first = create_post(payload("First", &["rust", "web"]), &signed_in(1), &repo).unwrap();
    create_post(payload("Second", &["rust"]), &signed_in(1), &repo).unwrap();

    assert_eq!(first.post.tags.len(), 2);
    let (total, posts) = repo
        .list_posts(PostListQuery::published().tag("WEB"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(posts[0].post.slug, "first");

    let (total, _) = repo
        .list_posts(PostListQuery::published().tag("rust"))
        .unwrap();
    assert_eq!(total, 2);
}

#[test]
fn concurrent_identical_titles_get_distinct_slugs() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    test_db.seed_user(1);
    let category_id: CategoryId = seed_category(&repo, "travel").id;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let repo = repo.clone();
            thread::spawn(move || {
                let payload = PostPayload {
                    title: Some(PostTitle::new("Hello World").unwrap()),
                    category_id: Some(category_id),
                    ..PostPayload::default()
                };
                create_post(payload, &signed_in(1), &repo).map(|post| post.post.slug)
            })
        })
        .collect();

    let slugs: HashSet<String> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should finish").expect("post created"))
        .collect();

    assert_eq!(slugs.len(), 4);
    assert!(slugs.contains("hello-world"));
}

#[test]
fn post_update_clears_subcategory_only_when_asked() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    let beaches = repo
        .create_subcategory(&NewSubCategory {
            name: SubCategoryName::new("Beaches").unwrap(),
            slug: Slug::new("beaches").unwrap(),
            description: String::new(),
            category_id: category.id,
            created_at: timestamp(0),
            updated_at: timestamp(0),
        })
        .unwrap();
    let mut new_post = common::new_post("sandy", category.id, author, 0);
    new_post.subcategory_id = Some(beaches.id);
    let post = repo.create_post(&new_post).unwrap();

    let retitle = PostUpdate {
        title: Some(PostTitle::new("Sandy shores").unwrap()),
        ..PostUpdate::default()
    };
    assert_eq!(repo.update_post(post.id, &retitle).unwrap(), 1);
    let stored = repo.get_post_by_slug("sandy", None).unwrap().unwrap();
    assert_eq!(stored.subcategory_id, Some(beaches.id));

    let clear = PostUpdate {
        subcategory_id: Some(None),
        ..PostUpdate::default()
    };
    assert_eq!(repo.update_post(post.id, &clear).unwrap(), 1);
    let stored = repo.get_post_by_slug("sandy", None).unwrap().unwrap();
    assert_eq!(stored.subcategory_id, None);
    assert_eq!(stored.title.as_str(), "Sandy shores");
}

#[test]
fn deleting_a_category_removes_its_posts() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);
    let category = seed_category(&repo, "travel");
    seed_post(&repo, "trip", category.id, author, 0);

    assert_eq!(repo.delete_category(category.id).unwrap(), 1);
    assert!(repo.get_category_by_slug("travel").unwrap().is_none());
    assert!(repo.get_post_by_slug("trip", None).unwrap().is_none());
}

#[test]
fn forum_sorts_and_caps_recent_answers() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let author = test_db.seed_user(1);

    let mut questions = Vec::new();
    for (n, slug) in ["quiet", "busy", "medium"].iter().enumerate() {
        let question = repo
            .create_question(&NewQuestion {
                author_id: author,
                title: QuestionTitle::new(*slug).unwrap(),
                slug: Slug::new(*slug).unwrap(),
                content: Some(format!("Question {slug}")),
                image: None,
                created_at: timestamp(n as i64),
            })
            .unwrap();
        questions.push(question);
    }

    let answer = |question: usize, n: i64| NewAnswer {
        question_id: questions[question].id,
        author_id: author,
        content: AnswerContent::new(format!("answer {n}")).unwrap(),
        image: None,
        created_at: timestamp(100 + n),
    };
    for n in 0..7 {
        repo.create_answer(&answer(1, n)).unwrap();
    }
    repo.create_answer(&answer(2, 0)).unwrap();

    let (total, top) = repo
        .list_questions(QuestionListQuery::default().sort(QuestionSort::Top))
        .unwrap();
    let slugs: Vec<&str> = top.iter().map(|q| q.slug.as_str()).collect();
    assert_eq!(total, 3);
    assert_eq!(slugs, vec!["busy", "medium", "quiet"]);
    assert_eq!(top[0].answers_count, 7);

    let (_, latest) = repo
        .list_questions(QuestionListQuery::default().paginate(1, 2))
        .unwrap();
    let slugs: Vec<&str> = latest.iter().map(|q| q.slug.as_str()).collect();
    assert_eq!(slugs, vec!["medium", "busy"]);

    let (_, found) = repo
        .list_questions(QuestionListQuery::default().search("question BUSY"))
        .unwrap();
    assert_eq!(found.len(), 1);

    let busy = questions[1].id;
    let (total, recent) = repo
        .list_answers(AnswerListQuery::new(busy).sort(AnswerSort::Recently))
        .unwrap();
    assert_eq!(total, AnswerSort::RECENT_LIMIT);
    assert_eq!(recent.len(), AnswerSort::RECENT_LIMIT);
    assert_eq!(recent[0].content.as_str(), "answer 6");

    let (_, old) = repo
        .list_answers(AnswerListQuery::new(busy).sort(AnswerSort::Old).paginate(2, 5))
        .unwrap();
    let contents: Vec<&str> = old.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(contents, vec!["answer 5", "answer 6"]);
}

#[test]
fn following_is_idempotent() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let alice = test_db.seed_user(1);
    let bob = test_db.seed_user(2);

    assert!(repo.follow_user(alice, bob).unwrap());
    assert!(!repo.follow_user(alice, bob).unwrap());

    let stats = repo.get_follow_stats(alice).unwrap();
    assert_eq!(stats.following, vec![bob]);
    assert_eq!(repo.get_follow_stats(bob).unwrap().followers_count, 1);

    assert_eq!(repo.unfollow_user(alice, bob).unwrap(), 1);
    assert!(repo.get_follow_stats(alice).unwrap().following.is_empty());
}

#[test]
fn category_writes_reject_duplicate_slugs() {
    let test_db = TestDb::new();
    let repo = test_db.repo();
    let category = seed_category(&repo, "travel");
    let now = Utc::now().naive_utc();

    let duplicate = repo.create_category(&pushkind_agora::domain::category::NewCategory {
        name: category.name.clone(),
        slug: category.slug.clone(),
        font_awesome_icon: String::new(),
        description: String::new(),
        created_at: now,
        updated_at: now,
    });

    assert!(matches!(
        duplicate,
        Err(pushkind_agora::repository::RepositoryError::Conflict(_))
    ));
}
