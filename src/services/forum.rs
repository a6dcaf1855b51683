use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::forum::Question;
use crate::dto::forum::{AnswerDto, QuestionDto};
use crate::dto::posts::PostListDto;
use crate::forms::forum::{AnswerForm, AnswerFormPayload, AskQuestionForm, AskQuestionFormPayload};
use crate::pagination::Paginated;
use crate::repository::{
    AnswerListQuery, AnswerReader, AnswerSort, AnswerWriter, PostReader, QuestionListQuery,
    QuestionReader, QuestionSort, QuestionWriter,
};
use crate::services::posts::all_posts;
use crate::services::slug::{insert_with_unique_slug, slugify_or};

use super::{ServiceError, ServiceResult, current_user_id, parse_optional};

/// Questions and answers shown per forum page.
pub const FORUM_PAGE_SIZE: usize = 10;
/// Size of the popular questions sidebar.
pub const POPULAR_QUESTIONS_LIMIT: usize = 5;

/// Query string of the forum pages.
#[derive(Debug, Default, Deserialize)]
pub struct ForumQueryParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ForumQueryParams {
    fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn page(&self) -> usize {
        parse_optional::<usize>(self.page.as_deref())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

/// Question list page: the requested page plus the popular and blog
/// sidebars.
#[derive(Debug)]
pub struct QuestionsPage {
    pub questions: Paginated<QuestionDto>,
    pub popular: Vec<QuestionDto>,
    pub blogs: Vec<PostListDto>,
}

/// Question detail page.
#[derive(Debug)]
pub struct QuestionPage {
    pub question: QuestionDto,
    pub answers: Paginated<AnswerDto>,
    pub popular: Vec<QuestionDto>,
    pub blogs: Vec<PostListDto>,
}

/// Questions ranked by answer count, newest first among equals.
pub fn popular_questions<R>(repo: &R) -> ServiceResult<Vec<QuestionDto>>
where
    R: QuestionReader,
{
    let query = QuestionListQuery::default()
        .sort(QuestionSort::Best)
        .limit(POPULAR_QUESTIONS_LIMIT);

    match repo.list_questions(query) {
        Ok((_total, questions)) => Ok(questions.into_iter().map(QuestionDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list popular questions: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn show_questions<R>(params: &ForumQueryParams, repo: &R) -> ServiceResult<QuestionsPage>
where
    R: QuestionReader + PostReader,
{
    let page = params.page();
    let mut query = QuestionListQuery::default()
        .sort(QuestionSort::parse(params.sort.as_deref()))
        .paginate(page, FORUM_PAGE_SIZE);
    if let Some(search) = params.search() {
        query = query.search(search);
    }

    let questions = match repo.list_questions(query) {
        Ok((total, questions)) => Paginated::from_total(
            questions.into_iter().map(QuestionDto::from).collect(),
            page,
            total,
            FORUM_PAGE_SIZE,
        ),
        Err(e) => {
            log::error!("Failed to list questions: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(QuestionsPage {
        questions,
        popular: popular_questions(repo)?,
        blogs: all_posts(repo)?,
    })
}

fn find_question<R>(slug: &str, repo: &R) -> ServiceResult<Question>
where
    R: QuestionReader,
{
    match repo.get_question_by_slug(slug) {
        Ok(Some(question)) => Ok(question),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get question: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn show_question<R>(
    slug: &str,
    params: &ForumQueryParams,
    repo: &R,
) -> ServiceResult<QuestionPage>
where
    R: QuestionReader + AnswerReader + PostReader,
{
    let question = find_question(slug, repo)?;

    let page = params.page();
    let mut query = AnswerListQuery::new(question.id)
        .sort(AnswerSort::parse(params.sort.as_deref()))
        .paginate(page, FORUM_PAGE_SIZE);
    if let Some(search) = params.search() {
        query = query.search(search);
    }

    let answers = match repo.list_answers(query) {
        Ok((total, answers)) => Paginated::from_total(
            answers.into_iter().map(AnswerDto::from).collect(),
            page,
            total,
            FORUM_PAGE_SIZE,
        ),
        Err(e) => {
            log::error!("Failed to list answers: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(QuestionPage {
        question: question.into(),
        answers,
        popular: popular_questions(repo)?,
        blogs: all_posts(repo)?,
    })
}

/// Create a question from the submitted form.
///
/// Invalid input is ignored and yields `Ok(None)`.
pub fn ask_question<R>(
    form: AskQuestionForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Option<QuestionDto>>
where
    R: QuestionReader + QuestionWriter,
{
    let author_id = current_user_id(user)?;

    let payload = match AskQuestionFormPayload::try_from(form) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Ignored question form from user {author_id}: {e}");
            return Ok(None);
        }
    };
    let base = slugify_or(payload.title.as_str(), "question")?;

    let question = insert_with_unique_slug(
        &base,
        "question",
        |slug| repo.question_slug_exists(slug),
        |slug| repo.create_question(&payload.clone().into_new_question(author_id, slug)),
    )?;

    log::info!("Question '{}' asked by user {author_id}", question.slug);

    Ok(Some(question.into()))
}

/// Answer the question `slug`. Returns `false` when the form was ignored.
pub fn post_answer<R>(
    slug: &str,
    form: AnswerForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: QuestionReader + AnswerWriter,
{
    let author_id = current_user_id(user)?;
    let question = find_question(slug, repo)?;

    let payload = match AnswerFormPayload::try_from(form) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Ignored answer form from user {author_id}: {e}");
            return Ok(false);
        }
    };

    match repo.create_answer(&payload.into_new_answer(question.id, author_id)) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create answer: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PostStatus;
    use crate::repository::test::{
        TestRepository, sample_category, sample_post, sample_question, sample_user,
    };
    use crate::services::test_support::reader;

    fn repo() -> TestRepository {
        let mut draft = sample_post(3, "draft", 1, 1);
        draft.status = PostStatus::Draft;

        TestRepository::new(vec![sample_user(1), sample_user(2)])
            .with_categories(vec![sample_category(1, "travel")])
            .with_posts(vec![
                sample_post(1, "older", 1, 1),
                sample_post(2, "newer", 1, 2),
                draft,
            ])
            .with_questions(vec![
                sample_question(1, "first", sample_user(1)),
                sample_question(2, "second", sample_user(2)),
                sample_question(3, "third", sample_user(1)),
            ])
    }

    fn answer(content: &str) -> AnswerForm {
        AnswerForm {
            content: content.into(),
            image: None,
        }
    }

    fn params(sort: Option<&str>, page: Option<&str>) -> ForumQueryParams {
        ForumQueryParams {
            search: None,
            sort: sort.map(Into::into),
            page: page.map(Into::into),
        }
    }

    #[test]
    fn question_list_sorts_by_answers() {
        let repo = repo();
        post_answer("first", answer("one"), &reader(2), &repo).unwrap();
        post_answer("first", answer("two"), &reader(2), &repo).unwrap();
        post_answer("second", answer("three"), &reader(1), &repo).unwrap();

        let slugs = |page: &QuestionsPage| -> Vec<String> {
            page.questions.items.iter().map(|q| q.slug.clone()).collect()
        };

        let top = show_questions(&params(Some("top"), None), &repo).unwrap();
        assert_eq!(slugs(&top), vec!["first", "second", "third"]);
        assert_eq!(top.questions.items[0].answers_count, 2);

        let latest = show_questions(&params(Some("unknown"), Some("zero")), &repo).unwrap();
        assert_eq!(slugs(&latest), vec!["third", "second", "first"]);
        assert_eq!(latest.questions.page, 1);

        assert_eq!(top.popular[0].slug, "first");
        assert!(top.popular.len() <= POPULAR_QUESTIONS_LIMIT);
    }

    #[test]
    fn forum_pages_list_published_blog_posts() {
        let repo = repo();

        let list = show_questions(&ForumQueryParams::default(), &repo).unwrap();
        let slugs: Vec<&str> = list.blogs.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let detail = show_question("first", &ForumQueryParams::default(), &repo).unwrap();
        assert_eq!(detail.blogs, list.blogs);
    }

    #[test]
    fn question_search_matches_title_or_content() {
        let repo = repo();
        let found = show_questions(
            &ForumQueryParams {
                search: Some("SECOND".into()),
                ..ForumQueryParams::default()
            },
            &repo,
        )
        .unwrap();
        assert_eq!(found.questions.items.len(), 1);
        assert_eq!(found.questions.items[0].slug, "second");
    }

    #[test]
    fn recently_sort_caps_answers() {
        let repo = repo();
        for n in 0..7 {
            post_answer("first", answer(&format!("answer {n}")), &reader(2), &repo).unwrap();
        }

        let recent = show_question("first", &params(Some("recently"), None), &repo).unwrap();
        assert_eq!(recent.answers.items.len(), AnswerSort::RECENT_LIMIT);
        assert_eq!(recent.answers.items[0].content, "answer 6");

        let old = show_question("first", &params(Some("old"), None), &repo).unwrap();
        assert_eq!(old.answers.items.len(), 7);
        assert_eq!(old.answers.items[0].content, "answer 0");
        assert_eq!(old.question.answers_count, 7);
    }

    #[test]
    fn blank_answer_is_ignored() {
        let repo = repo();
        let question_id = crate::domain::types::QuestionId::new(1).unwrap();

        assert_eq!(post_answer("first", answer("   "), &reader(2), &repo), Ok(false));
        assert_eq!(repo.answers_for(question_id), 0);
        assert_eq!(
            post_answer("missing", answer("hi"), &reader(2), &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn asked_questions_get_unique_slugs() {
        let repo = repo();
        let form = || AskQuestionForm {
            title: "How to cook rice?".into(),
            content: "Details".into(),
            image: None,
        };

        let first = ask_question(form(), &reader(1), &repo).unwrap().unwrap();
        let second = ask_question(form(), &reader(1), &repo).unwrap().unwrap();
        assert_eq!(first.slug, "how-to-cook-rice");
        assert_eq!(second.slug, "how-to-cook-rice-1");

        let russian = AskQuestionForm {
            title: "Как сварить рис?".into(),
            ..form()
        };
        let asked = ask_question(russian, &reader(1), &repo).unwrap().unwrap();
        assert_eq!(asked.slug, "kak-svarit-ris");

        let blank = AskQuestionForm {
            content: String::new(),
            ..form()
        };
        assert_eq!(ask_question(blank, &reader(1), &repo), Ok(None));
    }
}
