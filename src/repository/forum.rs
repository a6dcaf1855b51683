use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::forum::{Answer, NewAnswer, NewQuestion, Question};
use crate::domain::types::Slug;
use crate::models::forum::{
    Answer as DbAnswer, NewAnswer as DbNewAnswer, NewQuestion as DbNewQuestion,
    Question as DbQuestion, QuestionWithCount,
};
use crate::models::user::User as DbUser;
use crate::repository::{
    AnswerListQuery, AnswerReader, AnswerSort, AnswerWriter, DieselRepository, QuestionListQuery,
    QuestionReader, QuestionSort, QuestionWriter, RepositoryError, RepositoryResult, like_pattern,
    page_window,
};
use crate::schema::{answers, questions, users};

const QUESTION_LIST_SQL: &str = r"
SELECT q.id, q.author_id, q.title, q.slug, q.content, q.image, q.created_at,
       (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answers_count
FROM questions q
WHERE (? IS NULL OR q.title LIKE ? ESCAPE '\' OR q.content LIKE ? ESCAPE '\')
";

impl QuestionSort {
    fn order_clause(self) -> &'static str {
        match self {
            Self::Top => "answers_count DESC, q.id DESC",
            Self::Best => "answers_count DESC, q.created_at DESC, q.id DESC",
            Self::Latest => "q.created_at DESC, q.id DESC",
        }
    }
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern)
}

fn load_authors(
    conn: &mut SqliteConnection,
    author_ids: &[i32],
) -> RepositoryResult<HashMap<i32, DbUser>> {
    let authors = users::table
        .filter(users::id.eq_any(author_ids))
        .load::<DbUser>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(authors)
}

fn missing_author(id: i32) -> RepositoryError {
    RepositoryError::ValidationError(format!("author {id} does not exist"))
}

fn count_answers(conn: &mut SqliteConnection, question_id: i32) -> RepositoryResult<i64> {
    let total = answers::table
        .filter(answers::question_id.eq(question_id))
        .select(count_star())
        .get_result::<i64>(conn)?;

    Ok(total)
}

impl QuestionReader for DieselRepository {
    fn list_questions(
        &self,
        query: QuestionListQuery,
    ) -> RepositoryResult<(usize, Vec<Question>)> {
        let mut conn = self.conn()?;

        let pattern = search_pattern(query.search.as_deref());

        let mut total_query = questions::table.into_boxed::<Sqlite>();
        if let Some(pattern) = &pattern {
            total_query = total_query.filter(
                questions::title
                    .like(pattern.clone())
                    .escape('\\')
                    .or(questions::content.like(pattern.clone()).escape('\\')),
            );
        }
        let total = total_query.count().get_result::<i64>(&mut conn)? as usize;
        let total = query.limit.map_or(total, |limit| total.min(limit));

        let (offset, rows) = page_window(query.limit, query.pagination.as_ref());
        if rows == Some(0) {
            return Ok((total, vec![]));
        }

        // Ordering by the answer count needs a correlated subquery, so the
        // statement is written by hand. Only static clauses are interpolated.
        let sql = format!(
            "{QUESTION_LIST_SQL} ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.order_clause()
        );
        let rows = diesel::sql_query(sql)
            .bind::<Nullable<Text>, _>(pattern.clone())
            .bind::<Nullable<Text>, _>(pattern.clone())
            .bind::<Nullable<Text>, _>(pattern)
            .bind::<BigInt, _>(rows.map_or(-1, |n| n as i64))
            .bind::<BigInt, _>(offset as i64)
            .load::<QuestionWithCount>(&mut conn)?;

        let author_ids: Vec<i32> = rows.iter().map(|r| r.question.author_id).collect();
        let authors = load_authors(&mut conn, &author_ids)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let author_id = row.question.author_id;
                let author = authors
                    .get(&author_id)
                    .cloned()
                    .ok_or_else(|| missing_author(author_id))?;
                Ok(Question::try_from((row.question, author, row.answers_count))?)
            })
            .collect::<RepositoryResult<Vec<Question>>>()?;

        Ok((total, items))
    }

    fn get_question_by_slug(&self, slug: &str) -> RepositoryResult<Option<Question>> {
        let mut conn = self.conn()?;

        let Some((question, author)) = questions::table
            .inner_join(users::table)
            .filter(questions::slug.eq(slug))
            .select((DbQuestion::as_select(), DbUser::as_select()))
            .first::<(DbQuestion, DbUser)>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let answers_count = count_answers(&mut conn, question.id)?;

        Ok(Some((question, author, answers_count).try_into()?))
    }

    fn question_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            questions::table.filter(questions::slug.eq(slug.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl QuestionWriter for DieselRepository {
    fn create_question(&self, question: &NewQuestion) -> RepositoryResult<Question> {
        let mut conn = self.conn()?;

        let (row, author) = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(questions::table)
                .values(&DbNewQuestion {
                    author_id: question.author_id.get(),
                    title: question.title.as_str(),
                    slug: question.slug.as_str(),
                    content: question.content.as_deref(),
                    image: question.image.as_deref(),
                    created_at: question.created_at,
                })
                .returning(DbQuestion::as_returning())
                .get_result::<DbQuestion>(conn)?;
            let author = users::table.find(row.author_id).first::<DbUser>(conn)?;
            Ok((row, author))
        })?;

        Ok((row, author, 0).try_into()?)
    }
}

impl AnswerReader for DieselRepository {
    fn list_answers(&self, query: AnswerListQuery) -> RepositoryResult<(usize, Vec<Answer>)> {
        let mut conn = self.conn()?;

        let pattern = search_pattern(query.search.as_deref());
        let filtered = || {
            let mut items = answers::table
                .filter(answers::question_id.eq(query.question_id.get()))
                .into_boxed::<Sqlite>();
            if let Some(pattern) = &pattern {
                items = items.filter(answers::content.like(pattern.clone()).escape('\\'));
            }
            items
        };

        let limit = match query.sort {
            AnswerSort::Recently => Some(AnswerSort::RECENT_LIMIT),
            _ => None,
        };

        let total = filtered().count().get_result::<i64>(&mut conn)? as usize;
        let total = limit.map_or(total, |limit| total.min(limit));

        let (offset, rows) = page_window(limit, query.pagination.as_ref());
        if rows == Some(0) {
            return Ok((total, vec![]));
        }

        let items = match query.sort {
            AnswerSort::Old => filtered().order((answers::created_at.asc(), answers::id.asc())),
            AnswerSort::Top | AnswerSort::Recently | AnswerSort::Newest => {
                filtered().order((answers::created_at.desc(), answers::id.desc()))
            }
        };

        let rows = items
            .limit(rows.map_or(-1, |n| n as i64))
            .offset(offset as i64)
            .load::<DbAnswer>(&mut conn)?;

        let author_ids: Vec<i32> = rows.iter().map(|a| a.author_id).collect();
        let authors = load_authors(&mut conn, &author_ids)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let author_id = row.author_id;
                let author = authors
                    .get(&author_id)
                    .cloned()
                    .ok_or_else(|| missing_author(author_id))?;
                Ok(Answer::try_from((row, author))?)
            })
            .collect::<RepositoryResult<Vec<Answer>>>()?;

        Ok((total, items))
    }
}

impl AnswerWriter for DieselRepository {
    fn create_answer(&self, answer: &NewAnswer) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::insert_into(answers::table)
            .values(&DbNewAnswer {
                question_id: answer.question_id.get(),
                author_id: answer.author_id.get(),
                content: answer.content.as_str(),
                image: answer.image.as_deref(),
                created_at: answer.created_at,
            })
            .execute(&mut conn)?;

        Ok(affected)
    }
}
