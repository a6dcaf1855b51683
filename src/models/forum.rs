use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::forum::{Answer as DomainAnswer, Question as DomainQuestion};
use crate::domain::types::{AnswerContent, QuestionTitle, Slug, TypeConstraintError};
use crate::models::user::User;

/// Diesel model representing the `questions` table.
#[derive(Debug, Clone, Identifiable, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = crate::schema::questions)]
pub struct Question {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Question row with the number of answers computed by a correlated subquery.
#[derive(Debug, Clone, QueryableByName)]
pub struct QuestionWithCount {
    #[diesel(embed)]
    pub question: Question,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub answers_count: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::questions)]
pub struct NewQuestion<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub slug: &'a str,
    pub content: Option<&'a str>,
    pub image: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::answers)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub author_id: i32,
    pub content: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::answers)]
pub struct NewAnswer<'a> {
    pub question_id: i32,
    pub author_id: i32,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<(Question, User, i64)> for DomainQuestion {
    type Error = TypeConstraintError;

    fn try_from(
        (question, author, answers_count): (Question, User, i64),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: question.id.try_into()?,
            author: author.try_into()?,
            title: QuestionTitle::new(question.title)?,
            slug: Slug::new(question.slug)?,
            content: question.content,
            image: question.image,
            created_at: question.created_at,
            answers_count,
        })
    }
}

impl TryFrom<(Answer, User)> for DomainAnswer {
    type Error = TypeConstraintError;

    fn try_from((answer, author): (Answer, User)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: answer.id.try_into()?,
            question_id: answer.question_id.try_into()?,
            author: author.try_into()?,
            content: AnswerContent::new(answer.content)?,
            image: answer.image,
            created_at: answer.created_at,
        })
    }
}
