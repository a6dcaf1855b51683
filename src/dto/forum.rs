use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::forum::{Answer, Question};
use crate::dto::users::UserSummaryDto;

/// Question as rendered by the forum templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub author: UserSummaryDto,
    pub answers_count: i64,
    pub created_at: NaiveDateTime,
}

impl From<Question> for QuestionDto {
    fn from(value: Question) -> Self {
        Self {
            id: value.id.get(),
            title: value.title.into_inner(),
            slug: value.slug.into_inner(),
            content: value.content,
            image: value.image,
            author: value.author.into(),
            answers_count: value.answers_count,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerDto {
    pub id: i32,
    pub content: String,
    pub image: Option<String>,
    pub author: UserSummaryDto,
    pub created_at: NaiveDateTime,
}

impl From<Answer> for AnswerDto {
    fn from(value: Answer) -> Self {
        Self {
            id: value.id.get(),
            content: value.content.into_inner(),
            image: value.image,
            author: value.author.into(),
            created_at: value.created_at,
        }
    }
}
