use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AnswerContent, AnswerId, QuestionId, QuestionTitle, Slug, UserId};
use crate::domain::user::User;

/// Forum question with its author and the number of answers it received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub author: User,
    pub title: QuestionTitle,
    pub slug: Slug,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub answers_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewQuestion {
    pub author_id: UserId,
    pub title: QuestionTitle,
    pub slug: Slug,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub author: User,
    pub content: AnswerContent,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub author_id: UserId,
    pub content: AnswerContent,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}
