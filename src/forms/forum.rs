use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::forum::{NewAnswer, NewQuestion};
use crate::domain::types::{
    AnswerContent, QuestionId, QuestionTitle, Slug, TypeConstraintError, UserId,
};

fn optional_image(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Form posted to `/forum/questions`.
#[derive(Debug, Deserialize, Validate)]
pub struct AskQuestionForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub content: String,
    /// Reference to an already stored image.
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AskQuestionFormPayload {
    pub title: QuestionTitle,
    pub content: String,
    pub image: Option<String>,
}

impl AskQuestionFormPayload {
    pub fn into_new_question(self, author_id: UserId, slug: Slug) -> NewQuestion {
        NewQuestion {
            author_id,
            title: self.title,
            slug,
            content: Some(self.content),
            image: self.image,
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// Form posted to `/forum/questions/{slug}/answer`.
#[derive(Debug, Deserialize, Validate)]
pub struct AnswerForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFormPayload {
    pub content: AnswerContent,
    pub image: Option<String>,
}

impl AnswerFormPayload {
    pub fn into_new_answer(self, question_id: QuestionId, author_id: UserId) -> NewAnswer {
        NewAnswer {
            question_id,
            author_id,
            content: self.content,
            image: self.image,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ForumFormError {
    #[error("Forum form validation failed: {0}")]
    Validation(String),
    #[error("Forum form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ForumFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ForumFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AskQuestionForm> for AskQuestionFormPayload {
    type Error = ForumFormError;

    fn try_from(value: AskQuestionForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let content = value.content.trim().to_string();
        if content.is_empty() {
            return Err(TypeConstraintError::EmptyString("content").into());
        }

        Ok(Self {
            title: QuestionTitle::new(value.title)?,
            content,
            image: optional_image(value.image),
        })
    }
}

impl TryFrom<AnswerForm> for AnswerFormPayload {
    type Error = ForumFormError;

    fn try_from(value: AnswerForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            content: AnswerContent::new(value.content)?,
            image: optional_image(value.image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answer_is_rejected() {
        let result = AnswerFormPayload::try_from(AnswerForm {
            content: "   ".into(),
            image: None,
        });
        assert!(matches!(result, Err(ForumFormError::TypeConstraint(_))));
    }

    #[test]
    fn question_requires_title_and_content() {
        let missing_content = AskQuestionFormPayload::try_from(AskQuestionForm {
            title: "Why?".into(),
            content: String::new(),
            image: None,
        });
        assert!(matches!(missing_content, Err(ForumFormError::Validation(_))));

        let payload = AskQuestionFormPayload::try_from(AskQuestionForm {
            title: " Why? ".into(),
            content: "Because".into(),
            image: Some("  ".into()),
        })
        .unwrap();
        assert_eq!(payload.title.as_str(), "Why?");
        assert_eq!(payload.image, None);
    }
}
