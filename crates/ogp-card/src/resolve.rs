//! Identifier resolution.
//!
//! Maps a route's `{resource}/{id}` pair to the text that goes on the card.
//! An answer card shows the question that was answered, so answers take two
//! lookups: the answer (for its `questionId`), then the question.

use crate::error::OgpError;
use crate::store::{ANSWERS, Document, DocumentStore, QUESTIONS};

/// The text to render on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    /// ID of the document the body came from.
    pub id: String,
    /// Body text. May be empty.
    pub body: String,
}

/// Resource kinds that have cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `answers/{id}`: card shows the answered question.
    Answers,
    /// `questions/{id}`: card shows the question itself.
    Questions,
}

impl Resource {
    /// Parse the `{resource}` route segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            ANSWERS => Some(Self::Answers),
            QUESTIONS => Some(Self::Questions),
            _ => None,
        }
    }
}

/// Resolve a resource identifier to its card text.
///
/// Fails with [`OgpError::NotFound`] if any lookup comes back empty and with
/// [`OgpError::StoreUnavailable`] if the store errors. Never writes.
pub async fn resolve<S: DocumentStore + ?Sized>(
    store: &S,
    resource: Resource,
    id: &str,
) -> Result<TextContent, OgpError> {
    if !is_document_id(id) {
        return Err(OgpError::NotFound(format!("invalid id '{id}'")));
    }

    match resource {
        Resource::Answers => resolve_answer(store, id).await,
        Resource::Questions => resolve_question(store, id).await,
    }
}

/// Two-step lookup: answer → question.
async fn resolve_answer<S: DocumentStore + ?Sized>(
    store: &S,
    answer_id: &str,
) -> Result<TextContent, OgpError> {
    let answer = store
        .get(ANSWERS, answer_id)
        .await?
        .ok_or_else(|| OgpError::NotFound(format!("answer {answer_id}")))?;

    let question_id = answer
        .field("questionId")
        .filter(|id| is_document_id(id))
        .ok_or_else(|| OgpError::NotFound(format!("answer {answer_id} has no question")))?;

    tracing::debug!(answer_id = %answer_id, question_id = %question_id, "answer resolved");

    resolve_question(store, question_id).await
}

async fn resolve_question<S: DocumentStore + ?Sized>(
    store: &S,
    question_id: &str,
) -> Result<TextContent, OgpError> {
    let question = store
        .get(QUESTIONS, question_id)
        .await?
        .ok_or_else(|| OgpError::NotFound(format!("question {question_id}")))?;

    Ok(into_content(question))
}

fn into_content(mut document: Document) -> TextContent {
    let body = document.fields.remove("body").unwrap_or_default();
    TextContent {
        id: document.id,
        body,
    }
}

/// Document IDs are non-empty and never contain a path separator.
fn is_document_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/')
}
