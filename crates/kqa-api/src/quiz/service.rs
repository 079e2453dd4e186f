//! Quiz operations and the background provider fetches they trigger.
//!
//! Provider calls run in detached tasks. Their results go back through the
//! session's ticket and tag checks, so a result for an abandoned attempt or a
//! question no longer on screen is dropped instead of applied.

use std::time::Instant;

use kqa_quiz::{
    Advance, AnswerOutcome, BatchReport, Category, Delivery, ImageRequest, Phase, QuestionTicket,
};
use uuid::Uuid;

use super::view::ShellView;
use crate::{ApiState, error::ApiError, metrics};

/// Start a quiz and fetch its questions in the background.
///
/// Returns the loading view, rendered before the fetch is spawned.
pub async fn start_quiz(
    state: &ApiState,
    id: Uuid,
    category: Category,
) -> Result<ShellView, ApiError> {
    let (ticket, view) = state
        .sessions
        .update(id, |session| -> Result<_, ApiError> {
            let ticket = session.start(category)?;
            Ok((ticket, ShellView::from_session(session)))
        })
        .await
        .ok_or(ApiError::SessionNotFound)??;

    tracing::info!(session_id = %id, category = category.slug(), "Quiz started");
    metrics::record_quiz_event("started", category);

    tokio::spawn(fetch_questions(state.clone(), id, ticket));
    Ok(view)
}

/// Answer the question on screen.
///
/// While answering, an option that is not one of the question's choices is
/// rejected. Once revealed, every answer is ignored.
pub async fn answer(state: &ApiState, id: Uuid, option: &str) -> Result<AnswerOutcome, ApiError> {
    state
        .sessions
        .update(id, |session| -> Result<AnswerOutcome, ApiError> {
            let quiz = session.active()?;
            if *quiz.phase() == Phase::Answering && !quiz.current().has_option(option) {
                return Err(ApiError::Validation(format!(
                    "'{option}' is not one of the choices"
                )));
            }

            Ok(session.answer(option)?)
        })
        .await
        .ok_or(ApiError::SessionNotFound)?
}

/// Move past the revealed question and fetch the next illustration.
pub async fn advance(state: &ApiState, id: Uuid) -> Result<Advance, ApiError> {
    let (advance, category) = state
        .sessions
        .update(id, |session| -> Result<(Advance, Category), ApiError> {
            let category = session.active()?.category();
            Ok((session.advance()?, category))
        })
        .await
        .ok_or(ApiError::SessionNotFound)??;

    match &advance {
        Advance::Next(request) => spawn_image_fetch(state, id, request.clone()),
        Advance::Complete { score, total } => {
            tracing::info!(
                session_id = %id,
                category = category.slug(),
                score,
                total,
                "Quiz completed"
            );
            metrics::record_quiz_event("completed", category);
        }
    }

    Ok(advance)
}

/// Go back to category selection, abandoning any pending fetches.
pub async fn reset(state: &ApiState, id: Uuid) -> Result<(), ApiError> {
    state
        .sessions
        .update(id, |session| session.reset())
        .await
        .ok_or(ApiError::SessionNotFound)
}

async fn fetch_questions(state: ApiState, id: Uuid, ticket: QuestionTicket) {
    let category = ticket.category();
    let started = Instant::now();

    let drafts = match state.questions.generate_questions(category).await {
        Ok(drafts) => {
            metrics::record_provider_call("questions", true, started.elapsed().as_secs_f64());
            drafts
        }
        Err(e) => {
            metrics::record_provider_call("questions", false, started.elapsed().as_secs_f64());
            tracing::error!(
                session_id = %id,
                category = category.slug(),
                "Question generation failed: {e}"
            );
            Vec::new()
        }
    };

    let report = BatchReport::from_drafts(category, drafts);
    for reason in &report.rejected {
        tracing::warn!(session_id = %id, "Discarding malformed question: {reason}");
    }

    let delivery = state
        .sessions
        .apply(id, |session| session.deliver_questions(ticket, report.questions))
        .await;

    match delivery {
        Some(Delivery::Started(request)) => {
            tracing::debug!(session_id = %id, "Questions delivered");
            spawn_image_fetch(&state, id, request);
        }
        Some(Delivery::Unavailable) => {
            tracing::warn!(
                session_id = %id,
                category = category.slug(),
                "No usable questions, quiz unavailable"
            );
            metrics::record_quiz_event("unavailable", category);
        }
        Some(Delivery::Stale) => {
            tracing::debug!(session_id = %id, "Discarding questions for an abandoned quiz");
        }
        None => {
            tracing::debug!(session_id = %id, "Session gone before questions arrived");
        }
    }
}

/// Fetch the illustration for `request` in the background.
pub fn spawn_image_fetch(state: &ApiState, id: Uuid, request: ImageRequest) {
    tokio::spawn(fetch_image(state.clone(), id, request));
}

async fn fetch_image(state: ApiState, id: Uuid, request: ImageRequest) {
    let started = Instant::now();

    let image = match state.images.generate_image(&request.description).await {
        Ok(image) => {
            metrics::record_provider_call("image", true, started.elapsed().as_secs_f64());
            if image.is_none() {
                tracing::warn!(session_id = %id, index = request.tag.index, "No illustration returned");
            }
            image
        }
        Err(e) => {
            metrics::record_provider_call("image", false, started.elapsed().as_secs_f64());
            tracing::warn!(
                session_id = %id,
                index = request.tag.index,
                "Illustration failed: {e}"
            );
            None
        }
    };

    let applied = state
        .sessions
        .apply(id, |session| session.resolve_image(request.tag, image))
        .await;

    if applied != Some(true) {
        tracing::debug!(
            session_id = %id,
            index = request.tag.index,
            "Discarding stale illustration"
        );
    }
}
