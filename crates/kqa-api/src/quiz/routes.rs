use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use kqa_quiz::{Category, Image, ImageState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    service,
    view::{ImageView, ShellView},
};
use crate::{ApiState, error::ApiError, middleware::rate_limit};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    // Every start costs a generation call
    let start_routes = Router::new()
        .route("/sessions/{id}/start", post(start))
        .layer(make_rate_limit_layer!(
            rate_limit::START_REPLENISH_SECONDS,
            rate_limit::START_BURST_SIZE
        ));

    let session_routes = Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/answer", post(answer))
        .route("/sessions/{id}/next", post(next))
        .route("/sessions/{id}/reset", post(reset))
        .route("/sessions/{id}/image", get(get_image))
        .route("/sessions/{id}/image/raw", get(get_raw_image));

    Router::new().merge(start_routes).merge(session_routes)
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub view: ShellView,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option: String,
}

/// Illustration of the question on screen, with its 0-based index.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub question_index: usize,
    #[serde(flatten)]
    pub image: ImageView,
}

async fn render(state: &ApiState, id: Uuid) -> Result<ShellView, ApiError> {
    state
        .sessions
        .read(id, ShellView::from_session)
        .await
        .ok_or(ApiError::SessionNotFound)
}

async fn create_session(State(state): State<ApiState>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;
    tracing::debug!(%session_id, "Session created");

    let view = ShellView::CategorySelection {
        categories: super::view::category_cards(),
    };
    (StatusCode::CREATED, Json(SessionCreated { session_id, view }))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShellView>, ApiError> {
    Ok(Json(render(&state, id).await?))
}

async fn delete_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

async fn start(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartRequest>,
) -> Result<(StatusCode, Json<ShellView>), ApiError> {
    let view = service::start_quiz(&state, id, payload.category).await?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

async fn answer(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<ShellView>, ApiError> {
    let outcome = service::answer(&state, id, &payload.option).await?;
    tracing::debug!(session_id = %id, ?outcome, "Answer recorded");

    Ok(Json(render(&state, id).await?))
}

async fn next(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShellView>, ApiError> {
    service::advance(&state, id).await?;
    Ok(Json(render(&state, id).await?))
}

async fn reset(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShellView>, ApiError> {
    service::reset(&state, id).await?;
    Ok(Json(render(&state, id).await?))
}

async fn get_image(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImageResponse>, ApiError> {
    let image = state
        .sessions
        .read(id, |session| {
            session.active().map(|quiz| ImageResponse {
                question_index: quiz.index(),
                image: ImageView::from_state(quiz.image().state()),
            })
        })
        .await
        .ok_or(ApiError::SessionNotFound)??;

    Ok(Json(image))
}

async fn get_raw_image(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let image = state
        .sessions
        .read(id, |session| -> Result<Image, ApiError> {
            let quiz = session.active()?;
            match quiz.image().state() {
                ImageState::Ready(image) => Ok(image.clone()),
                _ => Err(ApiError::NotFound("No illustration is ready".to_string())),
            }
        })
        .await
        .ok_or(ApiError::SessionNotFound)??;

    let content_type = HeaderValue::from_str(&image.mime_type).unwrap_or_else(|_| {
        tracing::warn!(
            session_id = %id,
            mime_type = %image.mime_type.escape_debug(),
            "Illustration has an invalid MIME type, serving as octet-stream"
        );
        HeaderValue::from_static("application/octet-stream")
    });

    Ok(([(header::CONTENT_TYPE, content_type)], image.data).into_response())
}
