//! Request handlers for the quiz routes.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use quiz_core::bank::INHERITANCE_TOPIC;
use quiz_core::{EndReason, ItemId, SessionSettings};
use services::{
    AnswerResult, AnswerSubmission, BatchReport, ExplainEntry, NextOutcome, QuizEngine,
    ServedItem, SessionKey,
};

use super::error::ApiError;

fn default_topic() -> String {
    INHERITANCE_TOPIC.to_string()
}

fn parse_item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse().map_err(|_| ApiError::item_not_found(raw))
}

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub user_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default, alias = "time_limit")]
    pub time_limit_seconds: Option<u32>,
    #[serde(default)]
    pub max_questions: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub user_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl SessionRequest {
    fn key(&self) -> SessionKey {
        SessionKey::new(&self.user_id, &self.topic)
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub user_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub item_id: String,
    #[serde(alias = "choice_index")]
    pub chosen_index: usize,
    #[serde(default)]
    pub hint_used: bool,
    #[serde(default)]
    pub time_sec: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HintRequest {
    pub user_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainBatchRequest {
    pub user_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub entries: Vec<ExplainEntry>,
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub ok: bool,
}

/// Either an item with the seconds left, or `ended` with a reason.
#[derive(Debug, Serialize)]
pub struct NextResponse {
    pub ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ServedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
}

impl From<NextOutcome> for NextResponse {
    fn from(outcome: NextOutcome) -> Self {
        match outcome {
            NextOutcome::Item { item, time_left } => Self {
                ended: false,
                item: Some(item),
                time_left: Some(time_left),
                reason: None,
            },
            NextOutcome::Ended { reason } => Self {
                ended: true,
                item: None,
                time_left: None,
                reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hint_text: String,
}

//
// ─── HANDLERS ──────────────────────────────────────────────────────────────────
//

pub async fn health(State(engine): State<Arc<QuizEngine>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: engine.tutor().backend_name(),
    })
}

pub async fn start(
    State(engine): State<Arc<QuizEngine>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let defaults = engine.defaults();
    let settings = SessionSettings {
        time_limit_secs: request
            .time_limit_seconds
            .unwrap_or(defaults.time_limit_secs),
        max_questions: request.max_questions.unwrap_or(defaults.max_questions),
    };
    let key = SessionKey::new(request.user_id, request.topic);
    engine.start(&key, settings)?;
    Ok(Json(StartResponse { ok: true }))
}

pub async fn next(
    State(engine): State<Arc<QuizEngine>>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<NextResponse>, ApiError> {
    let outcome = engine.next(&request.key())?;
    Ok(Json(outcome.into()))
}

pub async fn answer(
    State(engine): State<Arc<QuizEngine>>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResult>, ApiError> {
    let submission = AnswerSubmission {
        item_id: parse_item_id(&request.item_id)?,
        chosen_index: request.chosen_index,
        hint_used: request.hint_used,
        elapsed_secs: request.time_sec,
    };
    let key = SessionKey::new(request.user_id, request.topic);
    Ok(Json(engine.answer(&key, &submission)?))
}

pub async fn hint(
    State(engine): State<Arc<QuizEngine>>,
    Json(request): Json<HintRequest>,
) -> Result<Json<HintResponse>, ApiError> {
    let item_id = parse_item_id(&request.item_id)?;
    let key = SessionKey::new(request.user_id, request.topic);
    let hint_text = engine.hint(&key, &item_id).await?;
    Ok(Json(HintResponse { hint_text }))
}

pub async fn explain_batch(
    State(engine): State<Arc<QuizEngine>>,
    Json(request): Json<ExplainBatchRequest>,
) -> Result<Json<BatchReport>, ApiError> {
    let key = SessionKey::new(request.user_id, request.topic);
    Ok(Json(engine.explain_batch(&key, &request.entries).await?))
}
