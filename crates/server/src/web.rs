//! Chat pages and JSON API.
//!
//! HTML Endpoints:
//! - `GET  /`                : question form
//! - `POST /chat`            : answer page for a submitted question
//! - `GET  /history`         : every answered question, newest first
//!
//! JSON API Endpoints:
//! - `POST /api/v1/chat`     : `{question}` in, `{id, answer, iteration_count, created_at}` out
//! - `GET  /api/v1/history`  : conversation records, newest first

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use uuid::Uuid;

use petworld_core::domain::conversation::ConversationRecord;
use petworld_core::errors::{ApplicationError, InterfaceError};

use crate::chat::{ChatResponse, ChatService};

const BLANK_QUESTION: &str = "Wpisz pytanie, aby otrzymać rekomendację.";

#[derive(Clone)]
pub struct WebState {
    chat: Arc<ChatService>,
    templates: Arc<Tera>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type PageError = (StatusCode, Html<String>);

#[derive(Debug, Serialize)]
struct ResponseView {
    answer: String,
    iteration_count: u32,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct RecordView {
    created_at: String,
    question: String,
    answer: String,
    iteration_count: u32,
}

pub fn init_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../../templates/chat/base.html")),
        ("index.html", include_str!("../../../templates/chat/index.html")),
        ("history.html", include_str!("../../../templates/chat/history.html")),
    ])?;
    Ok(tera)
}

pub fn router(chat: Arc<ChatService>, templates: Arc<Tera>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/chat", post(chat_page))
        .route("/history", get(history_page))
        .route("/api/v1/chat", post(api_chat))
        .route("/api/v1/history", get(api_history))
        .layer(TraceLayer::new_for_http())
        .with_state(WebState { chat, templates })
}

fn status_for(error: &InterfaceError) -> StatusCode {
    match error {
        InterfaceError::AnswerUnavailable { .. } => StatusCode::BAD_GATEWAY,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn to_interface(error: impl Into<ApplicationError>, correlation_id: &str) -> InterfaceError {
    let interface = error.into().into_interface(correlation_id);
    warn!(
        event_name = "server.web.request_failed",
        correlation_id = %correlation_id,
        error = %interface,
        "request could not be completed"
    );
    interface
}

fn display_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn render(templates: &Tera, name: &str, context: &Context) -> Result<String, PageError> {
    templates.render(name, context).map_err(|e| {
        error!(event_name = "server.web.template_error", template = name, error = ?e, "template rendering failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Template Error</h1>".to_string()),
        )
    })
}

fn chat_context(question: &str, response: Option<&ChatResponse>, error: Option<&str>) -> Context {
    let mut context = Context::new();
    context.insert("question", question);
    context.insert(
        "response",
        &response.map(|response| ResponseView {
            answer: response.answer.clone(),
            iteration_count: response.iteration_count,
            created_at: display_timestamp(&response.created_at),
        }),
    );
    context.insert("error", &error);
    context
}

async fn index_page(State(state): State<WebState>) -> Result<Html<String>, PageError> {
    render(&state.templates, "index.html", &chat_context("", None, None)).map(Html)
}

async fn chat_page(
    State(state): State<WebState>,
    Form(input): Form<QuestionInput>,
) -> Result<Html<String>, PageError> {
    let question = input.question.trim();
    if question.is_empty() {
        let page = render(&state.templates, "index.html", &chat_context("", None, Some(BLANK_QUESTION)))?;
        return Err((StatusCode::BAD_REQUEST, Html(page)));
    }

    let correlation_id = Uuid::new_v4().to_string();
    match state.chat.ask(question).await {
        Ok(response) => {
            render(&state.templates, "index.html", &chat_context(question, Some(&response), None))
                .map(Html)
        }
        Err(error) => {
            let interface = to_interface(error, &correlation_id);
            let page = render(
                &state.templates,
                "index.html",
                &chat_context(question, None, Some(interface.user_message())),
            )?;
            Err((status_for(&interface), Html(page)))
        }
    }
}

async fn history_page(State(state): State<WebState>) -> Result<Html<String>, PageError> {
    let correlation_id = Uuid::new_v4().to_string();
    let records = state.chat.history().await.map_err(|error| {
        let interface = to_interface(error, &correlation_id);
        (status_for(&interface), Html(format!("<h1>Error</h1><p>{}</p>", interface.user_message())))
    })?;

    let views: Vec<RecordView> = records
        .into_iter()
        .map(|record| RecordView {
            created_at: display_timestamp(&record.created_at),
            question: record.question,
            answer: record.answer,
            iteration_count: record.iteration_count,
        })
        .collect();

    let mut context = Context::new();
    context.insert("records", &views);
    render(&state.templates, "history.html", &context).map(Html)
}

async fn api_chat(
    State(state): State<WebState>,
    Json(input): Json<QuestionInput>,
) -> Result<Json<ChatResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let question = input.question.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody { error: "question must not be blank".to_string(), correlation_id }),
        ));
    }

    state.chat.ask(question).await.map(Json).map_err(|error| {
        let interface = to_interface(error, &correlation_id);
        (
            status_for(&interface),
            Json(ErrorBody { error: interface.user_message().to_string(), correlation_id }),
        )
    })
}

async fn api_history(
    State(state): State<WebState>,
) -> Result<Json<Vec<ConversationRecord>>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    state.chat.history().await.map(Json).map_err(|error| {
        let interface = to_interface(error, &correlation_id);
        (
            status_for(&interface),
            Json(ErrorBody { error: interface.user_message().to_string(), correlation_id }),
        )
    })
}
