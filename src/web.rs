use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use minijinja::{context, Environment};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::chain::AnswerChain;
use crate::error::{Error, Result};

pub const NO_QUESTION: &str = "No question provided.";

const INDEX_TEMPLATE: &str = "index.html";

/// Compiled page templates. `.html` names are autoescaped.
#[derive(Clone)]
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn index(&self, response: Option<&str>, query: Option<&str>) -> Result<String> {
        let template = self.env.get_template(INDEX_TEMPLATE)?;
        Ok(template.render(context! { response => response, query => query })?)
    }
}

pub struct AppState {
    pub chain: Arc<dyn AnswerChain>,
    pub pages: Pages,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    question: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    Ok(Html(state.pages.index(None, None)?))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<ChatForm>, FormRejection>,
) -> Result<Html<String>> {
    let question = form
        .ok()
        .and_then(|Form(form)| form.question)
        .filter(|q| !q.trim().is_empty());

    let Some(question) = question else {
        return Ok(Html(state.pages.index(Some(NO_QUESTION), None)?));
    };

    info!("Question received ({} chars)", question.chars().count());
    let output = state.chain.invoke(&question).await?;
    Ok(Html(
        state
            .pages
            .index(Some(&output.answer), Some(&output.input))?,
    ))
}
