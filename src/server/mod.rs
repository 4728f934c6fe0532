//! HTTP surface: search form, JSON search API and health check

mod views;

pub use views::{escape_html, render_page, SearchOutcome};

use crate::error::{FaqError, Result};
use crate::retrieval::{RankedResult, Retriever};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<Retriever>,
}

impl AppState {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub question: String,
    pub results: RankedResult,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub documents: usize,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page).post(search_page))
        .route("/api/search", axum::routing::post(search_api))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| FaqError::Io {
            source: e,
            context: format!("Failed to bind {}", bind),
        })?;

    tracing::info!("Server is running at http://{}", bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FaqError::Io {
            source: e,
            context: "HTTP server terminated".to_string(),
        })?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to setup SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

async fn index_page() -> Html<String> {
    Html(render_page(&SearchOutcome::Idle))
}

/// Form search; failures are logged and rendered as an empty result list
async fn search_page(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Html<String> {
    let outcome = run_search(&state.retriever, form.question).await;
    Html(render_page(&outcome))
}

async fn run_search(retriever: &Retriever, question: String) -> SearchOutcome {
    match retriever.search(&question).await {
        Ok(result) => SearchOutcome::Found { question, result },
        Err(e) => {
            tracing::error!("Search for {:?} failed: {}", question, e);
            SearchOutcome::Failed { question }
        }
    }
}

/// JSON search; failures surface as error statuses
async fn search_api(
    State(state): State<AppState>,
    Json(request): Json<QuestionForm>,
) -> Response {
    if request.question.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request", "question is empty");
    }

    match state.retriever.search(&request.question).await {
        Ok(results) => Json(SearchResponse {
            question: request.question,
            results,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("API search for {:?} failed: {}", request.question, e);
            let (status, code) = classify(&e);
            error_response(status, code, &e.to_string())
        }
    }
}

async fn health(State(state): State<AppState>) -> Response {
    match state.retriever.store().count().await {
        Ok(documents) => Json(HealthResponse {
            status: "ok",
            documents,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", &e.to_string())
        }
    }
}

fn classify(error: &FaqError) -> (StatusCode, &'static str) {
    match error {
        FaqError::EmbeddingUnavailable(_) | FaqError::ProviderUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "embedding_unavailable")
        }
        FaqError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

fn error_response(status: StatusCode, code: &'static str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
            code,
        }),
    )
        .into_response()
}
