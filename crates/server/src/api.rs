use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use shopwise_agent::ShoppingAssistant;
use shopwise_core::domain::chat::APOLOGY_MESSAGE;
use shopwise_core::domain::conversation::{ConversationTurn, SessionId, TurnRole};
use shopwise_core::domain::product::{Category, Product, ProductId};
use shopwise_core::errors::{ApplicationError, DomainError, InterfaceError};
use shopwise_db::{ChatSessionRepository, RepositoryError};

#[derive(Clone)]
pub struct ApiState {
    assistant: Arc<ShoppingAssistant>,
    sessions: Arc<dyn ChatSessionRepository>,
}

impl ApiState {
    pub fn new(assistant: Arc<ShoppingAssistant>, sessions: Arc<dyn ChatSessionRepository>) -> Self {
        Self { assistant, sessions }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub products: Vec<Product>,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatFailure {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub session_id: String,
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: &'static str,
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
    pub correlation_id: String,
}

/// Maps layered errors onto HTTP status codes with a user-safe message.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self(value.into_interface(Uuid::new_v4().to_string()))
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from(ApplicationError::from(value))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        Self::from(ApplicationError::from(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, correlation_id) = match &self.0 {
            InterfaceError::BadRequest { correlation_id, .. } => {
                (StatusCode::BAD_REQUEST, correlation_id)
            }
            InterfaceError::NotFound { correlation_id, .. } => (StatusCode::NOT_FOUND, correlation_id),
            InterfaceError::ServiceUnavailable { correlation_id, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, correlation_id)
            }
            InterfaceError::Internal { correlation_id, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, correlation_id)
            }
        };

        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                error = %self.0,
                "request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                error = %self.0,
                "request rejected"
            );
        }

        let body = ErrorBody {
            success: false,
            message: self.0.user_message(),
            error: self.0.message().to_string(),
            correlation_id: correlation_id.clone(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/chat", post(chat))
        .route("/api/chat/history", get(chat_history))
        .route("/api/chat/reset", post(reset_chat))
        .route("/api/products/search", get(search_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/categories", get(list_categories))
        .route("/api/recommendations", get(recommendations))
        .with_state(state)
}

pub async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "Shopwise shopping assistant API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn category_filter(raw: Option<String>) -> Option<Category> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(Category::from)
}

// ---------------------------------------------------------------------------
// Chat handlers
// ---------------------------------------------------------------------------

pub async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(DomainError::Validation("message is required".to_string()).into());
    }

    let session_id = match request.session_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => SessionId(id),
        None => state.sessions.create_session(None).await?,
    };

    // prior turns only; the new message is appended once by the gateway
    let history = state.sessions.get_chat_history(&session_id).await?;
    state.sessions.save_message(&session_id, TurnRole::User, &message).await?;

    let result = state.assistant.process_message(&message, &history).await?;

    match (result.success, result.answer) {
        (true, Some(answer)) => {
            state.sessions.save_message(&session_id, TurnRole::Assistant, &answer).await?;
            info!(
                event_name = "api.chat.answered",
                session_id = %session_id,
                product_count = result.products.len(),
                "chat message answered"
            );
            Ok(Json(ChatResponse {
                success: true,
                response: answer,
                products: result.products,
                session_id: session_id.0,
            })
            .into_response())
        }
        _ => {
            let error = result.error.unwrap_or_else(|| "unknown error".to_string());
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatFailure {
                    success: false,
                    message: APOLOGY_MESSAGE,
                    error,
                    session_id: session_id.0,
                }),
            )
                .into_response())
        }
    }
}

pub async fn chat_history(
    State(state): State<ApiState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session_id = SessionId(params.session_id);
    let history = state.sessions.get_chat_history(&session_id).await?;
    Ok(Json(HistoryResponse { success: true, session_id: session_id.0, history }))
}

pub async fn reset_chat(State(state): State<ApiState>) -> Result<Json<ResetResponse>, ApiError> {
    let session_id = state.sessions.create_session(None).await?;
    info!(event_name = "api.chat.reset", session_id = %session_id, "chat session reset");
    Ok(Json(ResetResponse {
        success: true,
        message: "Chat session reset",
        session_id: session_id.0,
    }))
}

// ---------------------------------------------------------------------------
// Catalog handlers
// ---------------------------------------------------------------------------

pub async fn search_products(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = state
        .assistant
        .search_products(
            params.q.as_deref().unwrap_or_default(),
            category_filter(params.category),
            params.min_price,
            params.max_price,
            params.limit,
        )
        .await?;
    Ok(Json(ProductListResponse { success: true, count: products.len(), products }))
}

pub async fn get_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.assistant.get_product_by_id(ProductId(id)).await?;
    Ok(Json(ProductResponse { success: true, product }))
}

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.assistant.list_categories().await?;
    Ok(Json(CategoriesResponse { success: true, categories }))
}

pub async fn recommendations(
    State(state): State<ApiState>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = state
        .assistant
        .get_recommendations(category_filter(params.category), params.limit)
        .await?;
    Ok(Json(ProductListResponse { success: true, count: products.len(), products }))
}
