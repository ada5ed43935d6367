use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Json, Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

use lighter_core::LighterError;
use lighter_core::calculator::CalorieEstimate;
use lighter_core::catalog::FoodItem;
use lighter_core::dashboard::{Dashboard, HomeView};
use lighter_core::goal::{GoalRecord, GoalRequest};
use lighter_core::models::{MealEntry, MealStore};
use lighter_core::service::LighterService;
use lighter_core::session::SessionToken;

const BODY_LIMIT: usize = 1024 * 1024; // 1 MiB

#[derive(Clone)]
struct AppState {
    service: Arc<LighterService>,
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: SessionToken,
}

#[derive(Deserialize)]
struct CalculateRequest {
    food: String,
    amount: f64,
    meal: String,
}

#[derive(Deserialize)]
struct LogWeightRequest {
    date: Option<String>,
    weight: f64,
}

#[derive(Serialize)]
struct LoggedResponse {
    message: &'static str,
    date: String,
}

#[derive(Serialize)]
struct GoalResponse {
    message: &'static str,
    goal: GoalRecord,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(err) => {
                error!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<LighterError> for ApiError {
    fn from(err: LighterError) -> Self {
        match err {
            LighterError::Auth | LighterError::InvalidSession => {
                Self::Unauthorized(err.to_string())
            }
            LighterError::UnknownFood(_) => Self::BadRequest("Food not found".to_string()),
            LighterError::Validation(msg) => Self::BadRequest(msg),
            LighterError::Storage(err) => Self::Internal(err),
        }
    }
}

// --- Middleware ---

fn bearer_token(request: &Request) -> Option<SessionToken> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| SessionToken::from(token.trim()))
}

async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return ApiError::Unauthorized("Missing session token".to_string()).into_response();
    };
    if let Err(e) = state.service.authenticate(&token) {
        return ApiError::from(e).into_response();
    }
    request.extensions_mut().insert(token);
    next.run(request).await
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Handlers ---

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.service.login(&req.username, &req.password)?;
    Ok(Json(LoginResponse { token }))
}

async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> StatusCode {
    state.service.logout(&token);
    StatusCode::NO_CONTENT
}

async fn list_foods(State(state): State<AppState>) -> Json<Vec<FoodItem>> {
    Json(state.service.foods())
}

async fn home(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<HomeView>, ApiError> {
    Ok(Json(state.service.home(&token)?))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.service.dashboard(&token)?))
}

async fn tracker(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<MealStore>, ApiError> {
    Ok(Json(state.service.tracker(&token)?))
}

async fn calculate(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalorieEstimate>, ApiError> {
    let estimate = state
        .service
        .calculate_calories(&token, &req.food, req.amount, &req.meal)?;
    Ok(Json(estimate))
}

async fn log_meal(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Json(entry): Json<MealEntry>,
) -> Result<Json<LoggedResponse>, ApiError> {
    let date = state.service.log_meal(&token, entry)?;
    Ok(Json(LoggedResponse {
        message: "Meal logged successfully",
        date,
    }))
}

async fn log_weight(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Json(req): Json<LogWeightRequest>,
) -> Result<Json<LoggedResponse>, ApiError> {
    let date = state
        .service
        .log_weight(&token, req.date.as_deref(), req.weight)?;
    Ok(Json(LoggedResponse {
        message: "Weight logged successfully",
        date,
    }))
}

async fn set_goal(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Json(req): Json<GoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal = state.service.set_goal(&token, &req)?;
    Ok(Json(GoalResponse {
        message: "Goal saved successfully",
        goal,
    }))
}

// --- Router ---

fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/logout", post(logout))
        .route("/api/home", get(home))
        .route("/api/dashboard", get(dashboard))
        .route("/api/tracker", get(tracker))
        .route("/api/calculate", post(calculate))
        .route("/api/log", post(log_meal))
        .route("/api/log_weight", post(log_weight))
        .route("/api/set_goal", post(set_goal))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/api/login", post(login))
        .route("/api/foods", get(list_foods))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(service: LighterService, port: u16, bind: &str) -> anyhow::Result<()> {
    let state = AppState {
        service: Arc::new(service),
    };
    let app = build_router(state);

    if bind != "127.0.0.1" && bind != "localhost" {
        warn!("Listening on {bind}; any device on your network can reach this API");
    }

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
