use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.register(request).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}
