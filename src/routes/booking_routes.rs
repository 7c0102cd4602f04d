use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingListQuery, BookingResponse, BookingStatusResponse, CreateBookingRequest,
    UpdateBookingStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id/status", patch(update_booking_status))
}

async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(user.id, user.role, request).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(user.id, user.role, query).await?;
    Ok(Json(response))
}

async fn update_booking_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingStatusResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .update_status(id, user.id, user.role, request)
        .await?;
    Ok(Json(response))
}
