use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateAvailabilityRequest, VehicleDetailResponse, VehicleListQuery,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/owner", get(list_owner_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/availability", patch(update_availability))
        .route("/:id", delete(delete_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(user.id, user.role, request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.search(query).await?;
    Ok(Json(response))
}

async fn list_owner_vehicles(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_owner(user.id, user.role).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn update_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller
        .update_availability(id, user.id, request.availability)
        .await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id, user.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Vehículo eliminado exitosamente"
    })))
}
