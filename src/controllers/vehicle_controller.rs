use crate::dto::vehicle_dto::{
    CreateVehicleRequest, VehicleDetailResponse, VehicleListQuery, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::user::UserRole;
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::{VehicleRepository, VehicleSearchFilters};
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        // Solo los owners publican vehículos
        if actor_role != UserRole::Owner {
            return Err(AppError::Forbidden(
                "Solo los propietarios pueden publicar vehículos".to_string(),
            ));
        }

        request.validate()?;

        if request.price_per_day <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "El precio por día debe ser mayor que cero".to_string(),
            ));
        }

        // Las tarifas semanal/mensual se aceptan tal como las define el owner,
        // pero se avisa si no ofrecen descuento frente a la tarifa diaria
        if let Some(weekly) = request.price_per_week {
            if weekly > request.price_per_day * Decimal::from(7) {
                tracing::warn!(
                    "Tarifa semanal {} mayor que 7x la diaria para '{}'",
                    weekly,
                    request.name
                );
            }
        }
        if let Some(monthly) = request.price_per_month {
            if monthly > request.price_per_day * Decimal::from(30) {
                tracing::warn!(
                    "Tarifa mensual {} mayor que 30x la diaria para '{}'",
                    monthly,
                    request.name
                );
            }
        }

        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id: actor_id,
            name: request.name,
            description: request.description,
            category: request.category,
            brand: request.brand,
            model: request.model,
            year: request.year,
            price_per_day: request.price_per_day,
            price_per_week: request.price_per_week,
            price_per_month: request.price_per_month,
            location: request.location,
            availability: true,
            created_at: Utc::now(),
        };

        let saved = self.repository.create(&vehicle).await?;

        Ok(ApiResponse::success_with_message(
            saved.into(),
            "Vehículo publicado exitosamente".to_string(),
        ))
    }

    pub async fn search(&self, query: VehicleListQuery) -> Result<Vec<VehicleResponse>, AppError> {
        let filters = VehicleSearchFilters {
            category: query.category,
            location: query.location,
            min_price: query.min_price,
            max_price: query.max_price,
            search: query.search,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
        };

        let vehicles = self.repository.search(&filters).await?;

        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<VehicleDetailResponse, AppError> {
        let detail = self
            .repository
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(VehicleDetailResponse {
            vehicle: detail.vehicle.into(),
            owner_name: detail.owner_name,
        })
    }

    pub async fn list_by_owner(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> Result<Vec<VehicleResponse>, AppError> {
        if actor_role != UserRole::Owner {
            return Err(AppError::Forbidden(
                "Solo los propietarios pueden listar sus vehículos".to_string(),
            ));
        }

        let vehicles = self.repository.find_by_owner(actor_id).await?;

        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update_availability(
        &self,
        id: Uuid,
        actor_id: Uuid,
        availability: bool,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let updated = self
            .repository
            .update_availability(id, actor_id, availability)
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Disponibilidad actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, actor_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, actor_id).await?;
        Ok(())
    }
}
