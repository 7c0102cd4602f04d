use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Columnas permitidas para ordenar el listado público
const SORTABLE_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("price_per_day", "price_per_day"),
    ("year", "year"),
    ("name", "name"),
];

/// Filtros de búsqueda del listado público
#[derive(Debug, Default)]
pub struct VehicleSearchFilters {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Vehicle con el nombre del propietario (JOIN con users)
#[derive(Debug, sqlx::FromRow)]
pub struct VehicleWithOwner {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,
    pub owner_name: String,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let saved = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, owner_id, name, description, category, brand, model, year,
                price_per_day, price_per_week, price_per_month, location, availability, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.owner_id)
        .bind(&vehicle.name)
        .bind(&vehicle.description)
        .bind(&vehicle.category)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price_per_day)
        .bind(vehicle.price_per_week)
        .bind(vehicle.price_per_month)
        .bind(&vehicle.location)
        .bind(vehicle.availability)
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Detalle del vehículo con el nombre del propietario
    pub async fn find_detail(&self, id: Uuid) -> Result<Option<VehicleWithOwner>, AppError> {
        let detail = sqlx::query_as::<_, VehicleWithOwner>(
            r#"
            SELECT v.*, u.name AS owner_name
            FROM vehicles v
            JOIN users u ON v.owner_id = u.id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Listado público con filtros opcionales
    ///
    /// El orden se restringe a una whitelist de columnas; los valores del
    /// caller nunca se interpolan en el SQL.
    pub async fn search(&self, filters: &VehicleSearchFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM vehicles WHERE availability = TRUE");

        if let Some(ref category) = filters.category {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }

        if let Some(ref location) = filters.location {
            qb.push(" AND location ILIKE ");
            qb.push_bind(format!("%{}%", location));
        }

        if let Some(min_price) = filters.min_price {
            qb.push(" AND price_per_day >= ");
            qb.push_bind(min_price);
        }

        if let Some(max_price) = filters.max_price {
            qb.push(" AND price_per_day <= ");
            qb.push_bind(max_price);
        }

        if let Some(ref search) = filters.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR brand ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR model ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        let sort_column = filters
            .sort_by
            .as_deref()
            .and_then(|requested| {
                SORTABLE_COLUMNS
                    .iter()
                    .find(|(name, _)| *name == requested)
                    .map(|(_, column)| *column)
            })
            .unwrap_or("created_at");

        let sort_order = match filters.sort_order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };

        qb.push(format!(" ORDER BY {} {}", sort_column, sort_order));

        let vehicles = qb
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn update_availability(
        &self,
        id: Uuid,
        owner_id: Uuid,
        availability: bool,
    ) -> Result<Vehicle, AppError> {
        // Verificar que pertenece al owner
        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este usuario".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET availability = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(availability)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        // Verificar que pertenece al owner
        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este usuario".to_string(),
            ));
        }

        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
