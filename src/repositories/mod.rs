//! Repositorios de persistencia
//!
//! Queries SQL parametrizadas sobre PostgreSQL. Cada repositorio es dueño
//! de las filas de su tabla; los controllers solo ven modelos.

pub mod booking_repository;
pub mod user_repository;
pub mod vehicle_repository;
