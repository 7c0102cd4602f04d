//! Controllers del sistema
//!
//! Flujo de negocio de cada recurso: validación de requests, reglas de
//! autorización por rol y orquestación de repositorios y servicios.

pub mod auth_controller;
pub mod booking_controller;
pub mod vehicle_controller;
