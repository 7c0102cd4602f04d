//! Middleware de autenticación JWT
//!
//! Este módulo define el extractor `AuthUser`: la identidad autenticada se
//! pasa explícitamente a cada handler como parámetro, nunca como estado
//! ambiental global.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Identidad autenticada extraída del JWT del request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Falta el header Authorization".to_string())
            })?;

        let token = extract_token_from_header(auth_header)?;
        let claims = verify_token(token, &state.jwt)?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Subject del token inválido".to_string()))?;

        let role = UserRole::from_str(&claims.role)
            .ok_or_else(|| AppError::Jwt(format!("Rol desconocido: {}", claims.role)))?;

        Ok(AuthUser {
            id,
            email: claims.email,
            role,
        })
    }
}
