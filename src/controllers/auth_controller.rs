use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        // Verificar que el email no exista
        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        // Hash de la contraseña
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = User::new(request.name, request.email, password_hash, request.role);
        let saved = self.repository.create(&user).await?;

        let token = generate_token(saved.id, &saved.email, request.role, &self.jwt)?;

        tracing::info!("Usuario registrado: {} ({})", saved.email, saved.role);

        Ok(AuthResponse::success(token, saved.into()))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        // Buscar usuario por email
        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        // Verificar contraseña
        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let role = user
            .role()
            .ok_or_else(|| AppError::Internal(format!("Rol desconocido en DB: {}", user.role)))?;

        let token = generate_token(user.id, &user.email, role, &self.jwt)?;

        Ok(AuthResponse::success(token, user.into()))
    }
}
