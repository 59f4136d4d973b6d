// src/handlers/veterinarians.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::registry::{CreateVeterinarianPayload, UpdateVeterinarianPayload, VeterinarianDetail},
};

#[utoipa::path(
    post,
    path = "/api/veterinarians",
    tag = "Veterinarians",
    request_body = CreateVeterinarianPayload,
    responses(
        (status = 201, description = "Veterinário cadastrado", body = VeterinarianDetail),
        (status = 404, description = "Cidade não encontrada"),
        (status = 409, description = "CRMV já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_veterinarian(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateVeterinarianPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let veterinarian = app_state.veterinarian_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(veterinarian)))
}

#[utoipa::path(
    get,
    path = "/api/veterinarians",
    tag = "Veterinarians",
    responses((status = 200, description = "Veterinários", body = Vec<VeterinarianDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_veterinarians(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<VeterinarianDetail>>, AppError> {
    Ok(Json(app_state.veterinarian_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/veterinarians/{id}",
    tag = "Veterinarians",
    params(("id" = Uuid, Path, description = "ID do veterinário")),
    responses(
        (status = 200, description = "Veterinário", body = VeterinarianDetail),
        (status = 404, description = "Veterinário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_veterinarian(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VeterinarianDetail>, AppError> {
    Ok(Json(app_state.veterinarian_service.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/veterinarians/{id}",
    tag = "Veterinarians",
    params(("id" = Uuid, Path, description = "ID do veterinário")),
    request_body = UpdateVeterinarianPayload,
    responses(
        (status = 200, description = "Veterinário atualizado", body = VeterinarianDetail),
        (status = 409, description = "CRMV já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_veterinarian(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVeterinarianPayload>,
) -> Result<Json<VeterinarianDetail>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.veterinarian_service.update(&user.caller(), id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/veterinarians/{id}",
    tag = "Veterinarians",
    params(("id" = Uuid, Path, description = "ID do veterinário")),
    responses(
        (status = 204, description = "Veterinário removido"),
        (status = 400, description = "Veterinário com consultas vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_veterinarian(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.veterinarian_service.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
